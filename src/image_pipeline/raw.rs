//! RAW sensor buffer handling
//!
//! This module turns padded RAW10 sensor buffers into linear samples, either
//! at full resolution or as a fast quarter-resolution preview.

pub mod types;
mod unpack;
mod preview;

pub use types::{
    BayerMosaic16, PackedFrame, RAW10_BIT_WIDTH, RAW10_GROUP_BYTES, RAW10_GROUP_SAMPLES,
    ROW_ALIGNMENT, raw10_stride,
};
pub use unpack::{pack_raw10, unpack_raw10_into};
pub use preview::{PREVIEW_SCALE, decode_quarter_preview_into};
