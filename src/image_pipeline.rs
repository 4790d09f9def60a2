//! Image processing pipeline module
//!
//! This module turns packed RAW10 sensor frames into linear or tone-mapped
//! color images, with separate modules for RAW unpacking, color conversion,
//! tone mapping, clipping overlays, per-frame orchestration and TIFF output.

pub mod common;
pub mod raw;
pub mod debayer;
pub mod tone;
pub mod zebra;
pub mod processor;
pub mod tiff;

pub use common::{
    PipelineError,
    Result,
    align_down,
    align_up,
};

pub use raw::{
    BayerMosaic16,
    PackedFrame,
    decode_quarter_preview_into,
    pack_raw10,
    unpack_raw10_into,
};

pub use debayer::{
    BayerConverter,
    ChannelOrder,
    ColorImage8,
    ColorImage16,
    CpuDebayer,
    PreviewFrame,
};

pub use tone::{
    CurvePoint,
    ToneCurve,
    ToneLut,
    apply_lut_into,
};

pub use zebra::apply_zebra;

pub use processor::{
    ProcessedFrame,
    ProcessorConfig,
    ProcessorConfigBuilder,
    RawProcessor,
    ToneMapping,
};

pub use self::tiff::{
    FrameWriter,
    StandardTiffWriter,
    TiffCompression,
    TiffConfig,
};
