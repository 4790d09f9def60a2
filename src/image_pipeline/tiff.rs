//! TIFF writing module
//!
//! Persists processed frames and previews with various compression options.

mod writer;
mod standard_tiff_writer;
pub mod types;

pub use writer::FrameWriter;
pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{TiffCompression, TiffConfig, TiffConfigBuilder};
