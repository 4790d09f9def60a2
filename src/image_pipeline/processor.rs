//! Per-frame processing: the composition root that owns the working buffers
//! and sequences unpacking, color conversion and tone mapping.

mod types;
mod frame_processor;

#[cfg(test)]
mod tests;

pub use types::{ProcessorConfig, ProcessorConfigBuilder, ToneMapping};
pub use frame_processor::{ProcessedFrame, RawProcessor};
