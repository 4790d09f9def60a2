use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::debayer::types::{ChannelOrder, ColorImage8, ColorImage16};
use crate::image_pipeline::tiff::types::TiffConfig;

/// Persists color images; `order` describes how `image` is interleaved.
pub trait FrameWriter {
    fn write_rgb16(
        &self,
        image: &ColorImage16,
        order: ChannelOrder,
        output: &mut dyn Write,
        config: &TiffConfig,
    ) -> Result<()>;

    fn write_rgb8(
        &self,
        image: &ColorImage8,
        order: ChannelOrder,
        output: &mut dyn Write,
        config: &TiffConfig,
    ) -> Result<()>;
}
