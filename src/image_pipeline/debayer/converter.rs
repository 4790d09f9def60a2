use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::debayer::types::{ChannelOrder, ColorImage16};
use crate::image_pipeline::raw::types::BayerMosaic16;

/// Converts a single-channel mosaic into an interleaved 3-channel image of the
/// same dimensions.
///
/// Implementations write into `out`, which the caller allocates once and
/// reuses; they may keep their own scratch space between calls.
pub trait BayerConverter {
    fn convert(
        &mut self,
        mosaic: &BayerMosaic16,
        order: ChannelOrder,
        out: &mut ColorImage16,
    ) -> Result<()>;
}
