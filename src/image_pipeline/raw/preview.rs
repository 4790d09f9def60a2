//! Quarter-resolution live preview decoded directly from packed RAW10 bytes.
//!
//! This is a visual approximation for fast feedback, not a color-accurate
//! decode. Each output pixel takes the high bytes of two neighbouring samples
//! on one sensor row and one sample from the row below, which lands roughly on
//! a B/G/R triple of the Bayer neighbourhood. Output is expected to match
//! byte-for-byte, so the offsets are fixed.

use tracing::trace;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::debayer::types::PreviewFrame;
use crate::image_pipeline::raw::types::{PackedFrame, RAW10_GROUP_BYTES, RAW10_GROUP_SAMPLES};

/// Downscale factor of the preview along each axis.
pub const PREVIEW_SCALE: usize = 4;

/// Decodes a `(height / 4) x (width / 4) x 3` preview into `out`.
///
/// # Errors
///
/// * `InvalidDimensions` - `out` is not a quarter of the frame dimensions
pub fn decode_quarter_preview_into(frame: &PackedFrame<'_>, out: &mut PreviewFrame) -> Result<()> {
    let out_width = frame.width() / PREVIEW_SCALE;
    let out_height = frame.height() / PREVIEW_SCALE;
    if out.width != out_width || out.height != out_height || out.data.len() != out_width * out_height * 3 {
        return Err(PipelineError::InvalidDimensions(out.width, out.height));
    }

    let data = frame.data();
    let stride = frame.stride();
    let skip = stride * PREVIEW_SCALE;
    let groups = frame.width() / RAW10_GROUP_SAMPLES;

    trace!(out_width, out_height, stride, "Decoding quarter preview");

    let mut k = 0;
    for y in 0..out_height {
        let mut j = y * skip;
        for _ in 0..groups {
            out.data[k] = data[j];
            out.data[k + 1] = data[j + 1];
            out.data[k + 2] = data[j + stride + 1];
            j += RAW10_GROUP_BYTES;
            k += 3;
        }
    }

    Ok(())
}

impl PackedFrame<'_> {
    /// Decodes a newly allocated quarter-resolution preview.
    pub fn quarter_preview(&self) -> Result<PreviewFrame> {
        let mut preview =
            PreviewFrame::new(self.width() / PREVIEW_SCALE, self.height() / PREVIEW_SCALE);
        decode_quarter_preview_into(self, &mut preview)?;
        Ok(preview)
    }
}
