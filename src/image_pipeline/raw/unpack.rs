//! RAW10 unpacking: strips row padding and widens packed samples to u16.

use tracing::trace;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::raw::types::{
    BayerMosaic16, PackedFrame, RAW10_GROUP_BYTES, RAW10_GROUP_SAMPLES, raw10_stride,
    validate_raw10_dimensions,
};

/// Unpacks `frame` into a caller-owned mosaic without allocating.
///
/// Each 5-byte group holds the upper 8 bits of 4 samples followed by one byte
/// with their low 2 bits at `[1:0]`, `[3:2]`, `[5:4]` and `[7:6]`.
///
/// # Errors
///
/// * `InvalidDimensions` - `out` does not match the frame dimensions
pub fn unpack_raw10_into(frame: &PackedFrame<'_>, out: &mut BayerMosaic16) -> Result<()> {
    let width = frame.width();
    let height = frame.height();
    if out.width != width || out.height != height || out.data.len() != width * height {
        return Err(PipelineError::InvalidDimensions(out.width, out.height));
    }

    trace!(width, height, stride = frame.stride(), "Unpacking RAW10 frame");

    let data = frame.data();
    let stride = frame.stride();
    let groups = width / RAW10_GROUP_SAMPLES;

    let mut k = 0;
    for y in 0..height {
        let mut j = y * stride;
        for _ in 0..groups {
            let low = data[j + 4] as u16;
            out.data[k] = ((data[j] as u16) << 2) | (low & 0x3);
            out.data[k + 1] = ((data[j + 1] as u16) << 2) | ((low >> 2) & 0x3);
            out.data[k + 2] = ((data[j + 2] as u16) << 2) | ((low >> 4) & 0x3);
            out.data[k + 3] = ((data[j + 3] as u16) << 2) | ((low >> 6) & 0x3);
            j += RAW10_GROUP_BYTES;
            k += RAW10_GROUP_SAMPLES;
        }
    }

    Ok(())
}

impl PackedFrame<'_> {
    /// Unpacks into a newly allocated mosaic.
    pub fn unpack(&self) -> Result<BayerMosaic16> {
        let mut mosaic = BayerMosaic16::new(self.width(), self.height());
        unpack_raw10_into(self, &mut mosaic)?;
        Ok(mosaic)
    }
}

/// Packs 10-bit samples into a padded RAW10 buffer, the inverse of
/// [`unpack_raw10_into`]. Samples above 1023 are masked to 10 bits and the
/// row padding is zero-filled.
pub fn pack_raw10(samples: &[u16], width: usize, height: usize) -> Result<Vec<u8>> {
    let frame_len = validate_raw10_dimensions(width, height)?;
    if samples.len() != width * height {
        return Err(PipelineError::SizeMismatch {
            expected: width * height,
            actual: samples.len(),
        });
    }

    let stride = raw10_stride(width);
    let mut packed = vec![0u8; frame_len];
    for (row, dst) in samples.chunks_exact(width).zip(packed.chunks_exact_mut(stride)) {
        for (group, bytes) in row
            .chunks_exact(RAW10_GROUP_SAMPLES)
            .zip(dst.chunks_exact_mut(RAW10_GROUP_BYTES))
        {
            let mut low = 0u8;
            for (i, &sample) in group.iter().enumerate() {
                let sample = sample & 0x3ff;
                bytes[i] = (sample >> 2) as u8;
                low |= ((sample & 0x3) as u8) << (2 * i);
            }
            bytes[4] = low;
        }
    }

    Ok(packed)
}
