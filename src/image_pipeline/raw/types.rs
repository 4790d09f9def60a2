//! RAW sensor buffer types

use crate::image_pipeline::common::align::{align_down, align_up};
use crate::image_pipeline::common::error::{PipelineError, Result};

/// Bits per sample produced by the sensor.
pub const RAW10_BIT_WIDTH: usize = 10;

/// Every packed row starts on a multiple of this many bytes.
pub const ROW_ALIGNMENT: usize = 32;

/// Samples sharing one packed group.
pub const RAW10_GROUP_SAMPLES: usize = 4;

/// Bytes per packed group: 4 high bytes followed by 1 byte of low bits.
pub const RAW10_GROUP_BYTES: usize = 5;

/// Bytes occupied by one packed row, padding included.
///
/// `width` must have passed [`validate_raw10_dimensions`].
#[inline]
pub const fn raw10_stride(width: usize) -> usize {
    align_up(width / 8 * RAW10_BIT_WIDTH, ROW_ALIGNMENT)
}

/// Checks that `width` x `height` can be described by the RAW10 packing and
/// returns the packed frame length in bytes.
///
/// Both dimensions must be non-zero and `width` a multiple of 8 so that the
/// stride formula and the 4-sample grouping are exact. The packed length and
/// the largest working buffer (3 channels of 16-bit samples) must also fit in
/// `usize`.
pub fn validate_raw10_dimensions(width: usize, height: usize) -> Result<usize> {
    let invalid = || PipelineError::InvalidDimensions(width, height);
    if width == 0 || height == 0 || width % 8 != 0 {
        return Err(invalid());
    }

    let frame_len = (width / 8)
        .checked_mul(RAW10_BIT_WIDTH)
        .and_then(|row| row.checked_add(ROW_ALIGNMENT - 1))
        .map(|row| align_down(row, ROW_ALIGNMENT))
        .and_then(|stride| stride.checked_mul(height))
        .ok_or_else(invalid)?;

    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(3 * size_of::<u16>()))
        .ok_or_else(invalid)?;

    Ok(frame_len)
}

/// A borrowed, padded, bit-packed RAW10 frame as delivered by the capture
/// subsystem. Dimensions are supplied out-of-band.
#[derive(Debug, Clone, Copy)]
pub struct PackedFrame<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> PackedFrame<'a> {
    /// Wraps `data` after checking dimensions and buffer length.
    pub fn new(data: &'a [u8], width: usize, height: usize) -> Result<Self> {
        Self::with_bit_width(data, width, height, RAW10_BIT_WIDTH)
    }

    /// Like [`PackedFrame::new`] with an explicit bit width; only 10 is accepted.
    pub fn with_bit_width(
        data: &'a [u8],
        width: usize,
        height: usize,
        bit_width: usize,
    ) -> Result<Self> {
        if bit_width != RAW10_BIT_WIDTH {
            return Err(PipelineError::UnsupportedFormat(format!(
                "{bit_width}-bit packing (only RAW10 is supported)"
            )));
        }
        let expected = validate_raw10_dimensions(width, height)?;
        if data.len() < expected {
            return Err(PipelineError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self { data, width, height })
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bit_width(&self) -> usize {
        RAW10_BIT_WIDTH
    }

    /// Row stride in bytes, `align_up(width / 8 * 10, 32)`.
    pub fn stride(&self) -> usize {
        raw10_stride(self.width)
    }

    /// Minimum buffer length for these dimensions.
    pub fn expected_len(&self) -> usize {
        self.stride() * self.height
    }
}

/// Single-channel sensor mosaic with one 10-bit sample per 16-bit cell.
///
/// The color-filter layout is implied by the sensor, not stored here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BayerMosaic16 {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Row-major samples, `width * height` long
    pub data: Vec<u16>,
}

impl BayerMosaic16 {
    /// Allocates a zeroed mosaic.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }
}
