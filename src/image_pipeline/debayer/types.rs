//! Types for debayering operations

/// Channel order of an interleaved 3-channel image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    /// [B, G, R, B, G, R, ...]
    #[default]
    Bgr,
    /// [R, G, B, R, G, B, ...]
    Rgb,
}

/// Interleaved 3-channel image, `height x width x 3` samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorImage<T> {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Interleaved pixel data, row-major
    pub data: Vec<T>,
}

impl<T: Copy + Default> ColorImage<T> {
    /// Allocates a zeroed image.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height * 3],
        }
    }

    /// `(height, width, channels)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height, self.width, 3)
    }

    pub fn pixel(&self, x: usize, y: usize) -> [T; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

/// Linear 16-bit color image, the output of the color conversion step.
pub type ColorImage16 = ColorImage<u16>;

/// 8-bit color image, either tone-mapped output or an annotated preview.
pub type ColorImage8 = ColorImage<u8>;

/// Quarter-resolution 8-bit preview decoded straight from packed bytes.
pub type PreviewFrame = ColorImage8;
