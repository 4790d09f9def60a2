//! Power-of-two row-size rounding used by the capture hardware.

/// Rounds `size` down to a multiple of `align`.
///
/// `align` must be a power of two.
#[inline]
pub const fn align_down(size: usize, align: usize) -> usize {
    size & !(align - 1)
}

/// Rounds `size` up to a multiple of `align`.
///
/// `align` must be a power of two.
#[inline]
pub const fn align_up(size: usize, align: usize) -> usize {
    align_down(size + align - 1, align)
}
