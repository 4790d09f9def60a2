//! Clipping overlay: marks saturated samples with a dashed diagonal stripe.
//!
//! The cursor visits one pixel out of every three along a row scan and skips
//! one extra pixel per row, so consecutive rows are shifted and clipped areas
//! show diagonal dashes instead of being blacked out entirely.

use tracing::trace;

use crate::image_pipeline::debayer::types::ColorImage8;

/// Samples the cursor advances after each visited pixel (3 pixels).
pub const ZEBRA_STRIDE: usize = 9;

/// Extra samples skipped at the end of each row scan (1 pixel).
pub const ZEBRA_ROW_SKIP: usize = 3;

/// Value treated as clipped.
const SATURATED: u8 = 255;

/// Zeroes clipped channels of the visited pixels, in place.
///
/// Because of the per-row skip the cursor drifts ahead of the true row
/// starts; the scan stops as soon as it would run past the end of the buffer.
pub fn apply_zebra(img: &mut ColorImage8) {
    let n = (img.width * img.height * 3).min(img.data.len());
    let data = &mut img.data[..n];

    let mut i = 0;
    let mut marked = 0usize;
    'rows: for _ in 0..img.height {
        for _ in 0..img.width / 3 {
            if i + 2 >= n {
                break 'rows;
            }
            for sample in &mut data[i..i + 3] {
                if *sample == SATURATED {
                    *sample = 0;
                    marked += 1;
                }
            }
            i += ZEBRA_STRIDE;
        }
        i += ZEBRA_ROW_SKIP;
        if i > n {
            break;
        }
    }

    trace!(marked, "Applied zebra overlay");
}
