//! Lookup tables baked from tone curves, and their application to 16-bit
//! images.

use tracing::{debug, info, trace};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::debayer::types::{ColorImage8, ColorImage16};
use crate::image_pipeline::tone::curve::{CURVE_SCALE, ToneCurve};

/// Number of LUT entries per channel, one per 10-bit input value.
pub const DEFAULT_LUT_IN_RANGE: usize = 1024;

/// Display gamma applied after the curve.
pub const DEFAULT_GAMMA: f64 = 2.2;

const CHANNELS: usize = 3;

/// Immutable per-channel lookup table mapping linear samples to 8-bit output.
///
/// Built once at configuration time and never mutated, so it can be shared
/// read-only (e.g. behind an `Arc`) between processors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneLut {
    in_range: usize,
    tables: [Vec<u8>; CHANNELS],
}

impl ToneLut {
    /// Compiles `curves` with the default input range and gamma.
    pub fn from_curves(curves: &[ToneCurve; CHANNELS]) -> Result<Self> {
        Self::compile(curves, DEFAULT_LUT_IN_RANGE, DEFAULT_GAMMA)
    }

    /// Compiles one table per curve, in output channel order.
    ///
    /// Each curve is fitted with a polynomial through its normalized control
    /// points, evaluated at `in_range` evenly spaced inputs in `[0, 1)`,
    /// clamped at 0, raised to `1 / gamma`, scaled by 256, clamped to 255 and
    /// truncated.
    ///
    /// # Errors
    ///
    /// * `DegenerateCurve` - a curve cannot be fitted
    /// * `InvalidLutConfig` - `in_range` is zero or `gamma` is not a positive
    ///   finite number
    pub fn compile(curves: &[ToneCurve; CHANNELS], in_range: usize, gamma: f64) -> Result<Self> {
        if in_range == 0 || in_range > u16::MAX as usize + 1 {
            return Err(PipelineError::InvalidLutConfig(format!(
                "input range must be in 1..=65536, got {in_range}"
            )));
        }
        if !gamma.is_finite() || gamma <= 0.0 {
            return Err(PipelineError::InvalidLutConfig(format!(
                "gamma must be positive and finite, got {gamma}"
            )));
        }

        let inv_gamma = 1.0 / gamma;
        let mut tables: [Vec<u8>; CHANNELS] = Default::default();

        for (channel, (curve, table)) in curves.iter().zip(tables.iter_mut()).enumerate() {
            let poly = curve.fit_polynomial()?;
            debug!(
                channel,
                points = curve.points.len(),
                degree = poly.degree(),
                "Fitted tone curve"
            );

            *table = (0..in_range)
                .map(|i| {
                    let y = poly.eval(i as f64 / in_range as f64).max(0.0);
                    (y.powf(inv_gamma) * CURVE_SCALE).min(255.0) as u8
                })
                .collect();
        }

        info!(in_range, gamma, "Compiled tone LUT");
        Ok(Self { in_range, tables })
    }

    /// A LUT mapping `v` to `v * 256 / in_range`, i.e. identity curves with
    /// unit gamma.
    pub fn identity(in_range: usize) -> Result<Self> {
        let curves = [ToneCurve::identity(), ToneCurve::identity(), ToneCurve::identity()];
        Self::compile(&curves, in_range, 1.0)
    }

    pub fn in_range(&self) -> usize {
        self.in_range
    }

    /// Table for `channel`, `in_range` entries long.
    pub fn table(&self, channel: usize) -> &[u8] {
        &self.tables[channel]
    }

    /// Maps one sample, clamping it to the table range.
    #[inline]
    pub fn lookup(&self, channel: usize, value: u16) -> u8 {
        self.tables[channel][(value as usize).min(self.in_range - 1)]
    }
}

/// Maps every sample of `input` through its channel's table into `out`.
///
/// Values beyond the table range are clamped rather than rejected, sensor
/// noise can exceed the nominal bit depth.
///
/// # Errors
///
/// * `InvalidDimensions` - `out` does not match `input`
pub fn apply_lut_into(input: &ColorImage16, lut: &ToneLut, out: &mut ColorImage8) -> Result<()> {
    if out.width != input.width || out.height != input.height || out.data.len() != input.data.len() {
        return Err(PipelineError::InvalidDimensions(out.width, out.height));
    }

    trace!(width = input.width, height = input.height, "Applying tone LUT");

    let max = lut.in_range - 1;
    let [t0, t1, t2] = &lut.tables;
    for (dst, src) in out.data.chunks_exact_mut(CHANNELS).zip(input.data.chunks_exact(CHANNELS)) {
        dst[0] = t0[(src[0] as usize).min(max)];
        dst[1] = t1[(src[1] as usize).min(max)];
        dst[2] = t2[(src[2] as usize).min(max)];
    }

    Ok(())
}

impl ColorImage16 {
    /// Tone-maps into a newly allocated 8-bit image.
    pub fn apply_lut(&self, lut: &ToneLut) -> Result<ColorImage8> {
        let mut out = ColorImage8::new(self.width, self.height);
        apply_lut_into(self, lut, &mut out)?;
        Ok(out)
    }
}
