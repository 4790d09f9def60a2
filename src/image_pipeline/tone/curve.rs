//! Tone curve control points and polynomial fitting.

use nalgebra::{DMatrix, DVector};

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Control point coordinates are divided by this before fitting.
pub const CURVE_SCALE: f64 = 256.0;

/// Largest miss allowed at a control point, in normalized units.
///
/// Well below one output level (1/256).
pub const FIT_TOLERANCE: f64 = 1e-6;

/// A single control point, both coordinates in `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurvePoint {
    pub x: u8,
    pub y: u8,
}

impl CurvePoint {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

impl From<(u8, u8)> for CurvePoint {
    fn from((x, y): (u8, u8)) -> Self {
        Self { x, y }
    }
}

/// Ordered control points for one channel.
///
/// Points need not be monotonic; a curve of `n` points is fitted with the
/// unique polynomial of degree `n - 1` through them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneCurve {
    pub points: Vec<CurvePoint>,
}

impl ToneCurve {
    pub fn new(points: impl IntoIterator<Item = impl Into<CurvePoint>>) -> Self {
        Self {
            points: points.into_iter().map(Into::into).collect(),
        }
    }

    /// Straight line from `(0, 0)` to `(255, 255)`.
    pub fn identity() -> Self {
        Self::new([(0u8, 0u8), (255, 255)])
    }

    /// Fits the interpolating polynomial through the normalized points.
    ///
    /// Returns the coefficients in ascending order of power.
    ///
    /// # Errors
    ///
    /// * `DegenerateCurve` - fewer than 2 points, coinciding x-values, or a
    ///   numerically singular system
    pub fn fit_polynomial(&self) -> Result<Polynomial> {
        let n = self.points.len();
        if n < 2 {
            return Err(PipelineError::DegenerateCurve(format!(
                "need at least 2 control points, got {n}"
            )));
        }

        for (i, a) in self.points.iter().enumerate() {
            if let Some(b) = self.points[i + 1..].iter().find(|b| b.x == a.x) {
                return Err(PipelineError::DegenerateCurve(format!(
                    "control points ({}, {}) and ({}, {}) share an x-value",
                    a.x, a.y, b.x, b.y
                )));
            }
        }

        let xs: Vec<f64> = self.points.iter().map(|p| p.x as f64 / CURVE_SCALE).collect();
        let ys: Vec<f64> = self.points.iter().map(|p| p.y as f64 / CURVE_SCALE).collect();

        let vandermonde = DMatrix::from_fn(n, n, |row, col| xs[row].powi(col as i32));
        let rhs = DVector::from_column_slice(&ys);

        let coefficients = vandermonde
            .lu()
            .solve(&rhs)
            .ok_or_else(|| PipelineError::DegenerateCurve("singular polynomial fit".to_string()))?;

        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(PipelineError::DegenerateCurve(
                "polynomial fit is numerically unstable".to_string(),
            ));
        }

        let poly = Polynomial {
            coefficients: coefficients.iter().copied().collect(),
        };

        // Large Vandermonde systems are ill-conditioned; LU still returns
        // finite coefficients that miss the control points.
        let max_residual = xs
            .iter()
            .zip(ys.iter())
            .map(|(&x, &y)| (poly.eval(x) - y).abs())
            .fold(0.0, f64::max);
        if max_residual > FIT_TOLERANCE {
            return Err(PipelineError::DegenerateCurve(format!(
                "polynomial fit is ill-conditioned (max residual {max_residual:.3e} over {n} points)"
            )));
        }

        Ok(poly)
    }
}

/// Polynomial with coefficients in ascending order of power.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    pub coefficients: Vec<f64>,
}

impl Polynomial {
    /// Horner evaluation.
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identity_fit_is_exact_line() {
        let poly = ToneCurve::identity().fit_polynomial().unwrap();
        assert_eq!(poly.degree(), 1);
        assert!(approx_eq(poly.coefficients[0], 0.0));
        assert!(approx_eq(poly.coefficients[1], 1.0));
    }

    #[test]
    fn test_fit_passes_through_control_points() {
        let curve = ToneCurve::new([(0u8, 10u8), (64, 90), (128, 150), (255, 250)]);
        let poly = curve.fit_polynomial().unwrap();
        assert_eq!(poly.degree(), 3);
        for p in &curve.points {
            let x = p.x as f64 / CURVE_SCALE;
            let y = p.y as f64 / CURVE_SCALE;
            assert!(approx_eq(poly.eval(x), y), "({}, {})", p.x, p.y);
        }
    }

    #[test]
    fn test_single_point_is_degenerate() {
        let err = ToneCurve::new([(128u8, 128u8)]).fit_polynomial().unwrap_err();
        assert!(matches!(err, PipelineError::DegenerateCurve(_)));
    }

    #[test]
    fn test_empty_curve_is_degenerate() {
        let curve = ToneCurve { points: Vec::new() };
        assert!(matches!(
            curve.fit_polynomial().unwrap_err(),
            PipelineError::DegenerateCurve(_)
        ));
    }

    #[test]
    fn test_duplicate_x_is_degenerate() {
        let curve = ToneCurve::new([(0u8, 0u8), (100, 80), (100, 120), (255, 255)]);
        assert!(matches!(
            curve.fit_polynomial().unwrap_err(),
            PipelineError::DegenerateCurve(_)
        ));
    }

    fn sqrt_curve(n: usize) -> ToneCurve {
        ToneCurve::new((0..n).map(|i| {
            let x = (i as f64 * 255.0 / (n - 1) as f64).round();
            let y = (255.0 * (x / 255.0).sqrt()).round();
            (x as u8, y as u8)
        }))
    }

    #[test]
    fn test_ill_conditioned_fit_is_degenerate() {
        let err = sqrt_curve(30).fit_polynomial().unwrap_err();
        match err {
            PipelineError::DegenerateCurve(msg) => assert!(msg.contains("ill-conditioned"), "{msg}"),
            other => panic!("expected DegenerateCurve, got {other:?}"),
        }
    }

    #[test]
    fn test_small_sqrt_curve_fits() {
        let curve = sqrt_curve(5);
        let poly = curve.fit_polynomial().unwrap();
        for p in &curve.points {
            let residual = poly.eval(p.x as f64 / CURVE_SCALE) - p.y as f64 / CURVE_SCALE;
            assert!(residual.abs() <= FIT_TOLERANCE);
        }
    }

    #[test]
    fn test_points_need_not_be_monotonic() {
        let curve = ToneCurve::new([(0u8, 0u8), (128, 200), (255, 100)]);
        assert!(curve.fit_polynomial().is_ok());
    }
}
