//! Tone mapping: per-channel tone curves baked into lookup tables.

pub mod curve;
pub mod lut;

pub use curve::{CurvePoint, ToneCurve};
pub use lut::{DEFAULT_GAMMA, DEFAULT_LUT_IN_RANGE, ToneLut, apply_lut_into};
