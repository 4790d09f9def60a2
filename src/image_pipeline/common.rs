//! Common utilities module
//!
//! This module contains shared utilities used across the image pipeline.

pub mod align;
pub mod error;

pub use align::{align_down, align_up};
pub use error::{PipelineError, Result};
