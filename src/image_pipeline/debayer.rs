//! Debayering module for converting Bayer pattern RAW images to RGB
//!
//! Color conversion sits behind the [`BayerConverter`] trait so the frame
//! processor can run with any demosaic backend.

pub mod cpu_debayer;
pub mod converter;
pub mod types;

pub use converter::BayerConverter;
pub use cpu_debayer::CpuDebayer;
pub use types::{ChannelOrder, ColorImage, ColorImage16, ColorImage8, PreviewFrame};
