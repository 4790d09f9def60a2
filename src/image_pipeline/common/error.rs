use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Packed buffer too short: expected at least {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Degenerate tone curve: {0}")]
    DegenerateCurve(String),

    #[error("Invalid LUT configuration: {0}")]
    InvalidLutConfig(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Color conversion failed: {0}")]
    DebayerError(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
