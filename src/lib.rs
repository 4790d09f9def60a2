//! Real-time ingestion and tone mapping of packed RAW10 camera frames.

pub mod image_pipeline;
pub mod logger;
