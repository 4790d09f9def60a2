//! Frame processor configuration types

use std::sync::Arc;
use std::time::Duration;

use crate::image_pipeline::debayer::types::ChannelOrder;
use crate::image_pipeline::tone::{DEFAULT_GAMMA, DEFAULT_LUT_IN_RANGE, ToneCurve, ToneLut};

/// How linear 16-bit frames are turned into output.
#[derive(Debug, Clone, Default)]
pub enum ToneMapping {
    /// Return the 16-bit color image as-is
    #[default]
    Linear,
    /// Compile these per-channel curves into a LUT at construction
    Curves(Box<[ToneCurve; 3]>),
    /// Use an already compiled LUT, possibly shared with other processors
    Lut(Arc<ToneLut>),
}

/// Configuration for a [`RawProcessor`](super::RawProcessor)
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Sensor width in pixels, a multiple of 8
    pub width: usize,
    /// Sensor height in pixels
    pub height: usize,
    /// Channel order requested from the color conversion step
    pub channel_order: ChannelOrder,
    /// Tone mapping applied after color conversion
    pub tone: ToneMapping,
    /// LUT entries per channel when compiling curves
    pub lut_in_range: usize,
    /// Gamma exponent when compiling curves
    pub gamma: f64,
    /// Log a warning when a frame takes longer than this
    pub frame_budget: Option<Duration>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            channel_order: ChannelOrder::Bgr,
            tone: ToneMapping::Linear,
            lut_in_range: DEFAULT_LUT_IN_RANGE,
            gamma: DEFAULT_GAMMA,
            frame_budget: None,
        }
    }
}

impl ProcessorConfig {
    pub fn builder() -> ProcessorConfigBuilder {
        ProcessorConfigBuilder::default()
    }
}

/// Builder for ProcessorConfig
#[derive(Default)]
pub struct ProcessorConfigBuilder {
    width: Option<usize>,
    height: Option<usize>,
    channel_order: Option<ChannelOrder>,
    tone: Option<ToneMapping>,
    lut_in_range: Option<usize>,
    gamma: Option<f64>,
    frame_budget: Option<Option<Duration>>,
}

impl ProcessorConfigBuilder {
    pub fn dimensions(mut self, width: usize, height: usize) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn channel_order(mut self, order: ChannelOrder) -> Self {
        self.channel_order = Some(order);
        self
    }

    pub fn curves(mut self, curves: [ToneCurve; 3]) -> Self {
        self.tone = Some(ToneMapping::Curves(Box::new(curves)));
        self
    }

    pub fn lut(mut self, lut: Arc<ToneLut>) -> Self {
        self.tone = Some(ToneMapping::Lut(lut));
        self
    }

    pub fn tone(mut self, tone: ToneMapping) -> Self {
        self.tone = Some(tone);
        self
    }

    pub fn lut_in_range(mut self, in_range: usize) -> Self {
        self.lut_in_range = Some(in_range);
        self
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }

    pub fn frame_budget(mut self, budget: Option<Duration>) -> Self {
        self.frame_budget = Some(budget);
        self
    }

    pub fn build(self) -> ProcessorConfig {
        let default = ProcessorConfig::default();
        ProcessorConfig {
            width: self.width.unwrap_or(default.width),
            height: self.height.unwrap_or(default.height),
            channel_order: self.channel_order.unwrap_or(default.channel_order),
            tone: self.tone.unwrap_or(default.tone),
            lut_in_range: self.lut_in_range.unwrap_or(default.lut_in_range),
            gamma: self.gamma.unwrap_or(default.gamma),
            frame_budget: self.frame_budget.unwrap_or(default.frame_budget),
        }
    }
}
