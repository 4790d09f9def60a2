use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, debug_span, info, instrument, warn};

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::debayer::{
    BayerConverter, ColorImage8, ColorImage16, CpuDebayer, PreviewFrame,
};
use crate::image_pipeline::processor::types::{ProcessorConfig, ToneMapping};
use crate::image_pipeline::raw::types::validate_raw10_dimensions;
use crate::image_pipeline::raw::{
    BayerMosaic16, PREVIEW_SCALE, PackedFrame, decode_quarter_preview_into, unpack_raw10_into,
};
use crate::image_pipeline::tone::{ToneLut, apply_lut_into};

/// Output of one [`RawProcessor::process`] call.
///
/// Borrows the processor's working buffers, so it must be dropped (or copied
/// out) before the next frame is submitted.
#[derive(Debug, Clone, Copy)]
pub enum ProcessedFrame<'a> {
    /// Linear 16-bit color image, no tone mapping configured
    Linear(&'a ColorImage16),
    /// 8-bit image mapped through the configured LUT
    ToneMapped(&'a ColorImage8),
}

impl<'a> ProcessedFrame<'a> {
    pub fn width(&self) -> usize {
        match self {
            Self::Linear(img) => img.width,
            Self::ToneMapped(img) => img.width,
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Self::Linear(img) => img.height,
            Self::ToneMapped(img) => img.height,
        }
    }

    pub fn as_linear(&self) -> Option<&'a ColorImage16> {
        match *self {
            Self::Linear(img) => Some(img),
            Self::ToneMapped(_) => None,
        }
    }

    pub fn as_tone_mapped(&self) -> Option<&'a ColorImage8> {
        match *self {
            Self::ToneMapped(img) => Some(img),
            Self::Linear(_) => None,
        }
    }
}

/// Turns packed RAW10 frames of one fixed resolution into color images.
///
/// All working buffers are allocated at construction and reused, the per-frame
/// path does not allocate. An instance must be driven by a single caller at a
/// time; it holds no locks and is not meant to be shared across threads while
/// processing. The LUT, once built, is immutable and may be shared.
pub struct RawProcessor<C: BayerConverter = CpuDebayer> {
    converter: C,
    config: ProcessorConfig,
    lut: Option<Arc<ToneLut>>,
    mosaic: BayerMosaic16,
    img16: ColorImage16,
    img8: Option<ColorImage8>,
    preview: PreviewFrame,
    frame_len: usize,
    frames_processed: u64,
}

impl RawProcessor<CpuDebayer> {
    /// Creates a processor using the CPU demosaic.
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        let mut debayer = CpuDebayer::new()?;
        debayer.reserve(config.width, config.height);
        Self::with_converter(debayer, config)
    }
}

impl<C: BayerConverter> RawProcessor<C> {
    /// Creates a processor around a custom color conversion backend.
    ///
    /// # Errors
    ///
    /// * `InvalidDimensions` - width is zero or not a multiple of 8, or height is zero
    /// * `DegenerateCurve` / `InvalidLutConfig` - the configured curves cannot be compiled
    #[instrument(skip(converter, config), fields(width = config.width, height = config.height))]
    pub fn with_converter(converter: C, config: ProcessorConfig) -> Result<Self> {
        let width = config.width;
        let height = config.height;
        let frame_len = validate_raw10_dimensions(width, height)?;

        let lut = match &config.tone {
            ToneMapping::Linear => None,
            ToneMapping::Curves(curves) => Some(Arc::new(ToneLut::compile(
                curves,
                config.lut_in_range,
                config.gamma,
            )?)),
            ToneMapping::Lut(lut) => Some(Arc::clone(lut)),
        };

        let img8 = lut.as_ref().map(|_| ColorImage8::new(width, height));

        info!(
            width,
            height,
            order = ?config.channel_order,
            tone_mapped = lut.is_some(),
            "Frame processor initialized"
        );

        Ok(Self {
            converter,
            lut,
            mosaic: BayerMosaic16::new(width, height),
            img16: ColorImage16::new(width, height),
            img8,
            preview: PreviewFrame::new(width / PREVIEW_SCALE, height / PREVIEW_SCALE),
            frame_len,
            frames_processed: 0,
            config,
        })
    }

    /// Processes one packed frame.
    ///
    /// Unpacks into the owned mosaic, runs color conversion into the owned
    /// 16-bit image and, when a LUT is configured, maps that into the owned
    /// 8-bit image. The returned frame borrows those buffers.
    ///
    /// A failed call leaves the processor usable for the next frame.
    ///
    /// # Errors
    ///
    /// * `SizeMismatch` - `data` is shorter than `stride * height`
    /// * `DebayerError` - the color conversion backend failed
    #[instrument(level = "trace", skip(self, data), fields(len = data.len()))]
    pub fn process(&mut self, data: &[u8]) -> Result<ProcessedFrame<'_>> {
        let started = Instant::now();
        let frame = PackedFrame::new(data, self.config.width, self.config.height)?;

        {
            let _span = debug_span!("unpack").entered();
            unpack_raw10_into(&frame, &mut self.mosaic)?;
        }

        {
            let _span = debug_span!("debayer").entered();
            self.converter
                .convert(&self.mosaic, self.config.channel_order, &mut self.img16)?;
        }

        if let (Some(lut), Some(img8)) = (&self.lut, &mut self.img8) {
            let _span = debug_span!("apply_lut").entered();
            apply_lut_into(&self.img16, lut, img8)?;
        }

        self.frames_processed += 1;
        self.check_budget(started.elapsed());

        Ok(match &self.img8 {
            Some(img8) => ProcessedFrame::ToneMapped(img8),
            None => ProcessedFrame::Linear(&self.img16),
        })
    }

    /// Decodes the quarter-resolution preview of a packed frame into the
    /// owned preview buffer.
    ///
    /// # Errors
    ///
    /// * `SizeMismatch` - `data` is shorter than `stride * height`
    pub fn preview(&mut self, data: &[u8]) -> Result<&PreviewFrame> {
        let frame = PackedFrame::new(data, self.config.width, self.config.height)?;
        decode_quarter_preview_into(&frame, &mut self.preview)?;
        Ok(&self.preview)
    }

    fn check_budget(&self, elapsed: Duration) {
        match self.config.frame_budget {
            Some(budget) if elapsed > budget => warn!(
                frame = self.frames_processed,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                budget_ms = budget.as_secs_f64() * 1000.0,
                "Frame exceeded processing budget"
            ),
            _ => debug!(
                frame = self.frames_processed,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                "Frame processed"
            ),
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// The compiled LUT, if tone mapping is configured.
    pub fn lut(&self) -> Option<&Arc<ToneLut>> {
        self.lut.as_ref()
    }

    /// Mosaic unpacked by the last successful [`process`](Self::process) call.
    pub fn mosaic(&self) -> &BayerMosaic16 {
        &self.mosaic
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Bytes one packed frame occupies.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }
}
