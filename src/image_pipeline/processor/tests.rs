use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::debayer::{BayerConverter, ChannelOrder, ColorImage16};
use crate::image_pipeline::processor::{ProcessedFrame, ProcessorConfig, RawProcessor, ToneMapping};
use crate::image_pipeline::raw::{BayerMosaic16, pack_raw10};
use crate::image_pipeline::tone::{ToneCurve, ToneLut};

/// Copies each mosaic sample into all three channels.
struct MockConverter {
    should_fail: bool,
    orders_seen: Arc<Mutex<Vec<ChannelOrder>>>,
}

impl MockConverter {
    fn new() -> Self {
        Self {
            should_fail: false,
            orders_seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }
}

impl BayerConverter for MockConverter {
    fn convert(
        &mut self,
        mosaic: &BayerMosaic16,
        order: ChannelOrder,
        out: &mut ColorImage16,
    ) -> Result<()> {
        if self.should_fail {
            return Err(PipelineError::DebayerError("Mock debayer error".to_string()));
        }
        self.orders_seen.lock().unwrap().push(order);
        for (dst, &v) in out.data.chunks_exact_mut(3).zip(mosaic.data.iter()) {
            dst.fill(v);
        }
        Ok(())
    }
}

fn identity_curves() -> [ToneCurve; 3] {
    [ToneCurve::identity(), ToneCurve::identity(), ToneCurve::identity()]
}

fn config(width: usize, height: usize) -> ProcessorConfig {
    ProcessorConfig::builder().dimensions(width, height).build()
}

#[test]
fn test_config_builder() {
    let config = ProcessorConfig::builder()
        .dimensions(640, 480)
        .channel_order(ChannelOrder::Rgb)
        .curves(identity_curves())
        .gamma(1.8)
        .lut_in_range(512)
        .frame_budget(Some(Duration::from_millis(33)))
        .build();

    assert_eq!(config.width, 640);
    assert_eq!(config.height, 480);
    assert_eq!(config.channel_order, ChannelOrder::Rgb);
    assert!(matches!(config.tone, ToneMapping::Curves(_)));
    assert_eq!(config.gamma, 1.8);
    assert_eq!(config.lut_in_range, 512);
    assert_eq!(config.frame_budget, Some(Duration::from_millis(33)));
}

#[test]
fn test_config_defaults() {
    let config = ProcessorConfig::builder().dimensions(16, 4).build();
    assert_eq!(config.channel_order, ChannelOrder::Bgr);
    assert!(matches!(config.tone, ToneMapping::Linear));
    assert_eq!(config.lut_in_range, 1024);
    assert_eq!(config.gamma, 2.2);
    assert_eq!(config.frame_budget, None);
}

#[test]
fn test_all_zero_frame_end_to_end() {
    let data = vec![0u8; 32 * 4];

    let mut linear = RawProcessor::with_converter(MockConverter::new(), config(16, 4)).unwrap();
    {
        let out = linear.process(&data).unwrap();
        let img = out.as_linear().expect("linear output");
        assert_eq!(img.shape(), (4, 16, 3));
        assert!(img.data.iter().all(|&v| v == 0));
    }
    assert!(linear.mosaic().data.iter().all(|&v| v == 0));

    let lut = Arc::new(ToneLut::identity(1024).unwrap());
    let mapped_config = ProcessorConfig::builder().dimensions(16, 4).lut(lut).build();
    let mut mapped = RawProcessor::with_converter(MockConverter::new(), mapped_config).unwrap();
    let out = mapped.process(&data).unwrap();
    assert_eq!((out.width(), out.height()), (16, 4));
    let img = out.as_tone_mapped().expect("tone mapped output");
    assert_eq!(img.shape(), (4, 16, 3));
    assert!(img.data.iter().all(|&v| v == 0));
}

#[test]
fn test_linear_output_carries_unpacked_values() {
    let samples: Vec<u16> = (0..64).map(|v| v * 16).collect();
    let packed = pack_raw10(&samples, 16, 4).unwrap();
    let mut processor = RawProcessor::with_converter(MockConverter::new(), config(16, 4)).unwrap();

    let out = processor.process(&packed).unwrap();
    let img = out.as_linear().unwrap();
    for (pixel, &v) in img.data.chunks_exact(3).zip(samples.iter()) {
        assert_eq!(pixel, &[v, v, v]);
    }
}

#[test]
fn test_curves_are_compiled_once_at_construction() {
    let config = ProcessorConfig::builder()
        .dimensions(16, 4)
        .curves(identity_curves())
        .gamma(1.0)
        .build();
    let mut processor = RawProcessor::with_converter(MockConverter::new(), config).unwrap();
    let lut = Arc::clone(processor.lut().expect("lut compiled"));

    let samples = vec![400u16; 64];
    let packed = pack_raw10(&samples, 16, 4).unwrap();
    for _ in 0..3 {
        let out = processor.process(&packed).unwrap();
        assert!(matches!(out, ProcessedFrame::ToneMapped(_)));
        assert!(out.as_tone_mapped().unwrap().data.iter().all(|&v| v == 100));
    }

    assert!(Arc::ptr_eq(&lut, processor.lut().unwrap()));
    assert_eq!(processor.frames_processed(), 3);
}

#[test]
fn test_shared_lut_across_processors() {
    let lut = Arc::new(ToneLut::identity(1024).unwrap());
    let a = RawProcessor::with_converter(
        MockConverter::new(),
        ProcessorConfig::builder().dimensions(16, 4).lut(Arc::clone(&lut)).build(),
    )
    .unwrap();
    let b = RawProcessor::with_converter(
        MockConverter::new(),
        ProcessorConfig::builder().dimensions(32, 8).lut(Arc::clone(&lut)).build(),
    )
    .unwrap();

    assert!(Arc::ptr_eq(a.lut().unwrap(), b.lut().unwrap()));
    assert_eq!(Arc::strong_count(&lut), 3);
}

#[test]
fn test_degenerate_curve_fails_construction() {
    let config = ProcessorConfig::builder()
        .dimensions(16, 4)
        .curves([
            ToneCurve::identity(),
            ToneCurve::identity(),
            ToneCurve::new([(0u8, 0u8)]),
        ])
        .build();
    let result = RawProcessor::with_converter(MockConverter::new(), config);
    assert!(matches!(result.err(), Some(PipelineError::DegenerateCurve(_))));
}

#[test]
fn test_invalid_dimensions_fail_construction() {
    let result = RawProcessor::with_converter(MockConverter::new(), config(12, 4));
    assert!(matches!(result.err(), Some(PipelineError::InvalidDimensions(12, 4))));

    let result = RawProcessor::with_converter(MockConverter::new(), config(16, 0));
    assert!(matches!(result.err(), Some(PipelineError::InvalidDimensions(16, 0))));
}

#[test]
fn test_short_frame_then_recovery() {
    let mut processor = RawProcessor::with_converter(MockConverter::new(), config(16, 4)).unwrap();
    assert_eq!(processor.frame_len(), 128);

    let short = vec![0u8; 127];
    assert!(matches!(
        processor.process(&short).unwrap_err(),
        PipelineError::SizeMismatch { expected: 128, actual: 127 }
    ));
    assert_eq!(processor.frames_processed(), 0);

    let samples = vec![7u16; 64];
    let packed = pack_raw10(&samples, 16, 4).unwrap();
    let out = processor.process(&packed).unwrap();
    assert!(out.as_linear().unwrap().data.iter().all(|&v| v == 7));
    assert_eq!(processor.frames_processed(), 1);
}

#[test]
fn test_converter_failure_is_propagated() {
    let mut processor =
        RawProcessor::with_converter(MockConverter::failing(), config(16, 4)).unwrap();
    let data = vec![0u8; 128];
    assert!(matches!(
        processor.process(&data).unwrap_err(),
        PipelineError::DebayerError(_)
    ));
    assert_eq!(processor.frames_processed(), 0);
}

#[test]
fn test_channel_order_is_passed_to_converter() {
    let converter = MockConverter::new();
    let seen = Arc::clone(&converter.orders_seen);
    let config = ProcessorConfig::builder()
        .dimensions(16, 4)
        .channel_order(ChannelOrder::Rgb)
        .build();
    let mut processor = RawProcessor::with_converter(converter, config).unwrap();
    processor.process(&[0u8; 128]).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![ChannelOrder::Rgb]);
}

#[test]
fn test_preview_uses_owned_buffer() {
    let data: Vec<u8> = (0..32 * 8).map(|i| i as u8).collect();
    let mut processor = RawProcessor::with_converter(MockConverter::new(), config(16, 8)).unwrap();
    let preview = processor.preview(&data).unwrap();
    assert_eq!(preview.shape(), (2, 4, 3));
    assert_eq!(preview.pixel(0, 0), [0, 1, 33]);

    assert!(matches!(
        processor.preview(&data[..100]).unwrap_err(),
        PipelineError::SizeMismatch { .. }
    ));
}

#[test]
fn test_cpu_debayer_processor() {
    let samples = vec![300u16; 16 * 4];
    let packed = pack_raw10(&samples, 16, 4).unwrap();
    let mut processor = RawProcessor::new(config(16, 4)).unwrap();
    let out = processor.process(&packed).unwrap();
    assert!(out.as_linear().unwrap().data.iter().all(|&v| v == 300));
}
