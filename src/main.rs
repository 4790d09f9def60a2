use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use picam_raw_rs::image_pipeline::{
    ChannelOrder, ColorImage8, FrameWriter, PipelineError, ProcessedFrame, ProcessorConfig,
    RawProcessor, Result as PipelineResult, StandardTiffWriter, TiffCompression, TiffConfig,
    ToneCurve, apply_zebra,
};
use picam_raw_rs::logger;

use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "picam-raw")]
#[command(about = "Unpack and tone-map RAW10 sensor dumps")]
#[command(long_about = "Reads one or more back-to-back packed RAW10 frames from a file, \
unpacks and debayers them, optionally applies per-channel tone curves, and writes \
the results (and optional quarter-resolution previews) as TIFF files.")]
struct Args {
    #[arg(help = "File holding one or more packed RAW10 frames")]
    input: PathBuf,

    #[arg(long, help = "Sensor width in pixels (multiple of 8)")]
    width: usize,

    #[arg(long, help = "Sensor height in pixels")]
    height: usize,

    #[arg(long = "curve", value_name = "X:Y,X:Y,...",
          help = "Tone curve control points, given once per output channel (3 times) or not at all")]
    curves: Vec<String>,

    #[arg(long, default_value_t = 2.2, help = "Gamma applied after the tone curves")]
    gamma: f64,

    #[arg(long, value_enum, default_value = "bgr", help = "Output channel order")]
    order: OrderArg,

    #[arg(long, help = "Mark clipped pixels in 8-bit outputs")]
    zebra: bool,

    #[arg(long, help = "Also write quarter-resolution previews")]
    preview: bool,

    #[arg(short, long, help = "Directory for TIFF output; nothing is written when omitted")]
    output_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "none", help = "TIFF compression")]
    compression: CompressionArg,

    #[arg(long, help = "Use horizontal differencing before compression")]
    predictor: bool,

    #[arg(long, help = "Warn when a frame takes longer than this many milliseconds")]
    frame_budget_ms: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderArg {
    Bgr,
    Rgb,
}

impl From<OrderArg> for ChannelOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Bgr => ChannelOrder::Bgr,
            OrderArg::Rgb => ChannelOrder::Rgb,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CompressionArg {
    None,
    Lzw,
    DeflateFast,
    Deflate,
    DeflateBest,
}

impl From<CompressionArg> for TiffCompression {
    fn from(compression: CompressionArg) -> Self {
        match compression {
            CompressionArg::None => TiffCompression::None,
            CompressionArg::Lzw => TiffCompression::Lzw,
            CompressionArg::DeflateFast => TiffCompression::DeflateFast,
            CompressionArg::Deflate => TiffCompression::DeflateBalanced,
            CompressionArg::DeflateBest => TiffCompression::DeflateBest,
        }
    }
}

/// Horizontal differencing, the only predictor the writer emits.
const HORIZONTAL_PREDICTOR: u16 = 2;

fn build_tiff_config(compression: CompressionArg, predictor: bool) -> TiffConfig {
    TiffConfig::builder()
        .compression(compression.into())
        .predictor(predictor.then_some(HORIZONTAL_PREDICTOR))
        .build()
}

/// Parses `"0:0,128:150,255:255"` into a curve.
fn parse_curve(text: &str) -> anyhow::Result<ToneCurve> {
    let points = text
        .split(',')
        .map(|pair| -> anyhow::Result<(u8, u8)> {
            let (x, y) = pair
                .trim()
                .split_once(':')
                .with_context(|| format!("control point '{pair}' is not X:Y"))?;
            Ok((x.trim().parse::<u8>()?, y.trim().parse::<u8>()?))
        })
        .collect::<anyhow::Result<Vec<_>>>()
        .with_context(|| format!("invalid curve '{text}'"))?;
    Ok(ToneCurve::new(points))
}

fn write_tiff(
    path: &Path,
    write: impl FnOnce(&mut File) -> PipelineResult<()>,
) -> anyhow::Result<()> {
    let mut file = File::create(path)
        .map_err(|e| PipelineError::OutputWriteError(format!("{}: {}", path.display(), e)))?;
    write(&mut file)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let order = ChannelOrder::from(args.order);
    let mut builder = ProcessorConfig::builder()
        .dimensions(args.width, args.height)
        .channel_order(order)
        .gamma(args.gamma)
        .frame_budget(args.frame_budget_ms.map(Duration::from_millis));

    match args.curves.len() {
        0 => {}
        3 => {
            let curves = args
                .curves
                .iter()
                .map(|c| parse_curve(c))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let curves: [ToneCurve; 3] = curves
                .try_into()
                .map_err(|_| anyhow::anyhow!("expected exactly 3 curves"))?;
            builder = builder.curves(curves);
        }
        n => bail!("--curve must be given 0 or 3 times, got {n}"),
    }

    let mut processor = RawProcessor::new(builder.build())?;

    let input = std::fs::read(&args.input)
        .map_err(|e| PipelineError::InputReadError(format!("{}: {}", args.input.display(), e)))?;

    let frame_len = processor.frame_len();
    let frame_count = input.len() / frame_len;
    if frame_count == 0 {
        return Err(PipelineError::SizeMismatch {
            expected: frame_len,
            actual: input.len(),
        }
        .into());
    }
    if input.len() % frame_len != 0 {
        warn!(
            trailing = input.len() % frame_len,
            "Input has trailing bytes after the last full frame"
        );
    }

    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }

    let tiff_config = build_tiff_config(args.compression, args.predictor);
    let writer = StandardTiffWriter;

    info!(
        input = %args.input.display(),
        frames = frame_count,
        width = args.width,
        height = args.height,
        "Processing RAW10 frames"
    );

    let started = Instant::now();
    for (index, chunk) in input.chunks_exact(frame_len).enumerate() {
        let frame = processor.process(chunk)?;
        debug!(index, width = frame.width(), height = frame.height(), "Frame ready");

        if let Some(dir) = &args.output_dir {
            let path = dir.join(format!("frame_{index:05}.tiff"));
            match frame {
                ProcessedFrame::Linear(img) => {
                    write_tiff(&path, |f| writer.write_rgb16(img, order, f, &tiff_config))?
                }
                ProcessedFrame::ToneMapped(img) => {
                    let mut img: ColorImage8 = img.clone();
                    if args.zebra {
                        apply_zebra(&mut img);
                    }
                    write_tiff(&path, |f| writer.write_rgb8(&img, order, f, &tiff_config))?
                }
            }
        }

        if args.preview {
            let mut preview = processor.preview(chunk)?.clone();
            if args.zebra {
                apply_zebra(&mut preview);
            }
            if let Some(dir) = &args.output_dir {
                let path = dir.join(format!("preview_{index:05}.tiff"));
                write_tiff(&path, |f| {
                    writer.write_rgb8(&preview, ChannelOrder::Bgr, f, &tiff_config)
                })?;
            }
        }
    }

    let elapsed = started.elapsed();
    info!(
        frames = processor.frames_processed(),
        total_ms = elapsed.as_secs_f64() * 1000.0,
        per_frame_ms = elapsed.as_secs_f64() * 1000.0 / frame_count as f64,
        "Processing complete"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_args_reach_every_level() {
        let cases = [
            ("none", TiffCompression::None),
            ("lzw", TiffCompression::Lzw),
            ("deflate-fast", TiffCompression::DeflateFast),
            ("deflate", TiffCompression::DeflateBalanced),
            ("deflate-best", TiffCompression::DeflateBest),
        ];
        for (name, expected) in cases {
            let arg = CompressionArg::from_str(name, true).unwrap();
            assert_eq!(build_tiff_config(arg, false).compression, expected, "{name}");
        }
    }

    #[test]
    fn test_predictor_flag() {
        let args = Args::try_parse_from([
            "picam-raw", "in.raw", "--width", "16", "--height", "4",
            "--compression", "lzw", "--predictor",
        ])
        .unwrap();
        let config = build_tiff_config(args.compression, args.predictor);
        assert_eq!(config.compression, TiffCompression::Lzw);
        assert_eq!(config.predictor, Some(2));
        assert_eq!(build_tiff_config(CompressionArg::None, false).predictor, None);
    }

    #[test]
    fn test_parse_curve() {
        let curve = parse_curve("0:0, 128:150,255:255").unwrap();
        assert_eq!(curve.points.len(), 3);
        assert_eq!(curve.points[1], picam_raw_rs::image_pipeline::CurvePoint::new(128, 150));
        assert!(parse_curve("0:0,300:10").is_err());
        assert!(parse_curve("0-0").is_err());
    }
}
