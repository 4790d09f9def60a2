use std::io::Cursor;

use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use tracing::{debug, trace};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::debayer::converter::BayerConverter;
use crate::image_pipeline::debayer::types::{ChannelOrder, ColorImage16};
use crate::image_pipeline::raw::types::BayerMosaic16;

/// Bytes per 16-bit sample handed to and returned from the `bayer` crate.
const BYTES_PER_SAMPLE: usize = 2;

/// CPU demosaic of an RGGB mosaic using the `bayer` crate's linear
/// interpolation.
///
/// The byte buffers the `bayer` crate reads from and writes into are kept
/// between frames, so steady-state conversion does not allocate.
pub struct CpuDebayer {
    cfa: CFA,
    algorithm: Demosaic,
    input_bytes: Vec<u8>,
    output_bytes: Vec<u8>,
}

impl CpuDebayer {
    pub fn new() -> Result<Self> {
        Ok(Self::with_pattern(CFA::RGGB, Demosaic::Linear))
    }

    pub fn with_pattern(cfa: CFA, algorithm: Demosaic) -> Self {
        Self {
            cfa,
            algorithm,
            input_bytes: Vec::new(),
            output_bytes: Vec::new(),
        }
    }

    /// Grows the scratch buffers for a `width` x `height` frame.
    pub fn reserve(&mut self, width: usize, height: usize) {
        let pixels = width * height;
        self.input_bytes.resize(pixels * BYTES_PER_SAMPLE, 0);
        self.output_bytes.resize(pixels * 3 * BYTES_PER_SAMPLE, 0);
    }
}

impl BayerConverter for CpuDebayer {
    fn convert(
        &mut self,
        mosaic: &BayerMosaic16,
        order: ChannelOrder,
        out: &mut ColorImage16,
    ) -> Result<()> {
        let width = mosaic.width;
        let height = mosaic.height;
        if out.width != width || out.height != height || out.data.len() != width * height * 3 {
            return Err(PipelineError::InvalidDimensions(out.width, out.height));
        }

        if self.input_bytes.len() != width * height * BYTES_PER_SAMPLE {
            debug!("Resizing debayer scratch buffers for {}x{}", width, height);
            self.reserve(width, height);
        }

        trace!(width, height, ?order, "Running CPU demosaic");

        for (bytes, &sample) in self
            .input_bytes
            .chunks_exact_mut(BYTES_PER_SAMPLE)
            .zip(mosaic.data.iter())
        {
            bytes.copy_from_slice(&sample.to_le_bytes());
        }

        {
            let mut cursor = Cursor::new(&self.input_bytes[..]);
            let mut raster = RasterMut::new(
                width,
                height,
                RasterDepth::Depth16,
                &mut self.output_bytes,
            );
            bayer::run_demosaic(
                &mut cursor,
                BayerDepth::Depth16LE,
                self.cfa,
                self.algorithm,
                &mut raster,
            )
            .map_err(|e| PipelineError::DebayerError(format!("{:?}", e)))?;
        }

        // The raster holds native-endian RGB triples.
        for (dst, src) in out
            .data
            .chunks_exact_mut(3)
            .zip(self.output_bytes.chunks_exact(3 * BYTES_PER_SAMPLE))
        {
            let r = u16::from_ne_bytes([src[0], src[1]]);
            let g = u16::from_ne_bytes([src[2], src[3]]);
            let b = u16::from_ne_bytes([src[4], src[5]]);
            match order {
                ChannelOrder::Rgb => dst.copy_from_slice(&[r, g, b]),
                ChannelOrder::Bgr => dst.copy_from_slice(&[b, g, r]),
            }
        }

        Ok(())
    }
}
