use std::borrow::Cow;
use std::io::{Cursor, Seek, Write};

use tiff::encoder::colortype::{ColorType, RGB8, RGB16};
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder, TiffValue};
use tiff::tags::Predictor;
use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::debayer::types::{ChannelOrder, ColorImage, ColorImage8, ColorImage16};
use crate::image_pipeline::tiff::types::{TiffCompression, TiffConfig};
use crate::image_pipeline::tiff::writer::FrameWriter;

/// Writes interleaved RGB TIFFs with the `tiff` crate.
pub struct StandardTiffWriter;

impl StandardTiffWriter {
    fn encoder<W: Write + Seek>(output: W, config: &TiffConfig) -> Result<TiffEncoder<W>> {
        let compression = match config.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        let mut encoder = TiffEncoder::new(output)
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?
            .with_compression(compression);

        if let Some(predictor_val) = config.predictor {
            let predictor = match predictor_val {
                2 => Predictor::Horizontal,
                _ => Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        Ok(encoder)
    }

    fn write_image<C>(
        image: &ColorImage<C::Inner>,
        order: ChannelOrder,
        output: &mut dyn Write,
        config: &TiffConfig,
    ) -> Result<()>
    where
        C: ColorType,
        C::Inner: Copy,
        [C::Inner]: TiffValue,
    {
        debug!("Encoding TIFF image: {}x{} ({:?})", image.width, image.height, order);

        // TIFF stores RGB; BGR frames are reordered into a temporary copy.
        let samples: Cow<'_, [C::Inner]> = match order {
            ChannelOrder::Rgb => Cow::Borrowed(&image.data),
            ChannelOrder::Bgr => Cow::Owned(
                image
                    .data
                    .chunks_exact(3)
                    .flat_map(|px| [px[2], px[1], px[0]])
                    .collect(),
            ),
        };

        let mut buffer = Vec::new();
        Self::encoder(Cursor::new(&mut buffer), config)?
            .write_image::<C>(image.width as u32, image.height as u32, &samples)
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

impl FrameWriter for StandardTiffWriter {
    fn write_rgb16(
        &self,
        image: &ColorImage16,
        order: ChannelOrder,
        output: &mut dyn Write,
        config: &TiffConfig,
    ) -> Result<()> {
        Self::write_image::<RGB16>(image, order, output, config)
    }

    fn write_rgb8(
        &self,
        image: &ColorImage8,
        order: ChannelOrder,
        output: &mut dyn Write,
        config: &TiffConfig,
    ) -> Result<()> {
        Self::write_image::<RGB8>(image, order, output, config)
    }
}
