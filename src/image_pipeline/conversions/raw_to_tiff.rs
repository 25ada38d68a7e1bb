use tracing::{info, instrument};
use std::io::Write;

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    conversions::ImageEncoder,
    raw::{FrontierRawReader, RawImageReader, RgbImageData},
    tiff::{TiffWriter, StandardTiffWriter, ConversionConfig},
};

pub struct RawToTiffPipeline<R: RawImageReader = FrontierRawReader, W: TiffWriter = StandardTiffWriter> {
    reader: R,
    writer: W,
    config: ConversionConfig,
}

impl RawToTiffPipeline<FrontierRawReader, StandardTiffWriter> {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            reader: FrontierRawReader,
            writer: StandardTiffWriter,
            config,
        }
    }
}

impl<R: RawImageReader, W: TiffWriter> RawToTiffPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ConversionConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    /// Decodes a whole scan file into an in-memory image.
    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn decode(&self, input_data: &[u8]) -> Result<RgbImageData> {
        let image = self.reader.read_raw(input_data)?;
        self.validate_dimensions(image.width, image.height)?;

        info!(height = image.height, width = image.width, "Decoded scan");
        Ok(image)
    }

    /// Encodes a decoded image as TIFF into `output`.
    pub fn encode(&self, image: &RgbImageData, output: &mut dyn Write) -> Result<()> {
        let _span = tracing::info_span!("encode_tiff").entered();
        self.writer.write_rgb_tiff(image, output, &self.config)
    }

    /// Decodes and encodes in one step, without handing the image to a sink.
    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8], output: &mut dyn Write) -> Result<()> {
        info!("Starting scan to TIFF conversion");

        let image = self.decode(input_data)?;
        self.encode(&image, output)?;

        info!(
            width = image.width,
            height = image.height,
            "Conversion complete"
        );
        Ok(())
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }
}

impl<R: RawImageReader, W: TiffWriter> ImageEncoder for RawToTiffPipeline<R, W> {
    fn encode(&self, image: &RgbImageData, output: &mut dyn Write) -> Result<()> {
        RawToTiffPipeline::encode(self, image, output)
    }
}
