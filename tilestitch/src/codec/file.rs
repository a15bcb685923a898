//! `image` crate backed codec.

use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::str::FromStr;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::error::{UnsupportedError, UnsupportedErrorKind};
use image::{DynamicImage, ImageError, ImageFormat, ImageReader, ImageResult};
use tracing::trace;

use super::ImageCodec;

/// Sample encoding used when writing PBM/PGM/PPM files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PnmEncoding {
    /// Plain text samples (P1/P2/P3).
    #[default]
    Ascii,
    /// Raw samples (P4/P5/P6).
    Binary,
}

impl PnmEncoding {
    fn sample_encoding(self) -> SampleEncoding {
        match self {
            PnmEncoding::Ascii => SampleEncoding::Ascii,
            PnmEncoding::Binary => SampleEncoding::Binary,
        }
    }
}

impl fmt::Display for PnmEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PnmEncoding::Ascii => write!(f, "ascii"),
            PnmEncoding::Binary => write!(f, "binary"),
        }
    }
}

impl FromStr for PnmEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ascii" | "plain" => Ok(PnmEncoding::Ascii),
            "binary" | "raw" => Ok(PnmEncoding::Binary),
            other => Err(format!("expected 'ascii' or 'binary', got '{}'", other)),
        }
    }
}

/// Reads and writes image files with the `image` crate.
///
/// Input format is sniffed from file contents, falling back to the extension.
/// Output format comes from the extension of the output path.
#[derive(Debug, Clone, Default)]
pub struct ImageFileCodec {
    pnm_encoding: PnmEncoding,
}

impl ImageFileCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sample encoding for PNM family outputs.
    pub fn with_pnm_encoding(mut self, encoding: PnmEncoding) -> Self {
        self.pnm_encoding = encoding;
        self
    }

    pub fn pnm_encoding(&self) -> PnmEncoding {
        self.pnm_encoding
    }

    /// Pick the PNM subtype from the output extension.
    ///
    /// `.pam` and unknown PNM extensions use the arbitrary map format.
    fn pnm_subtype(&self, path: &Path) -> PnmSubtype {
        let encoding = self.pnm_encoding.sample_encoding();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("pbm") => PnmSubtype::Bitmap(encoding),
            Some("pgm") => PnmSubtype::Graymap(encoding),
            Some("ppm") => PnmSubtype::Pixmap(encoding),
            _ => PnmSubtype::ArbitraryMap,
        }
    }
}

impl ImageCodec for ImageFileCodec {
    fn decode(&self, path: &Path) -> ImageResult<DynamicImage> {
        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        trace!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "Decoded image"
        );
        Ok(image)
    }

    fn encode(&self, image: &DynamicImage, path: &Path) -> ImageResult<()> {
        let format = ImageFormat::from_path(path)?;

        if format == ImageFormat::Pnm {
            let subtype = self.pnm_subtype(path);
            let bitmap;
            let image = match subtype {
                PnmSubtype::Bitmap(encoding) => {
                    bitmap = bitmap_samples(image, encoding)?;
                    &bitmap
                }
                _ => image,
            };
            let writer = BufWriter::new(File::create(path)?);
            image.write_with_encoder(PnmEncoder::new(writer).with_subtype(subtype))
        } else {
            image.save_with_format(path, format)
        }
    }
}

/// Reduce an 8-bit grayscale image to the 0/1 samples a bitmap header allows.
///
/// Luma at or above the midpoint is white. The PNM encoder packs binary
/// bitmaps with 0 as black but writes plain bitmaps verbatim, where 1 is
/// black, so the sample values depend on the encoding.
fn bitmap_samples(image: &DynamicImage, encoding: SampleEncoding) -> ImageResult<DynamicImage> {
    let DynamicImage::ImageLuma8(luma) = image else {
        return Err(ImageError::Unsupported(
            UnsupportedError::from_format_and_kind(
                ImageFormat::Pnm.into(),
                UnsupportedErrorKind::Color(image.color().into()),
            ),
        ));
    };

    let (black, white) = match encoding {
        SampleEncoding::Binary => (0, 1),
        SampleEncoding::Ascii => (1, 0),
    };
    let mut bits = luma.clone();
    for pixel in bits.pixels_mut() {
        pixel.0[0] = if pixel.0[0] >= 0x80 { white } else { black };
    }
    Ok(DynamicImage::ImageLuma8(bits))
}
