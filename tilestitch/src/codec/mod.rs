//! Image codec abstraction.
//!
//! The stitcher never touches image files directly. Decoding tiles and
//! encoding the composite go through [`ImageCodec`], so tests can substitute
//! in-memory images and the pipeline stays independent of file formats.
//!
//! ```text
//! TileIndexBuilder ──decode──► ImageCodec ◄──encode── Stitcher
//!                                  │
//!                            ImageFileCodec
//!                            (image crate)
//! ```

mod file;

pub use file::{ImageFileCodec, PnmEncoding};

use std::path::Path;

use image::{DynamicImage, ImageResult};

/// Reads and writes pixel buffers.
///
/// Implementations must preserve the channel layout and bit depth of decoded
/// images: a 16-bit grayscale file decodes to `ImageLuma16`, not RGBA.
pub trait ImageCodec: Send + Sync {
    /// Decode the image stored at `path`.
    fn decode(&self, path: &Path) -> ImageResult<DynamicImage>;

    /// Encode `image` to `path`, replacing any existing file.
    fn encode(&self, image: &DynamicImage, path: &Path) -> ImageResult<()>;
}
