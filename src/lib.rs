//! A Rust library for encoding raster images as GIF87a and baseline JPEG.
//!
//! Both encoders are single-shot library calls: give them the image, the
//! encoding parameters and any `std::io::Write` sink. Every working structure
//! (LZW dictionary, bit accumulators, quantization and Huffman tables) is
//! created for the call and dropped with it.
//!
//! # Quick Start
//!
//! ```
//! use raster_encoder::{
//!     encode_gif_to_vec, encode_jpeg_to_vec, GifParams, IndexedImage, JpegParams, Palette,
//!     Pixel, Pixmap,
//! };
//!
//! // Indexed GIF from a pre-reduced palette
//! let palette = Palette::new(vec![Pixel::new(255, 0, 0), Pixel::new(0, 255, 0)])?;
//! let image = IndexedImage::new(2, 2, vec![0, 1, 1, 0])?;
//! let gif = encode_gif_to_vec(&image, &palette, &GifParams::default())?;
//! assert!(gif.starts_with(b"GIF87a"));
//!
//! // Baseline JPEG from RGB samples
//! let pixmap = Pixmap::from_fn(16, 16, |x, y| Pixel::new(x as u8 * 16, y as u8 * 16, 128));
//! let jpeg = encode_jpeg_to_vec(&pixmap, &JpegParams::new().with_quality(90))?;
//! assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
//! # Ok::<(), raster_encoder::EncodeError>(())
//! ```
//!
//! # Errors
//!
//! Invalid input (zero-sized images, oversized or missing palettes, indices
//! outside the palette) is rejected before anything is written. Sink errors
//! abort the encode; partial output should be discarded.
//!
//! # Logging
//!
//! Diagnostics go through the `log` facade. Install any logger to see them.

// Core modules
pub mod encode;
pub mod image;
pub mod utils;

// Public encoder API
pub use encode::gif::{encode_gif, encode_gif_rgb, encode_gif_to_vec, GifParams, LzwCompressor};
pub use encode::jpeg::{encode_jpeg, encode_jpeg_to_vec, JpegEncoder, JpegParams};

// Image types
pub use image::image_formats::{IndexedImage, Pixel, Pixmap};
pub use image::palette::Palette;

// Error types
pub use utils::error::{EncodeError, Result};

// Constants
pub const ENCODER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(ENCODER_VERSION, "0.3.0");
    }

    #[test]
    fn test_public_api_gif() -> Result<()> {
        let palette = Palette::new(vec![Pixel::black(), Pixel::white()])?;
        let image = IndexedImage::new(1, 1, vec![1])?;
        let gif = encode_gif_to_vec(&image, &palette, &GifParams::default())?;
        assert_eq!(gif.last(), Some(&0x3B));
        Ok(())
    }

    #[test]
    fn test_public_api_jpeg() -> Result<()> {
        let jpeg = encode_jpeg_to_vec(&Pixmap::from_pixel(1, 1, Pixel::white()), &JpegParams::default())?;
        assert!(jpeg.ends_with(&[0xFF, 0xD9]));
        Ok(())
    }
}
