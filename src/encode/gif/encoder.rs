// src/encode/gif/encoder.rs

//! GIF87a file writer.
//!
//! Emits the signature, logical screen descriptor, global color table, one
//! image descriptor, the LZW image data and the trailer. Interlacing, local
//! color tables and GIF89a extensions are never written.

use super::lzw::write_image_data;
use crate::image::image_formats::{IndexedImage, Pixmap};
use crate::image::palette::{Palette, MIN_BITS_PER_PIXEL};
use crate::utils::error::{check_dimensions, EncodeError, Result};
use crate::utils::write_ext::WriteHeaderExt;
use log::debug;
use std::io::Write;

/// GIF file signature and version.
pub const GIF_SIGNATURE: &[u8; 6] = b"GIF87a";
/// Image descriptor introducer.
pub const IMAGE_SEPARATOR: u8 = 0x2C;
/// End-of-file marker.
pub const GIF_TRAILER: u8 = 0x3B;

/// Configuration for GIF encoding.
#[derive(Debug, Clone, Default)]
pub struct GifParams {
    /// Color table depth in bits (1-8). `None` picks the smallest depth that
    /// holds the palette.
    pub bits_per_pixel: Option<u8>,
    /// Palette index reported as the background color.
    pub background_index: u8,
}

impl GifParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bits_per_pixel(mut self, bits: u8) -> Self {
        self.bits_per_pixel = Some(bits);
        self
    }

    pub fn with_background_index(mut self, index: u8) -> Self {
        self.background_index = index;
        self
    }

    /// Resolves the color table depth for `palette`.
    fn resolve_bits(&self, palette: &Palette) -> Result<u8> {
        match self.bits_per_pixel {
            None => Ok(palette.bits_per_pixel()),
            Some(bits) if !(1..=8).contains(&bits) => Err(EncodeError::InvalidArg(format!(
                "GIF bit depth must be between 1 and 8, got {}",
                bits
            ))),
            Some(bits) if (1usize << bits) < palette.len() => Err(EncodeError::InvalidArg(format!(
                "A {}-bit color table cannot hold {} colors",
                bits,
                palette.len()
            ))),
            Some(bits) => Ok(bits),
        }
    }
}

/// Encodes an indexed image as a GIF87a stream.
///
/// All inputs are validated before anything is written to `sink`.
pub fn encode_gif<W: Write>(
    image: &IndexedImage,
    palette: &Palette,
    params: &GifParams,
    sink: &mut W,
) -> Result<()> {
    check_dimensions(image.width(), image.height())?;
    if let Some(max) = image.max_index() {
        if max as usize >= palette.len() {
            return Err(EncodeError::InvalidIndex {
                index: max,
                palette_len: palette.len(),
            });
        }
    }
    let bits = params.resolve_bits(palette)?;
    let min_code_size = bits.max(MIN_BITS_PER_PIXEL);

    debug!(
        "Encoding GIF {}x{}, {} colors, {} bits per pixel",
        image.width(),
        image.height(),
        palette.len(),
        bits
    );

    // Header and logical screen descriptor
    sink.write_all(GIF_SIGNATURE)?;
    sink.write_le_word(image.width() as u16)?;
    sink.write_le_word(image.height() as u16)?;
    // global table present | color resolution - 1 | unsorted | table size - 1
    let packed = 0x80 | ((bits - 1) << 4) | (bits - 1);
    sink.write_all(&[packed, params.background_index, 0])?;
    sink.write_all(&palette.table_bytes(bits))?;

    // Image descriptor at (0, 0), no local table, not interlaced
    sink.write_all(&[IMAGE_SEPARATOR])?;
    sink.write_le_word(0)?;
    sink.write_le_word(0)?;
    sink.write_le_word(image.width() as u16)?;
    sink.write_le_word(image.height() as u16)?;
    sink.write_all(&[0x00])?;

    write_image_data(image.indices(), min_code_size, sink)?;

    sink.write_all(&[GIF_TRAILER])?;
    sink.flush()?;
    Ok(())
}

/// Palettizes an RGB image (at most 256 distinct colors) and encodes it.
pub fn encode_gif_rgb<W: Write>(pixmap: &Pixmap, params: &GifParams, sink: &mut W) -> Result<()> {
    check_dimensions(pixmap.width(), pixmap.height())?;
    let (palette, image) = Palette::from_pixmap(pixmap)?;
    encode_gif(&image, &palette, params, sink)
}

/// Encodes an indexed image into a freshly allocated buffer.
pub fn encode_gif_to_vec(image: &IndexedImage, palette: &Palette, params: &GifParams) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_gif(image, palette, params, &mut out)?;
    debug!("GIF encoded to {} bytes", out.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::image_formats::Pixel;

    fn red_green() -> Palette {
        Palette::new(vec![Pixel::new(255, 0, 0), Pixel::new(0, 255, 0)]).unwrap()
    }

    #[test]
    fn test_two_by_two_layout() {
        let image = IndexedImage::new(2, 2, vec![0, 1, 1, 0]).unwrap();
        let out = encode_gif_to_vec(&image, &red_green(), &GifParams::default()).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(b"GIF87a");
        expected.extend_from_slice(&[2, 0, 2, 0, 0x91, 0, 0]);
        expected.extend_from_slice(&[255, 0, 0, 0, 255, 0, 0, 0, 0, 0, 0, 0]);
        expected.extend_from_slice(&[0x2C, 0, 0, 0, 0, 2, 0, 2, 0, 0]);
        expected.extend_from_slice(&[2, 3, 0x44, 0x02, 0x05, 0]);
        expected.push(0x3B);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_index_outside_palette_rejected() {
        let image = IndexedImage::new(2, 1, vec![0, 2]).unwrap();
        let mut out = Vec::new();
        let err = encode_gif(&image, &red_green(), &GifParams::default(), &mut out).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidIndex { index: 2, palette_len: 2 }));
        assert!(out.is_empty(), "nothing may be written before validation passes");
    }

    #[test]
    fn test_zero_size_rejected() {
        let image = IndexedImage::new(0, 5, Vec::new()).unwrap();
        let mut out = Vec::new();
        assert!(encode_gif(&image, &red_green(), &GifParams::default(), &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_bit_depth_override() {
        let image = IndexedImage::new(1, 1, vec![1]).unwrap();
        let out = encode_gif_to_vec(&image, &red_green(), &GifParams::new().with_bits_per_pixel(8)).unwrap();
        assert_eq!(out[10], 0xF7);
        // 256-entry table follows the 13-byte header
        assert_eq!(out[13 + 768], IMAGE_SEPARATOR);
        // LZW minimum code size
        assert_eq!(out[13 + 768 + 10], 8);

        let too_small = GifParams::new().with_bits_per_pixel(1);
        let four = Palette::new(vec![Pixel::black(); 4]).unwrap();
        assert!(encode_gif_to_vec(&image, &four, &too_small).is_err());
        assert!(encode_gif_to_vec(&image, &four, &GifParams::new().with_bits_per_pixel(9)).is_err());
    }

    #[test]
    fn test_one_bit_table_keeps_min_code_size_two() {
        let image = IndexedImage::new(1, 1, vec![0]).unwrap();
        let out = encode_gif_to_vec(&image, &red_green(), &GifParams::new().with_bits_per_pixel(1)).unwrap();
        assert_eq!(out[10], 0x80);
        // 2-entry table, then the descriptor, then min code size 2
        assert_eq!(out[13 + 6], IMAGE_SEPARATOR);
        assert_eq!(out[13 + 6 + 10], 2);
    }

    #[test]
    fn test_rgb_entry_point() {
        let red = Pixel::new(255, 0, 0);
        let green = Pixel::new(0, 255, 0);
        let pm = Pixmap::from_vec(2, 2, vec![red, green, green, red]).unwrap();
        let mut out = Vec::new();
        encode_gif_rgb(&pm, &GifParams::default(), &mut out).unwrap();

        let image = IndexedImage::new(2, 2, vec![0, 1, 1, 0]).unwrap();
        assert_eq!(out, encode_gif_to_vec(&image, &red_green(), &GifParams::default()).unwrap());
    }
}
