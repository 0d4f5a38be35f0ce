// src/image/palette.rs

//! Color tables for indexed (GIF) output.
//!
//! The table is assumed to be pre-reduced by the caller: `Palette::from_pixmap`
//! only collects the exact colors present and refuses images with more than
//! 256 of them. No color quantization happens here.

use crate::image::image_formats::{IndexedImage, Pixel, Pixmap};
use crate::utils::error::{EncodeError, Result};
use std::collections::HashMap;

/// Largest color table a GIF can carry.
pub const MAX_COLORS: usize = 256;

/// Smallest bit depth the encoder emits. GIF's minimum LZW code size is 2, and
/// the global table is sized to match it.
pub const MIN_BITS_PER_PIXEL: u8 = 2;

/// An ordered list of RGB entries, indexed by palette index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Pixel>,
}

impl Palette {
    /// Creates a palette from the given entries.
    pub fn new(colors: Vec<Pixel>) -> Result<Self> {
        if colors.is_empty() {
            return Err(EncodeError::InvalidArg(
                "Palette must contain at least one color".to_string(),
            ));
        }
        if colors.len() > MAX_COLORS {
            return Err(EncodeError::TooManyColors(colors.len()));
        }
        Ok(Palette { colors })
    }

    /// Builds a palette and an index stream from an RGB image.
    ///
    /// Colors are numbered in first-seen (row-major) order.
    pub fn from_pixmap(pixmap: &Pixmap) -> Result<(Palette, IndexedImage)> {
        let mut lookup: HashMap<Pixel, u8> = HashMap::new();
        let mut colors = Vec::new();
        let mut indices = Vec::with_capacity(pixmap.pixels().len());

        for &pixel in pixmap.pixels() {
            let index = match lookup.get(&pixel) {
                Some(&i) => i,
                None => {
                    if colors.len() == MAX_COLORS {
                        // Count the rest so the error reports the real total.
                        let mut distinct: std::collections::HashSet<Pixel> =
                            colors.iter().copied().collect();
                        distinct.extend(pixmap.pixels().iter().copied());
                        return Err(EncodeError::TooManyColors(distinct.len()));
                    }
                    let i = colors.len() as u8;
                    colors.push(pixel);
                    lookup.insert(pixel, i);
                    i
                }
            };
            indices.push(index);
        }

        let image = IndexedImage::new(pixmap.width(), pixmap.height(), indices)?;
        Ok((Palette::new(colors)?, image))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Pixel] {
        &self.colors
    }

    /// Smallest bit depth whose table holds every entry, never below
    /// `MIN_BITS_PER_PIXEL`.
    pub fn bits_per_pixel(&self) -> u8 {
        let mut bits = MIN_BITS_PER_PIXEL;
        while (1usize << bits) < self.colors.len() {
            bits += 1;
        }
        bits
    }

    /// Serializes the table as interleaved `R,G,B` triples, padded with black
    /// entries up to `2^bits_per_pixel`.
    pub fn table_bytes(&self, bits_per_pixel: u8) -> Vec<u8> {
        let size = 1usize << bits_per_pixel;
        let mut table = Vec::with_capacity(size * 3);
        table.extend_from_slice(bytemuck::cast_slice(&self.colors));
        table.resize(size * 3, 0);
        table
    }
}
