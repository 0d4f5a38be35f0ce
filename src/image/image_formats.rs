// src/image/image_formats.rs

//! In-memory sample buffers handed to the encoders.
//!
//! `Pixmap` carries RGB samples for the JPEG pipeline (and for palettization
//! ahead of GIF encoding). `IndexedImage` carries palette indices for the GIF
//! pipeline. Both are row-major, fixed width x height, and are only read
//! during an encode.

use crate::utils::error::{EncodeError, Result};
use bytemuck::{Pod, Zeroable};

// --- Pixel Type Definitions ---

/// A single RGB pixel with 8-bit components.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Pixel { r, g, b }
    }

    pub const fn black() -> Self {
        Pixel { r: 0, g: 0, b: 0 }
    }

    pub const fn white() -> Self {
        Pixel {
            r: 255,
            g: 255,
            b: 255,
        }
    }
}

impl From<[u8; 3]> for Pixel {
    fn from(arr: [u8; 3]) -> Self {
        Pixel {
            r: arr[0],
            g: arr[1],
            b: arr[2],
        }
    }
}

impl From<Pixel> for [u8; 3] {
    fn from(p: Pixel) -> Self {
        [p.r, p.g, p.b]
    }
}

// --- Pixmap Type (Color Image Buffer) ---

/// A 2D buffer of color pixels stored in row-major order.
#[derive(Clone, Debug)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<Pixel>,
}

impl Pixmap {
    /// Creates a pixmap from a raw vector of pixels.
    ///
    /// Fails if the vector length is not `width * height`.
    pub fn from_vec(width: u32, height: u32, data: Vec<Pixel>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(EncodeError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Pixmap {
            width,
            height,
            data,
        })
    }

    /// Creates a pixmap from interleaved `R,G,B` bytes.
    pub fn from_rgb_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 3 != 0 {
            return Err(EncodeError::InvalidArg(format!(
                "RGB buffer length {} is not a multiple of 3",
                bytes.len()
            )));
        }
        let pixels: &[Pixel] = bytemuck::cast_slice(bytes);
        Self::from_vec(width, height, pixels.to_vec())
    }

    /// Creates a pixmap filled with a single pixel value.
    pub fn from_pixel(width: u32, height: u32, pixel: Pixel) -> Self {
        Pixmap {
            width,
            height,
            data: vec![pixel; width as usize * height as usize],
        }
    }

    /// Creates a pixmap by calling a function for each pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> Pixel,
    {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Pixmap {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the dimensions as a tuple (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Pixel {
        assert!(x < self.width && y < self.height);
        self.data[(y as usize) * self.width as usize + x as usize]
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.data
    }

    /// Returns raw pixel data as a byte slice.
    pub fn as_raw(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

// --- IndexedImage Type (Palette Index Buffer) ---

/// A 2D buffer of palette indices stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedImage {
    width: u32,
    height: u32,
    indices: Vec<u8>,
}

impl IndexedImage {
    /// Creates an indexed image, checking that the buffer covers every pixel.
    pub fn new(width: u32, height: u32, indices: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if indices.len() != expected {
            return Err(EncodeError::DimensionMismatch {
                expected,
                actual: indices.len(),
            });
        }
        Ok(IndexedImage {
            width,
            height,
            indices,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Largest index used, or `None` for an empty buffer.
    pub fn max_index(&self) -> Option<u8> {
        self.indices.iter().copied().max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixmap_length_checked() {
        let err = Pixmap::from_vec(2, 2, vec![Pixel::black(); 3]).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_pixmap_from_rgb_bytes() {
        let pm = Pixmap::from_rgb_bytes(2, 1, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(pm.get_pixel(1, 0), Pixel::new(4, 5, 6));
        assert_eq!(pm.as_raw(), &[1, 2, 3, 4, 5, 6]);
        assert!(Pixmap::from_rgb_bytes(2, 1, &[1, 2, 3, 4]).is_err());
    }

    #[test]
    fn test_from_fn_row_major() {
        let pm = Pixmap::from_fn(3, 2, |x, y| Pixel::new(x as u8, y as u8, 0));
        assert_eq!(pm.pixels()[4], Pixel::new(1, 1, 0));
    }

    #[test]
    fn test_indexed_image() {
        let img = IndexedImage::new(2, 2, vec![0, 1, 1, 0]).unwrap();
        assert_eq!(img.max_index(), Some(1));
        assert!(IndexedImage::new(2, 2, vec![0]).is_err());
    }
}
