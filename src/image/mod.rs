//! Sample buffers and color tables consumed by the encoders.

pub mod image_formats;
pub mod palette;

pub use image_formats::{IndexedImage, Pixel, Pixmap};
pub use palette::Palette;
