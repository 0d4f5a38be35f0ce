pub mod gif;
pub mod jpeg;

// Re-export the entry points of both pipelines
pub use gif::{encode_gif, encode_gif_rgb, encode_gif_to_vec, GifParams};
pub use jpeg::{encode_jpeg, encode_jpeg_to_vec, JpegEncoder, JpegParams};

// Re-export error types for convenience
pub use crate::utils::error::{EncodeError, Result};
