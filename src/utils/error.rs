// src/utils/error.rs

use thiserror::Error;

/// The primary error type for all operations in the encoder library.
///
/// Every variant except `Io` is raised by up-front validation, before a single
/// byte reaches the output sink.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The output sink failed. Partial output must be discarded by the caller.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An invalid argument was provided to a function.
    #[error("Invalid argument: {0}")]
    InvalidArg(String),

    /// The sample buffer does not match the declared dimensions.
    #[error("Dimension mismatch: expected {expected} samples, but got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A GIF color table can hold at most 256 entries.
    #[error("Too many colors for a GIF color table: {0} (maximum is 256)")]
    TooManyColors(usize),

    /// A pixel refers to a color table entry that does not exist.
    #[error("Pixel index {index} is out of range for a palette of {palette_len} colors")]
    InvalidIndex { index: u8, palette_len: usize },
}

/// A specialized `Result` type for encoder operations.
pub type Result<T> = std::result::Result<T, EncodeError>;

/// Checks that an image is non-empty and fits in the 16-bit size fields shared
/// by the GIF and JPEG headers.
pub(crate) fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidArg(format!(
            "Image dimensions must be non-zero, got {}x{}",
            width, height
        )));
    }
    if width > u16::MAX as u32 || height > u16::MAX as u32 {
        return Err(EncodeError::InvalidArg(format!(
            "Image dimensions {}x{} exceed the 65535 pixel limit",
            width, height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(check_dimensions(0, 10), Err(EncodeError::InvalidArg(_))));
        assert!(matches!(check_dimensions(10, 0), Err(EncodeError::InvalidArg(_))));
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        assert!(check_dimensions(65_536, 1).is_err());
        assert!(check_dimensions(65_535, 65_535).is_ok());
    }

    #[test]
    fn test_io_error_converts() {
        let err: EncodeError = std::io::Error::new(std::io::ErrorKind::Other, "sink gone").into();
        assert!(err.to_string().contains("sink gone"));
    }
}
