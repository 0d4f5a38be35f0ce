//! General-purpose utility modules.

pub mod error;
pub mod write_ext;

// Re-export commonly used items
pub use error::{EncodeError, Result};
