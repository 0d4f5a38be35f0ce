//! An extension trait for `std::io::Write` with the small framing helpers both
//! container formats need: little-endian GIF words and big-endian JPEG markers.

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use std::io::{self, Write};

/// Extends `std::io::Write` with header-writing helpers.
pub trait WriteHeaderExt: Write {
    /// Writes a 16-bit word in little-endian order (GIF byte order).
    fn write_le_word(&mut self, n: u16) -> io::Result<()>;

    /// Writes a `0xFF`-prefixed JPEG marker.
    fn write_marker(&mut self, code: u8) -> io::Result<()>;

    /// Writes a JPEG marker segment: marker, big-endian length (which counts
    /// itself), then the payload.
    fn write_segment(&mut self, code: u8, payload: &[u8]) -> io::Result<()>;
}

impl<W: Write> WriteHeaderExt for W {
    fn write_le_word(&mut self, n: u16) -> io::Result<()> {
        self.write_u16::<LittleEndian>(n)
    }

    fn write_marker(&mut self, code: u8) -> io::Result<()> {
        self.write_all(&[0xFF, code])
    }

    fn write_segment(&mut self, code: u8, payload: &[u8]) -> io::Result<()> {
        let len = payload.len() + 2;
        if len > u16::MAX as usize {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "marker segment too large",
            ));
        }
        self.write_marker(code)?;
        self.write_u16::<BigEndian>(len as u16)?;
        self.write_all(payload)
    }
}
