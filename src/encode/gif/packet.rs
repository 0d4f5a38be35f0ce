// src/encode/gif/packet.rs

//! Sub-block packetizer for GIF image data.
//!
//! GIF stores compressed raster data as a chain of length-prefixed blocks of
//! at most 255 payload bytes. `PacketWriter` batches bytes and emits a block
//! each time the buffer fills. The zero-length terminator block is *not*
//! written here; the image-data writer appends it once the stream is done.

use std::io::{self, Write};

/// Maximum payload of one data sub-block.
pub const MAX_BLOCK_LEN: usize = 255;

pub struct PacketWriter<W: Write> {
    sink: W,
    buffer: [u8; MAX_BLOCK_LEN],
    len: usize,
}

impl<W: Write> PacketWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            buffer: [0; MAX_BLOCK_LEN],
            len: 0,
        }
    }

    /// Appends one byte, emitting a full block when the buffer reaches 255 bytes.
    pub fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.buffer[self.len] = byte;
        self.len += 1;
        if self.len == MAX_BLOCK_LEN {
            self.flush()?;
        }
        Ok(())
    }

    /// Emits the buffered bytes as one `[len][payload]` block.
    ///
    /// Does nothing when the buffer is empty.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.len == 0 {
            return Ok(());
        }
        self.sink.write_all(&[self.len as u8])?;
        self.sink.write_all(&self.buffer[..self.len])?;
        self.len = 0;
        Ok(())
    }

    /// Number of bytes waiting for the next block.
    pub fn pending(&self) -> usize {
        self.len
    }

    /// Returns the sink. Any buffered bytes not yet flushed are dropped.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_without_data_writes_nothing() {
        let mut out = Vec::new();
        let mut packets = PacketWriter::new(&mut out);
        packets.flush().unwrap();
        drop(packets);
        assert!(out.is_empty());
    }

    #[test]
    fn test_short_block() {
        let mut out = Vec::new();
        let mut packets = PacketWriter::new(&mut out);
        for b in [7u8, 8, 9] {
            packets.write_byte(b).unwrap();
        }
        packets.flush().unwrap();
        drop(packets);
        assert_eq!(out, [3, 7, 8, 9]);
    }

    #[test]
    fn test_full_block_emitted_automatically() {
        let mut out = Vec::new();
        let mut packets = PacketWriter::new(&mut out);
        for i in 0..300u32 {
            packets.write_byte(i as u8).unwrap();
        }
        assert_eq!(packets.pending(), 45);
        packets.flush().unwrap();
        drop(packets);

        assert_eq!(out.len(), 1 + 255 + 1 + 45);
        assert_eq!(out[0], 255);
        assert_eq!(out[256], 45);
        assert_eq!(out[257], 255);
    }
}
