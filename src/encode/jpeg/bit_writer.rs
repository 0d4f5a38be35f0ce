// src/encode/jpeg/bit_writer.rs

//! MSB-first bit writer for JPEG entropy-coded data.
//!
//! Any emitted byte equal to `0xFF` is followed by a stuffed `0x00` so the
//! decoder cannot mistake scan data for a marker.

use std::io::{self, Write};

pub struct JpegBitWriter<W: Write> {
    writer: W,
    /// Pending bits, left-aligned at bit 23.
    put_buffer: u32,
    put_bits: u32,
    bytes_written: u64,
}

impl<W: Write> JpegBitWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            put_buffer: 0,
            put_bits: 0,
            bytes_written: 0,
        }
    }

    /// Appends the low `size` bits of `code` (size <= 16).
    pub fn write_bits(&mut self, code: u32, size: u8) -> io::Result<()> {
        if size == 0 {
            return Ok(());
        }
        let mut buffer = code & ((1u32 << size) - 1);
        self.put_bits += size as u32;
        buffer <<= 24 - self.put_bits;
        buffer |= self.put_buffer;

        while self.put_bits >= 8 {
            let byte = ((buffer >> 16) & 0xFF) as u8;
            self.emit(byte)?;
            buffer <<= 8;
            self.put_bits -= 8;
        }
        self.put_buffer = buffer & 0x00FF_FFFF;
        Ok(())
    }

    /// Pads the last partial byte with 1-bits and emits it.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.put_bits > 0 {
            let pad = 8 - self.put_bits as u8;
            self.write_bits(0x7F, pad)?;
        }
        self.put_buffer = 0;
        Ok(())
    }

    /// Bytes written so far, stuffing included.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn emit(&mut self, byte: u8) -> io::Result<()> {
        if byte == 0xFF {
            self.writer.write_all(&[0xFF, 0x00])?;
            self.bytes_written += 2;
        } else {
            self.writer.write_all(&[byte])?;
            self.bytes_written += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first() {
        let mut out = Vec::new();
        let mut w = JpegBitWriter::new(&mut out);
        w.write_bits(0b101, 3).unwrap();
        w.write_bits(0b00110, 5).unwrap();
        w.write_bits(0xABCD, 16).unwrap();
        drop(w);
        assert_eq!(out, [0b1010_0110, 0xAB, 0xCD]);
    }

    #[test]
    fn test_ff_is_stuffed() {
        let mut out = Vec::new();
        let mut w = JpegBitWriter::new(&mut out);
        w.write_bits(0xFF, 8).unwrap();
        w.write_bits(0x12, 8).unwrap();
        assert_eq!(w.bytes_written(), 3);
        drop(w);
        assert_eq!(out, [0xFF, 0x00, 0x12]);
    }

    #[test]
    fn test_ff_spanning_codes_is_stuffed() {
        let mut out = Vec::new();
        let mut w = JpegBitWriter::new(&mut out);
        w.write_bits(0b1111, 4).unwrap();
        w.write_bits(0b1111_0000, 8).unwrap();
        w.flush().unwrap();
        drop(w);
        // 1111 1111 | 0000 + 1111 padding
        assert_eq!(out, [0xFF, 0x00, 0x0F]);
    }

    #[test]
    fn test_flush_pads_with_ones() {
        let mut out = Vec::new();
        let mut w = JpegBitWriter::new(&mut out);
        w.write_bits(0, 2).unwrap();
        w.flush().unwrap();
        w.flush().unwrap();
        drop(w);
        assert_eq!(out, [0x3F]);
    }

    #[test]
    fn test_padding_to_ff_is_stuffed() {
        let mut out = Vec::new();
        let mut w = JpegBitWriter::new(&mut out);
        w.write_bits(0b111, 3).unwrap();
        w.flush().unwrap();
        drop(w);
        assert_eq!(out, [0xFF, 0x00]);
    }
}
