// src/encode/gif/bit_packer.rs

//! Variable-width code accumulator for GIF LZW output.
//!
//! Codes are packed least-significant bit first, as GIF requires, and every
//! completed byte goes straight to the [`PacketWriter`].

use super::packet::PacketWriter;
use std::io::{self, Write};

/// A destination for variable-width LZW codes.
///
/// `BitPacker` is the production implementation; the trait exists so the
/// compressor's code stream can be observed directly.
pub trait CodeWriter {
    /// Appends the low `n_bits` bits of `code`.
    fn write_code(&mut self, code: u16, n_bits: u8) -> io::Result<()>;

    /// Drains any partial byte and pending output.
    fn finish(&mut self) -> io::Result<()>;
}

pub struct BitPacker<W: Write> {
    packets: PacketWriter<W>,
    accum: u32,
    bits: u32,
}

impl<W: Write> BitPacker<W> {
    pub fn new(sink: W) -> Self {
        Self {
            packets: PacketWriter::new(sink),
            accum: 0,
            bits: 0,
        }
    }

    /// Appends the low `n_bits` bits of `code`, then moves whole bytes to the
    /// packetizer. Fewer than 8 bits remain pending afterwards.
    pub fn write(&mut self, code: u16, n_bits: u8) -> io::Result<()> {
        let mask = (1u32 << n_bits) - 1;
        self.accum |= (code as u32 & mask) << self.bits;
        self.bits += n_bits as u32;

        while self.bits >= 8 {
            self.packets.write_byte(self.accum as u8)?;
            self.accum >>= 8;
            self.bits -= 8;
        }
        Ok(())
    }

    /// Writes the final partial byte zero-padded and emits the last block.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.bits > 0 {
            self.packets.write_byte(self.accum as u8)?;
            self.accum = 0;
            self.bits = 0;
        }
        self.packets.flush()
    }

    /// Number of bits waiting for a full byte.
    pub fn pending_bits(&self) -> u32 {
        self.bits
    }

    pub fn into_inner(self) -> W {
        self.packets.into_inner()
    }
}

impl<W: Write> CodeWriter for BitPacker<W> {
    fn write_code(&mut self, code: u16, n_bits: u8) -> io::Result<()> {
        self.write(code, n_bits)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lsb_first_packing() {
        let mut out = Vec::new();
        let mut packer = BitPacker::new(&mut out);
        // 3-bit codes 4, 0, 1 then 1 -> bits 0b_001_001_000_100
        packer.write(4, 3).unwrap();
        packer.write(0, 3).unwrap();
        packer.write(1, 3).unwrap();
        assert_eq!(packer.pending_bits(), 1);
        packer.write(1, 3).unwrap();
        packer.flush().unwrap();
        drop(packer);
        assert_eq!(out, [2, 0x44, 0x02]);
    }

    #[test]
    fn test_high_bits_are_masked() {
        let mut out = Vec::new();
        let mut packer = BitPacker::new(&mut out);
        packer.write(0xFFFF, 4).unwrap();
        packer.write(0, 4).unwrap();
        packer.flush().unwrap();
        drop(packer);
        assert_eq!(out, [1, 0x0F]);
    }

    #[test]
    fn test_twelve_bit_codes() {
        let mut out = Vec::new();
        let mut packer = BitPacker::new(&mut out);
        packer.write(0xABC, 12).unwrap();
        packer.write(0x123, 12).unwrap();
        packer.flush().unwrap();
        drop(packer);
        assert_eq!(out, [3, 0xBC, 0x3A, 0x12]);
    }
}
