// src/encode/jpeg/huffman.rs

//! Huffman entropy coding for baseline JPEG.
//!
//! Code tables are built canonically (T.81 Annex C) from the fixed Annex K
//! specifications, so every image of a given channel class uses identical
//! codes. Blocks are coded as a DC difference followed by run-length/size
//! symbols for the AC terms in zig-zag order.

use super::bit_writer::JpegBitWriter;
use super::quant::ChannelClass;
use super::tables::{
    HuffmanSpec, AC_CHROMINANCE, AC_LUMINANCE, DC_CHROMINANCE, DC_LUMINANCE, JPEG_NATURAL_ORDER,
};
use std::io::{self, Write};

/// Zero-run-length symbol: 16 zero coefficients.
const ZRL: u8 = 0xF0;
/// End-of-block symbol.
const EOB: u8 = 0x00;

/// Symbol -> (code, length) lookup for one table.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    codes: [u16; 256],
    sizes: [u8; 256],
}

impl HuffmanTable {
    /// Assigns canonical codes: consecutive codes within a length, shifting
    /// left once for every step up in length.
    pub fn from_spec(spec: &HuffmanSpec) -> Self {
        let mut codes = [0u16; 256];
        let mut sizes = [0u8; 256];

        let mut code: u32 = 0;
        let mut symbols = spec.values.iter();
        for (len_minus_one, &count) in spec.bits.iter().enumerate() {
            for _ in 0..count {
                if let Some(&symbol) = symbols.next() {
                    codes[symbol as usize] = code as u16;
                    sizes[symbol as usize] = len_minus_one as u8 + 1;
                }
                code += 1;
            }
            code <<= 1;
        }

        Self { codes, sizes }
    }

    /// Returns `(code, length)` for `symbol`, or `None` if the table has no code for it.
    pub fn code(&self, symbol: u8) -> Option<(u16, u8)> {
        match self.sizes[symbol as usize] {
            0 => None,
            size => Some((self.codes[symbol as usize], size)),
        }
    }

    fn emit<W: Write>(&self, writer: &mut JpegBitWriter<W>, symbol: u8) -> io::Result<()> {
        let (code, size) = self.code(symbol).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("no Huffman code for symbol {:#04x}", symbol),
            )
        })?;
        writer.write_bits(code as u32, size)
    }
}

/// Number of bits needed for `|value|` (0 for 0).
#[inline]
pub fn magnitude_category(value: i32) -> u8 {
    (32 - value.unsigned_abs().leading_zeros()) as u8
}

/// Bits written after a size symbol: the value itself when positive, the
/// one's complement (`value - 1`) when negative, truncated to `nbits`.
#[inline]
fn magnitude_bits(value: i32) -> u32 {
    if value < 0 { (value - 1) as u32 } else { value as u32 }
}

/// The four standard tables and the block coder that uses them.
#[derive(Debug, Clone)]
pub struct HuffmanEncoder {
    dc_luminance: HuffmanTable,
    ac_luminance: HuffmanTable,
    dc_chrominance: HuffmanTable,
    ac_chrominance: HuffmanTable,
}

impl Default for HuffmanEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HuffmanEncoder {
    pub fn new() -> Self {
        Self {
            dc_luminance: HuffmanTable::from_spec(&DC_LUMINANCE),
            ac_luminance: HuffmanTable::from_spec(&AC_LUMINANCE),
            dc_chrominance: HuffmanTable::from_spec(&DC_CHROMINANCE),
            ac_chrominance: HuffmanTable::from_spec(&AC_CHROMINANCE),
        }
    }

    fn tables(&self, class: ChannelClass) -> (&HuffmanTable, &HuffmanTable) {
        match class {
            ChannelClass::Luminance => (&self.dc_luminance, &self.ac_luminance),
            ChannelClass::Chrominance => (&self.dc_chrominance, &self.ac_chrominance),
        }
    }

    /// Specifications in DHT order for the given classes: DC then AC per class.
    pub fn specs(classes: &[ChannelClass]) -> Vec<(u8, HuffmanSpec)> {
        let mut out = Vec::new();
        for &class in classes {
            let id = class.table_id();
            let (dc, ac) = match class {
                ChannelClass::Luminance => (DC_LUMINANCE, AC_LUMINANCE),
                ChannelClass::Chrominance => (DC_CHROMINANCE, AC_CHROMINANCE),
            };
            out.push((id, dc));
            out.push((0x10 | id, ac));
        }
        out
    }

    /// Encodes one quantized block given in natural order. Returns the
    /// block's DC value, which is the predictor for the next block of the
    /// same component.
    pub fn encode_block<W: Write>(
        &self,
        writer: &mut JpegBitWriter<W>,
        block: &[i32; 64],
        previous_dc: i32,
        class: ChannelClass,
    ) -> io::Result<i32> {
        let (dc_table, ac_table) = self.tables(class);

        let diff = block[0] - previous_dc;
        let nbits = magnitude_category(diff);
        dc_table.emit(writer, nbits)?;
        if nbits > 0 {
            writer.write_bits(magnitude_bits(diff), nbits)?;
        }

        let mut run = 0u8;
        for &natural in &JPEG_NATURAL_ORDER[1..] {
            let coefficient = block[natural];
            if coefficient == 0 {
                run += 1;
                continue;
            }
            while run > 15 {
                ac_table.emit(writer, ZRL)?;
                run -= 16;
            }
            let nbits = magnitude_category(coefficient);
            ac_table.emit(writer, (run << 4) + nbits)?;
            writer.write_bits(magnitude_bits(coefficient), nbits)?;
            run = 0;
        }
        if run > 0 {
            ac_table.emit(writer, EOB)?;
        }

        Ok(block[0])
    }
}

/// Serializes table specifications into a DHT payload.
pub fn dht_payload(specs: &[(u8, HuffmanSpec)]) -> Vec<u8> {
    let mut payload = Vec::new();
    for (class_and_id, spec) in specs {
        payload.push(*class_and_id);
        payload.extend_from_slice(&spec.bits);
        payload.extend_from_slice(spec.values);
    }
    payload
}
