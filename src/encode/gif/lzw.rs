// src/encode/gif/lzw.rs

//! GIF-flavoured LZW compression.
//!
//! The dictionary is the closed hash table of the classic Unix `compress`
//! program: a fixed array of 5003 slots keyed by `(suffix << 12) + prefix`,
//! probed with a primary XOR hash and a secondary displacement of
//! `HASH_SIZE - index`. Keeping the table size and probe sequence identical is
//! what makes the output match other `compress`-derived GIF writers byte for
//! byte, so neither may change.

use super::bit_packer::{BitPacker, CodeWriter};
use crate::utils::error::{EncodeError, Result};
use log::trace;
use std::io::{self, Write};

/// Number of slots in the dictionary hash table (prime, ~80% load when full).
pub const HASH_SIZE: usize = 5003;

/// Widest code GIF allows.
pub const MAX_BITS: u8 = 12;

/// Number of codes a 12-bit dictionary can hold.
const MAX_MAX_CODE: u32 = 1 << MAX_BITS;

/// Shift applied to the suffix in the primary hash. Derived from `HASH_SIZE`
/// as in `compress`: 8 minus the number of doublings from 5003 past 65536.
const HASH_SHIFT: u32 = 4;

/// Observable phase of the dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryState {
    /// No entries beyond the root codes; initial code width.
    Cleared,
    /// Entries are being added and the code width may still grow.
    Accumulating,
    /// All 4096 codes are assigned; the next miss clears the dictionary.
    Full,
}

#[inline]
const fn max_code(n_bits: u8) -> u32 {
    (1 << n_bits) - 1
}

/// LZW compressor with a fixed-capacity hash dictionary.
pub struct LzwCompressor {
    /// Key stored in each slot, `-1` when empty.
    htab: Box<[i32; HASH_SIZE]>,
    /// Code assigned to each occupied slot.
    codetab: Box<[u16; HASH_SIZE]>,
    init_bits: u8,
    n_bits: u8,
    maxcode: u32,
    free_ent: u32,
    clear_code: u32,
    eof_code: u32,
    clear_flag: bool,
    clears: usize,
}

impl LzwCompressor {
    /// Creates a compressor for symbols of `min_code_size` bits (2..=8).
    pub fn new(min_code_size: u8) -> Result<Self> {
        if !(2..=8).contains(&min_code_size) {
            return Err(EncodeError::InvalidArg(format!(
                "LZW minimum code size must be between 2 and 8, got {}",
                min_code_size
            )));
        }
        let init_bits = min_code_size + 1;
        let clear_code = 1u32 << (init_bits - 1);
        Ok(Self {
            htab: Box::new([-1; HASH_SIZE]),
            codetab: Box::new([0; HASH_SIZE]),
            init_bits,
            n_bits: init_bits,
            maxcode: max_code(init_bits),
            free_ent: clear_code + 2,
            clear_code,
            eof_code: clear_code + 1,
            clear_flag: false,
            clears: 0,
        })
    }

    pub fn clear_code(&self) -> u16 {
        self.clear_code as u16
    }

    pub fn eof_code(&self) -> u16 {
        self.eof_code as u16
    }

    /// Current code width in bits.
    pub fn code_width(&self) -> u8 {
        self.n_bits
    }

    /// Number of mid-stream dictionary resets performed so far.
    pub fn dictionary_clears(&self) -> usize {
        self.clears
    }

    pub fn state(&self) -> DictionaryState {
        if self.free_ent == self.clear_code + 2 {
            DictionaryState::Cleared
        } else if self.free_ent >= MAX_MAX_CODE {
            DictionaryState::Full
        } else {
            DictionaryState::Accumulating
        }
    }

    /// Compresses `data` into `out`: a clear code, the coded stream, the final
    /// prefix, the end-of-information code, then `out.finish()`.
    ///
    /// Every symbol must be below the clear code.
    pub fn compress<C: CodeWriter>(&mut self, data: &[u8], out: &mut C) -> Result<()> {
        if let Some(&bad) = data.iter().find(|&&b| b as u32 >= self.clear_code) {
            return Err(EncodeError::InvalidArg(format!(
                "Symbol {} does not fit in a {}-bit LZW alphabet",
                bad,
                self.init_bits - 1
            )));
        }

        self.reset_dictionary();
        self.n_bits = self.init_bits;
        self.maxcode = max_code(self.n_bits);
        self.free_ent = self.clear_code + 2;
        self.clear_flag = false;
        self.clears = 0;

        self.output(self.clear_code, out)?;

        let mut symbols = data.iter();
        let Some(&first) = symbols.next() else {
            self.output(self.eof_code, out)?;
            out.finish()?;
            return Ok(());
        };

        let mut ent = first as u32;

        'next_symbol: for &byte in symbols {
            let c = byte as u32;
            let fcode = ((c << MAX_BITS) + ent) as i32;
            let mut i = ((c << HASH_SHIFT) ^ ent) as usize;

            if self.htab[i] == fcode {
                ent = self.codetab[i] as u32;
                continue;
            }
            if self.htab[i] >= 0 {
                let disp = if i == 0 { 1 } else { HASH_SIZE - i };
                loop {
                    i = if i >= disp { i - disp } else { i + HASH_SIZE - disp };
                    if self.htab[i] == fcode {
                        ent = self.codetab[i] as u32;
                        continue 'next_symbol;
                    }
                    if self.htab[i] < 0 {
                        break;
                    }
                }
            }

            self.output(ent, out)?;
            ent = c;
            if self.free_ent < MAX_MAX_CODE {
                self.codetab[i] = self.free_ent as u16;
                self.free_ent += 1;
                self.htab[i] = fcode;
            } else {
                self.clear_block(out)?;
            }
        }

        self.output(ent, out)?;
        self.output(self.eof_code, out)?;
        out.finish()?;
        Ok(())
    }

    /// Emits one code at the current width, then widens the code (or resets
    /// the width after a clear) once the free-entry counter passes `maxcode`.
    fn output<C: CodeWriter>(&mut self, code: u32, out: &mut C) -> io::Result<()> {
        out.write_code(code as u16, self.n_bits)?;

        if self.free_ent > self.maxcode || self.clear_flag {
            if self.clear_flag {
                self.n_bits = self.init_bits;
                self.maxcode = max_code(self.n_bits);
                self.clear_flag = false;
            } else {
                self.n_bits += 1;
                self.maxcode = if self.n_bits == MAX_BITS {
                    MAX_MAX_CODE
                } else {
                    max_code(self.n_bits)
                };
                trace!("LZW code width grew to {} bits", self.n_bits);
            }
        }
        Ok(())
    }

    /// Discards the dictionary and tells the decoder to do the same.
    fn clear_block<C: CodeWriter>(&mut self, out: &mut C) -> io::Result<()> {
        self.reset_dictionary();
        self.free_ent = self.clear_code + 2;
        self.clear_flag = true;
        self.clears += 1;
        trace!("LZW dictionary full, emitting clear code #{}", self.clears);
        self.output(self.clear_code, out)
    }

    fn reset_dictionary(&mut self) {
        self.htab.fill(-1);
    }
}

/// Writes a complete GIF image-data block: the minimum code size byte, the
/// LZW stream as length-prefixed sub-blocks, and the zero-length terminator.
pub fn write_image_data<W: Write>(data: &[u8], min_code_size: u8, sink: &mut W) -> Result<()> {
    let mut compressor = LzwCompressor::new(min_code_size)?;
    sink.write_all(&[min_code_size])?;

    let mut packer = BitPacker::new(&mut *sink);
    compressor.compress(data, &mut packer)?;
    drop(packer);

    sink.write_all(&[0])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every emitted code with its width.
    #[derive(Default)]
    struct RecordingWriter {
        codes: Vec<(u16, u8)>,
        finished: bool,
    }

    impl CodeWriter for RecordingWriter {
        fn write_code(&mut self, code: u16, n_bits: u8) -> io::Result<()> {
            self.codes.push((code, n_bits));
            Ok(())
        }

        fn finish(&mut self) -> io::Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    /// Deterministic pseudo-random bytes (LCG), dense in distinct pairs.
    fn noise(len: usize, modulus: u32) -> Vec<u8> {
        let mut state = 0x1234_5678u32;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                ((state >> 16) % modulus) as u8
            })
            .collect()
    }

    #[test]
    fn test_code_constants() {
        let lzw = LzwCompressor::new(2).unwrap();
        assert_eq!(lzw.clear_code(), 4);
        assert_eq!(lzw.eof_code(), 5);
        assert_eq!(lzw.code_width(), 3);
        assert_eq!(lzw.state(), DictionaryState::Cleared);

        let lzw = LzwCompressor::new(8).unwrap();
        assert_eq!(lzw.clear_code(), 256);
        assert_eq!(lzw.eof_code(), 257);
        assert_eq!(lzw.code_width(), 9);
    }

    #[test]
    fn test_invalid_code_size() {
        assert!(LzwCompressor::new(1).is_err());
        assert!(LzwCompressor::new(9).is_err());
    }

    #[test]
    fn test_symbol_out_of_alphabet() {
        let mut lzw = LzwCompressor::new(2).unwrap();
        let mut out = RecordingWriter::default();
        assert!(lzw.compress(&[0, 1, 4], &mut out).is_err());
        assert!(out.codes.is_empty());
    }

    #[test]
    fn test_small_stream_codes() {
        let mut lzw = LzwCompressor::new(2).unwrap();
        let mut out = RecordingWriter::default();
        lzw.compress(&[0, 1, 1, 0], &mut out).unwrap();
        assert_eq!(
            out.codes,
            vec![(4, 3), (0, 3), (1, 3), (1, 3), (0, 4), (5, 4)]
        );
        assert!(out.finished);
    }

    #[test]
    fn test_repeated_symbol_extends_match() {
        let mut lzw = LzwCompressor::new(2).unwrap();
        let mut out = RecordingWriter::default();
        lzw.compress(&[1; 10], &mut out).unwrap();
        // 1 | 1,1 (=6) | 1,1,1 (=7) | 1,1,1,1 (=8)
        let codes: Vec<u16> = out.codes.iter().map(|c| c.0).collect();
        assert_eq!(codes, vec![4, 1, 6, 7, 8, 5]);
        assert_eq!(lzw.state(), DictionaryState::Accumulating);
    }

    #[test]
    fn test_empty_input() {
        let mut lzw = LzwCompressor::new(2).unwrap();
        let mut out = RecordingWriter::default();
        lzw.compress(&[], &mut out).unwrap();
        assert_eq!(out.codes, vec![(4, 3), (5, 3)]);
    }

    #[test]
    fn test_code_width_thresholds() {
        let mut lzw = LzwCompressor::new(8).unwrap();
        let mut out = RecordingWriter::default();
        lzw.compress(&noise(60_000, 256), &mut out).unwrap();

        // First segment: everything up to the first mid-stream clear.
        let first_clear = out.codes[1..]
            .iter()
            .position(|&(code, _)| code == 256)
            .map(|p| p + 1)
            .expect("stream should contain a mid-stream clear");
        let segment = &out.codes[1..first_clear];

        let width_count = |w: u8| segment.iter().filter(|&&(_, n)| n == w).count();
        // free_ent starts at 258 and grows by one per emitted code; the width
        // widens right after the code that pushes it past 511, 1023, 2047.
        assert_eq!(width_count(9), 255);
        assert_eq!(width_count(10), 512);
        assert_eq!(width_count(11), 1024);
        assert!(segment.iter().skip(255 + 512 + 1024).all(|&(_, n)| n == 12));

        // Widths never shrink inside a segment.
        assert!(segment.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[test]
    fn test_dictionary_reset_mid_stream() {
        let mut lzw = LzwCompressor::new(8).unwrap();
        let mut out = RecordingWriter::default();
        lzw.compress(&noise(60_000, 256), &mut out).unwrap();

        assert!(lzw.dictionary_clears() >= 1);
        let clears: Vec<usize> = out
            .codes
            .iter()
            .enumerate()
            .filter(|(_, c)| c.0 == 256)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(clears.len(), lzw.dictionary_clears() + 1);

        for &i in &clears[1..] {
            // The clear goes out at full width and the width drops right after.
            assert_eq!(out.codes[i].1, 12);
            assert_eq!(out.codes[i + 1].1, 9);
        }
    }

    #[test]
    fn test_write_image_data_framing() {
        let mut out = Vec::new();
        write_image_data(&[0, 1, 1, 0], 2, &mut out).unwrap();
        assert_eq!(out, [2, 3, 0x44, 0x02, 0x05, 0]);
    }
}
