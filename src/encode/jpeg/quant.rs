// src/encode/jpeg/quant.rs

//! Quality-scaled quantization matrices and their AAN divisors.

use super::tables::{AAN_SCALE_FACTOR, JPEG_NATURAL_ORDER, QUANTUM_CHROMINANCE, QUANTUM_LUMINANCE};
use log::warn;

/// Which quantization/Huffman table set a component uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelClass {
    Luminance,
    Chrominance,
}

impl ChannelClass {
    /// Table slot used in DQT/SOF0/DHT/SOS.
    pub fn table_id(self) -> u8 {
        match self {
            ChannelClass::Luminance => 0,
            ChannelClass::Chrominance => 1,
        }
    }
}

/// Clamps a requested quality to 1..=100.
pub fn clamp_quality(quality: u8) -> u8 {
    let clamped = quality.clamp(1, 100);
    if clamped != quality {
        warn!("JPEG quality {} out of range, using {}", quality, clamped);
    }
    clamped
}

/// Percentage applied to the base tables for a quality in 1..=100.
pub fn quality_scale(quality: u8) -> u32 {
    let q = quality.clamp(1, 100) as u32;
    if q < 50 { 5000 / q } else { 200 - 2 * q }
}

/// One 8x8 quantization matrix plus the reciprocal divisors used by the
/// AAN quantizer.
#[derive(Debug, Clone)]
pub struct QuantizationTable {
    /// Quantum values in natural order, each in 1..=255.
    quantum: [u16; 64],
    /// `1 / (quantum * aan[row] * aan[col] * 8)` in natural order.
    divisors: [f32; 64],
}

impl QuantizationTable {
    /// Scales `base` by `scale` percent, rounding and clamping into 1..=255.
    pub fn from_base(base: &[u16; 64], scale: u32) -> Self {
        let mut quantum = [0u16; 64];
        for (q, &b) in quantum.iter_mut().zip(base.iter()) {
            *q = ((b as u32 * scale + 50) / 100).clamp(1, 255) as u16;
        }

        let mut divisors = [0f32; 64];
        for row in 0..8 {
            for col in 0..8 {
                let i = row * 8 + col;
                divisors[i] = 1.0
                    / (quantum[i] as f32 * AAN_SCALE_FACTOR[row] * AAN_SCALE_FACTOR[col] * 8.0);
            }
        }

        Self { quantum, divisors }
    }

    pub fn quantum(&self) -> &[u16; 64] {
        &self.quantum
    }

    pub fn divisors(&self) -> &[f32; 64] {
        &self.divisors
    }

    /// Quantum values in zig-zag order, as stored in a DQT segment.
    pub fn zigzag_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        for (k, &natural) in JPEG_NATURAL_ORDER.iter().enumerate() {
            out[k] = self.quantum[natural] as u8;
        }
        out
    }
}

/// The luminance and chrominance matrices for one quality setting.
#[derive(Debug, Clone)]
pub struct ColorQuantizationTable {
    quality: u8,
    luminance: QuantizationTable,
    chrominance: QuantizationTable,
}

impl ColorQuantizationTable {
    pub fn new(quality: u8) -> Self {
        let quality = clamp_quality(quality);
        let scale = quality_scale(quality);
        Self {
            quality,
            luminance: QuantizationTable::from_base(&QUANTUM_LUMINANCE, scale),
            chrominance: QuantizationTable::from_base(&QUANTUM_CHROMINANCE, scale),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn table(&self, class: ChannelClass) -> &QuantizationTable {
        match class {
            ChannelClass::Luminance => &self.luminance,
            ChannelClass::Chrominance => &self.chrominance,
        }
    }
}
