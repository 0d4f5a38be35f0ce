// src/encode/jpeg/mod.rs

//! Baseline JPEG encoder: color conversion, AAN DCT, quantization and
//! Huffman entropy coding.

pub mod bit_writer;
pub mod color;
pub mod dct;
pub mod encoder;
pub mod huffman;
pub mod quant;
pub mod tables;

pub use bit_writer::JpegBitWriter;
pub use dct::{forward_dct, quantize_block};
pub use encoder::{encode_jpeg, encode_jpeg_to_vec, JpegEncoder, JpegParams};
pub use huffman::{HuffmanEncoder, HuffmanTable};
pub use quant::{ChannelClass, ColorQuantizationTable, QuantizationTable};
