// src/encode/gif/mod.rs

//! GIF encoder: LZW compression, bit packing and sub-block framing.

pub mod bit_packer;
pub mod encoder;
pub mod lzw;
pub mod packet;

pub use bit_packer::{BitPacker, CodeWriter};
pub use encoder::{encode_gif, encode_gif_rgb, encode_gif_to_vec, GifParams};
pub use lzw::{write_image_data, DictionaryState, LzwCompressor};
pub use packet::PacketWriter;
