// src/encode/jpeg/encoder.rs

//! Baseline (sequential, Huffman) JPEG writer.
//!
//! Marker order: SOI, APP0 (JFIF), COM, DQT, SOF0, DHT, SOS, scan data, EOI.
//! Every component uses 1x1 sampling, so the output is 4:4:4 and one MCU is
//! one block per component.

use super::bit_writer::JpegBitWriter;
use super::color::to_component_planes;
use super::dct::{forward_dct, quantize_block};
use super::huffman::{dht_payload, HuffmanEncoder};
use super::quant::{ChannelClass, ColorQuantizationTable};
use crate::image::image_formats::Pixmap;
use crate::utils::error::{check_dimensions, EncodeError, Result};
use crate::utils::write_ext::WriteHeaderExt;
use log::debug;
use std::io::Write;

pub mod marker {
    pub const SOI: u8 = 0xD8;
    pub const EOI: u8 = 0xD9;
    pub const APP0: u8 = 0xE0;
    pub const COM: u8 = 0xFE;
    pub const DQT: u8 = 0xDB;
    pub const SOF0: u8 = 0xC0;
    pub const DHT: u8 = 0xC4;
    pub const SOS: u8 = 0xDA;
}

pub const DEFAULT_QUALITY: u8 = 80;
pub const DEFAULT_COMMENT: &str = "raster_encoder baseline JPEG";

/// Configuration for JPEG encoding.
#[derive(Debug, Clone)]
pub struct JpegParams {
    /// 1 (smallest) to 100 (best). Out-of-range values are clamped.
    pub quality: u8,
    /// Text for the COM segment; empty suppresses the segment.
    pub comment: String,
    /// Emit a single luminance component.
    pub grayscale: bool,
}

impl Default for JpegParams {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            comment: DEFAULT_COMMENT.to_string(),
            grayscale: false,
        }
    }
}

impl JpegParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_grayscale(mut self, grayscale: bool) -> Self {
        self.grayscale = grayscale;
        self
    }
}

/// A frame component: identifier plus the table set it uses.
#[derive(Debug, Clone, Copy)]
struct Component {
    id: u8,
    class: ChannelClass,
}

static COLOR_COMPONENTS: [Component; 3] = [
    Component { id: 1, class: ChannelClass::Luminance },
    Component { id: 2, class: ChannelClass::Chrominance },
    Component { id: 3, class: ChannelClass::Chrominance },
];

/// Encoder holding the per-encode quantization and Huffman tables.
pub struct JpegEncoder {
    params: JpegParams,
    quant: ColorQuantizationTable,
    huffman: HuffmanEncoder,
}

impl JpegEncoder {
    pub fn new(params: JpegParams) -> Self {
        let quant = ColorQuantizationTable::new(params.quality);
        Self {
            params,
            quant,
            huffman: HuffmanEncoder::new(),
        }
    }

    fn components(&self) -> &'static [Component] {
        if self.params.grayscale {
            &COLOR_COMPONENTS[..1]
        } else {
            &COLOR_COMPONENTS
        }
    }

    fn classes(&self) -> Vec<ChannelClass> {
        if self.params.grayscale {
            vec![ChannelClass::Luminance]
        } else {
            vec![ChannelClass::Luminance, ChannelClass::Chrominance]
        }
    }

    /// Encodes `pixmap` as a complete JPEG file.
    pub fn encode<W: Write>(&self, pixmap: &Pixmap, sink: &mut W) -> Result<()> {
        let (width, height) = pixmap.dimensions();
        check_dimensions(width, height)?;
        if self.params.comment.len() > u16::MAX as usize - 2 {
            return Err(EncodeError::InvalidArg(format!(
                "JPEG comment of {} bytes does not fit in a COM segment",
                self.params.comment.len()
            )));
        }

        debug!(
            "Encoding JPEG {}x{}, quality {}, {} component(s)",
            width,
            height,
            self.quant.quality(),
            self.components().len()
        );

        self.write_headers(width as u16, height as u16, sink)?;

        let planes = to_component_planes(pixmap, self.params.grayscale);
        let components = self.components();
        let mut writer = JpegBitWriter::new(&mut *sink);
        let mut last_dc = [0i32; 3];

        for by in 0..planes[0].blocks_high() {
            for bx in 0..planes[0].blocks_wide() {
                for (c, component) in components.iter().enumerate() {
                    let coefficients = forward_dct(&planes[c].block(bx, by));
                    let quantized =
                        quantize_block(&coefficients, self.quant.table(component.class));
                    last_dc[c] = self.huffman.encode_block(
                        &mut writer,
                        &quantized,
                        last_dc[c],
                        component.class,
                    )?;
                }
            }
        }
        writer.flush()?;
        debug!("JPEG scan data: {} bytes", writer.bytes_written());
        drop(writer);

        sink.write_marker(marker::EOI)?;
        sink.flush()?;
        Ok(())
    }

    fn write_headers<W: Write>(&self, width: u16, height: u16, sink: &mut W) -> Result<()> {
        sink.write_marker(marker::SOI)?;

        // JFIF 1.01, no units, 1:1 density, no thumbnail
        sink.write_segment(
            marker::APP0,
            &[b'J', b'F', b'I', b'F', 0, 1, 1, 0, 0, 1, 0, 1, 0, 0],
        )?;

        if !self.params.comment.is_empty() {
            sink.write_segment(marker::COM, self.params.comment.as_bytes())?;
        }

        let classes = self.classes();
        let mut dqt = Vec::with_capacity(65 * classes.len());
        for &class in &classes {
            dqt.push(class.table_id());
            dqt.extend_from_slice(&self.quant.table(class).zigzag_bytes());
        }
        sink.write_segment(marker::DQT, &dqt)?;

        let components = self.components();
        let mut sof = vec![8];
        sof.extend_from_slice(&height.to_be_bytes());
        sof.extend_from_slice(&width.to_be_bytes());
        sof.push(components.len() as u8);
        for component in components {
            sof.extend_from_slice(&[component.id, 0x11, component.class.table_id()]);
        }
        sink.write_segment(marker::SOF0, &sof)?;

        sink.write_segment(marker::DHT, &dht_payload(&HuffmanEncoder::specs(&classes)))?;

        let mut sos = vec![components.len() as u8];
        for component in components {
            let id = component.class.table_id();
            sos.extend_from_slice(&[component.id, (id << 4) | id]);
        }
        // Ss = 0, Se = 63, Ah/Al = 0
        sos.extend_from_slice(&[0, 63, 0]);
        sink.write_segment(marker::SOS, &sos)?;
        Ok(())
    }
}

/// Encodes `pixmap` as JPEG into `sink`.
pub fn encode_jpeg<W: Write>(pixmap: &Pixmap, params: &JpegParams, sink: &mut W) -> Result<()> {
    JpegEncoder::new(params.clone()).encode(pixmap, sink)
}

/// Encodes `pixmap` as JPEG into a freshly allocated buffer.
pub fn encode_jpeg_to_vec(pixmap: &Pixmap, params: &JpegParams) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_jpeg(pixmap, params, &mut out)?;
    Ok(out)
}
