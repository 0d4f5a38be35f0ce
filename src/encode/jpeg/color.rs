// src/encode/jpeg/color.rs

//! RGB -> YCbCr conversion into block-aligned component planes.

use crate::image::image_formats::Pixmap;
use std::sync::OnceLock;

/// Per-channel contribution tables: `[R, G, B][sample]`.
type ChannelTables = [[f32; 256]; 3];

// JFIF (Rec.601, full range) conversion, computed once
static YCC_TABLES: OnceLock<(ChannelTables, ChannelTables, ChannelTables)> = OnceLock::new();

fn ycc_tables() -> &'static (ChannelTables, ChannelTables, ChannelTables) {
    YCC_TABLES.get_or_init(|| {
        let mut y = [[0f32; 256]; 3];
        let mut cb = [[0f32; 256]; 3];
        let mut cr = [[0f32; 256]; 3];
        for i in 0..256 {
            let v = i as f32;
            y[0][i] = 0.299 * v;
            y[1][i] = 0.587 * v;
            y[2][i] = 0.114 * v;

            cb[0][i] = -0.168_74 * v;
            cb[1][i] = -0.331_26 * v;
            cb[2][i] = 0.5 * v;

            cr[0][i] = 0.5 * v;
            cr[1][i] = -0.418_69 * v;
            cr[2][i] = -0.081_31 * v;
        }
        (y, cb, cr)
    })
}

/// One color component, padded to whole 8x8 blocks by repeating the last
/// column and row.
#[derive(Debug, Clone)]
pub struct Plane {
    width: usize,
    height: usize,
    samples: Vec<f32>,
}

impl Plane {
    fn padded(width: u32, height: u32) -> Self {
        let width = (width as usize).div_ceil(8) * 8;
        let height = (height as usize).div_ceil(8) * 8;
        Self {
            width,
            height,
            samples: vec![0.0; width * height],
        }
    }

    /// Blocks per row.
    pub fn blocks_wide(&self) -> usize {
        self.width / 8
    }

    /// Blocks per column.
    pub fn blocks_high(&self) -> usize {
        self.height / 8
    }

    /// Copies the 8x8 block at block coordinates (`bx`, `by`).
    pub fn block(&self, bx: usize, by: usize) -> [f32; 64] {
        let mut out = [0f32; 64];
        for row in 0..8 {
            let start = (by * 8 + row) * self.width + bx * 8;
            out[row * 8..row * 8 + 8].copy_from_slice(&self.samples[start..start + 8]);
        }
        out
    }

    fn replicate_edges(&mut self, image_width: usize, image_height: usize) {
        for y in 0..image_height {
            let row = y * self.width;
            let last = self.samples[row + image_width - 1];
            self.samples[row + image_width..row + self.width].fill(last);
        }
        for y in image_height..self.height {
            let (done, rest) = self.samples.split_at_mut(y * self.width);
            let source = &done[(image_height - 1) * self.width..image_height * self.width];
            rest[..self.width].copy_from_slice(source);
        }
    }
}

/// Converts a pixmap to padded Y, Cb, Cr planes (or Y alone for grayscale).
pub fn to_component_planes(pixmap: &Pixmap, grayscale: bool) -> Vec<Plane> {
    let (y_table, cb_table, cr_table) = ycc_tables();
    let (w, h) = (pixmap.width() as usize, pixmap.height() as usize);

    let count = if grayscale { 1 } else { 3 };
    let mut planes: Vec<Plane> = (0..count)
        .map(|_| Plane::padded(pixmap.width(), pixmap.height()))
        .collect();
    let stride = planes[0].width;

    for (i, p) in pixmap.pixels().iter().enumerate() {
        let (r, g, b) = (p.r as usize, p.g as usize, p.b as usize);
        let at = (i / w) * stride + i % w;
        planes[0].samples[at] = y_table[0][r] + y_table[1][g] + y_table[2][b];
        if !grayscale {
            planes[1].samples[at] = 128.0 + cb_table[0][r] + cb_table[1][g] + cb_table[2][b];
            planes[2].samples[at] = 128.0 + cr_table[0][r] + cr_table[1][g] + cr_table[2][b];
        }
    }

    for plane in &mut planes {
        plane.replicate_edges(w, h);
    }
    planes
}
