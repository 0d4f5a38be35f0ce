// src/encode/jpeg/dct.rs

//! Forward DCT for 8x8 sample blocks.
//!
//! Uses the Arai-Agui-Nakajima factorization: a separable 1-D butterfly run
//! over rows then columns. The outputs are scaled by `8 * aan[row] * aan[col]`
//! relative to the true DCT-II; that scaling is folded into the quantization
//! divisors, so `quantize_block` yields correctly quantized coefficients.

use super::quant::QuantizationTable;

/// Level-shifts `samples` (0..=255) by -128 and transforms them.
///
/// Input and output are in natural (row-major) order.
pub fn forward_dct(samples: &[f32; 64]) -> [f32; 64] {
    let mut data = [0f32; 64];
    for (d, &s) in data.iter_mut().zip(samples.iter()) {
        *d = s - 128.0;
    }

    for row in 0..8 {
        fdct_1d(&mut data, row * 8, 1);
    }
    for col in 0..8 {
        fdct_1d(&mut data, col, 8);
    }
    data
}

/// One 8-point AAN butterfly over `data[base + k * stride]`, k = 0..8.
#[inline]
fn fdct_1d(data: &mut [f32; 64], base: usize, stride: usize) {
    let at = |k: usize| base + k * stride;

    let tmp0 = data[at(0)] + data[at(7)];
    let tmp7 = data[at(0)] - data[at(7)];
    let tmp1 = data[at(1)] + data[at(6)];
    let tmp6 = data[at(1)] - data[at(6)];
    let tmp2 = data[at(2)] + data[at(5)];
    let tmp5 = data[at(2)] - data[at(5)];
    let tmp3 = data[at(3)] + data[at(4)];
    let tmp4 = data[at(3)] - data[at(4)];

    // Even part
    let tmp10 = tmp0 + tmp3;
    let tmp13 = tmp0 - tmp3;
    let tmp11 = tmp1 + tmp2;
    let tmp12 = tmp1 - tmp2;

    data[at(0)] = tmp10 + tmp11;
    data[at(4)] = tmp10 - tmp11;

    let z1 = (tmp12 + tmp13) * 0.707_106_781;
    data[at(2)] = tmp13 + z1;
    data[at(6)] = tmp13 - z1;

    // Odd part
    let tmp10 = tmp4 + tmp5;
    let tmp11 = tmp5 + tmp6;
    let tmp12 = tmp6 + tmp7;

    let z5 = (tmp10 - tmp12) * 0.382_683_433;
    let z2 = 0.541_196_100 * tmp10 + z5;
    let z4 = 1.306_562_965 * tmp12 + z5;
    let z3 = tmp11 * 0.707_106_781;

    let z11 = tmp7 + z3;
    let z13 = tmp7 - z3;

    data[at(5)] = z13 + z2;
    data[at(3)] = z13 - z2;
    data[at(1)] = z11 + z4;
    data[at(7)] = z11 - z4;
}

/// Divides each coefficient by its AAN-scaled quantum and rounds to nearest
/// (halves toward positive infinity). Output stays in natural order.
pub fn quantize_block(coefficients: &[f32; 64], table: &QuantizationTable) -> [i32; 64] {
    let mut out = [0i32; 64];
    for ((o, &c), &d) in out.iter_mut().zip(coefficients.iter()).zip(table.divisors().iter()) {
        *o = (c * d + 0.5).floor() as i32;
    }
    out
}
