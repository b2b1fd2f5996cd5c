//! Forward DCT with fused quantization.
//!
//! Implements the Arai, Agui and Nakajima scaled forward DCT in integer
//! arithmetic (the structure follows figure 4-8 in Pennebaker & Mitchell:
//! 5 multiplies and 29 adds per 1-D transform). The AA&N outputs come out
//! scaled by `aan[row] * aan[col]` relative to the conventional 8x-scaled
//! DCT, so a per-coefficient descale multiplier normalizes them before the
//! reciprocal quantizer divides by `qval * 8`.

use crate::consts::{DCTSIZE, DCTSIZE2};
use crate::quant::DivisorTable;

// Fixed-point butterfly constants, 8 fraction bits
const CONST_BITS: i32 = 8;
const FIX_0_382683433: i32 = 98;
const FIX_0_541196100: i32 = 139;
const FIX_0_707106781: i32 = 181;
const FIX_1_306562965: i32 = 334;

/// Level shift applied to 8-bit samples before the transform
const CENTER_SAMPLE: i32 = 128;

// Per-coefficient descale multipliers, 12 fraction bits:
// round(4096 / (aan[row] * aan[col])) with
// aan = [1.0, 1.387039845, 1.306562965, 1.175875602,
//        1.0, 0.785694958, 0.541196100, 0.275899379]
const DESCALE_BITS: i32 = 12;
#[rustfmt::skip]
const AAN_DESCALE: [i32; DCTSIZE2] = [
     4096,  2953,  3135,  3483,  4096,  5213,  7568, 14846,
     2953,  2129,  2260,  2511,  2953,  3759,  5457, 10703,
     3135,  2260,  2399,  2666,  3135,  3990,  5793, 11363,
     3483,  2511,  2666,  2962,  3483,  4433,  6436, 12625,
     4096,  2953,  3135,  3483,  4096,  5213,  7568, 14846,
     5213,  3759,  3990,  4433,  5213,  6635,  9633, 18895,
     7568,  5457,  5793,  6436,  7568,  9633, 13985, 27432,
    14846, 10703, 11363, 12625, 14846, 18895, 27432, 53809,
];

#[inline]
fn multiply(v: i32, c: i32) -> i32 {
    (v * c) >> CONST_BITS
}

#[inline]
fn descale(v: i32, i: usize) -> i32 {
    (v * AAN_DESCALE[i] + (1 << (DESCALE_BITS - 1))) >> DESCALE_BITS
}

/// Transform and quantize one 8x8 block in place.
///
/// Input samples are in 0..=255 (stored as i16); output is the quantized
/// coefficient block in natural order.
pub fn fdct_quantize_block(block: &mut [i16], divisors: &DivisorTable) {
    debug_assert_eq!(block.len(), DCTSIZE2);
    let mut data = [0i32; DCTSIZE2];
    for (d, &s) in data.iter_mut().zip(block.iter()) {
        *d = i32::from(s) - CENTER_SAMPLE;
    }

    forward_dct_aan(&mut data);

    for (out, (i, &v)) in block.iter_mut().zip(data.iter().enumerate()) {
        *out = divisors.quantize(descale(v, i), i);
    }
}

/// The raw AA&N butterfly network over rows then columns.
///
/// Output coefficient (u, v) is the conventional 8x-scaled DCT value times
/// `aan[u] * aan[v]`.
fn forward_dct_aan(data: &mut [i32; DCTSIZE2]) {
    // Pass 1: rows
    for row in 0..DCTSIZE {
        let b = row * DCTSIZE;

        let tmp0 = data[b] + data[b + 7];
        let tmp7 = data[b] - data[b + 7];
        let tmp1 = data[b + 1] + data[b + 6];
        let tmp6 = data[b + 1] - data[b + 6];
        let tmp2 = data[b + 2] + data[b + 5];
        let tmp5 = data[b + 2] - data[b + 5];
        let tmp3 = data[b + 3] + data[b + 4];
        let tmp4 = data[b + 3] - data[b + 4];

        // Even part
        let tmp10 = tmp0 + tmp3;
        let tmp13 = tmp0 - tmp3;
        let tmp11 = tmp1 + tmp2;
        let tmp12 = tmp1 - tmp2;

        data[b] = tmp10 + tmp11;
        data[b + 4] = tmp10 - tmp11;

        let z1 = multiply(tmp12 + tmp13, FIX_0_707106781);
        data[b + 2] = tmp13 + z1;
        data[b + 6] = tmp13 - z1;

        // Odd part
        let tmp10 = tmp4 + tmp5;
        let tmp11 = tmp5 + tmp6;
        let tmp12 = tmp6 + tmp7;

        // The rotator is modified from fig 4-8 to avoid extra negations
        let z5 = multiply(tmp10 - tmp12, FIX_0_382683433);
        let z2 = multiply(tmp10, FIX_0_541196100) + z5;
        let z4 = multiply(tmp12, FIX_1_306562965) + z5;
        let z3 = multiply(tmp11, FIX_0_707106781);

        let z11 = tmp7 + z3;
        let z13 = tmp7 - z3;

        data[b + 5] = z13 + z2;
        data[b + 3] = z13 - z2;
        data[b + 1] = z11 + z4;
        data[b + 7] = z11 - z4;
    }

    // Pass 2: columns
    for col in 0..DCTSIZE {
        let tmp0 = data[col] + data[col + DCTSIZE * 7];
        let tmp7 = data[col] - data[col + DCTSIZE * 7];
        let tmp1 = data[col + DCTSIZE] + data[col + DCTSIZE * 6];
        let tmp6 = data[col + DCTSIZE] - data[col + DCTSIZE * 6];
        let tmp2 = data[col + DCTSIZE * 2] + data[col + DCTSIZE * 5];
        let tmp5 = data[col + DCTSIZE * 2] - data[col + DCTSIZE * 5];
        let tmp3 = data[col + DCTSIZE * 3] + data[col + DCTSIZE * 4];
        let tmp4 = data[col + DCTSIZE * 3] - data[col + DCTSIZE * 4];

        // Even part
        let tmp10 = tmp0 + tmp3;
        let tmp13 = tmp0 - tmp3;
        let tmp11 = tmp1 + tmp2;
        let tmp12 = tmp1 - tmp2;

        data[col] = tmp10 + tmp11;
        data[col + DCTSIZE * 4] = tmp10 - tmp11;

        let z1 = multiply(tmp12 + tmp13, FIX_0_707106781);
        data[col + DCTSIZE * 2] = tmp13 + z1;
        data[col + DCTSIZE * 6] = tmp13 - z1;

        // Odd part
        let tmp10 = tmp4 + tmp5;
        let tmp11 = tmp5 + tmp6;
        let tmp12 = tmp6 + tmp7;

        let z5 = multiply(tmp10 - tmp12, FIX_0_382683433);
        let z2 = multiply(tmp10, FIX_0_541196100) + z5;
        let z4 = multiply(tmp12, FIX_1_306562965) + z5;
        let z3 = multiply(tmp11, FIX_0_707106781);

        let z11 = tmp7 + z3;
        let z13 = tmp7 - z3;

        data[col + DCTSIZE * 5] = z13 + z2;
        data[col + DCTSIZE * 3] = z13 - z2;
        data[col + DCTSIZE] = z11 + z4;
        data[col + DCTSIZE * 7] = z11 - z4;
    }
}
