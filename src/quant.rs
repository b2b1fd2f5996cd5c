//! Quantization table handling.
//!
//! Scales the Annex K base tables by the user quality factor and precomputes
//! the reciprocal divisor quadruples that let the DCT stage replace a divide
//! by `qval * 8` with a multiply-add-shift (the libjpeg-turbo technique).

use crate::consts::{jpeg_nbits, DCTSIZE2, STD_CHROMA_QUANT, STD_LUMA_QUANT};
use crate::error::{Error, Result};

/// Quantization table for a single component class
#[derive(Clone, Debug)]
pub struct QuantTable {
    /// Quantization values in natural (row-major) order, each in 1..=255
    pub values: [u8; DCTSIZE2],
    /// DQT table slot (0 = luminance, 1 = chrominance)
    pub slot: u8,
}

impl QuantTable {
    /// Create the luminance table at the given quality
    pub fn luma(quality: u8) -> Self {
        Self::from_base_table(&STD_LUMA_QUANT, quality, 0)
    }

    /// Create the chrominance table at the given quality
    pub fn chroma(quality: u8) -> Self {
        Self::from_base_table(&STD_CHROMA_QUANT, quality, 1)
    }

    /// Scale a base quantization table by quality factor.
    ///
    /// Quality is clamped to 1..=100 and mapped onto the IJG linear scaling
    /// curve: `5000/q` below 50, `200 - 2q` from 50 up.
    fn from_base_table(base: &[u8; DCTSIZE2], quality: u8, slot: u8) -> Self {
        let quality = quality.clamp(1, 100) as u32;

        let scale = if quality < 50 {
            5000 / quality
        } else {
            200 - 2 * quality
        };

        let mut values = [0u8; DCTSIZE2];
        for (v, &b) in values.iter_mut().zip(base.iter()) {
            let scaled = (u32::from(b) * scale + 50) / 100;
            *v = scaled.clamp(1, 255) as u8;
        }

        Self { values, slot }
    }

    /// Get the quantization value at a zigzag position
    #[inline]
    pub fn at_zigzag(&self, pos: usize) -> u8 {
        self.values[crate::consts::JPEG_NATURAL_ORDER[pos]]
    }
}

/// Reciprocal divisor table for one quantization table.
///
/// Four parallel sequences, one quadruple per coefficient. The divisor for
/// coefficient `i` is `values[i] * 8` because the forward DCT outputs
/// coefficients scaled up by a factor of 8. `scale` and `shift` are carried
/// for SIMD-style backends that implement the divide as two 16-bit high
/// multiplies; the scalar path below uses `recip`, `corr` and `shift` only.
#[derive(Clone, Debug)]
pub struct DivisorTable {
    pub recip: [i16; DCTSIZE2],
    pub corr: [i16; DCTSIZE2],
    pub scale: [i16; DCTSIZE2],
    pub shift: [i16; DCTSIZE2],
}

impl DivisorTable {
    /// Build the divisor table for a quantization table.
    pub fn new(qtbl: &QuantTable) -> Result<Self> {
        let mut table = Self {
            recip: [0; DCTSIZE2],
            corr: [0; DCTSIZE2],
            scale: [0; DCTSIZE2],
            shift: [0; DCTSIZE2],
        };
        for i in 0..DCTSIZE2 {
            let divisor = u16::from(qtbl.values[i]) << 3;
            let (recip, corr, scale, shift) = compute_reciprocal(divisor)?;
            table.recip[i] = recip;
            table.corr[i] = corr;
            table.scale[i] = scale;
            table.shift[i] = shift;
        }
        Ok(table)
    }

    /// Quantize one DCT coefficient (already at the 8x natural scale).
    ///
    /// Bit-identical to `sign(x) * ((|x| + divisor/2) / divisor)` for the
    /// coefficient range produced by 8-bit samples.
    #[inline]
    pub fn quantize(&self, coef: i32, i: usize) -> i16 {
        let recip = u64::from(self.recip[i] as u16);
        let corr = u64::from(self.corr[i] as u16);
        let shift = i32::from(self.shift[i]) + 16;

        let magnitude = u64::from(coef.unsigned_abs()) + corr;
        let quantized = ((magnitude * recip) >> shift) as i16;

        if coef < 0 {
            -quantized
        } else {
            quantized
        }
    }
}

/// Compute the reciprocal quadruple for one divisor.
///
/// Adapted from libjpeg-turbo's `compute_reciprocal`: chooses `r = 16 + b`
/// bits of precision where `b` is the highest bit of the divisor, then nudges
/// either the reciprocal or the correction term depending on the remainder so
/// the multiply-shift reproduces rounded division exactly.
fn compute_reciprocal(divisor: u16) -> Result<(i16, i16, i16, i16)> {
    if divisor == 1 {
        // Unquantized: parameters make the quantizer an identity function.
        return Ok((1, 0, 1, -16));
    }
    if divisor == 0 {
        return Err(Error::Internal("quantization divisor of zero"));
    }

    let b = u32::from(jpeg_nbits(u32::from(divisor))) - 1;
    let mut r = 16 + b;

    let mut fq = (1u32 << r) / u32::from(divisor);
    let fr = (1u32 << r) % u32::from(divisor);

    let mut c = u32::from(divisor) >> 1;

    if fr == 0 {
        // Divisor is a power of two; fq is one bit too large.
        fq >>= 1;
        r -= 1;
    } else if fr <= u32::from(divisor) / 2 {
        c += 1;
    } else {
        fq += 1;
    }

    Ok((
        fq as u16 as i16,
        c as u16 as i16,
        (1u32 << (32 - r)) as u16 as i16,
        (r as i16) - 16,
    ))
}
