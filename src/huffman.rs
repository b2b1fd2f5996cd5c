//! Huffman table construction for JPEG entropy encoding.
//!
//! A [`HuffTable`] holds the `(BITS, VALUES)` specification exactly as it is
//! serialized into a DHT segment; a [`DerivedTable`] is the expanded
//! per-symbol canonical code table used by the entropy coder, built per
//! Annex C Figures C.1-C.3.

use crate::consts::{
    AC_CHROMA_BITS, AC_CHROMA_VALUES, AC_LUMA_BITS, AC_LUMA_VALUES, DC_CHROMA_BITS,
    DC_CHROMA_VALUES, DC_LUMA_BITS, DC_LUMA_VALUES,
};
use crate::error::{Error, Result};

/// A Huffman table specification: the raw contents of a DHT segment.
#[derive(Clone, Debug)]
pub struct HuffTable {
    /// bits[k] = number of symbols with codes of length k bits; bits[0] unused
    pub bits: [u8; 17],
    /// The symbols, in order of increasing code length
    pub values: Vec<u8>,
}

impl HuffTable {
    /// Create a specification from BITS and VALUES arrays.
    pub fn new(bits: &[u8; 17], values: &[u8]) -> Self {
        Self {
            bits: *bits,
            values: values.to_vec(),
        }
    }

    /// Standard DC luminance table (Annex K)
    pub fn dc_luma() -> Self {
        Self::new(&DC_LUMA_BITS, &DC_LUMA_VALUES)
    }

    /// Standard AC luminance table (Annex K)
    pub fn ac_luma() -> Self {
        Self::new(&AC_LUMA_BITS, &AC_LUMA_VALUES)
    }

    /// Standard DC chrominance table (Annex K)
    pub fn dc_chroma() -> Self {
        Self::new(&DC_CHROMA_BITS, &DC_CHROMA_VALUES)
    }

    /// Standard AC chrominance table (Annex K)
    pub fn ac_chroma() -> Self {
        Self::new(&AC_CHROMA_BITS, &AC_CHROMA_VALUES)
    }

    /// Total number of symbols (sum of BITS)
    pub fn symbol_count(&self) -> usize {
        self.bits[1..].iter().map(|&b| b as usize).sum()
    }
}

/// Expanded encoding table: canonical `(code, length)` indexed by symbol.
///
/// Symbols not listed in the specification have length 0 and must never be
/// emitted.
#[derive(Clone, Debug)]
pub struct DerivedTable {
    codes: [u32; 256],
    sizes: [u8; 256],
}

impl DerivedTable {
    /// Expand a `(BITS, VALUES)` specification into canonical codes.
    pub fn derive(spec: &HuffTable) -> Result<Self> {
        // Figure C.1: make a table of Huffman code lengths for each symbol
        let mut huffsize = [0u8; 257];
        let mut p = 0usize;
        for l in 1..=16u8 {
            for _ in 0..spec.bits[l as usize] {
                if p >= 256 {
                    return Err(Error::HuffmanCodeLengthOverflow);
                }
                huffsize[p] = l;
                p += 1;
            }
        }
        let lastp = p;
        if lastp != spec.values.len() {
            return Err(Error::Internal("Huffman BITS/VALUES length mismatch"));
        }

        // Figure C.2: generate the codes themselves. A canonical code of
        // length si must fit in si bits (no code may be all ones).
        let mut huffcode = [0u32; 257];
        let mut code = 0u32;
        let mut si = huffsize[0];
        let mut p = 0usize;
        while p < lastp && huffsize[p] != 0 {
            while p < lastp && huffsize[p] == si {
                huffcode[p] = code;
                code += 1;
                p += 1;
            }
            if code >= 1 << si {
                return Err(Error::HuffmanCodeLengthOverflow);
            }
            code <<= 1;
            si += 1;
        }

        // Figure C.3: populate the per-symbol encoding table
        let mut derived = Self {
            codes: [0; 256],
            sizes: [0; 256],
        };
        for p in 0..lastp {
            let symbol = spec.values[p] as usize;
            if derived.sizes[symbol] != 0 {
                return Err(Error::Internal("duplicate symbol in Huffman VALUES"));
            }
            derived.codes[symbol] = huffcode[p];
            derived.sizes[symbol] = huffsize[p];
        }
        Ok(derived)
    }

    /// Get the code and bit length for a symbol.
    #[inline]
    pub fn code(&self, symbol: u8) -> (u32, u8) {
        (self.codes[symbol as usize], self.sizes[symbol as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_prefix_free(table: &DerivedTable, spec: &HuffTable) {
        let symbols: Vec<u8> = spec.values.clone();
        for (i, &a) in symbols.iter().enumerate() {
            let (code_a, len_a) = table.code(a);
            assert!(len_a >= 1 && len_a <= 16, "symbol {:#04x}", a);
            for &b in &symbols[i + 1..] {
                let (code_b, len_b) = table.code(b);
                let (short, long, short_len, long_len) = if len_a <= len_b {
                    (code_a, code_b, len_a, len_b)
                } else {
                    (code_b, code_a, len_b, len_a)
                };
                assert_ne!(
                    short,
                    long >> (long_len - short_len),
                    "{:#04x} is a prefix of {:#04x}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn standard_tables_derive() {
        for spec in [
            HuffTable::dc_luma(),
            HuffTable::ac_luma(),
            HuffTable::dc_chroma(),
            HuffTable::ac_chroma(),
        ] {
            let derived = DerivedTable::derive(&spec).unwrap();
            assert_prefix_free(&derived, &spec);
        }
    }

    #[test]
    fn known_canonical_codes() {
        // DC luminance: symbol 0 is the only 2-bit code and comes first,
        // so it gets code 00; symbol 1 is the first 3-bit code, 010.
        let dc = DerivedTable::derive(&HuffTable::dc_luma()).unwrap();
        assert_eq!(dc.code(0), (0b00, 2));
        assert_eq!(dc.code(1), (0b010, 3));
        assert_eq!(dc.code(5), (0b1110, 4));

        // AC luminance: EOB (0x00) is the fourth 4-bit symbol, 1010;
        // ZRL (0xF0) has an 11-bit code.
        let ac = DerivedTable::derive(&HuffTable::ac_luma()).unwrap();
        assert_eq!(ac.code(0x00), (0b1010, 4));
        assert_eq!(ac.code(0x01), (0b00, 2));
        assert_eq!(ac.code(0xF0).1, 11);

        // AC chrominance: EOB is the first symbol, a 2-bit 00.
        let ac_c = DerivedTable::derive(&HuffTable::ac_chroma()).unwrap();
        assert_eq!(ac_c.code(0x00), (0b00, 2));
    }

    #[test]
    fn unlisted_symbols_have_length_zero() {
        let dc = DerivedTable::derive(&HuffTable::dc_luma()).unwrap();
        // DC tables only define categories 0..=11
        assert_eq!(dc.code(12).1, 0);
        assert_eq!(dc.code(0xFF).1, 0);
    }

    #[test]
    fn rejects_oversubscribed_bits() {
        // Three 1-bit codes cannot exist
        let mut bits = [0u8; 17];
        bits[1] = 3;
        let spec = HuffTable::new(&bits, &[0, 1, 2]);
        assert!(matches!(
            DerivedTable::derive(&spec),
            Err(Error::HuffmanCodeLengthOverflow)
        ));
    }
}
