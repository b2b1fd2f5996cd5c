//! Main encoder: owns the immutable table set and drives the pipeline.
//!
//! The [`Encoder`] is constructed once per quality setting and can encode
//! any number of images. Per-image buffers live only for the duration of an
//! encode call; nothing is written to the sink until the bitstream is
//! complete.

use std::io::Write;

use imgref::ImgRef;
use rgb::RGB8;

use crate::backend::{make_pipeline, Backend, PixelPipeline};
use crate::blocks::{fix_bottom_edge_dc, McuGrid};
use crate::consts::{BLOCKS_PER_MCU_LUMA, DCTSIZE2};
use crate::entropy::{encode_mcu, EntropyState};
use crate::error::{Error, Result};
use crate::huffman::{DerivedTable, HuffTable};
use crate::marker::{
    write_app0_jfif, write_dht, write_dqt, write_eoi, write_sof0, write_soi, write_sos,
};
use crate::quant::{DivisorTable, QuantTable};

/// Maximum image dimension representable in a SOF0 segment
const MAX_DIMENSION: usize = 65535;

/// Baseline JFIF encoder with 4:2:0 chroma subsampling.
pub struct Encoder {
    quality: u8,
    quant: [QuantTable; 2],
    divisors: [DivisorTable; 2],
    dc_specs: [HuffTable; 2],
    ac_specs: [HuffTable; 2],
    dc_derived: [DerivedTable; 2],
    ac_derived: [DerivedTable; 2],
    pipeline: Box<dyn PixelPipeline>,
}

impl Encoder {
    /// Create an encoder. Quality is clamped to 1..=100; all quantization,
    /// divisor and Huffman tables are built here and stay immutable for the
    /// encoder's lifetime.
    pub fn new(backend: Backend, quality: u8) -> Result<Self> {
        let quality = quality.clamp(1, 100);

        let quant = [QuantTable::luma(quality), QuantTable::chroma(quality)];
        let divisors = [
            DivisorTable::new(&quant[0])?,
            DivisorTable::new(&quant[1])?,
        ];

        let dc_specs = [HuffTable::dc_luma(), HuffTable::dc_chroma()];
        let ac_specs = [HuffTable::ac_luma(), HuffTable::ac_chroma()];
        let dc_derived = [
            DerivedTable::derive(&dc_specs[0])?,
            DerivedTable::derive(&dc_specs[1])?,
        ];
        let ac_derived = [
            DerivedTable::derive(&ac_specs[0])?,
            DerivedTable::derive(&ac_specs[1])?,
        ];

        Ok(Self {
            quality,
            quant,
            divisors,
            dc_specs,
            ac_specs,
            dc_derived,
            ac_derived,
            pipeline: make_pipeline(backend),
        })
    }

    /// The clamped quality this encoder was built with.
    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode a tightly packed, row-major RGB image and write the finished
    /// JPEG to the sink. Nothing is written on error.
    pub fn encode<W: Write>(
        &self,
        rgb: &[u8],
        width: usize,
        height: usize,
        sink: &mut W,
    ) -> Result<()> {
        let jpeg = self.encode_to_vec(rgb, width, height)?;
        sink.write_all(&jpeg)?;
        Ok(())
    }

    /// Encode a typed image reference. The buffer may carry row padding;
    /// only `width` pixels per row are read.
    pub fn encode_img(&self, img: ImgRef<'_, RGB8>) -> Result<Vec<u8>> {
        let (width, height) = (img.width(), img.height());
        let mut rgb = Vec::with_capacity(width * height * 3);
        for row in img.rows() {
            for px in row {
                rgb.extend_from_slice(&[px.r, px.g, px.b]);
            }
        }
        self.encode_to_vec(&rgb, width, height)
    }

    /// Encode a tightly packed, row-major RGB image into a byte vector.
    pub fn encode_to_vec(&self, rgb: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
        self.validate(rgb, width, height)?;

        let grid = McuGrid::new(width, height);
        let mut out = Vec::with_capacity(width * height / 2 + 1024);

        // Container prologue
        write_soi(&mut out);
        write_app0_jfif(&mut out);
        write_dqt(&mut out, &self.quant[0]);
        write_dqt(&mut out, &self.quant[1]);
        write_sof0(&mut out, width as u16, height as u16);
        write_dht(&mut out, &self.dc_specs[0], 0, 0);
        write_dht(&mut out, &self.ac_specs[0], 1, 0);
        write_dht(&mut out, &self.dc_specs[1], 0, 1);
        write_dht(&mut out, &self.ac_specs[1], 1, 1);
        write_sos(&mut out);

        // Pixel pipeline
        let mut ycc = vec![0u8; rgb.len()];
        self.pipeline.run_color_transform(rgb, &mut ycc)?;

        let mut y_blocks = vec![0i16; grid.luma_len()];
        let mut cb_blocks = vec![0i16; grid.chroma_len()];
        let mut cr_blocks = vec![0i16; grid.chroma_len()];
        self.pipeline
            .run_downsample_luma(&ycc, &grid, &mut y_blocks)?;
        self.pipeline
            .run_downsample_chroma(&ycc, &grid, &mut cb_blocks, &mut cr_blocks)?;

        self.pipeline
            .run_fdct_quantize(&mut y_blocks, &self.divisors[0])?;
        self.pipeline
            .run_fdct_quantize(&mut cb_blocks, &self.divisors[1])?;
        self.pipeline
            .run_fdct_quantize(&mut cr_blocks, &self.divisors[1])?;

        self.pipeline.run_zero_right(&mut y_blocks, &grid)?;
        self.pipeline.run_zero_bottom(&mut y_blocks, &grid)?;

        // The DC carry must observe the final quantized coefficients, so it
        // runs on the host after every pipeline stage has completed.
        fix_bottom_edge_dc(&mut y_blocks, &grid);

        // Entropy-coded scan, MCUs in row-major order
        let mut state = EntropyState::new();
        for mcu in 0..grid.mcu_count() {
            let luma = &y_blocks[mcu * BLOCKS_PER_MCU_LUMA * DCTSIZE2..][..4 * DCTSIZE2];
            let cb = &cb_blocks[mcu * DCTSIZE2..][..DCTSIZE2];
            let cr = &cr_blocks[mcu * DCTSIZE2..][..DCTSIZE2];
            encode_mcu(
                &[
                    &luma[..DCTSIZE2],
                    &luma[DCTSIZE2..2 * DCTSIZE2],
                    &luma[2 * DCTSIZE2..3 * DCTSIZE2],
                    &luma[3 * DCTSIZE2..],
                    cb,
                    cr,
                ],
                &self.dc_derived,
                &self.ac_derived,
                &mut state,
                &mut out,
            );
        }
        state.flush(&mut out);

        write_eoi(&mut out);
        Ok(out)
    }

    fn validate(&self, rgb: &[u8], width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions {
                width,
                height,
                reason: "dimensions must be non-zero",
            });
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(Error::InvalidDimensions {
                width,
                height,
                reason: "dimensions exceed JPEG maximum (65535)",
            });
        }
        let expected = width * height * 3;
        if rgb.len() != expected {
            return Err(Error::InvalidPixelData {
                expected,
                actual: rgb.len(),
            });
        }
        Ok(())
    }
}
