//! Pixel-pipeline backends.
//!
//! The six stages between raw RGB and quantized coefficient blocks are
//! expressed as a trait so an accelerator (SIMD, GPU) can take over the
//! data-parallel work. [`CpuPipeline`] is the reference implementation and
//! the ground truth for tests; [`ThreadedPipeline`] fans the same per-MCU
//! work out over a rayon pool and produces byte-identical results because
//! every stage is a pure function of its disjoint chunk.
//!
//! The entropy coder is deliberately not part of the trait: the DC
//! predictors and the bit buffer make it strictly sequential.

use rayon::prelude::*;

use crate::blocks::{
    extract_chroma_mcu, extract_luma_mcu, zero_bottom_blocks, zero_right_blocks, McuGrid,
};
use crate::color::ColorTables;
use crate::consts::{BLOCKS_PER_MCU_LUMA, DCTSIZE2};
use crate::dct::fdct_quantize_block;
use crate::error::Result;
use crate::quant::DivisorTable;

/// Backend selector, chosen at encoder construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Single-threaded reference pipeline
    Cpu,
    /// Multi-threaded pipeline on the global rayon pool
    Threaded,
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Cpu
    }
}

/// The data-parallel stages of the encoder.
///
/// Ordering contract: color transform completes before downsampling reads a
/// pixel, downsampling completes before the DCT reads a block, and the
/// caller applies the bottom-edge DC fix only after `run_fdct_quantize`,
/// `run_zero_right` and `run_zero_bottom` have returned.
pub trait PixelPipeline: Send + Sync {
    /// Convert interleaved RGB into interleaved YCbCr of the same length.
    fn run_color_transform(&self, rgb: &[u8], ycc: &mut [u8]) -> Result<()>;

    /// Extract full-resolution luma blocks in MCU order (zero padded).
    fn run_downsample_luma(&self, ycc: &[u8], grid: &McuGrid, y_blocks: &mut [i16]) -> Result<()>;

    /// Extract 2:2 downsampled chroma blocks in MCU order (zero padded).
    fn run_downsample_chroma(
        &self,
        ycc: &[u8],
        grid: &McuGrid,
        cb_blocks: &mut [i16],
        cr_blocks: &mut [i16],
    ) -> Result<()>;

    /// Forward DCT and quantize every 8x8 block in the buffer.
    fn run_fdct_quantize(&self, blocks: &mut [i16], divisors: &DivisorTable) -> Result<()>;

    /// Zero luma blocks entirely right of the image.
    fn run_zero_right(&self, y_blocks: &mut [i16], grid: &McuGrid) -> Result<()>;

    /// Zero luma blocks entirely below the image.
    fn run_zero_bottom(&self, y_blocks: &mut [i16], grid: &McuGrid) -> Result<()>;
}

/// Construct the pipeline for a backend selector. The color conversion
/// tables are built once here and owned by the pipeline.
pub fn make_pipeline(backend: Backend) -> Box<dyn PixelPipeline> {
    match backend {
        Backend::Cpu => Box::new(CpuPipeline::new()),
        Backend::Threaded => Box::new(ThreadedPipeline::new()),
    }
}

/// Reference single-threaded pipeline.
pub struct CpuPipeline {
    color: ColorTables,
}

impl CpuPipeline {
    pub fn new() -> Self {
        Self {
            color: ColorTables::new(),
        }
    }
}

impl Default for CpuPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelPipeline for CpuPipeline {
    fn run_color_transform(&self, rgb: &[u8], ycc: &mut [u8]) -> Result<()> {
        self.color.convert_interleaved(rgb, ycc);
        Ok(())
    }

    fn run_downsample_luma(&self, ycc: &[u8], grid: &McuGrid, y_blocks: &mut [i16]) -> Result<()> {
        for (mcu, out) in y_blocks
            .chunks_exact_mut(BLOCKS_PER_MCU_LUMA * DCTSIZE2)
            .enumerate()
        {
            extract_luma_mcu(ycc, grid, mcu % grid.mcus_w, mcu / grid.mcus_w, out);
        }
        Ok(())
    }

    fn run_downsample_chroma(
        &self,
        ycc: &[u8],
        grid: &McuGrid,
        cb_blocks: &mut [i16],
        cr_blocks: &mut [i16],
    ) -> Result<()> {
        for (mcu, (cb, cr)) in cb_blocks
            .chunks_exact_mut(DCTSIZE2)
            .zip(cr_blocks.chunks_exact_mut(DCTSIZE2))
            .enumerate()
        {
            extract_chroma_mcu(ycc, grid, mcu % grid.mcus_w, mcu / grid.mcus_w, cb, cr);
        }
        Ok(())
    }

    fn run_fdct_quantize(&self, blocks: &mut [i16], divisors: &DivisorTable) -> Result<()> {
        for block in blocks.chunks_exact_mut(DCTSIZE2) {
            fdct_quantize_block(block, divisors);
        }
        Ok(())
    }

    fn run_zero_right(&self, y_blocks: &mut [i16], grid: &McuGrid) -> Result<()> {
        zero_right_blocks(y_blocks, grid);
        Ok(())
    }

    fn run_zero_bottom(&self, y_blocks: &mut [i16], grid: &McuGrid) -> Result<()> {
        zero_bottom_blocks(y_blocks, grid);
        Ok(())
    }
}

/// Multi-threaded pipeline. Identical math to [`CpuPipeline`], partitioned
/// over disjoint MCU chunks.
pub struct ThreadedPipeline {
    color: ColorTables,
}

impl ThreadedPipeline {
    pub fn new() -> Self {
        Self {
            color: ColorTables::new(),
        }
    }
}

impl Default for ThreadedPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelPipeline for ThreadedPipeline {
    fn run_color_transform(&self, rgb: &[u8], ycc: &mut [u8]) -> Result<()> {
        rgb.par_chunks_exact(3)
            .zip(ycc.par_chunks_exact_mut(3))
            .for_each(|(src, dst)| {
                let (y, cb, cr) = self.color.rgb_to_ycbcr(src[0], src[1], src[2]);
                dst[0] = y;
                dst[1] = cb;
                dst[2] = cr;
            });
        Ok(())
    }

    fn run_downsample_luma(&self, ycc: &[u8], grid: &McuGrid, y_blocks: &mut [i16]) -> Result<()> {
        y_blocks
            .par_chunks_exact_mut(BLOCKS_PER_MCU_LUMA * DCTSIZE2)
            .enumerate()
            .for_each(|(mcu, out)| {
                extract_luma_mcu(ycc, grid, mcu % grid.mcus_w, mcu / grid.mcus_w, out);
            });
        Ok(())
    }

    fn run_downsample_chroma(
        &self,
        ycc: &[u8],
        grid: &McuGrid,
        cb_blocks: &mut [i16],
        cr_blocks: &mut [i16],
    ) -> Result<()> {
        cb_blocks
            .par_chunks_exact_mut(DCTSIZE2)
            .zip(cr_blocks.par_chunks_exact_mut(DCTSIZE2))
            .enumerate()
            .for_each(|(mcu, (cb, cr))| {
                extract_chroma_mcu(ycc, grid, mcu % grid.mcus_w, mcu / grid.mcus_w, cb, cr);
            });
        Ok(())
    }

    fn run_fdct_quantize(&self, blocks: &mut [i16], divisors: &DivisorTable) -> Result<()> {
        blocks
            .par_chunks_exact_mut(DCTSIZE2)
            .for_each(|block| fdct_quantize_block(block, divisors));
        Ok(())
    }

    fn run_zero_right(&self, y_blocks: &mut [i16], grid: &McuGrid) -> Result<()> {
        zero_right_blocks(y_blocks, grid);
        Ok(())
    }

    fn run_zero_bottom(&self, y_blocks: &mut [i16], grid: &McuGrid) -> Result<()> {
        zero_bottom_blocks(y_blocks, grid);
        Ok(())
    }
}
