//! # basejpeg - Baseline JFIF Encoder
//!
//! A baseline JPEG (ISO/IEC 10918-1, sequential DCT, Huffman, 8-bit) encoder
//! producing JFIF 1.01 bitstreams with 4:2:0 chroma subsampling.
//!
//! The encoder is deterministic: two encodes of the same input at the same
//! quality produce byte-identical output, regardless of which pixel-pipeline
//! backend executes the data-parallel stages.
//!
//! ## Usage
//!
//! ```rust
//! use basejpeg::{Backend, Encoder};
//!
//! let encoder = Encoder::new(Backend::Cpu, 85)?;
//! let pixels = vec![200u8; 32 * 24 * 3]; // RGB, row-major, tightly packed
//! let jpeg = encoder.encode_to_vec(&pixels, 32, 24)?;
//! assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
//! # Ok::<(), basejpeg::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! RGB pixels flow through color conversion, MCU-ordered block extraction
//! with 2:2 chroma downsampling, a fast integer forward DCT fused with
//! reciprocal quantization, and a sequential Huffman entropy coder, while
//! the container writer frames the result. The data-parallel stages sit
//! behind the [`backend::PixelPipeline`] trait so they can run on a thread
//! pool ([`Backend::Threaded`]) or, in principle, an accelerator.

pub mod backend;
mod blocks;
mod color;
pub mod consts;
mod dct;
mod encode;
mod entropy;
mod error;
mod huffman;
mod marker;
mod quant;

pub use backend::{Backend, PixelPipeline};
pub use blocks::McuGrid;
pub use encode::Encoder;
pub use error::Error;
pub use huffman::{DerivedTable, HuffTable};
pub use quant::{DivisorTable, QuantTable};

/// Result type for basejpeg operations
pub type Result<T> = std::result::Result<T, Error>;
