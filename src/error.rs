//! Error types for basejpeg

use std::fmt;

/// Result type for basejpeg operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for basejpeg operations
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid image dimensions
    InvalidDimensions {
        width: usize,
        height: usize,
        reason: &'static str,
    },
    /// Pixel buffer length does not match the stated dimensions
    InvalidPixelData {
        expected: usize,
        actual: usize,
    },
    /// The output sink rejected the finished bitstream
    Io(std::io::Error),
    /// A pixel-pipeline backend reported an error
    BackendFailed {
        stage: &'static str,
        reason: String,
    },
    /// A derived Huffman code exceeded 16 bits or the BITS counts do not
    /// describe a valid prefix code
    HuffmanCodeLengthOverflow,
    /// Internal encoder invariant violated
    Internal(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDimensions { width, height, reason } => {
                write!(f, "Invalid dimensions {}x{}: {}", width, height, reason)
            }
            Error::InvalidPixelData { expected, actual } => {
                write!(f, "Expected {} bytes of pixel data, got {}", expected, actual)
            }
            Error::Io(e) => write!(f, "Output sink error: {}", e),
            Error::BackendFailed { stage, reason } => {
                write!(f, "Backend failed at {}: {}", stage, reason)
            }
            Error::HuffmanCodeLengthOverflow => {
                write!(f, "Huffman code length exceeds maximum (16 bits)")
            }
            Error::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
