use alloc::string::String;
use enough::StopReason;

/// Why a crop rectangle was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum CropRejection {
    /// `x` or `y` is negative.
    NegativeOrigin,
    /// `w` or `h` is zero or negative.
    NonPositiveSize,
    /// `x + w` or `y + h` does not fit in an `i32`.
    Overflow,
    /// The rectangle extends past the source image.
    OutOfBounds,
}

impl core::fmt::Display for CropRejection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::NegativeOrigin => "negative crop origin",
            Self::NonPositiveSize => "crop width and height must be positive",
            Self::Overflow => "crop rectangle overflows i32",
            Self::OutOfBounds => "crop rectangle exceeds source bounds",
        })
    }
}

/// Errors from BMP reading, writing, and cropping.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BmpError {
    #[cfg(feature = "std")]
    #[error("failed to open file: {source}")]
    OpenFailed {
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "std")]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("short read: needed {needed} bytes, got {available}")]
    ShortRead { needed: usize, available: usize },

    #[error("short write")]
    ShortWrite,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("size computation overflowed")]
    SizeOverflow,

    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("failed to allocate {bytes} bytes")]
    AllocationFailed { bytes: usize },

    #[error("invalid crop rectangle: {0}")]
    InvalidCropRectangle(CropRejection),

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for BmpError {
    fn from(r: StopReason) -> Self {
        BmpError::Cancelled(r)
    }
}

impl From<CropRejection> for BmpError {
    fn from(r: CropRejection) -> Self {
        BmpError::InvalidCropRectangle(r)
    }
}
