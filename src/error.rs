use enough::StopReason;

/// Errors from BMP decoding/encoding and from applying transforms.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BmpError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The header does not describe a 24-bit uncompressed BMP.
    #[error("not a 24-bit true color image: {0}")]
    Format(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u64, height: u64 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("invalid transform parameter: {0}")]
    InvalidParameter(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for BmpError {
    fn from(r: StopReason) -> Self {
        BmpError::Cancelled(r)
    }
}

impl BmpError {
    /// Whether this error means the input is not a supported BMP
    /// (as opposed to an I/O failure or a bad transform parameter).
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_) | Self::UnexpectedEof)
    }
}
