use crate::error::BmpError;

/// Bytes the decoder allocates per pixel.
const DECODED_BYTES_PER_PIXEL: u64 = 3;

/// Resource limits for decoding.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum memory bytes for the decoded pixel buffer.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Check a `width` x `height` decode against every cap, including the
    /// size of the BGR buffer it would allocate.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), BmpError> {
        let pixels = u64::from(width) * u64::from(height);
        let bytes = pixels.saturating_mul(DECODED_BYTES_PER_PIXEL);
        let measured = [
            ("width", u64::from(width), self.max_width),
            ("height", u64::from(height), self.max_height),
            ("pixel count", pixels, self.max_pixels),
            ("decoded size in bytes", bytes, self.max_memory_bytes),
        ];
        for (what, value, cap) in measured {
            if let Some(cap) = cap.filter(|&cap| value > cap) {
                return Err(BmpError::LimitExceeded(format!(
                    "{what} {value} exceeds limit {cap}"
                )));
            }
        }
        Ok(())
    }
}
