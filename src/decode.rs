use enough::Stop;

use crate::error::BmpError;
use crate::limits::Limits;
use crate::pixel::PixelBuffer;

/// Builder for a BMP decode with optional resource limits.
///
/// ```
/// use bmpfx::{DecodeRequest, Limits, Unstoppable};
///
/// # fn run(data: &[u8]) -> Result<(), bmpfx::BmpError> {
/// let limits = Limits { max_pixels: Some(4096 * 4096), ..Default::default() };
/// let image = DecodeRequest::new(data)
///     .with_limits(&limits)
///     .decode(Unstoppable)?;
/// println!("{}x{}", image.width(), image.height());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, limits: None }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Decode, polling `stop` between scanline batches.
    pub fn decode(self, stop: impl Stop) -> Result<PixelBuffer, BmpError> {
        crate::bmp::decode(self.data, self.limits, &stop)
    }
}
