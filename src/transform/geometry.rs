//! Geometric transforms: quarter-turn rotation and nearest-neighbor enlarge.

use crate::bmp;
use crate::error::BmpError;
use crate::pixel::PixelBuffer;

/// Rotate 90° clockwise. Output is `height` wide and `width` tall.
pub fn rotate90(buf: &PixelBuffer) -> PixelBuffer {
    let last_x = buf.width() - 1;
    PixelBuffer::generate(buf.height(), buf.width(), |x, y| buf.get(last_x - y, x))
}

/// Rotate clockwise by `rotations` quarter turns.
pub fn rotate90x(buf: &PixelBuffer, rotations: u32) -> PixelBuffer {
    // four quarter turns are the identity permutation
    let mut out = buf.clone();
    for _ in 0..rotations % 4 {
        out = rotate90(&out);
    }
    out
}

/// Nearest-neighbor upscale: every source pixel becomes an
/// `x_scale`x`y_scale` block.
///
/// Outputs too large to encode as a BMP fail with
/// [`BmpError::DimensionsTooLarge`] before anything is allocated.
pub fn enlarge(buf: &PixelBuffer, x_scale: u32, y_scale: u32) -> Result<PixelBuffer, BmpError> {
    if x_scale == 0 || y_scale == 0 {
        return Err(BmpError::InvalidParameter(format!(
            "enlarge scale factors must be positive, got {x_scale}x{y_scale}"
        )));
    }
    let width = (buf.width() as u64).saturating_mul(u64::from(x_scale));
    let height = (buf.height() as u64).saturating_mul(u64::from(y_scale));
    bmp::check_encodable(width, height)?;

    let (xs, ys) = (x_scale as usize, y_scale as usize);
    PixelBuffer::from_fn(width as usize, height as usize, |x, y| buf.get(x / xs, y / ys))
}
