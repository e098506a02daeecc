//! In-memory BGR pixel buffer shared by the codec and every transform.

use imgref::{ImgRef, ImgVec};

use crate::error::BmpError;

/// One 24-bit pixel in BMP's native channel order (`b`, `g`, `r`).
pub type Bgr8 = rgb::alt::BGR8;

/// Construct a [`Bgr8`] from channels in blue, green, red order.
#[inline]
pub const fn bgr(b: u8, g: u8, r: u8) -> Bgr8 {
    Bgr8 { b, g, r }
}

/// A decoded 24-bit image.
///
/// Pixels are stored row-major in BMP scanline order: row `y = 0` is the
/// *bottom* row of the picture (the first row in the file), `x = 0` is the
/// leftmost column. Every transform reads and writes through [`get`] and
/// [`set`], so this is the single place the convention lives.
///
/// Width and height are always at least 1.
///
/// [`get`]: PixelBuffer::get
/// [`set`]: PixelBuffer::set
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    img: ImgVec<Bgr8>,
}

impl PixelBuffer {
    /// Wrap `pixels` (row-major, bottom row first) as a `width`x`height` buffer.
    pub fn new(width: usize, height: usize, pixels: Vec<Bgr8>) -> Result<Self, BmpError> {
        let expected = width
            .checked_mul(height)
            .ok_or(BmpError::DimensionsTooLarge {
                width: width as u64,
                height: height as u64,
            })?;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(BmpError::InvalidDimensions { width, height });
        }
        Ok(Self {
            img: ImgVec::new(pixels, width, height),
        })
    }

    /// A buffer where every pixel is `px`.
    pub fn filled(width: usize, height: usize, px: Bgr8) -> Result<Self, BmpError> {
        let len = width
            .checked_mul(height)
            .ok_or(BmpError::DimensionsTooLarge {
                width: width as u64,
                height: height as u64,
            })?;
        Self::new(width, height, vec![px; len])
    }

    /// Build a buffer by evaluating `f(x, y)` for every position.
    pub fn from_fn(
        width: usize,
        height: usize,
        f: impl FnMut(usize, usize) -> Bgr8,
    ) -> Result<Self, BmpError> {
        if width == 0 || height == 0 {
            return Err(BmpError::InvalidDimensions { width, height });
        }
        if width.checked_mul(height).is_none() {
            return Err(BmpError::DimensionsTooLarge {
                width: width as u64,
                height: height as u64,
            });
        }
        Ok(Self::generate(width, height, f))
    }

    /// `from_fn` for callers that derive `width`/`height` from an existing
    /// buffer, so both are non-zero and their product fits.
    pub(crate) fn generate(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> Bgr8,
    ) -> Self {
        debug_assert!(width > 0 && height > 0);
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            img: ImgVec::new(pixels, width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.img.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.img.height()
    }

    /// Pixel at column `x`, row `y` (counted from the bottom).
    ///
    /// Panics if the position is out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Bgr8 {
        assert!(x < self.width() && y < self.height(), "pixel ({x}, {y}) out of bounds");
        self.img.buf()[y * self.img.stride() + x]
    }

    /// Overwrite the pixel at column `x`, row `y` (counted from the bottom).
    ///
    /// Panics if the position is out of bounds.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, px: Bgr8) {
        assert!(x < self.width() && y < self.height(), "pixel ({x}, {y}) out of bounds");
        let stride = self.img.stride();
        self.img.buf_mut()[y * stride + x] = px;
    }

    /// All pixels, row-major, bottom row first.
    pub fn pixels(&self) -> &[Bgr8] {
        self.img.buf()
    }

    /// Rows in storage order (bottom row first).
    pub fn rows(&self) -> impl Iterator<Item = &[Bgr8]> + '_ {
        self.img.buf().chunks_exact(self.img.stride())
    }

    /// Borrow as an [`imgref::ImgRef`].
    pub fn as_imgref(&self) -> ImgRef<'_, Bgr8> {
        self.img.as_ref()
    }

    pub fn into_pixels(self) -> Vec<Bgr8> {
        self.img.into_buf()
    }

    /// New buffer of the same size with `f` applied to every pixel.
    pub fn map(&self, mut f: impl FnMut(Bgr8) -> Bgr8) -> PixelBuffer {
        let pixels = self.img.buf().iter().map(|&px| f(px)).collect();
        PixelBuffer {
            img: ImgVec::new(pixels, self.width(), self.height()),
        }
    }

    /// Like [`map`](Self::map), but `f` also receives the pixel's `(x, y)`.
    pub fn map_with_position(&self, mut f: impl FnMut(usize, usize, Bgr8) -> Bgr8) -> PixelBuffer {
        Self::generate(self.width(), self.height(), |x, y| f(x, y, self.get(x, y)))
    }
}

impl PartialEq for PixelBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.pixels() == other.pixels()
    }
}

impl Eq for PixelBuffer {}

/// How out-of-range channel results are stored into a `u8`.
///
/// Transforms compute in `i64`/`f64`; a real-valued result is first truncated
/// toward zero, then this policy maps it into `0..=255`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Overflow {
    /// Keep the low 8 bits (`value mod 256`).
    #[default]
    Wrap,
    /// Saturate to `0` or `255`.
    Clamp,
}

impl Overflow {
    #[inline]
    pub fn store(self, value: i64) -> u8 {
        match self {
            Self::Wrap => value as u8,
            Self::Clamp => value.clamp(0, 255) as u8,
        }
    }

    /// Truncate toward zero, then store. NaN becomes 0 and infinities saturate
    /// to the `i64` range before the policy applies.
    #[inline]
    pub fn store_f64(self, value: f64) -> u8 {
        self.store(value as i64)
    }
}
