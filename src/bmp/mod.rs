//! 24-bit uncompressed BMP decoder and encoder (internal).
//!
//! Use top-level [`crate::decode_bmp`], [`crate::encode_bmp`], etc.

mod decode;
mod encode;

use enough::Stop;

use crate::error::BmpError;
use crate::limits::Limits;
use crate::pixel::PixelBuffer;

/// Header summary of a BMP, read without decoding pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpInfo {
    pub width: u32,
    pub height: u32,
    /// Declared total file size (header offset 2).
    pub file_size: u32,
    /// Offset of the pixel array (header offset 10).
    pub data_offset: u32,
    pub bits_per_pixel: u16,
}

impl BmpInfo {
    /// Parse and validate the header only.
    pub fn from_bytes(data: &[u8]) -> Result<Self, BmpError> {
        let header = decode::parse_bmp_header(data)?;
        Ok(Self {
            width: header.width,
            height: header.height,
            file_size: header.file_size,
            data_offset: header.data_offset,
            bits_per_pixel: header.bits_per_pixel,
        })
    }

    /// Bytes per scanline including padding.
    pub fn row_stride(&self) -> u64 {
        decode::row_stride(u64::from(self.width))
    }
}

/// Decode BMP data into a BGR pixel buffer.
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<PixelBuffer, BmpError> {
    let header = decode::parse_bmp_header(data)?;
    check_limits(limits, header.width, header.height)?;
    stop.check()?;
    let buf = decode::decode_bmp_pixels(data, &header, stop)?;
    log::debug!("decoded {}x{} bmp", buf.width(), buf.height());
    Ok(buf)
}

fn check_limits(limits: Option<&Limits>, width: u32, height: u32) -> Result<(), BmpError> {
    match limits {
        Some(limits) => limits.check(width, height),
        None => Ok(()),
    }
}

/// Fail with [`BmpError::DimensionsTooLarge`] unless a `width` x `height`
/// image fits the 32-bit BMP header fields.
pub(crate) fn check_encodable(width: u64, height: u64) -> Result<(), BmpError> {
    encode::BmpLayout::new(width, height).map(|_| ())
}

/// Encode to BMP.
pub(crate) fn encode(buf: &PixelBuffer, stop: &dyn Stop) -> Result<Vec<u8>, BmpError> {
    let out = encode::encode_bmp(buf, stop)?;
    log::debug!(
        "encoded {}x{} bmp ({} bytes)",
        buf.width(),
        buf.height(),
        out.len()
    );
    Ok(out)
}
