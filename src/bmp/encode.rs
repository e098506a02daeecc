//! BMP encoder: uncompressed 24-bit BMP.

use enough::Stop;

use super::decode::HEADERS_LEN;
use crate::error::BmpError;
use crate::pixel::PixelBuffer;

/// Header sizes of an encoded image, checked against the 32-bit fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BmpLayout {
    pub width: i32,
    pub height: i32,
    pub row_stride: usize,
    pub pixel_data_size: u32,
    pub file_size: u32,
}

impl BmpLayout {
    /// Fails with [`BmpError::DimensionsTooLarge`] when either dimension
    /// exceeds `i32::MAX` or the file size exceeds `u32::MAX`.
    pub(crate) fn new(width: u64, height: u64) -> Result<Self, BmpError> {
        let too_large = || BmpError::DimensionsTooLarge { width, height };
        let w = i32::try_from(width).map_err(|_| too_large())?;
        let h = i32::try_from(height).map_err(|_| too_large())?;

        // w <= i32::MAX, so the stride itself cannot overflow u64
        let row_stride = super::decode::row_stride(width);
        let pixel_data_size = row_stride.checked_mul(height).ok_or_else(too_large)?;
        let file_size = pixel_data_size
            .checked_add(HEADERS_LEN as u64)
            .ok_or_else(too_large)?;

        Ok(Self {
            width: w,
            height: h,
            row_stride: usize::try_from(row_stride).map_err(|_| too_large())?,
            pixel_data_size: u32::try_from(pixel_data_size).map_err(|_| too_large())?,
            file_size: u32::try_from(file_size).map_err(|_| too_large())?,
        })
    }
}

/// Encode a pixel buffer as a BITMAPINFOHEADER 24-bit BMP.
pub(crate) fn encode_bmp(buf: &PixelBuffer, stop: &dyn Stop) -> Result<Vec<u8>, BmpError> {
    let w = buf.width();
    let layout = BmpLayout::new(w as u64, buf.height() as u64)?;

    stop.check()?;

    let mut out = Vec::with_capacity(layout.file_size as usize);
    write_bmp_header(&mut out, &layout);

    let pad_bytes = layout.row_stride - w * 3;
    // Rows are already in file order (bottom scanline first).
    for (row, pixels) in buf.rows().enumerate() {
        if row % 16 == 0 {
            stop.check()?;
        }
        for px in pixels {
            out.push(px.b);
            out.push(px.g);
            out.push(px.r);
        }
        out.extend(core::iter::repeat_n(0u8, pad_bytes));
    }

    Ok(out)
}

fn write_bmp_header(out: &mut Vec<u8>, layout: &BmpLayout) {
    // File header (14 bytes)
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&layout.file_size.to_le_bytes());
    out.extend_from_slice(&[0u8; 4]); // reserved
    out.extend_from_slice(&(HEADERS_LEN as u32).to_le_bytes()); // data offset

    // DIB header (BITMAPINFOHEADER, 40 bytes)
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&layout.width.to_le_bytes());
    out.extend_from_slice(&layout.height.to_le_bytes()); // positive = bottom-up
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&24u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // compression
    out.extend_from_slice(&layout.pixel_data_size.to_le_bytes());
    out.extend_from_slice(&2835u32.to_le_bytes()); // h resolution (72 DPI)
    out.extend_from_slice(&2835u32.to_le_bytes()); // v resolution
    out.extend_from_slice(&0u32.to_le_bytes()); // colors used
    out.extend_from_slice(&0u32.to_le_bytes()); // important colors
}
