//! BMP decoder: 24-bit uncompressed, bottom-up scanlines.

use enough::Stop;

use crate::error::BmpError;
use crate::pixel::{Bgr8, PixelBuffer, bgr};

/// Size of the BITMAPFILEHEADER + BITMAPINFOHEADER pair.
pub(crate) const HEADERS_LEN: usize = 54;

// ── Cursor for reading little-endian fields from &[u8] ──────────────

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], BmpError> {
        let end = self.pos.checked_add(N).ok_or(BmpError::UnexpectedEof)?;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or(BmpError::UnexpectedEof)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.pos = end;
        Ok(out)
    }

    fn get_u16_le(&mut self) -> Result<u16, BmpError> {
        Ok(u16::from_le_bytes(self.read_fixed_bytes()?))
    }

    fn get_u32_le(&mut self) -> Result<u32, BmpError> {
        Ok(u32::from_le_bytes(self.read_fixed_bytes()?))
    }

    fn get_i32_le(&mut self) -> Result<i32, BmpError> {
        Ok(i32::from_le_bytes(self.read_fixed_bytes()?))
    }
}

// ── Parsed BMP header ───────────────────────────────────────────────

/// The header fields this codec reads. Everything else is ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BmpHeader {
    pub file_size: u32,
    pub data_offset: u32,
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u16,
}

impl BmpHeader {
    /// Bytes per scanline: `width * 3` rounded up to a multiple of 4.
    pub fn row_stride(&self) -> u64 {
        row_stride(u64::from(self.width))
    }

    /// Where the pixel array should end according to the header.
    pub fn expected_file_size(&self) -> u64 {
        u64::from(self.data_offset) + self.row_stride() * u64::from(self.height)
    }
}

pub(crate) fn row_stride(width: u64) -> u64 {
    (width * 3).div_ceil(4) * 4
}

/// Parse and validate the fixed 54-byte header.
///
/// The declared file size must equal `data_offset + row_stride * height`;
/// anything that is not 24-bit uncompressed fails that arithmetic.
pub(crate) fn parse_bmp_header(data: &[u8]) -> Result<BmpHeader, BmpError> {
    if data.len() < HEADERS_LEN {
        return Err(BmpError::UnexpectedEof);
    }
    let mut cur = Cursor::new(data);

    let magic: [u8; 2] = cur.read_fixed_bytes()?;
    if &magic != b"BM" {
        return Err(BmpError::Format("missing BM signature".into()));
    }
    let file_size = cur.get_u32_le()?;
    let _reserved: [u8; 4] = cur.read_fixed_bytes()?;
    let data_offset = cur.get_u32_le()?;

    let _info_size = cur.get_u32_le()?;
    let width = cur.get_i32_le()?;
    let height = cur.get_i32_le()?;
    let _planes = cur.get_u16_le()?;
    let bits_per_pixel = cur.get_u16_le()?;
    let compression = cur.get_u32_le()?;

    log::trace!(
        "bmp header: size={file_size} offset={data_offset} {width}x{height} bpp={bits_per_pixel} compression={compression}"
    );

    if width <= 0 || height <= 0 {
        return Err(BmpError::Format(format!(
            "unsupported dimensions {width}x{height}"
        )));
    }

    let header = BmpHeader {
        file_size,
        data_offset,
        width: width as u32,
        height: height as u32,
        bits_per_pixel,
    };

    let expected = header.expected_file_size();
    if u64::from(file_size) != expected {
        return Err(BmpError::Format(format!(
            "declared file size {file_size} does not match {expected} computed from header"
        )));
    }

    Ok(header)
}

/// Read the pixel array described by `header` into a [`PixelBuffer`].
pub(crate) fn decode_bmp_pixels(
    data: &[u8],
    header: &BmpHeader,
    stop: &dyn Stop,
) -> Result<PixelBuffer, BmpError> {
    let w = header.width as usize;
    let h = header.height as usize;
    let stride = usize::try_from(header.row_stride()).map_err(|_| too_large(header))?;
    let start = header.data_offset as usize;
    let end = stride
        .checked_mul(h)
        .and_then(|len| len.checked_add(start))
        .ok_or_else(|| too_large(header))?;
    let pixel_array = data.get(start..end).ok_or(BmpError::UnexpectedEof)?;

    let len = w.checked_mul(h).ok_or_else(|| too_large(header))?;
    let mut pixels: Vec<Bgr8> = Vec::with_capacity(len);
    for (row, scanline) in pixel_array.chunks_exact(stride).enumerate() {
        if row % 16 == 0 {
            stop.check()?;
        }
        // Trailing bytes past width * 3 are padding.
        pixels.extend(
            scanline[..w * 3]
                .chunks_exact(3)
                .map(|c| bgr(c[0], c[1], c[2])),
        );
    }

    PixelBuffer::new(w, h, pixels)
}

fn too_large(header: &BmpHeader) -> BmpError {
    BmpError::DimensionsTooLarge {
        width: u64::from(header.width),
        height: u64::from(header.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enough::Unstoppable;

    fn header_bytes(file_size: u32, offset: u32, width: i32, height: i32) -> Vec<u8> {
        let mut bmp = vec![0u8; HEADERS_LEN];
        bmp[0] = b'B';
        bmp[1] = b'M';
        bmp[2..6].copy_from_slice(&file_size.to_le_bytes());
        bmp[10..14].copy_from_slice(&offset.to_le_bytes());
        bmp[14..18].copy_from_slice(&40u32.to_le_bytes());
        bmp[18..22].copy_from_slice(&width.to_le_bytes());
        bmp[22..26].copy_from_slice(&height.to_le_bytes());
        bmp[26..28].copy_from_slice(&1u16.to_le_bytes());
        bmp[28..30].copy_from_slice(&24u16.to_le_bytes());
        bmp
    }

    #[test]
    fn stride_is_four_byte_aligned() {
        assert_eq!(row_stride(1), 4);
        assert_eq!(row_stride(2), 8);
        assert_eq!(row_stride(3), 12);
        assert_eq!(row_stride(4), 12);
        assert_eq!(row_stride(5), 16);
    }

    #[test]
    fn parses_consistent_header() {
        // 5 wide: stride 16, 2 rows
        let data = header_bytes(54 + 32, 54, 5, 2);
        let header = parse_bmp_header(&data).unwrap();
        assert_eq!(header.width, 5);
        assert_eq!(header.height, 2);
        assert_eq!(header.bits_per_pixel, 24);
        assert_eq!(header.row_stride(), 16);
    }

    #[test]
    fn rejects_size_mismatch() {
        // declared size assumes an unpadded 15-byte scanline
        let data = header_bytes(54 + 15, 54, 5, 1);
        assert!(matches!(parse_bmp_header(&data), Err(BmpError::Format(_))));
    }

    #[test]
    fn rejects_short_and_unsigned_input() {
        assert!(matches!(parse_bmp_header(b"BM"), Err(BmpError::UnexpectedEof)));
        let mut data = header_bytes(58, 54, 1, 1);
        data[0] = b'P';
        assert!(matches!(parse_bmp_header(&data), Err(BmpError::Format(_))));
        let data = header_bytes(54, 54, 1, 0);
        assert!(matches!(parse_bmp_header(&data), Err(BmpError::Format(_))));
        let data = header_bytes(58, 54, 1, -1);
        assert!(matches!(parse_bmp_header(&data), Err(BmpError::Format(_))));
    }

    #[test]
    fn padding_is_discarded() {
        let mut data = header_bytes(54 + 8, 54, 1, 2);
        data.extend_from_slice(&[1, 2, 3, 0xAA, 4, 5, 6, 0xBB]);
        let header = parse_bmp_header(&data).unwrap();
        let buf = decode_bmp_pixels(&data, &header, &Unstoppable).unwrap();
        assert_eq!(buf.pixels(), &[bgr(1, 2, 3), bgr(4, 5, 6)]);
    }

    #[test]
    fn truncated_pixel_array_is_eof() {
        let mut data = header_bytes(54 + 8, 54, 1, 2);
        data.extend_from_slice(&[1, 2, 3, 0]);
        let header = parse_bmp_header(&data).unwrap();
        assert!(matches!(
            decode_bmp_pixels(&data, &header, &Unstoppable),
            Err(BmpError::UnexpectedEof)
        ));
    }

    struct AlwaysStop;

    impl Stop for AlwaysStop {
        fn check(&self) -> Result<(), enough::StopReason> {
            Err(enough::StopReason::Cancelled)
        }
    }

    #[test]
    fn stopped_decode_is_cancelled() {
        let mut data = header_bytes(54 + 8, 54, 1, 2);
        data.extend_from_slice(&[1, 2, 3, 0, 4, 5, 6, 0]);
        let header = parse_bmp_header(&data).unwrap();
        assert!(matches!(
            decode_bmp_pixels(&data, &header, &AlwaysStop),
            Err(BmpError::Cancelled(_))
        ));
    }
}
