//! # bmpfx
//!
//! 24-bit uncompressed BMP decoder/encoder plus ten pixel effects.
//!
//! The pipeline is: file bytes → [`decode_bmp`] → [`PixelBuffer`] →
//! [`Transform::apply`] → [`PixelBuffer`] → [`encode_bmp`] → file bytes.
//!
//! ## Supported input
//!
//! Only BITMAPINFOHEADER files with bottom-up 24-bit BGR scanlines. The decoder
//! checks one thing: the declared file size (header offset 2) must equal
//! `pixel offset + row stride * height`, with the row stride being `width * 3`
//! rounded up to a multiple of 4. Palette, 16/32-bit and compressed files fail
//! that arithmetic and are rejected with [`BmpError::Format`].
//!
//! ## Pixel layout
//!
//! [`PixelBuffer`] keeps BMP's native order: channels are `b`, `g`, `r` and
//! row `y = 0` is the bottom scanline. Transforms index through
//! [`PixelBuffer::get`]/[`PixelBuffer::set`] and never mutate their input.
//!
//! ## Channel overflow
//!
//! Effects such as [`lighten`] with a factor above 1 can produce values
//! outside `0..=255`. By default they wrap modulo 256 ([`Overflow::Wrap`]);
//! [`Transform::apply_with`] accepts [`Overflow::Clamp`] instead.
//!
//! ## Usage
//!
//! ```no_run
//! use bmpfx::{Transform, decode_bmp, encode_bmp};
//!
//! let data = std::fs::read("photo.bmp")?;
//! let image = decode_bmp(&data)?;
//! let rotated = Transform::Rotate90x { rotations: 3 }.apply(&image)?;
//! std::fs::write("photo_rotate90x.bmp", encode_bmp(&rotated)?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod error;
mod limits;
mod pixel;

pub mod bmp;
pub mod transform;

mod decode;

use std::path::Path;

// Re-exports
pub use bmp::BmpInfo;
pub use decode::DecodeRequest;
pub use enough::{Stop, Unstoppable};
pub use error::BmpError;
pub use limits::Limits;
pub use pixel::{Bgr8, Overflow, PixelBuffer, bgr};
pub use transform::{
    Param, Params, Transform, TransformKind, black_white_rgb, claredon, darken, enlarge,
    grayscale, high_contrast, lighten, rotate90, rotate90x, vignette,
};

/// Decode a 24-bit BMP with no limits.
pub fn decode_bmp(data: &[u8]) -> Result<PixelBuffer, BmpError> {
    DecodeRequest::new(data).decode(Unstoppable)
}

/// Encode as a 24-bit BMP.
///
/// Fails only if the dimensions don't fit the 32-bit header fields.
pub fn encode_bmp(buf: &PixelBuffer) -> Result<Vec<u8>, BmpError> {
    bmp::encode(buf, &Unstoppable)
}

/// Encode, polling `stop` between scanline batches.
pub fn encode_bmp_stoppable(buf: &PixelBuffer, stop: impl Stop) -> Result<Vec<u8>, BmpError> {
    bmp::encode(buf, &stop)
}

/// Read and decode a BMP file.
pub fn read_bmp_file(path: impl AsRef<Path>) -> Result<PixelBuffer, BmpError> {
    let data = std::fs::read(path.as_ref())?;
    decode_bmp(&data)
}

/// Encode and write a BMP file.
///
/// The whole file is encoded before the output is created, so an encode
/// failure leaves nothing on disk.
pub fn write_bmp_file(path: impl AsRef<Path>, buf: &PixelBuffer) -> Result<(), BmpError> {
    let bytes = encode_bmp(buf)?;
    std::fs::write(path.as_ref(), bytes)?;
    Ok(())
}

/// Decode `data`, apply `transform`, and re-encode.
pub fn process(data: &[u8], transform: &Transform, overflow: Overflow) -> Result<Vec<u8>, BmpError> {
    let image = decode_bmp(data)?;
    let out = transform.apply_with(&image, overflow)?;
    encode_bmp(&out)
}

/// [`process`] from one file to another.
pub fn process_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    transform: &Transform,
    overflow: Overflow,
) -> Result<(), BmpError> {
    let data = std::fs::read(input.as_ref())?;
    let bytes = process(&data, transform, overflow)?;
    std::fs::write(output.as_ref(), bytes)?;
    log::info!(
        "{} -> {} ({})",
        input.as_ref().display(),
        output.as_ref().display(),
        transform.name()
    );
    Ok(())
}
