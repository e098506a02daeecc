//! Per-pixel photometric effects.
//!
//! Real-valued results are truncated toward zero and stored with the caller's
//! [`Overflow`] policy. Channel averages use integer division.

use crate::pixel::{Bgr8, Overflow, PixelBuffer, bgr};

const WHITE: Bgr8 = bgr(255, 255, 255);
const BLACK: Bgr8 = bgr(0, 0, 0);

#[inline]
fn average(px: Bgr8) -> i64 {
    (i64::from(px.b) + i64::from(px.g) + i64::from(px.r)) / 3
}

#[inline]
fn scale_channel(c: u8, factor: f64, overflow: Overflow) -> u8 {
    overflow.store_f64(f64::from(c) * factor)
}

#[inline]
fn lighten_channel(c: u8, factor: f64, overflow: Overflow) -> u8 {
    overflow.store_f64(255.0 - (255.0 - f64::from(c)) * factor)
}

/// Darken toward the corners.
///
/// Each pixel is scaled by the mean of `(height - d) / height` and
/// `(width - d) / width`, where `d` is its distance from
/// `(width / 2, height / 2)` (integer halves). Far corners of elongated images
/// get a negative scale.
pub fn vignette(buf: &PixelBuffer, overflow: Overflow) -> PixelBuffer {
    let w = buf.width() as i64;
    let h = buf.height() as i64;
    let (cx, cy) = (w / 2, h / 2);
    let (wf, hf) = (w as f64, h as f64);

    buf.map_with_position(|x, y, px| {
        let dx = x as i64 - cx;
        let dy = y as i64 - cy;
        let distance = ((dx * dx + dy * dy) as f64).sqrt();
        let scale = ((hf - distance) / hf + (wf - distance) / wf) / 2.0;
        bgr(
            scale_channel(px.b, scale, overflow),
            scale_channel(px.g, scale, overflow),
            scale_channel(px.r, scale, overflow),
        )
    })
}

/// Lighten bright pixels (average > 170) and darken dark ones (average < 90)
/// by `factor`; mid-tones are left alone.
pub fn claredon(buf: &PixelBuffer, factor: f64, overflow: Overflow) -> PixelBuffer {
    buf.map(|px| {
        let avg = average(px);
        if avg > 170 {
            bgr(
                lighten_channel(px.b, factor, overflow),
                lighten_channel(px.g, factor, overflow),
                lighten_channel(px.r, factor, overflow),
            )
        } else if avg < 90 {
            bgr(
                scale_channel(px.b, factor, overflow),
                scale_channel(px.g, factor, overflow),
                scale_channel(px.r, factor, overflow),
            )
        } else {
            px
        }
    })
}

pub fn grayscale(buf: &PixelBuffer) -> PixelBuffer {
    buf.map(|px| {
        // average of three u8 always fits
        let avg = average(px) as u8;
        bgr(avg, avg, avg)
    })
}

/// Pure black or white depending on whether the average reaches 127.
pub fn high_contrast(buf: &PixelBuffer) -> PixelBuffer {
    buf.map(|px| if average(px) >= 255 / 2 { WHITE } else { BLACK })
}

/// `channel := 255 - (255 - channel) * factor`
pub fn lighten(buf: &PixelBuffer, factor: f64, overflow: Overflow) -> PixelBuffer {
    buf.map(|px| {
        bgr(
            lighten_channel(px.b, factor, overflow),
            lighten_channel(px.g, factor, overflow),
            lighten_channel(px.r, factor, overflow),
        )
    })
}

/// `channel := channel * factor`
pub fn darken(buf: &PixelBuffer, factor: f64, overflow: Overflow) -> PixelBuffer {
    buf.map(|px| {
        bgr(
            scale_channel(px.b, factor, overflow),
            scale_channel(px.g, factor, overflow),
            scale_channel(px.r, factor, overflow),
        )
    })
}

/// Reduce to black, white, red, blue, or green.
///
/// Channel sum ≥ 550 is white, ≤ 150 is black; otherwise the dominant channel
/// wins, ties resolved red first, then blue, then green.
pub fn black_white_rgb(buf: &PixelBuffer) -> PixelBuffer {
    buf.map(|px| {
        let sum = u32::from(px.b) + u32::from(px.g) + u32::from(px.r);
        let max = px.b.max(px.g).max(px.r);
        if sum >= 550 {
            WHITE
        } else if sum <= 150 {
            BLACK
        } else if max == px.r {
            bgr(0, 0, 255)
        } else if max == px.b {
            bgr(255, 0, 0)
        } else {
            bgr(0, 255, 0)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(px: Bgr8) -> PixelBuffer {
        PixelBuffer::filled(1, 1, px).unwrap()
    }

    #[test]
    fn vignette_keeps_center_and_dims_edges() {
        let buf = PixelBuffer::filled(5, 5, bgr(200, 200, 200)).unwrap();
        let out = vignette(&buf, Overflow::Wrap);
        assert_eq!(out.get(2, 2), bgr(200, 200, 200));
        // corner distance sqrt(8): scale = (5 - 2.828...) / 5 = 0.434...
        assert_eq!(out.get(0, 0), bgr(86, 86, 86));
        assert_eq!(out.get(4, 4), out.get(0, 0));
    }

    #[test]
    fn vignette_negative_scale_wraps_or_clamps() {
        // 9x1: pixel 0 is 4 from the center; scale = ((1-4)/1 + (9-4)/9) / 2
        let buf = PixelBuffer::filled(9, 1, bgr(10, 10, 10)).unwrap();
        let scale: f64 = (-3.0 + 5.0 / 9.0) / 2.0;
        let expected = (10.0 * scale) as i64;
        assert!(expected < 0);
        let wrapped = vignette(&buf, Overflow::Wrap);
        assert_eq!(wrapped.get(0, 0).b, expected as u8);
        let clamped = vignette(&buf, Overflow::Clamp);
        assert_eq!(clamped.get(0, 0).b, 0);
    }

    #[test]
    fn claredon_bands() {
        let bright = claredon(&single(bgr(200, 180, 240)), 0.5, Overflow::Wrap);
        assert_eq!(bright.get(0, 0), bgr(227, 217, 247));
        let dark = claredon(&single(bgr(10, 50, 101)), 0.5, Overflow::Wrap);
        assert_eq!(dark.get(0, 0), bgr(5, 25, 50));
        let mid = claredon(&single(bgr(100, 120, 140)), 0.5, Overflow::Wrap);
        assert_eq!(mid.get(0, 0), bgr(100, 120, 140));
        // avg exactly 170 and 90 are mid-tones
        let edge = claredon(&single(bgr(170, 170, 170)), 0.0, Overflow::Wrap);
        assert_eq!(edge.get(0, 0), bgr(170, 170, 170));
        let edge = claredon(&single(bgr(90, 90, 90)), 0.0, Overflow::Wrap);
        assert_eq!(edge.get(0, 0), bgr(90, 90, 90));
    }

    #[test]
    fn grayscale_truncates_average() {
        let out = grayscale(&single(bgr(1, 1, 2)));
        assert_eq!(out.get(0, 0), bgr(1, 1, 1));
        let out = grayscale(&single(bgr(255, 255, 255)));
        assert_eq!(out.get(0, 0), bgr(255, 255, 255));
    }

    #[test]
    fn high_contrast_threshold_is_127() {
        assert_eq!(high_contrast(&single(bgr(127, 127, 127))).get(0, 0), WHITE);
        assert_eq!(high_contrast(&single(bgr(126, 127, 127))).get(0, 0), BLACK);
    }

    #[test]
    fn lighten_and_darken() {
        let px = single(bgr(0, 100, 255));
        assert_eq!(lighten(&px, 0.5, Overflow::Wrap).get(0, 0), bgr(127, 177, 255));
        assert_eq!(darken(&px, 0.5, Overflow::Wrap).get(0, 0), bgr(0, 50, 127));
    }

    #[test]
    fn out_of_range_factors_follow_overflow_policy() {
        let px = single(bgr(0, 200, 255));
        // 255 - 255 * 2 = -255 -> low byte 1
        assert_eq!(lighten(&px, 2.0, Overflow::Wrap).get(0, 0).b, 1);
        assert_eq!(lighten(&px, 2.0, Overflow::Clamp).get(0, 0).b, 0);
        // 200 * 1.5 = 300 -> 44
        assert_eq!(darken(&px, 1.5, Overflow::Wrap).get(0, 0).g, 44);
        assert_eq!(darken(&px, 1.5, Overflow::Clamp).get(0, 0).g, 255);
    }

    #[test]
    fn black_white_rgb_classes() {
        let classify = |px| black_white_rgb(&single(px)).get(0, 0);
        assert_eq!(classify(bgr(200, 200, 150)), WHITE);
        assert_eq!(classify(bgr(50, 50, 50)), BLACK);
        assert_eq!(classify(bgr(10, 20, 200)), bgr(0, 0, 255));
        assert_eq!(classify(bgr(200, 20, 10)), bgr(255, 0, 0));
        assert_eq!(classify(bgr(10, 200, 20)), bgr(0, 255, 0));
        // ties: red beats blue, blue beats green
        assert_eq!(classify(bgr(100, 0, 100)), bgr(0, 0, 255));
        assert_eq!(classify(bgr(100, 100, 0)), bgr(255, 0, 0));
    }
}
