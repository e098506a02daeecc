use bmpfx::*;
use proptest::prelude::*;

fn solid(w: usize, h: usize, px: Bgr8) -> PixelBuffer {
    PixelBuffer::filled(w, h, px).unwrap()
}

/// Strategy for small buffers with arbitrary pixel values.
fn buffer_strategy() -> impl Strategy<Value = PixelBuffer> {
    (1usize..=12, 1usize..=12).prop_flat_map(|(w, h)| {
        proptest::collection::vec(any::<(u8, u8, u8)>(), w * h).prop_map(move |px| {
            let pixels = px.into_iter().map(|(b, g, r)| bgr(b, g, r)).collect();
            PixelBuffer::new(w, h, pixels).unwrap()
        })
    })
}

#[test]
fn white_survives_high_contrast_and_grayscale() {
    let white = solid(2, 2, bgr(255, 255, 255));
    assert_eq!(Transform::HighContrast.apply(&white).unwrap(), white);
    assert_eq!(Transform::Grayscale.apply(&white).unwrap(), white);
}

#[test]
fn darkened_black_stays_black() {
    let black = solid(2, 2, bgr(0, 0, 0));
    let out = Transform::Darken { factor: 0.5 }.apply(&black).unwrap();
    assert_eq!(out, black);
}

#[test]
fn pipeline_through_bytes() {
    let white = solid(2, 2, bgr(255, 255, 255));
    let data = encode_bmp(&white).unwrap();
    let out = process(&data, &Transform::HighContrast, Overflow::Wrap).unwrap();
    assert_eq!(out, data);

    let enlarged = process(
        &data,
        &Transform::Enlarge { x_scale: 3, y_scale: 2 },
        Overflow::Wrap,
    )
    .unwrap();
    let info = BmpInfo::from_bytes(&enlarged).unwrap();
    assert_eq!((info.width, info.height), (6, 4));
}

#[test]
fn clamp_differs_from_wrap_only_out_of_range() {
    let buf = PixelBuffer::from_fn(4, 1, |x, _| bgr(x as u8 * 80, 10, 250)).unwrap();
    let lighten = Transform::Lighten { factor: 3.0 };
    let wrapped = lighten.apply_with(&buf, Overflow::Wrap).unwrap();
    let clamped = lighten.apply_with(&buf, Overflow::Clamp).unwrap();
    // 255 - 5 * 3 = 240 is in range for the red channel either way
    assert_eq!(wrapped.get(0, 0).r, 240);
    assert_eq!(clamped.get(0, 0).r, 240);
    // 255 - 245 * 3 = -480
    assert_eq!(wrapped.get(0, 0).g, (-480i64) as u8);
    assert_eq!(clamped.get(0, 0).g, 0);
}

#[test]
fn registry_builds_every_transform() {
    let params = Params {
        factor: Some(0.25),
        rotations: Some(2),
        x_scale: Some(2),
        y_scale: Some(2),
    };
    let buf = solid(3, 2, bgr(40, 120, 220));
    for kind in TransformKind::ALL {
        let t = kind.with_params(&params).unwrap();
        let out = t.apply(&buf).unwrap();
        let dims = (out.width(), out.height());
        match kind {
            TransformKind::Rotate90 => assert_eq!(dims, (2, 3)),
            TransformKind::Enlarge => assert_eq!(dims, (6, 4)),
            _ => assert_eq!(dims, (3, 2), "{kind}"),
        }
    }
}

proptest! {
    /// Decode(Encode(b)) == b.
    #[test]
    fn prop_codec_roundtrip(buf in buffer_strategy()) {
        let encoded = encode_bmp(&buf).unwrap();
        prop_assert_eq!(decode_bmp(&encoded).unwrap(), buf);
    }

    /// Grayscale twice equals grayscale once.
    #[test]
    fn prop_grayscale_idempotent(buf in buffer_strategy()) {
        let once = grayscale(&buf);
        prop_assert_eq!(grayscale(&once), once);
    }

    /// Four quarter turns restore the original.
    #[test]
    fn prop_four_rotations_identity(buf in buffer_strategy()) {
        let mut out = buf.clone();
        for _ in 0..4 {
            out = rotate90(&out);
        }
        prop_assert_eq!(out, buf);
    }

    /// rotate90x(n) is rotate90 applied n times.
    #[test]
    fn prop_rotate90x_matches_repeated(buf in buffer_strategy(), n in 0u32..9) {
        let mut expected = buf.clone();
        for _ in 0..n {
            expected = rotate90(&expected);
        }
        prop_assert_eq!(rotate90x(&buf, n), expected);
    }

    /// Enlarge by 1x1 is the identity.
    #[test]
    fn prop_enlarge_unit_identity(buf in buffer_strategy()) {
        prop_assert_eq!(enlarge(&buf, 1, 1).unwrap(), buf);
    }

    /// Enlarge multiplies dimensions and replicates pixels.
    #[test]
    fn prop_enlarge_blocks(buf in buffer_strategy(), xs in 1u32..4, ys in 1u32..4) {
        let out = enlarge(&buf, xs, ys).unwrap();
        prop_assert_eq!(out.width(), buf.width() * xs as usize);
        prop_assert_eq!(out.height(), buf.height() * ys as usize);
        for y in 0..out.height() {
            for x in 0..out.width() {
                prop_assert_eq!(out.get(x, y), buf.get(x / xs as usize, y / ys as usize));
            }
        }
    }

    /// A header whose declared size is off by any non-zero amount is rejected.
    #[test]
    fn prop_size_mismatch_rejected(buf in buffer_strategy(), delta in 1u32..1000) {
        let mut encoded = encode_bmp(&buf).unwrap();
        let size = u32::from_le_bytes(encoded[2..6].try_into().unwrap());
        encoded[2..6].copy_from_slice(&size.wrapping_add(delta).to_le_bytes());
        prop_assert!(matches!(decode_bmp(&encoded), Err(BmpError::Format(_))));
    }

    /// High contrast output contains only black and white.
    #[test]
    fn prop_high_contrast_is_binary(buf in buffer_strategy()) {
        let out = high_contrast(&buf);
        for px in out.pixels() {
            prop_assert!(*px == bgr(0, 0, 0) || *px == bgr(255, 255, 255));
        }
    }

    /// Factors in [0, 1] never leave the channel range, so clamping is a no-op.
    #[test]
    fn prop_unit_factors_do_not_overflow(buf in buffer_strategy(), f in 0.0f64..=1.0) {
        for t in [
            Transform::Claredon { factor: f },
            Transform::Lighten { factor: f },
            Transform::Darken { factor: f },
        ] {
            prop_assert_eq!(
                t.apply_with(&buf, Overflow::Wrap).unwrap(),
                t.apply_with(&buf, Overflow::Clamp).unwrap()
            );
        }
    }
}
