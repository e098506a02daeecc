#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Header probe and full decode must never panic
    let _ = bmpfx::BmpInfo::from_bytes(data);
    let Ok(image) = bmpfx::DecodeRequest::new(data).decode(enough::Unstoppable) else {
        return;
    };

    // Every parameterless effect must accept any decoded image
    for kind in bmpfx::TransformKind::ALL {
        if let Ok(t) = kind.with_params(&bmpfx::Params::default()) {
            let _ = t.apply(&image);
        }
    }
});
