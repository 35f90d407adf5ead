#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (u8, u8, i32, i32, i32, i32, Vec<u8>)| {
    let (w, h, x, y, cw, ch, fill) = input;
    let (w, h) = (u32::from(w % 64), u32::from(h % 64));
    let mut pixels = vec![0u8; (w * h * 3) as usize];
    for (p, f) in pixels.iter_mut().zip(fill.iter().cycle()) {
        *p = *f;
    }
    let Ok(src) = bmpmini::Image::from_bgr(w, h, &pixels) else {
        return;
    };
    // Must never panic; a successful crop must be a valid file
    if let Ok(out) = bmpmini::crop(&src, x, y, cw, ch) {
        let bytes = out.encode().expect("encode");
        assert!(bmpmini::is_valid_header(out.header(), bytes.len() as u64));
    }
});
