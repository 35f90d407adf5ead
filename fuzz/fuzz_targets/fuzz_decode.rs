#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must never panic; anything that decodes must re-encode to the same bytes
    let Ok(img) = bmpmini::decode(data) else {
        return;
    };
    let encoded = img.encode().expect("re-encode");
    assert_eq!(&encoded[..], &data[..encoded.len()]);
    let _ = bmpmini::is_valid_header(img.header(), data.len() as u64);
});
