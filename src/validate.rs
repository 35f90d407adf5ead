//! Header validation for the supported BMP subset.

use crate::error::BmpError;
use crate::header::{BITS_PER_PIXEL, BMP_MAGIC, Header};

/// Whether `header` describes a supported 24-bit uncompressed BMP whose
/// claimed size matches `file_len`, the real length of the file.
pub fn is_valid_header(header: &Header, file_len: u64) -> bool {
    check_header(header, file_len).is_ok()
}

fn mismatch<T: core::fmt::Display>(field: &str, received: T, expected: T) -> BmpError {
    BmpError::InvalidHeader(alloc::format!(
        "{field}: received {received}, expected {expected}"
    ))
}

/// Like [`is_valid_header`], but reports the first rule that failed.
pub fn check_header(header: &Header, file_len: u64) -> Result<(), BmpError> {
    if header.magic != BMP_MAGIC {
        return Err(mismatch("type", header.magic, BMP_MAGIC));
    }
    if header.num_planes != 1 {
        return Err(mismatch("num_planes", header.num_planes, 1));
    }
    if header.compression != 0 {
        return Err(mismatch("compression", header.compression, 0));
    }
    if header.num_colors != 0 {
        return Err(mismatch("num_colors", header.num_colors, 0));
    }
    if header.important_colors != 0 {
        return Err(mismatch("important_colors", header.important_colors, 0));
    }
    if header.bitsperpixel != BITS_PER_PIXEL {
        return Err(mismatch("bitsperpixel", header.bitsperpixel, BITS_PER_PIXEL));
    }
    if u64::from(header.size) != file_len {
        return Err(mismatch("size", u64::from(header.size), file_len));
    }
    let expected = header.expected_image_size().ok_or_else(|| {
        BmpError::InvalidHeader(alloc::format!(
            "image_size_bytes: dimensions {}x{} have no representable size",
            header.width_px,
            header.height_px
        ))
    })?;
    if header.image_size_bytes != expected {
        return Err(mismatch(
            "image_size_bytes",
            header.image_size_bytes,
            expected,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_header_is_valid() {
        let h = Header::for_dimensions(3, 2).unwrap();
        assert!(is_valid_header(&h, u64::from(h.size)));
        assert!(!is_valid_header(&h, u64::from(h.size) + 1));
    }

    #[test]
    fn reason_names_the_field() {
        let h = Header {
            bitsperpixel: 32,
            ..Header::for_dimensions(3, 2).unwrap()
        };
        match check_header(&h, u64::from(h.size)) {
            Err(BmpError::InvalidHeader(msg)) => assert!(msg.starts_with("bitsperpixel")),
            other => panic!("expected InvalidHeader, got {other:?}"),
        }
    }
}
