//! Synthetic test images.

#![allow(dead_code)]

use bmpmini::{HEADER_SIZE, Header, Image};

/// BGR value for visual pixel `(x, y)` of a `w` x `h` gradient: red ramps
/// down the rows, green across the columns, blue along the diagonal.
pub fn gradient_pixel(x: usize, y: usize, w: usize, h: usize) -> [u8; 3] {
    [
        ((x + y) * 255 / (w + h)) as u8,
        (x * 255 / w) as u8,
        (y * 255 / h) as u8,
    ]
}

/// Tightly packed BGR rows, top row first.
pub fn gradient(w: usize, h: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(w * h * 3);
    for y in 0..h {
        for x in 0..w {
            pixels.extend_from_slice(&gradient_pixel(x, y, w, h));
        }
    }
    pixels
}

/// Bottom-up gradient image.
pub fn gradient_image(w: u32, h: u32) -> Image {
    Image::from_bgr(w, h, &gradient(w as usize, h as usize)).unwrap()
}

/// Top-down image (negative height) with the same visual content as
/// [`gradient_image`] and `gap` opaque bytes before the pixels.
pub fn top_down_image(w: u32, h: u32, gap: &[u8]) -> Image {
    let mut header = Header::for_dimensions(w as i32, -(h as i32)).unwrap();
    header.offset = (HEADER_SIZE + gap.len()) as u32;
    header.size = header.offset + header.image_size_bytes;

    let pixels = gradient(w as usize, h as usize);
    let pad = bmpmini::row_padding(w) as usize;
    let mut data = gap.to_vec();
    for row in pixels.chunks_exact(w as usize * 3) {
        data.extend_from_slice(row);
        data.extend(std::iter::repeat_n(0u8, pad));
    }
    Image::from_parts(header, data).unwrap()
}

/// Bottom-up gradient image with `gap` opaque bytes before the pixels.
pub fn image_with_gap(w: u32, h: u32, gap: &[u8]) -> Image {
    let (mut header, data) = gradient_image(w, h).into_parts();
    header.offset = (HEADER_SIZE + gap.len()) as u32;
    header.size = header.offset + header.image_size_bytes;
    let mut with_gap = gap.to_vec();
    with_gap.extend_from_slice(&data);
    Image::from_parts(header, with_gap).unwrap()
}
