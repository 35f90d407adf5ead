//! Rectangular crop producing a new, independent image.

use enough::{Stop, Unstoppable};

use crate::error::{BmpError, CropRejection};
use crate::header::BYTES_PER_PIXEL;
use crate::image::{Image, try_with_capacity};
use crate::limits::Limits;

/// A crop window in visual coordinates: `(x, y)` is the top-left corner,
/// row 0 is the top of the image regardless of storage order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CropRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CropRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check the rectangle against a source of `src_width` x `src_height`.
    ///
    /// Returns the exclusive bottom edge.
    fn check(&self, src_width: i32, src_height: u32) -> Result<u32, CropRejection> {
        if self.x < 0 || self.y < 0 {
            return Err(CropRejection::NegativeOrigin);
        }
        if self.width <= 0 || self.height <= 0 {
            return Err(CropRejection::NonPositiveSize);
        }
        let right = self
            .x
            .checked_add(self.width)
            .ok_or(CropRejection::Overflow)?;
        let bottom = self
            .y
            .checked_add(self.height)
            .ok_or(CropRejection::Overflow)?;
        let bottom = bottom as u32;
        if right > src_width || bottom > src_height {
            return Err(CropRejection::OutOfBounds);
        }
        Ok(bottom)
    }
}

/// Crop `image` to the `w` x `h` rectangle whose top-left corner is `(x, y)`.
///
/// The result keeps the source's gap bytes, resolution, and row order.
pub fn crop(image: &Image, x: i32, y: i32, w: i32, h: i32) -> Result<Image, BmpError> {
    crop_with_stop(image, CropRect::new(x, y, w, h), None, &Unstoppable)
}

/// [`crop`] with resource limits and cooperative cancellation.
pub fn crop_with_stop(
    image: &Image,
    rect: CropRect,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Image, BmpError> {
    let src = image.header();
    let src_rows = src.rows();
    let bottom = rect.check(src.width_px, src_rows)?;

    let mut header = *src;
    header.width_px = rect.width;
    header.height_px = if src.is_bottom_up() {
        rect.height
    } else {
        -rect.height
    };
    header.image_size_bytes = header.expected_image_size().ok_or(BmpError::SizeOverflow)?;
    header.size = header.total_size()?;

    let payload_len = header.payload_len()?;
    if let Some(limits) = limits {
        limits.check(&header, payload_len)?;
    }
    stop.check()?;

    // Visual rows [y, bottom) map to disk rows reflected about the source
    // height when the source is stored bottom-up.
    let (first, last) = if src.is_bottom_up() {
        (src_rows - bottom, src_rows - rect.y as u32)
    } else {
        (rect.y as u32, bottom)
    };

    let mut out = try_with_capacity(payload_len)?;
    out.extend_from_slice(image.gap());

    let src_pixels = image.pixels();
    let src_stride = image.stride();
    let col_start = rect.x as usize * BYTES_PER_PIXEL;
    let col_end = col_start + rect.width as usize * BYTES_PER_PIXEL;
    let pad = header.padding() as usize;
    for (i, disk_row) in (first..last).enumerate() {
        if i % 16 == 0 {
            stop.check()?;
        }
        let row_start = disk_row as usize * src_stride;
        out.extend_from_slice(&src_pixels[row_start + col_start..row_start + col_end]);
        out.extend(core::iter::repeat_n(0u8, pad));
    }

    log::debug!(
        "cropped {}x{} to {}x{} at ({}, {})",
        src.width_px,
        src.height_px,
        rect.width,
        rect.height,
        rect.x,
        rect.y
    );
    Image::from_parts(header, out)
}
