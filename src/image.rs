//! The in-memory image: a header plus the bytes that follow it on disk.

use alloc::vec::Vec;

use crate::error::BmpError;
use crate::header::{BITS_PER_PIXEL, BYTES_PER_PIXEL, HEADER_SIZE, Header, decode_header, encode_header};
use crate::limits::Limits;
use crate::validate::check_header;

/// A 24-bit BMP image.
///
/// `data` holds everything after the 54-byte header: first the opaque gap
/// (`offset - 54` bytes), then the pixel array in on-disk row order with
/// each row padded to 4 bytes. Its length always equals
/// `image_size_bytes + (offset - 54)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    header: Header,
    data: Vec<u8>,
}

/// Empty buffer with room for `len` bytes; allocation failure is an error,
/// not an abort.
pub(crate) fn try_with_capacity(len: usize) -> Result<Vec<u8>, BmpError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| BmpError::AllocationFailed { bytes: len })?;
    Ok(buf)
}

/// Validate a freshly decoded header against the real file length and
/// return how many payload bytes follow it.
///
/// The payload must fit in the file before anything is allocated for it.
pub(crate) fn payload_len_for_read(
    header: &Header,
    file_len: u64,
    limits: Option<&Limits>,
) -> Result<usize, BmpError> {
    if let Err(err) = check_header(header, file_len) {
        log::warn!("rejecting BMP header: {err}");
        return Err(err);
    }
    let payload_len = header.payload_len()?;
    let available = file_len.saturating_sub(HEADER_SIZE as u64);
    if payload_len as u64 > available {
        log::warn!("BMP payload of {payload_len} bytes exceeds the {available} bytes after the header");
        return Err(BmpError::ShortRead {
            needed: payload_len,
            available: usize::try_from(available).unwrap_or(usize::MAX),
        });
    }
    if let Some(limits) = limits {
        limits.check(header, payload_len)?;
    }
    Ok(payload_len)
}

impl Image {
    /// Assemble an image from a header and the bytes following it.
    ///
    /// The header must describe a 24-bit pixel array whose
    /// `image_size_bytes` matches its dimensions, and `data` must be exactly
    /// gap plus pixel array long. Magic, size, and palette fields are not
    /// checked here; see [`crate::check_header`].
    pub fn from_parts(header: Header, data: Vec<u8>) -> Result<Self, BmpError> {
        if header.bitsperpixel != BITS_PER_PIXEL {
            return Err(BmpError::InvalidHeader(alloc::format!(
                "unsupported bit depth {}",
                header.bitsperpixel
            )));
        }
        header.total_size()?;
        let expected = header.expected_image_size().ok_or(BmpError::SizeOverflow)?;
        if header.image_size_bytes != expected {
            return Err(BmpError::InvalidHeader(alloc::format!(
                "image_size_bytes {} does not match {}x{} (expected {expected})",
                header.image_size_bytes,
                header.width_px,
                header.height_px
            )));
        }
        let payload_len = header.payload_len()?;
        if data.len() != payload_len {
            return Err(BmpError::InvalidHeader(alloc::format!(
                "buffer holds {} bytes, header describes {payload_len}",
                data.len()
            )));
        }
        Ok(Self { header, data })
    }

    /// Build a bottom-up image from tightly packed BGR rows, top row first.
    pub fn from_bgr(width: u32, height: u32, pixels: &[u8]) -> Result<Self, BmpError> {
        let w = i32::try_from(width).map_err(|_| BmpError::SizeOverflow)?;
        let h = i32::try_from(height).map_err(|_| BmpError::SizeOverflow)?;
        let header = Header::for_dimensions(w, h)?;

        let row_bytes = (width as usize)
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or(BmpError::SizeOverflow)?;
        let expected = row_bytes
            .checked_mul(height as usize)
            .ok_or(BmpError::SizeOverflow)?;
        if pixels.len() != expected {
            return Err(BmpError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        let payload_len = header.payload_len()?;
        let mut data = try_with_capacity(payload_len)?;
        let pad = header.padding() as usize;
        if row_bytes > 0 {
            for row in pixels.chunks_exact(row_bytes).rev() {
                data.extend_from_slice(row);
                data.extend(core::iter::repeat_n(0u8, pad));
            }
        } else {
            data.resize(payload_len, 0);
        }
        Self::from_parts(header, data)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Gap bytes followed by the pixel array.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_parts(self) -> (Header, Vec<u8>) {
        (self.header, self.data)
    }

    pub fn width(&self) -> u32 {
        self.header.width_px.unsigned_abs()
    }

    pub fn height(&self) -> u32 {
        self.header.rows()
    }

    pub fn is_bottom_up(&self) -> bool {
        self.header.is_bottom_up()
    }

    fn gap_len(&self) -> usize {
        self.data.len() - self.header.image_size_bytes as usize
    }

    /// The opaque bytes between the header and the pixel array.
    pub fn gap(&self) -> &[u8] {
        &self.data[..self.gap_len()]
    }

    /// The pixel array, padded rows in on-disk order.
    pub fn pixels(&self) -> &[u8] {
        &self.data[self.gap_len()..]
    }

    /// Bytes per stored row, including padding.
    pub fn stride(&self) -> usize {
        self.header.width_px.unsigned_abs() as usize * BYTES_PER_PIXEL
            + self.header.padding() as usize
    }

    /// A stored row (without padding) by its on-disk index.
    pub fn row(&self, disk_row: u32) -> Option<&[u8]> {
        if disk_row >= self.height() {
            return None;
        }
        let start = disk_row as usize * self.stride();
        let len = self.width() as usize * BYTES_PER_PIXEL;
        self.pixels().get(start..start + len)
    }

    /// The BGR pixel at visual column `x`, visual row `y` (row 0 is the top).
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let disk_row = if self.is_bottom_up() {
            self.height() - 1 - y
        } else {
            y
        };
        let off = x as usize * BYTES_PER_PIXEL;
        let px = self.row(disk_row)?.get(off..off + BYTES_PER_PIXEL)?;
        Some([px[0], px[1], px[2]])
    }

    /// Serialize to the on-disk byte layout.
    pub fn encode(&self) -> Result<Vec<u8>, BmpError> {
        let total = HEADER_SIZE
            .checked_add(self.data.len())
            .ok_or(BmpError::SizeOverflow)?;
        let mut out = try_with_capacity(total)?;
        out.extend_from_slice(&encode_header(&self.header));
        out.extend_from_slice(&self.data);
        Ok(out)
    }
}

/// Decode an image from a complete in-memory BMP file.
pub fn decode(data: &[u8]) -> Result<Image, BmpError> {
    decode_inner(data, None)
}

/// [`decode`] with resource limits.
pub fn decode_with_limits(data: &[u8], limits: &Limits) -> Result<Image, BmpError> {
    decode_inner(data, Some(limits))
}

fn decode_inner(data: &[u8], limits: Option<&Limits>) -> Result<Image, BmpError> {
    let header_bytes: &[u8; HEADER_SIZE] = data
        .get(..HEADER_SIZE)
        .and_then(|b| b.try_into().ok())
        .ok_or(BmpError::ShortRead {
            needed: HEADER_SIZE,
            available: data.len(),
        })?;
    let header = decode_header(header_bytes);
    let payload_len = payload_len_for_read(&header, data.len() as u64, limits)?;

    let rest = &data[HEADER_SIZE..];
    let payload = rest.get(..payload_len).ok_or(BmpError::ShortRead {
        needed: payload_len,
        available: rest.len(),
    })?;
    let mut buf = try_with_capacity(payload_len)?;
    buf.extend_from_slice(payload);

    log::debug!(
        "decoded {}x{} BMP ({payload_len} payload bytes)",
        header.width_px,
        header.height_px
    );
    Image::from_parts(header, buf)
}
