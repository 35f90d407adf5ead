//! The fixed 54-byte BMP header: 14-byte file header plus a 40-byte
//! `BITMAPINFOHEADER`, all fields little-endian.

use crate::error::BmpError;

/// Size of the on-disk header region (file header + info header).
pub const HEADER_SIZE: usize = 54;
/// Size of the `BITMAPINFOHEADER` sub-header.
pub const DIB_HEADER_SIZE: u32 = 40;
/// `"BM"` read as a little-endian `u16`.
pub const BMP_MAGIC: u16 = 0x4D42;
/// The only supported bit depth.
pub const BITS_PER_PIXEL: u16 = 24;

pub(crate) const BYTES_PER_PIXEL: usize = (BITS_PER_PIXEL / 8) as usize;

/// 72 DPI expressed in pixels per meter.
const DEFAULT_RESOLUTION_PPM: i32 = 2835;

/// Byte offset of each field within the 54-byte header.
mod field {
    pub const MAGIC: usize = 0;
    pub const SIZE: usize = 2;
    pub const RESERVED1: usize = 6;
    pub const RESERVED2: usize = 8;
    pub const OFFSET: usize = 10;
    pub const DIB_HEADER_SIZE: usize = 14;
    pub const WIDTH: usize = 18;
    pub const HEIGHT: usize = 22;
    pub const NUM_PLANES: usize = 26;
    pub const BITS_PER_PIXEL: usize = 28;
    pub const COMPRESSION: usize = 30;
    pub const IMAGE_SIZE: usize = 34;
    pub const X_RES: usize = 38;
    pub const Y_RES: usize = 42;
    pub const NUM_COLORS: usize = 46;
    pub const IMPORTANT_COLORS: usize = 50;
}

/// A decoded BMP header.
///
/// Fields are stored exactly as they appear on disk; nothing is checked at
/// decode time. Use [`crate::is_valid_header`] or [`crate::check_header`]
/// to judge whether a header describes a supported image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Header {
    /// Magic signature (the BMP `type` field); `0x4D42` for `"BM"`.
    pub magic: u16,
    /// Total file size in bytes.
    pub size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    /// Byte offset from the start of the file to the pixel array.
    pub offset: u32,
    pub dib_header_size: u32,
    pub width_px: i32,
    /// Negative for top-down row order, positive for bottom-up.
    pub height_px: i32,
    pub num_planes: u16,
    pub bitsperpixel: u16,
    pub compression: u32,
    /// Size of the pixel array including row padding.
    pub image_size_bytes: u32,
    pub x_res_ppm: i32,
    pub y_res_ppm: i32,
    pub num_colors: u32,
    pub important_colors: u32,
}

fn get_u16(bytes: &[u8; HEADER_SIZE], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn get_u32(bytes: &[u8; HEADER_SIZE], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn get_i32(bytes: &[u8; HEADER_SIZE], at: usize) -> i32 {
    i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn put(bytes: &mut [u8; HEADER_SIZE], at: usize, value: &[u8]) {
    bytes[at..at + value.len()].copy_from_slice(value);
}

/// Decode the 54-byte on-disk layout. Never fails.
pub fn decode_header(bytes: &[u8; HEADER_SIZE]) -> Header {
    Header {
        magic: get_u16(bytes, field::MAGIC),
        size: get_u32(bytes, field::SIZE),
        reserved1: get_u16(bytes, field::RESERVED1),
        reserved2: get_u16(bytes, field::RESERVED2),
        offset: get_u32(bytes, field::OFFSET),
        dib_header_size: get_u32(bytes, field::DIB_HEADER_SIZE),
        width_px: get_i32(bytes, field::WIDTH),
        height_px: get_i32(bytes, field::HEIGHT),
        num_planes: get_u16(bytes, field::NUM_PLANES),
        bitsperpixel: get_u16(bytes, field::BITS_PER_PIXEL),
        compression: get_u32(bytes, field::COMPRESSION),
        image_size_bytes: get_u32(bytes, field::IMAGE_SIZE),
        x_res_ppm: get_i32(bytes, field::X_RES),
        y_res_ppm: get_i32(bytes, field::Y_RES),
        num_colors: get_u32(bytes, field::NUM_COLORS),
        important_colors: get_u32(bytes, field::IMPORTANT_COLORS),
    }
}

/// Encode a header into its 54-byte on-disk layout.
pub fn encode_header(header: &Header) -> [u8; HEADER_SIZE] {
    let mut out = [0u8; HEADER_SIZE];
    put(&mut out, field::MAGIC, &header.magic.to_le_bytes());
    put(&mut out, field::SIZE, &header.size.to_le_bytes());
    put(&mut out, field::RESERVED1, &header.reserved1.to_le_bytes());
    put(&mut out, field::RESERVED2, &header.reserved2.to_le_bytes());
    put(&mut out, field::OFFSET, &header.offset.to_le_bytes());
    put(&mut out, field::DIB_HEADER_SIZE, &header.dib_header_size.to_le_bytes());
    put(&mut out, field::WIDTH, &header.width_px.to_le_bytes());
    put(&mut out, field::HEIGHT, &header.height_px.to_le_bytes());
    put(&mut out, field::NUM_PLANES, &header.num_planes.to_le_bytes());
    put(&mut out, field::BITS_PER_PIXEL, &header.bitsperpixel.to_le_bytes());
    put(&mut out, field::COMPRESSION, &header.compression.to_le_bytes());
    put(&mut out, field::IMAGE_SIZE, &header.image_size_bytes.to_le_bytes());
    put(&mut out, field::X_RES, &header.x_res_ppm.to_le_bytes());
    put(&mut out, field::Y_RES, &header.y_res_ppm.to_le_bytes());
    put(&mut out, field::NUM_COLORS, &header.num_colors.to_le_bytes());
    put(&mut out, field::IMPORTANT_COLORS, &header.important_colors.to_le_bytes());
    out
}

/// Zero bytes appended to a 24-bit row of `width` pixels.
///
/// Always in `0..=3`, and `3 * width + row_padding(width)` is a multiple of 4.
pub fn row_padding(width: u32) -> u32 {
    // 2^32 is a multiple of 4, so the wrapped product has the right residue.
    (4 - width.wrapping_mul(3) % 4) % 4
}

impl Header {
    /// Canonical 24-bit header for an image of the given dimensions.
    ///
    /// Negative `height` produces a top-down image. The pixel array starts
    /// right after the header (no gap).
    pub fn for_dimensions(width: i32, height: i32) -> Result<Self, BmpError> {
        if width < 0 {
            return Err(BmpError::InvalidHeader(alloc::format!(
                "negative width {width}"
            )));
        }
        let mut header = Header {
            magic: BMP_MAGIC,
            size: 0,
            reserved1: 0,
            reserved2: 0,
            offset: HEADER_SIZE as u32,
            dib_header_size: DIB_HEADER_SIZE,
            width_px: width,
            height_px: height,
            num_planes: 1,
            bitsperpixel: BITS_PER_PIXEL,
            compression: 0,
            image_size_bytes: 0,
            x_res_ppm: DEFAULT_RESOLUTION_PPM,
            y_res_ppm: DEFAULT_RESOLUTION_PPM,
            num_colors: 0,
            important_colors: 0,
        };
        header.image_size_bytes = header.expected_image_size().ok_or(BmpError::SizeOverflow)?;
        header.size = header.total_size()?;
        Ok(header)
    }

    /// Bytes per pixel implied by `bitsperpixel`.
    pub fn bytes_per_pixel(&self) -> usize {
        usize::from(self.bitsperpixel / 8)
    }

    /// Row padding for this header's width.
    pub fn padding(&self) -> u32 {
        row_padding(self.width_px as u32)
    }

    /// Bytes per stored row, including padding. `None` for a negative width
    /// or when the value does not fit in a `u32`.
    pub fn row_size(&self) -> Option<u32> {
        let width = u32::try_from(self.width_px).ok()?;
        width.checked_mul(3)?.checked_add(self.padding())
    }

    /// `row_size * |height_px|`, the value `image_size_bytes` must hold.
    pub fn expected_image_size(&self) -> Option<u32> {
        self.row_size()?.checked_mul(self.height_px.unsigned_abs())
    }

    /// Rows are stored bottom-up (first stored row is the visual bottom).
    pub fn is_bottom_up(&self) -> bool {
        self.height_px > 0
    }

    /// Number of pixel rows regardless of orientation.
    pub fn rows(&self) -> u32 {
        self.height_px.unsigned_abs()
    }

    /// Length of the opaque region between the header and the pixel array.
    pub fn gap_len(&self) -> Result<usize, BmpError> {
        let gap = self
            .offset
            .checked_sub(HEADER_SIZE as u32)
            .ok_or_else(|| {
                BmpError::InvalidHeader(alloc::format!(
                    "pixel offset {} is inside the {HEADER_SIZE}-byte header",
                    self.offset
                ))
            })?;
        usize::try_from(gap).map_err(|_| BmpError::SizeOverflow)
    }

    /// Bytes following the header on disk: gap plus pixel array.
    pub fn payload_len(&self) -> Result<usize, BmpError> {
        let image = usize::try_from(self.image_size_bytes).map_err(|_| BmpError::SizeOverflow)?;
        image
            .checked_add(self.gap_len()?)
            .ok_or(BmpError::SizeOverflow)
    }

    /// `offset + image_size_bytes`, the file size this header describes.
    pub fn total_size(&self) -> Result<u32, BmpError> {
        self.offset
            .checked_add(self.image_size_bytes)
            .ok_or(BmpError::SizeOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_offsets_are_little_endian() {
        let header = Header {
            magic: BMP_MAGIC,
            size: 0x0403_0201,
            reserved1: 0x0605,
            reserved2: 0x0807,
            offset: 0x0C0B_0A09,
            dib_header_size: 40,
            width_px: -2,
            height_px: 0x1122_3344,
            num_planes: 1,
            bitsperpixel: 24,
            compression: 0xAABB_CCDD,
            image_size_bytes: 7,
            x_res_ppm: 2835,
            y_res_ppm: -1,
            num_colors: 0x0102_0304,
            important_colors: 0xFFFF_FFFE,
        };
        let bytes = encode_header(&header);
        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(&bytes[2..6], &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(&bytes[6..10], &[0x05, 0x06, 0x07, 0x08]);
        assert_eq!(&bytes[10..14], &[0x09, 0x0A, 0x0B, 0x0C]);
        assert_eq!(&bytes[14..18], &[40, 0, 0, 0]);
        assert_eq!(&bytes[18..22], &[0xFE, 0xFF, 0xFF, 0xFF]);
        assert_eq!(&bytes[22..26], &[0x44, 0x33, 0x22, 0x11]);
        assert_eq!(&bytes[26..30], &[1, 0, 24, 0]);
        assert_eq!(&bytes[30..34], &[0xDD, 0xCC, 0xBB, 0xAA]);
        assert_eq!(&bytes[34..38], &[7, 0, 0, 0]);
        assert_eq!(&bytes[38..42], &[0x13, 0x0B, 0, 0]);
        assert_eq!(&bytes[42..46], &[0xFF; 4]);
        assert_eq!(&bytes[46..50], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[50..54], &[0xFE, 0xFF, 0xFF, 0xFF]);
        assert_eq!(decode_header(&bytes), header);
    }

    #[test]
    fn row_math() {
        assert_eq!(row_padding(1), 1);
        assert_eq!(row_padding(2), 2);
        assert_eq!(row_padding(3), 3);
        assert_eq!(row_padding(4), 0);
        assert_eq!(row_padding(860), 0);
        assert_eq!(row_padding(500), 0);
        assert_eq!(row_padding(5), 1);

        let h = Header::for_dimensions(5, -3).unwrap();
        assert_eq!(h.row_size(), Some(16));
        assert_eq!(h.image_size_bytes, 48);
        assert_eq!(h.size, 54 + 48);
        assert!(!h.is_bottom_up());
        assert_eq!(h.rows(), 3);
    }

    #[test]
    fn negative_width_has_no_row_size() {
        let h = Header {
            width_px: -4,
            height_px: 2,
            ..Header::default()
        };
        assert_eq!(h.row_size(), None);
        assert_eq!(h.expected_image_size(), None);
    }

    #[test]
    fn oversized_dimensions_overflow() {
        assert!(matches!(
            Header::for_dimensions(i32::MAX, 2),
            Err(BmpError::SizeOverflow)
        ));
        assert!(matches!(
            Header::for_dimensions(40_000, 40_000),
            Err(BmpError::SizeOverflow)
        ));
    }

    #[test]
    fn offset_inside_header_is_rejected() {
        let h = Header {
            offset: 10,
            ..Header::default()
        };
        assert!(matches!(h.gap_len(), Err(BmpError::InvalidHeader(_))));
    }
}
