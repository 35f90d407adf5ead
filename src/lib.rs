//! # bmpmini
//!
//! Reader, writer, and cropper for uncompressed 24-bit BMP images.
//!
//! ## Supported Format
//!
//! - 54-byte header (14-byte file header + 40-byte `BITMAPINFOHEADER`)
//! - 24 bits per pixel, BGR byte order, rows padded to 4 bytes
//! - Bottom-up (positive height) and top-down (negative height) row order
//! - Opaque bytes between the header and the pixel array are kept verbatim
//!
//! ## Non-Goals
//!
//! - Compressed BMPs (RLE, bitfields, embedded JPEG/PNG)
//! - Palettes and bit depths other than 24
//! - Any format other than BMP
//!
//! ## Usage
//!
//! ```no_run
//! use bmpmini::{crop, read_image, write_image};
//!
//! let img = read_image("photo.bmp")?;
//! let header = img.header();
//! println!("{}x{}", header.width_px, header.height_px);
//!
//! let thumb = crop(&img, 10, 10, 64, 64)?;
//! write_image("thumb.bmp", &thumb)?;
//! # Ok::<(), bmpmini::BmpError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod crop;
mod error;
mod header;
mod image;
mod limits;
mod validate;

#[cfg(feature = "std")]
mod io;

// Re-exports
pub use crop::{CropRect, crop, crop_with_stop};
pub use enough::{Stop, Unstoppable};
pub use error::{BmpError, CropRejection};
pub use header::{
    BITS_PER_PIXEL, BMP_MAGIC, DIB_HEADER_SIZE, HEADER_SIZE, Header, decode_header, encode_header,
    row_padding,
};
pub use image::{Image, decode, decode_with_limits};
#[cfg(feature = "std")]
pub use io::{read_from, read_image, read_image_with_limits, write_image, write_to};
pub use limits::Limits;
pub use validate::{check_header, is_valid_header};
