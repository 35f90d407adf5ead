//! File and stream I/O.
//!
//! Handles are owned by the functions that open them and are closed by
//! `Drop` on every return path, including errors.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::BmpError;
use crate::header::{HEADER_SIZE, decode_header, encode_header};
use crate::image::{Image, payload_len_for_read, try_with_capacity};
use crate::limits::Limits;

/// Fill `buf` completely, or report how many bytes were available.
fn read_exact_or_short<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<(), BmpError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(BmpError::ShortRead {
                    needed: buf.len(),
                    available: filled,
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(BmpError::Io(e)),
        }
    }
    Ok(())
}

fn write_exact<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> Result<(), BmpError> {
    writer.write_all(buf).map_err(|e| match e.kind() {
        ErrorKind::WriteZero => BmpError::ShortWrite,
        _ => BmpError::Io(e),
    })
}

/// Length of the stream, leaving the cursor at the start.
fn stream_len<S: Seek + ?Sized>(stream: &mut S) -> Result<u64, BmpError> {
    let len = stream.seek(SeekFrom::End(0))?;
    stream.rewind()?;
    Ok(len)
}

/// Read a BMP file.
pub fn read_image(path: impl AsRef<Path>) -> Result<Image, BmpError> {
    read_image_inner(path.as_ref(), None)
}

/// [`read_image`] with resource limits.
pub fn read_image_with_limits(path: impl AsRef<Path>, limits: &Limits) -> Result<Image, BmpError> {
    read_image_inner(path.as_ref(), Some(limits))
}

fn read_image_inner(path: &Path, limits: Option<&Limits>) -> Result<Image, BmpError> {
    let mut file = File::open(path).map_err(|source| BmpError::OpenFailed { source })?;
    let image = read_from_inner(&mut file, limits)?;
    log::debug!("read {}", path.display());
    Ok(image)
}

/// Read an image from a seekable stream. The whole stream is the file:
/// its length is what the header's `size` field is checked against.
pub fn read_from<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<Image, BmpError> {
    read_from_inner(reader, None)
}

fn read_from_inner<R: Read + Seek + ?Sized>(
    reader: &mut R,
    limits: Option<&Limits>,
) -> Result<Image, BmpError> {
    let file_len = stream_len(reader)?;

    let mut header_bytes = [0u8; HEADER_SIZE];
    read_exact_or_short(reader, &mut header_bytes)?;
    let header = decode_header(&header_bytes);
    let payload_len = payload_len_for_read(&header, file_len, limits)?;

    let mut data = try_with_capacity(payload_len)?;
    data.resize(payload_len, 0);
    read_exact_or_short(reader, &mut data)?;

    log::debug!(
        "decoded {}x{} BMP ({payload_len} payload bytes)",
        header.width_px,
        header.height_px
    );
    Image::from_parts(header, data)
}

/// Write `image` to `path`, creating or truncating the file.
pub fn write_image(path: impl AsRef<Path>, image: &Image) -> Result<(), BmpError> {
    let path = path.as_ref();
    let mut file = File::create(path).map_err(|source| BmpError::OpenFailed { source })?;
    write_to(&mut file, image)?;
    file.flush()?;
    log::debug!("wrote {} ({} bytes)", path.display(), HEADER_SIZE + image.data().len());
    Ok(())
}

/// Write the header followed by gap and pixel bytes.
pub fn write_to<W: Write + ?Sized>(writer: &mut W, image: &Image) -> Result<(), BmpError> {
    write_exact(writer, &encode_header(image.header()))?;
    write_exact(writer, image.data())
}
