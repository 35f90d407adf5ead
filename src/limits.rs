use crate::error::BmpError;
use crate::header::Header;

/// Caps applied to an image before its buffer is allocated, on read and
/// on crop. Unset fields impose nothing.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Caps `width * |height|`.
    pub max_pixels: Option<u64>,
    /// Caps the gap-plus-pixels buffer of one image.
    pub max_memory_bytes: Option<u64>,
}

fn within(what: &str, value: u64, cap: Option<u64>) -> Result<(), BmpError> {
    match cap {
        Some(cap) if value > cap => Err(BmpError::LimitExceeded(alloc::format!(
            "{what} {value} exceeds limit {cap}"
        ))),
        _ => Ok(()),
    }
}

impl Limits {
    /// Check the dimensions `header` describes and the `payload_len`-byte
    /// buffer that would hold them.
    pub(crate) fn check(&self, header: &Header, payload_len: usize) -> Result<(), BmpError> {
        let width = u64::from(header.width_px.unsigned_abs());
        let rows = u64::from(header.rows());
        within("width", width, self.max_width)?;
        within("height", rows, self.max_height)?;
        within("pixel count", width * rows, self.max_pixels)?;
        within("allocation", payload_len as u64, self.max_memory_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_limits_accept_anything() {
        let header = Header::for_dimensions(40_000, -20_000).unwrap();
        assert!(Limits::default().check(&header, usize::MAX).is_ok());
    }

    #[test]
    fn each_cap_is_inclusive() {
        let header = Header::for_dimensions(10, -4).unwrap();
        let payload = header.payload_len().unwrap();
        let exact = Limits {
            max_width: Some(10),
            max_height: Some(4),
            max_pixels: Some(40),
            max_memory_bytes: Some(payload as u64),
        };
        assert!(exact.check(&header, payload).is_ok());

        let tighter = [
            Limits { max_width: Some(9), ..exact.clone() },
            Limits { max_height: Some(3), ..exact.clone() },
            Limits { max_pixels: Some(39), ..exact.clone() },
            Limits { max_memory_bytes: Some(payload as u64 - 1), ..exact.clone() },
        ];
        for limits in tighter {
            assert!(matches!(
                limits.check(&header, payload),
                Err(BmpError::LimitExceeded(_))
            ));
        }
    }
}
