//! Raw BMP file-header parsing.
//!
//! BMP is the one container glimpse introspects at the byte level: the
//! fixed-layout file header carries the pixel-data offset and a header-size
//! field that identifies which of several header layouts follows. Nothing
//! past the first 18 bytes is read here.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Expected two-byte signature at the start of every BMP file.
pub const BMP_SIGNATURE: [u8; 2] = *b"BM";

/// Number of bytes the probe needs: signature (2), file size + reserved (8),
/// pixel-data offset (4), header-size field (4).
pub const BMP_PROBE_LEN: usize = 18;

/// The header layout declared by the header-size field.
///
/// Classification is by exact value equality; any other positive size is
/// carried through as [`BmpHeaderKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmpHeaderKind {
    /// 12 bytes
    Core,
    /// 40 bytes
    Info,
    /// 108 bytes
    V4,
    /// 124 bytes
    V5,
    /// Any other declared size
    Unknown(u32),
}

impl BmpHeaderKind {
    /// Classify a header-size field value.
    pub fn from_size(size: u32) -> Self {
        match size {
            12 => Self::Core,
            40 => Self::Info,
            108 => Self::V4,
            124 => Self::V5,
            other => Self::Unknown(other),
        }
    }

    /// Human-readable description of the header variant.
    pub fn describe(&self) -> String {
        match self {
            Self::Core => "core header (legacy 1.x)".to_string(),
            Self::Info => "info header (3.x and later)".to_string(),
            Self::V4 => "V4 header".to_string(),
            Self::V5 => "V5 header".to_string(),
            Self::Unknown(size) => format!("unknown header ({size} bytes)"),
        }
    }
}

/// Parsed summary of a BMP file header.
#[derive(Debug, Clone, Copy)]
pub struct BmpHeader {
    /// Offset from the start of the file to the pixel data. Read as-is;
    /// no bounds check against the actual file length.
    pub pixel_data_offset: u32,

    /// Raw value of the header-size field
    pub header_size: u32,
}

impl BmpHeader {
    /// Classify the header-size field.
    pub fn kind(&self) -> BmpHeaderKind {
        BmpHeaderKind::from_size(self.header_size)
    }
}

/// Outcome of probing the first bytes of a purported BMP file.
///
/// A wrong signature is an advisory outcome, not an error; only an
/// unreadable or truncated file surfaces as `io::Error`.
#[derive(Debug, Clone, Copy)]
pub enum BmpProbe {
    /// Signature matched; header fields were read
    Header(BmpHeader),
    /// The first two bytes were not `BM`
    BadSignature,
}

/// Parse the fixed-layout BMP file header from its first bytes.
///
/// Layout: 2-byte signature, 4-byte file size and two 2-byte reserved
/// fields (skipped, unvalidated), then two little-endian `u32`s: the
/// pixel-data offset and the header-size field.
pub fn parse(bytes: &[u8; BMP_PROBE_LEN]) -> BmpProbe {
    if bytes[0..2] != BMP_SIGNATURE {
        return BmpProbe::BadSignature;
    }

    let pixel_data_offset = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]);
    let header_size = u32::from_le_bytes([bytes[14], bytes[15], bytes[16], bytes[17]]);

    BmpProbe::Header(BmpHeader {
        pixel_data_offset,
        header_size,
    })
}

/// Probe a file on disk.
///
/// A file shorter than [`BMP_PROBE_LEN`] bytes fails with
/// `ErrorKind::UnexpectedEof`, which callers render as a read-failure
/// advisory rather than a signature mismatch.
pub fn probe_file(path: &Path) -> io::Result<BmpProbe> {
    let mut file = File::open(path)?;
    let mut buf = [0u8; BMP_PROBE_LEN];
    file.read_exact(&mut buf)?;
    Ok(parse(&buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Build a minimal probe buffer with the given offset and header size.
    fn probe_bytes(signature: &[u8; 2], offset: u32, header_size: u32) -> [u8; BMP_PROBE_LEN] {
        let mut bytes = [0u8; BMP_PROBE_LEN];
        bytes[0..2].copy_from_slice(signature);
        bytes[10..14].copy_from_slice(&offset.to_le_bytes());
        bytes[14..18].copy_from_slice(&header_size.to_le_bytes());
        bytes
    }

    #[test]
    fn test_parse_reads_little_endian_fields() {
        let bytes = probe_bytes(b"BM", 1078, 40);
        match parse(&bytes) {
            BmpProbe::Header(header) => {
                assert_eq!(header.pixel_data_offset, 1078);
                assert_eq!(header.header_size, 40);
                assert_eq!(header.kind(), BmpHeaderKind::Info);
            }
            BmpProbe::BadSignature => panic!("Expected parsed header"),
        }
    }

    #[test]
    fn test_parse_bad_signature_is_not_an_error() {
        let bytes = probe_bytes(b"XX", 54, 40);
        assert!(matches!(parse(&bytes), BmpProbe::BadSignature));
    }

    #[test]
    fn test_kind_classification_is_exact() {
        assert_eq!(BmpHeaderKind::from_size(12), BmpHeaderKind::Core);
        assert_eq!(BmpHeaderKind::from_size(40), BmpHeaderKind::Info);
        assert_eq!(BmpHeaderKind::from_size(108), BmpHeaderKind::V4);
        assert_eq!(BmpHeaderKind::from_size(124), BmpHeaderKind::V5);
        // Near misses are unknown, not rounded to a neighbor
        assert_eq!(BmpHeaderKind::from_size(41), BmpHeaderKind::Unknown(41));
        assert_eq!(BmpHeaderKind::from_size(123), BmpHeaderKind::Unknown(123));
    }

    #[test]
    fn test_describe_labels() {
        assert_eq!(
            BmpHeaderKind::Core.describe(),
            "core header (legacy 1.x)"
        );
        assert_eq!(
            BmpHeaderKind::Info.describe(),
            "info header (3.x and later)"
        );
        assert_eq!(BmpHeaderKind::V4.describe(), "V4 header");
        assert_eq!(BmpHeaderKind::V5.describe(), "V5 header");
        assert_eq!(
            BmpHeaderKind::Unknown(56).describe(),
            "unknown header (56 bytes)"
        );
    }

    #[test]
    fn test_probe_file_short_file_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.bmp");
        let mut f = File::create(&path).unwrap();
        f.write_all(b"BM\x00\x00").unwrap();

        let err = probe_file(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_probe_file_missing_file_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nonexistent.bmp");
        assert!(probe_file(&path).is_err());
    }

    #[test]
    fn test_probe_file_valid_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.bmp");
        std::fs::write(&path, probe_bytes(b"BM", 54, 124)).unwrap();

        match probe_file(&path).unwrap() {
            BmpProbe::Header(header) => {
                assert_eq!(header.pixel_data_offset, 54);
                assert_eq!(header.kind(), BmpHeaderKind::V5);
            }
            BmpProbe::BadSignature => panic!("Expected parsed header"),
        }
    }
}
