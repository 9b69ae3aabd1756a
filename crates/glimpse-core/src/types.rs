//! Core data types for the glimpse scanner.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The metadata record for a single scanned file.
///
/// A record always exists for every listed file, even when the image could
/// not be decoded: failures are captured in `error` and whatever fields were
/// derived before the failure point keep their values. An empty string means
/// "not derived", never "derived as empty".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Just the filename portion; the natural key within one scan
    pub file_name: String,

    /// Full path to the source file
    pub file_path: PathBuf,

    /// Pixel dimensions, "width × height"
    pub dimensions: String,

    /// DPI per axis, "x × y", or "not specified" when the decoder
    /// reported no density
    pub resolution: String,

    /// Color depth label ("8-bit", "24-bit", ...)
    pub color_depth: String,

    /// Format label: file extension, uppercased
    pub format: String,

    /// Compression scheme inferred from the format
    pub compression: String,

    /// On-disk size in bytes
    pub file_size: u64,

    /// Human-readable size (three-tier: bytes/KB/MB)
    pub file_size_label: String,

    /// Palette entry count; recorded only for BMP files whose decoder
    /// reports a positive count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette_colors: Option<u32>,

    /// Set when decoding or derivation failed; the rest of the record
    /// is best-effort partial data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageMetadata {
    /// Whether the record was produced without any failure.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Events emitted by the scan worker, consumed by whatever display layer
/// sits on the other end of the channel.
///
/// Ordering guarantees: the `Result` and `Progress` events for file *i*
/// arrive strictly before those for file *i+1*, and `Finished` is sent
/// exactly once, after the last result (or immediately for an empty
/// directory).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScanEvent {
    /// Percentage complete plus a status line
    Progress { percent: u8, status: String },

    /// One file has been analyzed
    Result {
        file_name: String,
        metadata: ImageMetadata,
    },

    /// The scan is over; no further events follow
    Finished,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metadata() -> ImageMetadata {
        ImageMetadata {
            file_name: "beach.png".to_string(),
            file_path: PathBuf::from("/photos/beach.png"),
            dimensions: "1920 × 1080".to_string(),
            resolution: "72 × 72".to_string(),
            color_depth: "24-bit".to_string(),
            format: "PNG".to_string(),
            compression: "Deflate".to_string(),
            file_size: 2048,
            file_size_label: "2.0 KB".to_string(),
            palette_colors: None,
            error: None,
        }
    }

    #[test]
    fn test_metadata_serde_skips_absent_options() {
        let json = serde_json::to_string(&sample_metadata()).unwrap();
        assert!(!json.contains("palette_colors"));
        assert!(!json.contains("error"));
    }

    #[test]
    fn test_metadata_partial_record_keeps_error() {
        let meta = ImageMetadata {
            file_name: "broken.jpg".to_string(),
            file_path: PathBuf::from("/photos/broken.jpg"),
            error: Some("cannot load image".to_string()),
            ..Default::default()
        };
        assert!(!meta.is_ok());
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("\"error\":\"cannot load image\""));
    }

    #[test]
    fn test_scan_event_tagged_serde() {
        let event = ScanEvent::Progress {
            percent: 50,
            status: "processed 1/2 files".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"progress\""));

        let parsed: ScanEvent = serde_json::from_str(&json).unwrap();
        match parsed {
            ScanEvent::Progress { percent, .. } => assert_eq!(percent, 50),
            _ => panic!("Expected Progress variant"),
        }
    }

    #[test]
    fn test_scan_event_finished_serde() {
        let json = serde_json::to_string(&ScanEvent::Finished).unwrap();
        assert!(json.contains("\"type\":\"finished\""));
    }
}
