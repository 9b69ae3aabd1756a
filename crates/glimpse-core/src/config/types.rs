//! Sub-configuration structs with defaults matching the scanner's contract.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scan settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Extensions eligible for scanning (matched case-insensitively)
    pub supported_formats: Vec<String>,

    /// Courtesy yield between files, in milliseconds. Gives the consumer
    /// and the cancellation flag a chance to run; not a throttle.
    pub yield_ms: u64,

    /// Event channel capacity (backpressure bound)
    pub channel_capacity: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "gif".to_string(),
                "tif".to_string(),
                "tiff".to_string(),
                "bmp".to_string(),
                "png".to_string(),
                "pcx".to_string(),
            ],
            yield_ms: 1,
            channel_capacity: 64,
        }
    }
}

/// Static format-to-compression lookup, injected into the extractor so
/// tests can substitute alternate tables.
///
/// Keys are uppercase format labels; lookups for formats without an entry
/// yield the `fallback` label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionTable {
    /// Format label to compression scheme name
    pub map: BTreeMap<String, String>,

    /// Label for formats without a table entry
    pub fallback: String,
}

impl Default for CompressionTable {
    fn default() -> Self {
        let mut map = BTreeMap::new();
        map.insert("JPG".to_string(), "JPEG".to_string());
        map.insert("JPEG".to_string(), "JPEG".to_string());
        map.insert("PNG".to_string(), "Deflate".to_string());
        map.insert("GIF".to_string(), "LZW".to_string());
        map.insert("TIF".to_string(), "varies by file".to_string());
        map.insert("TIFF".to_string(), "varies by file".to_string());
        map.insert("BMP".to_string(), "uncompressed".to_string());
        map.insert("PCX".to_string(), "RLE".to_string());
        Self {
            map,
            fallback: "unknown".to_string(),
        }
    }
}

impl CompressionTable {
    /// Look up the compression label for an uppercase format label.
    pub fn label_for(&self, format: &str) -> &str {
        self.map
            .get(format)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("text" or "json")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            pretty: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
