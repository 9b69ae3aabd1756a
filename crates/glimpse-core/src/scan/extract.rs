//! Per-file metadata extraction.

use std::path::Path;
use std::sync::Arc;

use crate::config::{CompressionTable, Config};
use crate::stats::format_file_size_brief;
use crate::types::ImageMetadata;

use super::decode::{ImageProbe, ProbedImage, StdProbe};
use super::header::{self, BmpProbe};

/// Meters to inches; dots-per-meter times this gives DPI.
const METERS_PER_INCH: f64 = 0.0254;

/// Derives a complete [`ImageMetadata`] record for one file.
///
/// Extraction never fails to the caller: decode failures and derivation
/// faults are captured in the record's `error` field, keeping whatever
/// fields were computed before the failure point.
pub struct MetadataExtractor {
    compression: CompressionTable,
    probe: Arc<dyn ImageProbe>,
}

impl MetadataExtractor {
    /// Create an extractor using the default on-disk probe.
    pub fn new(config: &Config) -> Self {
        Self::with_probe(config, Arc::new(StdProbe))
    }

    /// Create an extractor with a custom probe (used by tests).
    pub fn with_probe(config: &Config, probe: Arc<dyn ImageProbe>) -> Self {
        Self {
            compression: config.compression.clone(),
            probe,
        }
    }

    /// Extract metadata for a single file.
    ///
    /// The on-disk size is recorded before decoding, so an undecodable
    /// file still contributes its real byte count to the statistics.
    pub fn extract(&self, path: &Path) -> ImageMetadata {
        let mut meta = ImageMetadata {
            file_name: path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string(),
            file_path: path.to_path_buf(),
            ..Default::default()
        };

        let mut stat_error = None;
        match std::fs::metadata(path) {
            Ok(info) => {
                meta.file_size = info.len();
                meta.file_size_label = format_file_size_brief(info.len());
            }
            Err(e) => stat_error = Some(e),
        }

        let Some(probed) = self.probe.probe(path) else {
            tracing::debug!("Cannot load {:?}", path);
            meta.error = Some("cannot load image".to_string());
            return meta;
        };

        self.derive(&mut meta, path, &probed);

        // A stat failure after a successful decode marks the record but
        // keeps every derived field.
        if let Some(e) = stat_error {
            tracing::debug!("Cannot stat {:?}: {}", path, e);
            meta.error = Some("error analyzing image".to_string());
        }

        meta
    }

    fn derive(&self, meta: &mut ImageMetadata, path: &Path, probed: &ProbedImage) {
        meta.dimensions = format!("{} × {}", probed.width, probed.height);

        meta.resolution = if probed.dots_per_meter_x > 0 && probed.dots_per_meter_y > 0 {
            let dpi_x = (f64::from(probed.dots_per_meter_x) * METERS_PER_INCH).round() as i64;
            let dpi_y = (f64::from(probed.dots_per_meter_y) * METERS_PER_INCH).round() as i64;
            format!("{dpi_x} × {dpi_y}")
        } else {
            "not specified".to_string()
        };

        meta.color_depth = depth_label(probed.bit_depth);

        meta.format = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_uppercase();
        meta.compression = self.compression.label_for(&meta.format).to_string();

        // Palette size only matters for BMP, and a zero count means
        // "no palette declared", same as not applicable.
        if meta.format == "BMP" {
            meta.palette_colors = probed.palette_colors.filter(|&c| c > 0);
        }
    }

    /// Format-specific advisory text for the details view.
    ///
    /// For BMP this runs the raw header probe; a wrong signature or an
    /// unreadable file yields advisory text, never an error.
    pub fn additional_info(&self, format: &str, path: &Path) -> Option<String> {
        match format {
            "JPG" | "JPEG" => Some("color space: YCbCr".to_string()),
            "PNG" => self.probe.probe(path).map(|p| {
                let channels = if p.grayscale { "1" } else { "3-4" };
                format!("channels: {channels}")
            }),
            "GIF" => Some("palette image (256 colors)".to_string()),
            "BMP" => Some(match header::probe_file(path) {
                Ok(BmpProbe::Header(h)) => format!(
                    "BMP type: {} | data offset: {} bytes",
                    h.kind().describe(),
                    h.pixel_data_offset
                ),
                Ok(BmpProbe::BadSignature) => "invalid BMP signature".to_string(),
                Err(_) => "cannot read file".to_string(),
            }),
            _ => None,
        }
    }
}

/// Color depth label; the common depths get fixed labels.
fn depth_label(bit_depth: u32) -> String {
    match bit_depth {
        1 => "1-bit".to_string(),
        8 => "8-bit".to_string(),
        24 => "24-bit".to_string(),
        32 => "32-bit".to_string(),
        d => format!("{d}-bit"),
    }
}
