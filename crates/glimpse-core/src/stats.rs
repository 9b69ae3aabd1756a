//! Aggregate statistics over a scan's result set.
//!
//! Recomputed after every stored result and once at completion; cheap
//! enough that no incremental state is kept.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::ImageMetadata;

/// Pixel-count bucket boundaries.
const SMALL_PIXELS: u64 = 100_000;
const MEDIUM_PIXELS: u64 = 1_000_000;
const LARGE_PIXELS: u64 = 10_000_000;

/// Per-format aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatStats {
    pub format: String,
    pub count: usize,
    pub bytes: u64,
    /// Share of the file count, 0..100
    pub count_percent: f64,
    /// Share of the total bytes, 0..100 (0 when total bytes is 0)
    pub bytes_percent: f64,
}

/// File counts per pixel-count bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SizeBuckets {
    /// Under 100K pixels
    pub small: usize,
    /// 100K to 1M pixels
    pub medium: usize,
    /// 1M to 10M pixels
    pub large: usize,
    /// 10M pixels and up
    pub huge: usize,
}

/// The single largest image by pixel count. First seen wins ties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LargestImage {
    pub file_name: String,
    pub width: u64,
    pub height: u64,
}

/// Throughput figures; present only once elapsed time is measurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Performance {
    pub elapsed_seconds: f64,
    pub files_per_second: f64,
    pub avg_ms_per_file: f64,
}

/// The full statistics report for one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub total_bytes: u64,
    pub average_bytes: u64,
    /// Lexicographic by format label
    pub formats: Vec<FormatStats>,
    pub buckets: SizeBuckets,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largest: Option<LargestImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<Performance>,
}

/// Computes descriptive statistics over a result set.
pub struct StatisticsEngine;

impl StatisticsEngine {
    /// Compute statistics. Returns `None` for an empty result set, which
    /// keeps every division below guarded by construction.
    pub fn compute(
        results: &BTreeMap<String, ImageMetadata>,
        elapsed: Duration,
    ) -> Option<ScanStatistics> {
        if results.is_empty() {
            return None;
        }
        let total_files = results.len();

        let mut format_counts: BTreeMap<&str, (usize, u64)> = BTreeMap::new();
        let mut total_bytes = 0u64;
        for meta in results.values() {
            let entry = format_counts.entry(meta.format.as_str()).or_default();
            entry.0 += 1;
            entry.1 += meta.file_size;
            total_bytes += meta.file_size;
        }

        let formats = format_counts
            .into_iter()
            .map(|(format, (count, bytes))| FormatStats {
                format: format.to_string(),
                count,
                bytes,
                count_percent: count as f64 * 100.0 / total_files as f64,
                bytes_percent: if total_bytes > 0 {
                    bytes as f64 * 100.0 / total_bytes as f64
                } else {
                    0.0
                },
            })
            .collect();

        let mut buckets = SizeBuckets::default();
        let mut largest: Option<(LargestImage, u64)> = None;
        for meta in results.values() {
            let Some((width, height)) = parse_dimensions(&meta.dimensions) else {
                continue;
            };
            let pixels = width * height;
            if pixels < SMALL_PIXELS {
                buckets.small += 1;
            } else if pixels < MEDIUM_PIXELS {
                buckets.medium += 1;
            } else if pixels < LARGE_PIXELS {
                buckets.large += 1;
            } else {
                buckets.huge += 1;
            }

            let is_new_max = largest.as_ref().map(|(_, max)| pixels > *max).unwrap_or(true);
            if is_new_max {
                largest = Some((
                    LargestImage {
                        file_name: meta.file_name.clone(),
                        width,
                        height,
                    },
                    pixels,
                ));
            }
        }

        let elapsed_ms = elapsed.as_millis() as f64;
        let performance = (elapsed_ms > 0.0).then(|| Performance {
            elapsed_seconds: elapsed_ms / 1000.0,
            files_per_second: total_files as f64 / (elapsed_ms / 1000.0),
            avg_ms_per_file: elapsed_ms / total_files as f64,
        });

        Some(ScanStatistics {
            total_files,
            total_bytes,
            average_bytes: total_bytes / total_files as u64,
            formats,
            buckets,
            largest: largest.map(|(image, _)| image),
            performance,
        })
    }

    /// Compute and render the text report in one step.
    pub fn report(results: &BTreeMap<String, ImageMetadata>, elapsed: Duration) -> String {
        match Self::compute(results, elapsed) {
            Some(stats) => stats.render(),
            None => "no data yet".to_string(),
        }
    }
}

impl ScanStatistics {
    /// Render the report as plain text for the display layer.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("SCAN STATISTICS\n");
        out.push_str("===============\n\n");

        out.push_str("Overview:\n");
        out.push_str(&format!("  files:        {}\n", self.total_files));
        out.push_str(&format!(
            "  total size:   {}\n",
            format_file_size(self.total_bytes)
        ));
        out.push_str(&format!(
            "  average size: {}\n\n",
            format_file_size(self.average_bytes)
        ));

        out.push_str("By format:\n");
        for f in &self.formats {
            out.push_str(&format!(
                "  {}: {} file(s) ({:.1}%) - {} ({:.1}%)\n",
                f.format,
                f.count,
                f.count_percent,
                format_file_size(f.bytes),
                f.bytes_percent
            ));
        }

        out.push_str("\nBy pixel count:\n");
        out.push_str(&format!("  small  (< 100K):   {}\n", self.buckets.small));
        out.push_str(&format!("  medium (100K-1M):  {}\n", self.buckets.medium));
        out.push_str(&format!("  large  (1M-10M):   {}\n", self.buckets.large));
        out.push_str(&format!("  huge   (>= 10M):   {}\n", self.buckets.huge));
        if let Some(largest) = &self.largest {
            out.push_str(&format!(
                "  largest: {} ({} × {})\n",
                largest.file_name, largest.width, largest.height
            ));
        }

        if let Some(perf) = &self.performance {
            out.push_str("\nPerformance:\n");
            out.push_str(&format!("  elapsed:  {:.2} s\n", perf.elapsed_seconds));
            out.push_str(&format!(
                "  rate:     {:.2} files/sec\n",
                perf.files_per_second
            ));
            out.push_str(&format!("  per file: {:.1} ms\n", perf.avg_ms_per_file));
        }

        out
    }
}

/// Parse a "width × height" label back into integers.
///
/// Labels that do not split into exactly two integers yield `None` and
/// are skipped by the bucket histogram.
fn parse_dimensions(label: &str) -> Option<(u64, u64)> {
    let mut parts = label.split(" × ");
    let width = parts.next()?.parse().ok()?;
    let height = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((width, height))
}

/// Four-tier byte formatter used for aggregate figures.
pub fn format_file_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    const GIB: u64 = 1024 * 1024 * 1024;
    if bytes < KIB {
        format!("{bytes} bytes")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else if bytes < GIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.1} GB", bytes as f64 / GIB as f64)
    }
}

/// Three-tier byte formatter used for per-file labels. Tops out at MB;
/// deliberately narrower than [`format_file_size`].
pub fn format_file_size_brief(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if bytes < KIB {
        format!("{bytes} bytes")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}
