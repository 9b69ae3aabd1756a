//! Glimpse Core - image metadata scanning library.
//!
//! Glimpse walks a directory of images and derives structural metadata for
//! each file without decoding pixel data: dimensions, density, color depth,
//! container format, inferred compression scheme, file size, and palette
//! size. Results aggregate into descriptive statistics.
//!
//! # Architecture
//!
//! ```text
//! Directory → Discover → Extract (probe + BMP header) → Events → Store → Statistics
//! ```
//!
//! The scan runs on one worker and pushes a tagged event stream
//! ([`ScanEvent`]) through a bounded channel; the consumer owns the
//! [`ResultStore`] and recomputes [`StatisticsEngine`] output as results
//! arrive. Cancellation is cooperative via [`CancelToken`], checked at
//! file boundaries.
//!
//! # Usage
//!
//! ```rust,ignore
//! use glimpse_core::{CancelToken, Config, ResultStore, ScanEvent, Scanner};
//!
//! #[tokio::main]
//! async fn main() -> glimpse_core::Result<()> {
//!     let config = Config::load()?;
//!     let scanner = Scanner::new(&config);
//!     let cancel = CancelToken::new();
//!     let (tx, mut rx) = scanner.channel();
//!
//!     tokio::spawn(async move { scanner.scan("./photos".as_ref(), cancel, tx).await });
//!     while let Some(event) = rx.recv().await {
//!         if let ScanEvent::Finished = event {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod scan;
pub mod stats;
pub mod store;
pub mod types;

// Re-exports for convenient access
pub use config::{CompressionTable, Config};
pub use error::{ConfigError, GlimpseError, Result, ScanError, ScanResult};
pub use scan::{CancelToken, ImageProbe, MetadataExtractor, ProbedImage, Scanner};
pub use stats::{format_file_size, ScanStatistics, StatisticsEngine};
pub use store::ResultStore;
pub use types::{ImageMetadata, ScanEvent};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
