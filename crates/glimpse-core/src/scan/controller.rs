//! Scan orchestration: drives extraction over a directory listing and
//! emits a tagged event stream.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::Config;
use crate::error::ScanResult;
use crate::types::ScanEvent;

use super::decode::ImageProbe;
use super::discovery::FileDiscovery;
use super::extract::MetadataExtractor;

/// Cooperative cancellation handle.
///
/// The control context that starts a scan keeps the token and is its only
/// writer; the scan worker polls it once per file boundary. Cancellation
/// never retracts results that were already emitted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; takes effect at the next file boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Runs a scan over one directory, sequentially, one file at a time.
pub struct Scanner {
    discovery: FileDiscovery,
    extractor: MetadataExtractor,
    yield_ms: u64,
    channel_capacity: usize,
}

impl Scanner {
    /// Create a scanner using the default on-disk probe.
    pub fn new(config: &Config) -> Self {
        Self {
            discovery: FileDiscovery::new(config.scan.clone()),
            extractor: MetadataExtractor::new(config),
            yield_ms: config.scan.yield_ms,
            channel_capacity: config.scan.channel_capacity,
        }
    }

    /// Create a scanner with a custom probe (used by tests).
    pub fn with_probe(config: &Config, probe: Arc<dyn ImageProbe>) -> Self {
        Self {
            discovery: FileDiscovery::new(config.scan.clone()),
            extractor: MetadataExtractor::with_probe(config, probe),
            yield_ms: config.scan.yield_ms,
            channel_capacity: config.scan.channel_capacity,
        }
    }

    /// Create the bounded event channel pair for a scan.
    ///
    /// The bound gives backpressure: a slow consumer stalls the worker
    /// instead of growing an unbounded queue.
    pub fn channel(&self) -> (mpsc::Sender<ScanEvent>, mpsc::Receiver<ScanEvent>) {
        mpsc::channel(self.channel_capacity)
    }

    /// Scan `dir`, emitting events until the listing is exhausted or the
    /// token is cancelled.
    ///
    /// Event order per file: `Result` then `Progress`, with the percentage
    /// `floor(processed * 100 / total)`. `Finished` is sent exactly once,
    /// last. An empty listing finishes immediately. Errors are only
    /// returned when the directory itself cannot be listed.
    pub async fn scan(
        &self,
        dir: &Path,
        cancel: CancelToken,
        events: mpsc::Sender<ScanEvent>,
    ) -> ScanResult<()> {
        let files = self.discovery.list(dir)?;
        let total = files.len();
        if total == 0 {
            tracing::info!("No image files in {:?}", dir);
            let _ = events.send(ScanEvent::Finished).await;
            return Ok(());
        }

        tracing::info!("Scanning {} files in {:?}", total, dir);
        let mut processed = 0usize;

        for file in files {
            // Cancellation is checked per file, not mid-extraction.
            if cancel.is_cancelled() {
                tracing::info!("Scan cancelled after {} of {} files", processed, total);
                break;
            }

            let metadata = self.extractor.extract(&file.path);
            tracing::debug!("Analyzed {:?}", file.file_name);

            let result = ScanEvent::Result {
                file_name: file.file_name,
                metadata,
            };
            if events.send(result).await.is_err() {
                // Consumer dropped the receiver; nothing left to notify.
                tracing::debug!("Event consumer gone, stopping scan");
                return Ok(());
            }

            processed += 1;
            let progress = ScanEvent::Progress {
                percent: (processed * 100 / total) as u8,
                status: format!("processed {processed} of {total} files"),
            };
            if events.send(progress).await.is_err() {
                return Ok(());
            }

            // Courtesy yield so the consumer and the cancel flag get a turn.
            if self.yield_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.yield_ms)).await;
            }
        }

        let _ = events.send(ScanEvent::Finished).await;
        Ok(())
    }

    /// The extractor driving this scanner, for detail lookups.
    pub fn extractor(&self) -> &MetadataExtractor {
        &self.extractor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;
    use crate::scan::decode::ProbedImage;
    use std::path::PathBuf;

    struct FixedProbe(ProbedImage);

    impl ImageProbe for FixedProbe {
        fn probe(&self, _path: &Path) -> Option<ProbedImage> {
            Some(self.0)
        }
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.scan.yield_ms = 0; // keep tests fast
        config
    }

    fn fixed_scanner(config: &Config, width: u32, height: u32) -> Scanner {
        let probed = ProbedImage {
            width,
            height,
            bit_depth: 24,
            ..Default::default()
        };
        Scanner::with_probe(config, Arc::new(FixedProbe(probed)))
    }

    async fn collect_events(
        scanner: &Scanner,
        dir: &Path,
        cancel: CancelToken,
    ) -> Vec<ScanEvent> {
        let (tx, mut rx) = scanner.channel();
        let mut events = Vec::new();
        // Capacity exceeds the event count in these tests, so sending
        // never blocks on the unconsumed channel.
        scanner.scan(dir, cancel, tx).await.unwrap();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_empty_directory_finishes_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = fixed_scanner(&test_config(), 1, 1);
        let events = collect_events(&scanner, dir.path(), CancelToken::new()).await;

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ScanEvent::Finished));
    }

    #[tokio::test]
    async fn test_event_order_and_progress_math() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.jpg", "c.gif"] {
            std::fs::write(dir.path().join(name), vec![0u8; 10]).unwrap();
        }

        let scanner = fixed_scanner(&test_config(), 100, 100);
        let events = collect_events(&scanner, dir.path(), CancelToken::new()).await;

        // Result/Progress pair per file, then Finished
        assert_eq!(events.len(), 7);
        let mut percents = Vec::new();
        for pair in events[..6].chunks(2) {
            assert!(matches!(pair[0], ScanEvent::Result { .. }));
            match &pair[1] {
                ScanEvent::Progress { percent, status } => {
                    percents.push(*percent);
                    assert!(status.starts_with("processed "));
                }
                other => panic!("Expected Progress, got {other:?}"),
            }
        }
        assert_eq!(percents, vec![33, 66, 100]);
        assert!(matches!(events[6], ScanEvent::Finished));
    }

    #[tokio::test]
    async fn test_cancellation_stops_at_file_boundary() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            std::fs::write(dir.path().join(format!("img{i}.png")), vec![0u8; 10]).unwrap();
        }

        let scanner = fixed_scanner(&test_config(), 10, 10);
        let cancel = CancelToken::new();
        let (tx, mut rx) = scanner.channel();

        // Pre-cancelled: the flag is set before the first boundary check
        cancel.cancel();
        scanner.scan(dir.path(), cancel, tx).await.unwrap();

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ScanEvent::Finished));
    }

    #[tokio::test]
    async fn test_cancellation_mid_scan_keeps_emitted_results() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..4 {
            std::fs::write(dir.path().join(format!("img{i}.png")), vec![0u8; 10]).unwrap();
        }

        // Capacity 1 so the worker cannot run ahead of the consumer; the
        // cancel below is then guaranteed to land before the third file.
        let mut config = test_config();
        config.scan.channel_capacity = 1;
        let scanner = Arc::new(fixed_scanner(&config, 10, 10));
        let cancel = CancelToken::new();
        let (tx, mut rx) = scanner.channel();

        let worker = {
            let scanner = Arc::clone(&scanner);
            let cancel = cancel.clone();
            let dir = dir.path().to_path_buf();
            tokio::spawn(async move { scanner.scan(&dir, cancel, tx).await })
        };

        // Cancel after consuming the first Result/Progress pair
        let mut events = Vec::new();
        for _ in 0..2 {
            events.push(rx.recv().await.unwrap());
        }
        cancel.cancel();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        worker.await.unwrap().unwrap();

        let results = events
            .iter()
            .filter(|e| matches!(e, ScanEvent::Result { .. }))
            .count();
        // The flag lands while the worker sits at or before the second
        // boundary; files three and four are never processed.
        assert!(
            (1..=2).contains(&results),
            "cancellation should cut the scan short, got {results} results"
        );
        assert!(matches!(events.last(), Some(ScanEvent::Finished)));
        // Exactly one Finished
        let finished = events
            .iter()
            .filter(|e| matches!(e, ScanEvent::Finished))
            .count();
        assert_eq!(finished, 1);
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let scanner = fixed_scanner(&test_config(), 1, 1);
        let (tx, _rx) = scanner.channel();
        let err = scanner
            .scan(&PathBuf::from("/nonexistent/dir"), CancelToken::new(), tx)
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::DirectoryNotFound(_)));
    }

    #[tokio::test]
    async fn test_scan_scenario_three_formats() {
        use crate::stats::StatisticsEngine;
        use crate::store::ResultStore;
        use std::time::Duration;

        // Probe keyed by extension, standing in for a real decoder
        struct ByExtension;
        impl ImageProbe for ByExtension {
            fn probe(&self, path: &Path) -> Option<ProbedImage> {
                let ext = path.extension()?.to_str()?.to_lowercase();
                let (width, height, bit_depth) = match ext.as_str() {
                    "png" => (100, 100, 24),
                    "bmp" => (200, 200, 8),
                    "jpg" => (4000, 3000, 24),
                    _ => return None,
                };
                Some(ProbedImage {
                    width,
                    height,
                    bit_depth,
                    ..Default::default()
                })
            }
        }

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("small.png"), vec![0u8; 500]).unwrap();
        let mut bmp = vec![0u8; 2048];
        bmp[0..2].copy_from_slice(b"BM");
        bmp[10..14].copy_from_slice(&1078u32.to_le_bytes());
        bmp[14..18].copy_from_slice(&40u32.to_le_bytes());
        std::fs::write(dir.path().join("indexed.bmp"), &bmp).unwrap();
        std::fs::write(dir.path().join("big.jpg"), vec![0u8; 3 * 1_048_576]).unwrap();

        let config = test_config();
        let scanner = Scanner::with_probe(&config, Arc::new(ByExtension));
        let mut store = ResultStore::new();

        let (tx, mut rx) = scanner.channel();
        scanner
            .scan(dir.path(), CancelToken::new(), tx)
            .await
            .unwrap();
        while let Some(event) = rx.recv().await {
            if let ScanEvent::Result {
                file_name,
                metadata,
            } = event
            {
                store.insert(file_name, metadata);
            }
        }

        let stats =
            StatisticsEngine::compute(store.results(), Duration::from_millis(10)).unwrap();
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_bytes, 500 + 2048 + 3 * 1_048_576);
        assert_eq!(stats.average_bytes, stats.total_bytes / 3);
        let counts: Vec<(&str, usize)> = stats
            .formats
            .iter()
            .map(|f| (f.format.as_str(), f.count))
            .collect();
        assert_eq!(counts, [("BMP", 1), ("JPG", 1), ("PNG", 1)]);

        // The BMP advisory reflects the parsed header
        let info = scanner
            .extractor()
            .additional_info("BMP", &dir.path().join("indexed.bmp"))
            .unwrap();
        assert_eq!(
            info,
            "BMP type: info header (3.x and later) | data offset: 1078 bytes"
        );
    }

    #[tokio::test]
    async fn test_decode_failures_do_not_abort_the_scan() {
        struct FailingProbe;
        impl ImageProbe for FailingProbe {
            fn probe(&self, _path: &Path) -> Option<ProbedImage> {
                None
            }
        }

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), vec![0u8; 10]).unwrap();
        std::fs::write(dir.path().join("b.png"), vec![0u8; 10]).unwrap();

        let scanner = Scanner::with_probe(&test_config(), Arc::new(FailingProbe));
        let events = collect_events(&scanner, dir.path(), CancelToken::new()).await;

        let errored = events
            .iter()
            .filter(|e| {
                matches!(e, ScanEvent::Result { metadata, .. }
                    if metadata.error.as_deref() == Some("cannot load image"))
            })
            .count();
        assert_eq!(errored, 2);
        assert!(matches!(events.last(), Some(ScanEvent::Finished)));
    }
}
