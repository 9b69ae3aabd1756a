//! Scanning components.
//!
//! - **discovery**: non-recursive listing of eligible image files
//! - **decode**: structural image probing behind a stubbable trait
//! - **header**: raw BMP file-header parsing
//! - **extract**: per-file metadata derivation
//! - **controller**: the sequential, cancellable scan loop

pub mod controller;
pub mod decode;
pub mod discovery;
pub mod extract;
pub mod header;

// Re-exports for convenient access
pub use controller::{CancelToken, Scanner};
pub use decode::{ImageProbe, ProbedImage, StdProbe};
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use extract::MetadataExtractor;
pub use header::{BmpHeader, BmpHeaderKind, BmpProbe};
