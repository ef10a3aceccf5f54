// Library module
// Stored recordings the engine can load: listing, import, deletion, metadata probe

pub mod asset;
pub mod probe;
pub mod store;

pub use asset::{AssetId, AudioAsset, SUPPORTED_FORMATS};
pub use probe::probe_duration;
pub use store::{AssetLibrary, DirectoryLibrary};

/// Library error types
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Unsupported audio format: {0} (expected MP3, WAV or OGG)")]
    UnsupportedFormat(String),

    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    #[error("Asset not found: {0}")]
    NotFound(AssetId),

    #[error("Metadata probe failed: {0}")]
    Probe(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}
