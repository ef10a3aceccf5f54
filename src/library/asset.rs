// Audio assets - Read-only descriptors handed to the engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Accepted extensions and their MIME types
pub const SUPPORTED_FORMATS: [(&str, &str); 3] = [
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
];

/// Stable identifier of an asset within its library
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A playable recording: where to find it and, once probed, how long it is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioAsset {
    pub id: AssetId,
    /// Name the user imported the file under
    pub original_name: String,
    /// Name of the stored file
    pub file_name: String,
    pub path: PathBuf,
    /// Dereferenceable location handed to the clock source
    pub url: String,
    pub size: u64,
    pub mime_type: String,
    pub modified: DateTime<Utc>,
    /// Duration read from container metadata, if available
    pub duration_hint: Option<f64>,
}

impl AudioAsset {
    /// Asset that is not backed by a library file
    pub fn with_duration(id: &str, name: &str, duration_hint: Option<f64>) -> Self {
        let path = PathBuf::from(name);
        Self {
            id: AssetId::new(id),
            original_name: name.to_string(),
            file_name: name.to_string(),
            url: file_url(&path),
            mime_type: mime_type_for(&path).unwrap_or("application/octet-stream").to_string(),
            path,
            size: 0,
            modified: Utc::now(),
            duration_hint,
        }
    }

    /// Size in megabytes, for display
    pub fn size_mb(&self) -> f64 {
        self.size as f64 / 1024.0 / 1024.0
    }
}

/// MIME type for a supported audio file, by extension
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    SUPPORTED_FORMATS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

pub fn is_supported(path: &Path) -> bool {
    mime_type_for(path).is_some()
}

/// `file://` URL for a local path
pub fn file_url(path: &Path) -> String {
    let display = path.to_string_lossy().replace('\\', "/");
    if display.starts_with('/') {
        format!("file://{}", display)
    } else {
        format!("file:///{}", display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_type_for(Path::new("a/song.MP3")), Some("audio/mpeg"));
        assert_eq!(mime_type_for(Path::new("take.wav")), Some("audio/wav"));
        assert_eq!(mime_type_for(Path::new("take.ogg")), Some("audio/ogg"));
        assert_eq!(mime_type_for(Path::new("take.flac")), None);
        assert_eq!(mime_type_for(Path::new("README")), None);
    }

    #[test]
    fn test_file_url() {
        assert_eq!(file_url(Path::new("/tmp/a.wav")), "file:///tmp/a.wav");
        assert_eq!(file_url(Path::new("C:\\music\\a.wav")), "file:///C:/music/a.wav");
    }

    #[test]
    fn test_asset_display_helpers() {
        let mut asset = AudioAsset::with_duration("1-2", "scale.mp3", Some(3.0));
        asset.size = 3 * 1024 * 1024;
        assert_eq!(asset.size_mb(), 3.0);
        assert_eq!(asset.mime_type, "audio/mpeg");
        assert_eq!(asset.id.to_string(), "1-2");
    }
}
