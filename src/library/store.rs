// Asset library - Directory-backed storage of imported recordings

use crate::library::LibraryError;
use crate::library::asset::{AssetId, AudioAsset, file_url, is_supported, mime_type_for};
use crate::library::probe::probe_duration;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File-management collaborator of the engine
pub trait AssetLibrary {
    /// All playable assets; callers must not rely on the order
    fn list_assets(&self) -> Result<Vec<AudioAsset>, LibraryError>;

    /// Remove an asset and return its descriptor
    fn delete_asset(&mut self, id: &AssetId) -> Result<AudioAsset, LibraryError>;
}

/// Library rooted at a directory.
///
/// Imported files are stored as `<millis>-<random>-<original name>`; the
/// asset id is the `<millis>-<random>` prefix.
#[derive(Debug, Clone)]
pub struct DirectoryLibrary {
    root: PathBuf,
    max_upload_bytes: u64,
}

impl DirectoryLibrary {
    /// Open (and create if needed) a library directory
    pub fn open(root: impl Into<PathBuf>, max_upload_bytes: u64) -> Result<Self, LibraryError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        log::info!("Asset library at {}", root.display());
        Ok(Self {
            root,
            max_upload_bytes,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copy an audio file into the library
    pub fn import(&mut self, source: &Path) -> Result<AudioAsset, LibraryError> {
        if !is_supported(source) {
            return Err(LibraryError::UnsupportedFormat(source.display().to_string()));
        }

        let size = fs::metadata(source)?.len();
        if size > self.max_upload_bytes {
            return Err(LibraryError::TooLarge {
                size,
                limit: self.max_upload_bytes,
            });
        }

        let original_name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| LibraryError::UnsupportedFormat(source.display().to_string()))?;

        let id = generate_asset_id();
        let stored = self.root.join(format!("{}-{}", id, original_name));
        fs::copy(source, &stored)?;
        log::info!("Imported '{}' as {}", original_name, id);

        self.describe(&stored)
    }

    /// Look up a single asset by id
    pub fn find(&self, id: &AssetId) -> Result<AudioAsset, LibraryError> {
        // Match on the stored name so only the hit gets probed
        let path = self
            .audio_files()?
            .into_iter()
            .find(|path| {
                path.file_name()
                    .is_some_and(|n| &split_stored_name(&n.to_string_lossy()).0 == id)
            })
            .ok_or_else(|| LibraryError::NotFound(id.clone()))?;
        self.describe(&path)
    }

    /// Supported files directly under the root. A failure on the root itself
    /// is an error; unreadable entries inside it are skipped.
    fn audio_files(&self) -> Result<Vec<PathBuf>, LibraryError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    log::warn!("Skipping unreadable library entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() && is_supported(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn describe(&self, path: &Path) -> Result<AudioAsset, LibraryError> {
        let metadata = fs::metadata(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let (id, original_name) = split_stored_name(&file_name);
        let modified: DateTime<Utc> = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        let duration_hint = match probe_duration(path) {
            Ok(duration) => Some(duration),
            Err(e) => {
                log::warn!("No duration for '{}': {}", file_name, e);
                None
            }
        };

        Ok(AudioAsset {
            id,
            original_name,
            url: file_url(path),
            mime_type: mime_type_for(path).unwrap_or("application/octet-stream").to_string(),
            path: path.to_path_buf(),
            file_name,
            size: metadata.len(),
            modified,
            duration_hint,
        })
    }
}

impl AssetLibrary for DirectoryLibrary {
    fn list_assets(&self) -> Result<Vec<AudioAsset>, LibraryError> {
        let mut assets = Vec::new();
        for path in self.audio_files()? {
            match self.describe(&path) {
                Ok(asset) => assets.push(asset),
                Err(e) => log::warn!("Skipping '{}': {}", path.display(), e),
            }
        }
        // Newest first
        assets.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| b.id.cmp(&a.id)));
        Ok(assets)
    }

    fn delete_asset(&mut self, id: &AssetId) -> Result<AudioAsset, LibraryError> {
        let asset = self.find(id)?;
        fs::remove_file(&asset.path)?;
        log::info!("Deleted '{}' ({})", asset.original_name, asset.id);
        Ok(asset)
    }
}

fn generate_asset_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", millis, &random[..9])
}

/// Split a stored file name into its id and the original name.
/// Files that were not imported through the library keep their full name for both.
fn split_stored_name(file_name: &str) -> (AssetId, String) {
    let mut parts = file_name.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(millis), Some(random), Some(original))
            if !original.is_empty() && millis.chars().all(|c| c.is_ascii_digit()) =>
        {
            (AssetId::new(format!("{}-{}", millis, random)), original.to_string())
        }
        _ => (AssetId::new(file_name), file_name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_stored_name() {
        let (id, original) = split_stored_name("1700000000000-abc123def-my-song.mp3");
        assert_eq!(id.as_str(), "1700000000000-abc123def");
        assert_eq!(original, "my-song.mp3");
    }

    #[test]
    fn test_split_foreign_name() {
        let (id, original) = split_stored_name("warmup.wav");
        assert_eq!(id.as_str(), "warmup.wav");
        assert_eq!(original, "warmup.wav");

        let (id, _) = split_stored_name("live-take-two.ogg");
        assert_eq!(id.as_str(), "live-take-two.ogg");
    }

    #[test]
    fn test_generated_id_shape() {
        let id = generate_asset_id();
        let (millis, random) = id.split_once('-').unwrap();
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(random.len(), 9);
    }
}
