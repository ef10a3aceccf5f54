use hound::{SampleFormat, WavSpec, WavWriter};
use musicloop::library::probe_duration;
use musicloop::{
    AssetId, AssetLibrary, DirectoryLibrary, LibraryError, LoopEngine, PlaybackRate, Segment,
    SimulatedClock,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const SAMPLE_RATE: u32 = 8000;
const MAX_UPLOAD: u64 = 50 * 1024 * 1024;

/// Write a silent mono WAV of `seconds` length
fn write_wav(dir: &Path, name: &str, seconds: f64) -> PathBuf {
    let path = dir.join(name);
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    let frames = (seconds * SAMPLE_RATE as f64).round() as usize;
    for _ in 0..frames {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
    path
}

#[test]
fn test_probe_reads_wav_duration() {
    let dir = tempdir().unwrap();
    let path = write_wav(dir.path(), "tone.wav", 2.5);

    let duration = probe_duration(&path).unwrap();
    assert!((duration - 2.5).abs() < 1e-3, "got {}", duration);
}

#[test]
fn test_probe_rejects_garbage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("noise.mp3");
    fs::write(&path, b"definitely not an mpeg stream").unwrap();

    assert!(matches!(probe_duration(&path), Err(LibraryError::Probe(_))));
}

#[test]
fn test_import_list_delete() {
    let source = tempdir().unwrap();
    let root = tempdir().unwrap();
    let wav = write_wav(source.path(), "warm-up.wav", 3.0);

    let mut library = DirectoryLibrary::open(root.path().join("uploads"), MAX_UPLOAD).unwrap();
    let asset = library.import(&wav).unwrap();

    assert_eq!(asset.original_name, "warm-up.wav");
    assert_eq!(asset.mime_type, "audio/wav");
    assert!(asset.file_name.ends_with("-warm-up.wav"));
    assert!(asset.url.starts_with("file://"));
    assert!(asset.path.starts_with(library.root()));
    assert!((asset.duration_hint.unwrap() - 3.0).abs() < 1e-3);

    let listed = library.list_assets().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, asset.id);
    assert_eq!(library.find(&asset.id).unwrap().size, asset.size);

    let deleted = library.delete_asset(&asset.id).unwrap();
    assert_eq!(deleted.id, asset.id);
    assert!(!deleted.path.exists());
    assert!(library.list_assets().unwrap().is_empty());
    assert!(matches!(
        library.delete_asset(&asset.id),
        Err(LibraryError::NotFound(_))
    ));

    // The source file is untouched
    assert!(wav.exists());
}

#[test]
fn test_listing_skips_unsupported_files() {
    let root = tempdir().unwrap();
    let library = DirectoryLibrary::open(root.path(), MAX_UPLOAD).unwrap();
    write_wav(root.path(), "dropped-in.wav", 1.0);
    fs::write(root.path().join("notes.txt"), "practice bars 12-16").unwrap();
    fs::create_dir(root.path().join("archive.wav")).unwrap();

    let listed = library.list_assets().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].original_name, "dropped-in.wav");
    assert_eq!(listed[0].id.as_str(), "dropped-in.wav");
}

#[test]
fn test_find_matches_stored_id_among_many() {
    let source = tempdir().unwrap();
    let root = tempdir().unwrap();
    let mut library = DirectoryLibrary::open(root.path(), MAX_UPLOAD).unwrap();

    let first = library.import(&write_wav(source.path(), "one.wav", 1.0)).unwrap();
    let second = library.import(&write_wav(source.path(), "two.wav", 2.0)).unwrap();
    fs::write(root.path().join("junk.mp3"), b"not audio").unwrap();

    let found = library.find(&second.id).unwrap();
    assert_eq!(found.original_name, "two.wav");
    assert_eq!(library.find(&first.id).unwrap().original_name, "one.wav");
    assert_eq!(library.find(&AssetId::new("junk.mp3")).unwrap().duration_hint, None);
    assert!(matches!(
        library.find(&AssetId::new("0-missing")),
        Err(LibraryError::NotFound(_))
    ));
}

#[test]
fn test_listing_a_removed_root_is_an_error() {
    let root = tempdir().unwrap();
    let dir = root.path().join("uploads");
    let library = DirectoryLibrary::open(&dir, MAX_UPLOAD).unwrap();
    fs::remove_dir(&dir).unwrap();

    assert!(matches!(library.list_assets(), Err(LibraryError::Walk(_))));
}

#[cfg(unix)]
#[test]
fn test_listing_skips_dangling_links() {
    let root = tempdir().unwrap();
    let library = DirectoryLibrary::open(root.path(), MAX_UPLOAD).unwrap();
    write_wav(root.path(), "kept.wav", 1.0);
    std::os::unix::fs::symlink(root.path().join("gone.wav"), root.path().join("link.wav"))
        .unwrap();

    let listed = library.list_assets().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].original_name, "kept.wav");
}

#[test]
fn test_import_rejects_unsupported_format() {
    let source = tempdir().unwrap();
    let root = tempdir().unwrap();
    let text = source.path().join("lyrics.txt");
    fs::write(&text, "la la la").unwrap();

    let mut library = DirectoryLibrary::open(root.path(), MAX_UPLOAD).unwrap();
    assert!(matches!(
        library.import(&text),
        Err(LibraryError::UnsupportedFormat(_))
    ));
    assert!(library.list_assets().unwrap().is_empty());
}

#[test]
fn test_import_rejects_oversized_file() {
    let source = tempdir().unwrap();
    let root = tempdir().unwrap();
    let wav = write_wav(source.path(), "long.wav", 1.0);

    let mut library = DirectoryLibrary::open(root.path(), 1024).unwrap();
    match library.import(&wav) {
        Err(LibraryError::TooLarge { size, limit }) => {
            assert_eq!(limit, 1024);
            assert!(size > limit);
        }
        other => panic!("expected TooLarge, got {:?}", other),
    }
    assert!(library.list_assets().unwrap().is_empty());
}

#[test]
fn test_imported_asset_drives_engine() {
    let source = tempdir().unwrap();
    let root = tempdir().unwrap();
    let wav = write_wav(source.path(), "etude.wav", 4.0);

    let mut library = DirectoryLibrary::open(root.path(), MAX_UPLOAD).unwrap();
    let asset = library.import(&wav).unwrap();
    let id = asset.id.clone();

    let mut engine = LoopEngine::new(SimulatedClock::new(), 1.0, PlaybackRate::Normal);
    engine.load_asset(asset);
    engine.pump();

    assert!((engine.duration() - 4.0).abs() < 1e-3);
    assert_eq!(engine.segment(), Segment::reset(engine.duration()));

    let deleted = library.delete_asset(&id).unwrap();
    assert!(engine.on_asset_deleted(&deleted.id));
    assert!(engine.asset().is_none());
}

#[test]
fn test_unprobeable_asset_fails_to_load() {
    let root = tempdir().unwrap();
    fs::write(root.path().join("broken.mp3"), b"not an audio stream at all").unwrap();
    let library = DirectoryLibrary::open(root.path(), MAX_UPLOAD).unwrap();

    let asset = library.list_assets().unwrap().remove(0);
    assert!(asset.duration_hint.is_none());

    let mut engine = LoopEngine::new(SimulatedClock::new(), 1.0, PlaybackRate::Normal);
    engine.load_asset(asset);
    engine.pump();

    assert!(engine.status().unwrap().contains("broken.mp3"));
    assert_eq!(engine.segment(), Segment::ZERO);
}
