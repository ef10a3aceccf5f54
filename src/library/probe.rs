// Metadata probe - Track duration from container headers, without decoding

use crate::library::LibraryError;
use std::fs::File;
use std::path::Path;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Read the duration of the default track in seconds
pub fn probe_duration(path: &Path) -> Result<f64, LibraryError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| LibraryError::Probe(format!("{}: {}", path.display(), e)))?;

    let track = probed
        .format
        .default_track()
        .ok_or_else(|| LibraryError::Probe(format!("{}: no audio track", path.display())))?;
    let params = &track.codec_params;

    let seconds = match (params.n_frames, params.time_base, params.sample_rate) {
        (Some(frames), Some(time_base), _) => {
            let time = time_base.calc_time(frames);
            time.seconds as f64 + time.frac
        }
        (Some(frames), None, Some(sample_rate)) if sample_rate > 0 => {
            frames as f64 / sample_rate as f64
        }
        _ => {
            return Err(LibraryError::Probe(format!(
                "{}: duration not available in metadata",
                path.display()
            )));
        }
    };

    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err(LibraryError::Probe(format!(
            "{}: empty audio track",
            path.display()
        )))
    }
}
