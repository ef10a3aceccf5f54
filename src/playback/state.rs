// Playback state - Enumerated rates and the read-only state snapshot

use serde::{Deserialize, Serialize};
use std::fmt;

/// Playback speed, restricted to the rates offered by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlaybackRate {
    Half,
    ThreeQuarters,
    #[default]
    Normal,
    OneAndQuarter,
    OneAndHalf,
    Double,
}

impl PlaybackRate {
    pub const ALL: [PlaybackRate; 6] = [
        PlaybackRate::Half,
        PlaybackRate::ThreeQuarters,
        PlaybackRate::Normal,
        PlaybackRate::OneAndQuarter,
        PlaybackRate::OneAndHalf,
        PlaybackRate::Double,
    ];

    /// Speed multiplier
    pub fn as_f64(&self) -> f64 {
        match self {
            PlaybackRate::Half => 0.5,
            PlaybackRate::ThreeQuarters => 0.75,
            PlaybackRate::Normal => 1.0,
            PlaybackRate::OneAndQuarter => 1.25,
            PlaybackRate::OneAndHalf => 1.5,
            PlaybackRate::Double => 2.0,
        }
    }

    /// Exact match against the enumerated set
    pub fn from_f64(rate: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| (r.as_f64() - rate).abs() < 1e-9)
    }

    /// Closest enumerated rate, or `None` for non-finite or non-positive input
    pub fn nearest(rate: f64) -> Option<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return None;
        }
        Self::ALL.into_iter().min_by(|a, b| {
            let da = (a.as_f64() - rate).abs();
            let db = (b.as_f64() - rate).abs();
            da.total_cmp(&db)
        })
    }
}

impl fmt::Display for PlaybackRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.as_f64())
    }
}

/// Loop Controller state, orthogonal to play/pause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    #[default]
    NotLooping,
    Looping,
}

impl LoopMode {
    pub fn is_looping(&self) -> bool {
        matches!(self, LoopMode::Looping)
    }

    pub fn toggled(self) -> Self {
        match self {
            LoopMode::NotLooping => LoopMode::Looping,
            LoopMode::Looping => LoopMode::NotLooping,
        }
    }
}

/// Snapshot of the transport, derived from the clock on demand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    /// Current position in seconds, within `[0, duration]`
    pub position: f64,
    /// Known duration, 0 while unknown
    pub duration: f64,
    pub is_playing: bool,
    pub is_looping: bool,
    /// Volume in `[0, 1]`
    pub volume: f32,
    pub rate: PlaybackRate,
}

impl PlaybackState {
    pub fn is_muted(&self) -> bool {
        self.volume <= 0.0
    }

    /// Playhead position as a percentage of the track
    pub fn progress_percent(&self) -> f64 {
        percent_of(self.position, self.duration)
    }
}

/// `t` as a percentage of `duration`; 0 when the duration is unknown
pub fn percent_of(t: f64, duration: f64) -> f64 {
    if duration > 0.0 && t.is_finite() {
        (t / duration * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Format seconds as `m:ss`
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_values() {
        let values: Vec<f64> = PlaybackRate::ALL.iter().map(|r| r.as_f64()).collect();
        assert_eq!(values, vec![0.5, 0.75, 1.0, 1.25, 1.5, 2.0]);
        assert_eq!(PlaybackRate::default(), PlaybackRate::Normal);
    }

    #[test]
    fn test_rate_lookup() {
        assert_eq!(PlaybackRate::from_f64(1.25), Some(PlaybackRate::OneAndQuarter));
        assert_eq!(PlaybackRate::from_f64(1.1), None);

        assert_eq!(PlaybackRate::nearest(1.1), Some(PlaybackRate::Normal));
        assert_eq!(PlaybackRate::nearest(9.0), Some(PlaybackRate::Double));
        assert_eq!(PlaybackRate::nearest(0.01), Some(PlaybackRate::Half));
        assert_eq!(PlaybackRate::nearest(0.0), None);
        assert_eq!(PlaybackRate::nearest(-1.0), None);
        assert_eq!(PlaybackRate::nearest(f64::NAN), None);
    }

    #[test]
    fn test_loop_mode_toggle() {
        let mode = LoopMode::default();
        assert!(!mode.is_looping());
        assert!(mode.toggled().is_looping());
        assert_eq!(mode.toggled().toggled(), mode);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(9.9), "0:09");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(600.4), "10:00");
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(5.0, 0.0), 0.0);
        assert_eq!(percent_of(15.0, 60.0), 25.0);
        assert_eq!(percent_of(90.0, 60.0), 100.0);
    }
}
