// Clock Source - Media playback primitive driving the engine
// Owns the true playback position; the engine only observes it through events

use crate::library::AudioAsset;
use std::collections::VecDeque;
use std::time::Duration;

/// Event emitted by a clock source.
///
/// Implementations running callbacks on another thread (decoder, device)
/// must queue their events and hand them over through
/// [`ClockSource::drain_events`] on the logic thread.
#[derive(Debug, Clone, PartialEq)]
pub enum ClockEvent {
    /// Regular position update while playing
    Tick { position: f64 },
    /// Position jumped because of a seek; a new baseline, not a boundary crossing
    Seeked { position: f64 },
    /// Duration became known for the loaded media
    MetadataReady { duration: f64 },
    /// Playback reached the end of the media on its own
    Ended,
    /// The media cannot be decoded or played
    LoadFailed { reason: String },
}

/// Black-box playback primitive (position, duration, transport, volume, rate)
pub trait ClockSource {
    /// Start loading a new asset, replacing any previous one.
    /// Readiness is reported later through `MetadataReady` or `LoadFailed`.
    fn load(&mut self, asset: &AudioAsset);

    /// Drop the current asset and stop producing events
    fn unload(&mut self);

    fn position(&self) -> f64;

    /// Total duration, `None` until metadata is available
    fn duration(&self) -> Option<f64>;

    fn is_playing(&self) -> bool;

    fn play(&mut self);

    fn pause(&mut self);

    fn seek(&mut self, position: f64);

    fn set_volume(&mut self, volume: f32);

    fn set_rate(&mut self, rate: f64);

    /// Take all events queued since the last call, in emission order
    fn drain_events(&mut self) -> Vec<ClockEvent>;
}

/// Virtual clock that advances by wall time multiplied by the playback rate.
///
/// Produces the same event timing as a media element: ticks while playing,
/// `Seeked` after every seek, `Ended` (and an implicit pause) at the end of
/// the media. Duration comes from the asset's metadata hint; an asset without
/// one fails to load.
#[derive(Debug)]
pub struct SimulatedClock {
    position: f64,
    duration: Option<f64>,
    playing: bool,
    loaded: bool,
    volume: f32,
    rate: f64,
    pending: VecDeque<ClockEvent>,
}

impl SimulatedClock {
    pub fn new() -> Self {
        Self {
            position: 0.0,
            duration: None,
            playing: false,
            loaded: false,
            volume: 1.0,
            rate: 1.0,
            pending: VecDeque::new(),
        }
    }

    /// Advance the clock by `elapsed` wall time
    pub fn advance(&mut self, elapsed: Duration) {
        self.advance_seconds(elapsed.as_secs_f64());
    }

    /// Advance the clock by `seconds` of wall time
    pub fn advance_seconds(&mut self, seconds: f64) {
        let Some(duration) = self.duration else {
            return;
        };
        if !self.playing || seconds <= 0.0 {
            return;
        }

        self.position += seconds * self.rate;
        if self.position >= duration {
            self.position = duration;
            self.playing = false;
            self.pending.push_back(ClockEvent::Tick {
                position: duration,
            });
            self.pending.push_back(ClockEvent::Ended);
        } else {
            self.pending.push_back(ClockEvent::Tick {
                position: self.position,
            });
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Report a decode failure for the current asset, as a real backend would
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.playing = false;
        self.duration = None;
        self.pending.push_back(ClockEvent::LoadFailed {
            reason: reason.into(),
        });
    }
}

impl Default for SimulatedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for SimulatedClock {
    fn load(&mut self, asset: &AudioAsset) {
        self.pending.clear();
        self.position = 0.0;
        self.playing = false;
        self.loaded = true;
        match asset.duration_hint.filter(|d| d.is_finite() && *d > 0.0) {
            Some(duration) => {
                self.duration = Some(duration);
                self.pending
                    .push_back(ClockEvent::MetadataReady { duration });
            }
            None => {
                self.duration = None;
                self.pending.push_back(ClockEvent::LoadFailed {
                    reason: format!("no playable audio stream in '{}'", asset.original_name),
                });
            }
        }
    }

    fn unload(&mut self) {
        self.pending.clear();
        self.position = 0.0;
        self.duration = None;
        self.playing = false;
        self.loaded = false;
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self) {
        if self.duration.is_some() {
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, position: f64) {
        let Some(duration) = self.duration else {
            return;
        };
        self.position = position.clamp(0.0, duration);
        self.pending.push_back(ClockEvent::Seeked {
            position: self.position,
        });
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    fn drain_events(&mut self) -> Vec<ClockEvent> {
        self.pending.drain(..).collect()
    }
}
