// Playback Facade - Public transport API over the clock source
// Every operation on a missing or unready asset is a no-op

use crate::library::AudioAsset;
use crate::playback::clock::ClockSource;
use crate::playback::state::{LoopMode, PlaybackRate, PlaybackState};
use crate::segment::Segment;

/// Owns the clock source and the transport settings (volume, rate).
pub struct PlaybackFacade<C: ClockSource> {
    clock: C,
    loaded: bool,
    duration: Option<f64>,
    volume: f32,
    rate: PlaybackRate,
}

impl<C: ClockSource> PlaybackFacade<C> {
    pub fn new(mut clock: C, volume: f32, rate: PlaybackRate) -> Self {
        let volume = sanitize_volume(volume).unwrap_or(1.0);
        clock.set_volume(volume);
        clock.set_rate(rate.as_f64());
        Self {
            clock,
            loaded: false,
            duration: None,
            volume,
            rate,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Hand a new asset to the clock; the duration stays unknown until metadata arrives
    pub fn load(&mut self, asset: &AudioAsset) {
        self.clock.pause();
        self.clock.load(asset);
        self.clock.set_volume(self.volume);
        self.clock.set_rate(self.rate.as_f64());
        self.loaded = true;
        self.duration = None;
    }

    pub fn unload(&mut self) {
        self.clock.unload();
        self.loaded = false;
        self.duration = None;
    }

    /// Record the duration once it is known.
    /// Returns `false` if the asset was already ready (the reset happens once).
    pub fn mark_ready(&mut self, duration: f64) -> bool {
        if !self.loaded || self.duration.is_some() || !duration.is_finite() || duration <= 0.0 {
            return false;
        }
        self.duration = Some(duration);
        true
    }

    /// The asset cannot be played: force paused and forget the duration
    pub fn mark_failed(&mut self) {
        self.clock.pause();
        self.duration = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_ready(&self) -> bool {
        self.loaded && self.duration.is_some()
    }

    /// Known duration, 0 while unknown
    pub fn duration(&self) -> f64 {
        self.duration.unwrap_or(0.0)
    }

    /// Clock position clamped to `[0, duration]`
    pub fn position(&self) -> f64 {
        match self.duration {
            Some(duration) if self.loaded => self.clock.position().clamp(0.0, duration),
            _ => 0.0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_ready() && self.clock.is_playing()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn rate(&self) -> PlaybackRate {
        self.rate
    }

    /// Flip play/pause
    pub fn toggle_play(&mut self) {
        if !self.is_ready() {
            return;
        }
        if self.clock.is_playing() {
            self.clock.pause();
        } else {
            self.clock.play();
        }
    }

    pub fn play(&mut self) {
        if self.is_ready() {
            self.clock.play();
        }
    }

    pub fn pause(&mut self) {
        if self.loaded {
            self.clock.pause();
        }
    }

    /// Pause and return to the top of the segment (not the top of the track)
    pub fn stop(&mut self, segment: &Segment) {
        if !self.is_ready() {
            return;
        }
        self.clock.pause();
        self.clock.seek(segment.start().clamp(0.0, self.duration()));
    }

    /// Seek to `t` clamped to `[0, duration]`; returns the applied position
    pub fn seek(&mut self, t: f64) -> Option<f64> {
        if !self.is_ready() || t.is_nan() {
            return None;
        }
        let target = t.clamp(0.0, self.duration());
        self.clock.seek(target);
        Some(target)
    }

    /// Set the volume, clamped to `[0, 1]`; NaN is ignored
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        if let Some(volume) = sanitize_volume(volume) {
            self.volume = volume;
            self.clock.set_volume(volume);
        }
        self.volume
    }

    /// Mute when audible, otherwise restore full volume
    pub fn toggle_mute(&mut self) -> f32 {
        let target = if self.volume > 0.0 { 0.0 } else { 1.0 };
        self.set_volume(target)
    }

    pub fn set_rate(&mut self, rate: PlaybackRate) {
        self.rate = rate;
        self.clock.set_rate(rate.as_f64());
    }

    /// Set the rate from an arbitrary number, snapped to the enumerated set
    pub fn set_rate_value(&mut self, rate: f64) -> PlaybackRate {
        if let Some(rate) = PlaybackRate::nearest(rate) {
            self.set_rate(rate);
        }
        self.rate
    }

    pub fn state(&self, loop_mode: LoopMode) -> PlaybackState {
        PlaybackState {
            position: self.position(),
            duration: self.duration(),
            is_playing: self.is_playing(),
            is_looping: loop_mode.is_looping(),
            volume: self.volume,
            rate: self.rate,
        }
    }
}

fn sanitize_volume(volume: f32) -> Option<f32> {
    if volume.is_nan() {
        None
    } else {
        Some(volume.clamp(0.0, 1.0))
    }
}
