// Loop engine - Owns the segment and composes clock, loop controller,
// interaction surface and transport facade
//
// Clock events flow in through `handle_clock_event`/`pump`; pointer and
// transport operations come from the host. Every state change is published
// to subscribers as an `EngineEvent`.

use crate::config::AppConfig;
use crate::engine::snapshot::EngineSnapshot;
use crate::interaction::{
    InteractionSurface, TimelineGeometry, end_from_position, parse_time_entry,
    start_from_position,
};
use crate::library::{AssetId, AudioAsset};
use crate::messaging::{
    EngineEvent, EventBus, EventConsumer, Notification, NotificationCategory,
};
use crate::playback::{
    ClockEvent, ClockSource, EndAction, LoopController, PlaybackFacade, PlaybackRate,
    PlaybackState,
};
use crate::segment::{Handle, Segment};

// A seek issued while handling an event queues at most one follow-up event;
// more rounds than this means the clock keeps producing events on its own.
const MAX_PUMP_ROUNDS: usize = 16;

pub struct LoopEngine<C: ClockSource> {
    playback: PlaybackFacade<C>,
    segment: Segment,
    looper: LoopController,
    surface: InteractionSurface,
    asset: Option<AudioAsset>,
    status: Option<String>,
    bus: EventBus,
}

impl<C: ClockSource> LoopEngine<C> {
    pub fn new(clock: C, volume: f32, rate: PlaybackRate) -> Self {
        Self {
            playback: PlaybackFacade::new(clock, volume, rate),
            segment: Segment::ZERO,
            looper: LoopController::new(),
            surface: InteractionSurface::new(),
            asset: None,
            status: None,
            bus: EventBus::new(),
        }
    }

    pub fn from_config(clock: C, config: &AppConfig) -> Self {
        Self::new(clock, config.default_volume, config.default_rate)
    }

    /// Register an observer with its own event buffer
    pub fn subscribe(&mut self, capacity: usize) -> EventConsumer {
        self.bus.subscribe(capacity)
    }

    pub fn clock(&self) -> &C {
        self.playback.clock()
    }

    pub fn clock_mut(&mut self) -> &mut C {
        self.playback.clock_mut()
    }

    // === State ===

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            asset: self.asset.clone(),
            segment: self.segment,
            playback: self.playback_state(),
            dragging: self.surface.active_handle(),
            status: self.status.clone(),
        }
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state(self.looper.mode())
    }

    pub fn segment(&self) -> Segment {
        self.segment
    }

    pub fn asset(&self) -> Option<&AudioAsset> {
        self.asset.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn position(&self) -> f64 {
        self.playback.position()
    }

    pub fn duration(&self) -> f64 {
        self.playback.duration()
    }

    pub fn is_ready(&self) -> bool {
        self.asset.is_some() && self.playback.is_ready()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn is_looping(&self) -> bool {
        self.looper.is_looping()
    }

    pub fn is_dragging(&self) -> bool {
        self.surface.is_dragging()
    }

    /// Handle of the open drag session
    pub fn active_handle(&self) -> Option<Handle> {
        self.surface.active_handle()
    }

    pub fn loop_count(&self) -> u64 {
        self.looper.wrap_count()
    }

    // === Assets ===

    /// Switch to a new asset. Segment, drag and transport are reset together
    /// and published as one `Reset`; the segment spans the track once
    /// metadata arrives.
    pub fn load_asset(&mut self, asset: AudioAsset) {
        log::info!("Loading '{}' ({})", asset.original_name, asset.url);
        self.surface.cancel();
        self.looper.reset();
        self.segment = Segment::ZERO;
        self.status = None;
        self.playback.load(&asset);
        self.asset = Some(asset);
        self.publish_reset();
    }

    /// Drop the current asset and return to the idle state
    pub fn unload(&mut self) {
        if let Some(asset) = self.asset.take() {
            log::info!("Unloading '{}'", asset.original_name);
        }
        self.surface.cancel();
        self.looper.reset();
        self.segment = Segment::ZERO;
        self.status = None;
        self.playback.unload();
        self.publish_reset();
    }

    /// The library deleted `id`; unload it if it is the current asset
    pub fn on_asset_deleted(&mut self, id: &AssetId) -> bool {
        let is_current = self.asset.as_ref().is_some_and(|a| &a.id == id);
        if is_current {
            self.unload();
        }
        is_current
    }

    // === Clock events ===

    /// Dispatch every event the clock has queued, including the ones caused
    /// by seeks issued while handling them. Returns the number handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        for _ in 0..MAX_PUMP_ROUNDS {
            let events = self.playback.clock_mut().drain_events();
            if events.is_empty() {
                return handled;
            }
            for event in events {
                self.handle_clock_event(event);
                handled += 1;
            }
        }
        log::warn!("Clock still producing events after {} rounds", MAX_PUMP_ROUNDS);
        handled
    }

    pub fn handle_clock_event(&mut self, event: ClockEvent) {
        if !self.playback.is_loaded() {
            log::trace!("Dropping {:?}, nothing loaded", event);
            return;
        }

        match event {
            ClockEvent::Tick { position } => self.on_tick(position),
            ClockEvent::Seeked { position } => {
                self.looper.on_seeked(position);
                let position = self.clamp_to_track(position);
                self.bus.publish(EngineEvent::PositionChanged(position));
            }
            ClockEvent::MetadataReady { duration } => self.on_metadata(duration),
            ClockEvent::Ended => self.on_ended(),
            ClockEvent::LoadFailed { reason } => self.on_load_failed(&reason),
        }
    }

    fn on_tick(&mut self, position: f64) {
        if !self.playback.is_ready() {
            return;
        }
        let duration = self.playback.duration();
        if let Some(target) =
            self.looper
                .on_tick(position, self.playback.is_playing(), &self.segment, duration)
        {
            // The resulting Seeked event is a baseline; it is not checked again
            // and carries the position observers see next
            self.playback.seek(target);
            return;
        }
        if self.looper.is_awaiting_seek() {
            return;
        }

        let clamped = self.clamp_to_track(position);
        self.bus.publish(EngineEvent::PositionChanged(clamped));
    }

    fn on_metadata(&mut self, duration: f64) {
        if !self.playback.mark_ready(duration) {
            log::debug!("Ignoring repeated metadata ({:.3}s)", duration);
            return;
        }
        log::info!("Track duration {:.3}s", duration);
        self.segment = Segment::reset(duration);
        self.publish_reset();
    }

    fn on_ended(&mut self) {
        let duration = self.playback.duration();
        match self.looper.on_ended(&self.segment, duration) {
            EndAction::Restart { to } => {
                self.playback.seek(to);
                self.playback.play();
            }
            EndAction::Stop => {
                self.playback.pause();
                log::debug!("Reached end of track");
            }
        }
        self.publish_playback();
    }

    fn on_load_failed(&mut self, reason: &str) {
        let name = self
            .asset
            .as_ref()
            .map(|a| a.original_name.clone())
            .unwrap_or_default();
        let message = format!("Cannot play '{}': {}", name, reason);
        log::error!("{}", message);

        self.playback.mark_failed();
        self.looper.reset();
        self.surface.cancel();
        self.segment = Segment::ZERO;
        self.status = Some(message.clone());
        self.publish_reset();
        self.bus.publish(EngineEvent::Notify(Notification::error(
            NotificationCategory::Asset,
            message,
        )));
    }

    // === Transport ===

    pub fn toggle_play(&mut self) {
        self.playback.toggle_play();
        self.publish_playback();
    }

    pub fn play(&mut self) {
        self.playback.play();
        self.publish_playback();
    }

    pub fn pause(&mut self) {
        self.playback.pause();
        self.publish_playback();
    }

    /// Pause and return to the segment start
    pub fn stop(&mut self) {
        self.playback.stop(&self.segment);
        self.publish_playback();
    }

    /// Seek within `[0, duration]`; no-op until the track is ready
    pub fn seek(&mut self, t: f64) -> Option<f64> {
        let applied = self.playback.seek(t)?;
        log::debug!("Seek to {:.3}s", applied);
        self.publish_playback();
        Some(applied)
    }

    pub fn set_volume(&mut self, volume: f32) -> f32 {
        let applied = self.playback.set_volume(volume);
        self.publish_playback();
        applied
    }

    pub fn toggle_mute(&mut self) -> f32 {
        let applied = self.playback.toggle_mute();
        self.publish_playback();
        applied
    }

    /// Volume from a click on a horizontal volume bar
    pub fn set_volume_fraction(&mut self, pointer_x: f32, geometry: &TimelineGeometry) -> f32 {
        self.set_volume(geometry.fraction_at(pointer_x) as f32)
    }

    pub fn set_rate(&mut self, rate: PlaybackRate) {
        self.playback.set_rate(rate);
        self.publish_playback();
    }

    pub fn set_rate_value(&mut self, rate: f64) -> PlaybackRate {
        let applied = self.playback.set_rate_value(rate);
        self.publish_playback();
        applied
    }

    // === Looping ===

    /// Arm or disarm looping; takes effect from the next tick
    pub fn toggle_loop(&mut self) -> bool {
        self.looper.toggle();
        self.publish_playback();
        self.looper.is_looping()
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looper.set_looping(looping);
        self.publish_playback();
    }

    // === Segment editing ===

    /// Press on a segment handle. Rejected while another drag is open or
    /// before the track is ready.
    pub fn begin_drag(&mut self, handle: Handle, pointer_x: f32) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.surface.begin_drag(handle, pointer_x)
    }

    /// Pointer moved during a drag. Never seeks the clock.
    pub fn update_drag(&mut self, pointer_x: f32, geometry: &TimelineGeometry) -> Option<Segment> {
        let updated =
            self.surface
                .update_drag(pointer_x, geometry, &self.segment, self.playback.duration())?;
        self.commit_segment(updated);
        Some(self.segment)
    }

    /// Pointer released; idempotent
    pub fn end_drag(&mut self) -> bool {
        self.surface.end_drag().is_some()
    }

    /// Click on the timeline; ignored while dragging
    pub fn click_seek(&mut self, pointer_x: f32, geometry: &TimelineGeometry) -> Option<f64> {
        let target = self
            .surface
            .click_seek(pointer_x, geometry, self.playback.duration())?;
        self.seek(target)
    }

    pub fn can_set_start_from_current_position(&self) -> bool {
        self.snapshot().can_set_start_from_position()
    }

    pub fn can_set_end_from_current_position(&self) -> bool {
        self.snapshot().can_set_end_from_position()
    }

    /// Move the start bound to the live position
    pub fn set_start_from_current_position(&mut self) -> Option<Segment> {
        if !self.is_ready() {
            return None;
        }
        let updated =
            start_from_position(self.position(), &self.segment, self.playback.duration())?;
        self.commit_segment(updated);
        Some(self.segment)
    }

    /// Move the end bound to the live position
    pub fn set_end_from_current_position(&mut self) -> Option<Segment> {
        if !self.is_ready() {
            return None;
        }
        let updated = end_from_position(self.position(), &self.segment, self.playback.duration())?;
        self.commit_segment(updated);
        Some(self.segment)
    }

    pub fn set_segment_start(&mut self, t: f64) -> Segment {
        if self.is_ready() {
            let updated = self.segment.set_start(t, self.playback.duration());
            self.commit_segment(updated);
        }
        self.segment
    }

    pub fn set_segment_end(&mut self, t: f64) -> Segment {
        if self.is_ready() {
            let updated = self.segment.set_end(t, self.playback.duration());
            self.commit_segment(updated);
        }
        self.segment
    }

    /// Numeric entry for the start bound; malformed text means 0
    pub fn set_start_text(&mut self, text: &str) -> Segment {
        self.set_segment_start(parse_time_entry(text, 0.0))
    }

    /// Numeric entry for the end bound; malformed text means the track end
    pub fn set_end_text(&mut self, text: &str) -> Segment {
        let duration = self.playback.duration();
        self.set_segment_end(parse_time_entry(text, duration))
    }

    /// Segment back to the whole track
    pub fn reset_segment(&mut self) -> Segment {
        if self.is_ready() {
            self.commit_segment(Segment::reset(self.playback.duration()));
        }
        self.segment
    }

    /// Jump to the segment start
    pub fn cue_segment(&mut self) -> Option<f64> {
        if self.segment.end() <= self.segment.start() {
            return None;
        }
        self.seek(self.segment.start())
    }

    // === Internals ===

    fn commit_segment(&mut self, segment: Segment) {
        if segment != self.segment {
            self.segment = segment;
            log::trace!("Segment {}", segment);
            self.bus.publish(EngineEvent::SegmentChanged(segment));
        }
    }

    fn clamp_to_track(&self, position: f64) -> f64 {
        position.clamp(0.0, self.playback.duration())
    }

    fn publish_playback(&mut self) {
        let state = self.playback_state();
        self.bus.publish(EngineEvent::PlaybackChanged(state));
    }

    fn publish_reset(&mut self) {
        let snapshot = self.snapshot();
        self.bus.publish(EngineEvent::Reset(Box::new(snapshot)));
    }
}
