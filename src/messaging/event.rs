// Engine events - What observers (render layer) are told

use crate::engine::EngineSnapshot;
use crate::messaging::notification::Notification;
use crate::playback::PlaybackState;
use crate::segment::Segment;

/// Change published by the engine.
///
/// Asset switches, unloads and load failures are published as a single
/// `Reset` carrying the complete new state, so an observer never sees the old
/// segment paired with the new duration.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Playhead moved (tick, seek or loop wrap)
    PositionChanged(f64),
    /// Segment bounds committed
    SegmentChanged(Segment),
    /// Transport state changed (play/pause, loop, volume, rate)
    PlaybackChanged(PlaybackState),
    /// Whole state replaced at once
    Reset(Box<EngineSnapshot>),
    /// Message for the status bar
    Notify(Notification),
}
