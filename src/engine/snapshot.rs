// Engine snapshot - Immutable view of the whole engine state for renderers

use crate::interaction::{can_set_end_from, can_set_start_from};
use crate::library::AudioAsset;
use crate::playback::PlaybackState;
use crate::segment::{Handle, Segment};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSnapshot {
    pub asset: Option<AudioAsset>,
    pub segment: Segment,
    pub playback: PlaybackState,
    /// Handle being dragged, if any
    pub dragging: Option<Handle>,
    /// Load failure message shown to the user
    pub status: Option<String>,
}

impl EngineSnapshot {
    /// Metadata is known and transport controls can act
    pub fn is_ready(&self) -> bool {
        self.asset.is_some() && self.playback.duration > 0.0
    }

    pub fn can_set_start_from_position(&self) -> bool {
        self.is_ready() && can_set_start_from(self.playback.position, &self.segment)
    }

    pub fn can_set_end_from_position(&self) -> bool {
        self.is_ready() && can_set_end_from(self.playback.position, &self.segment)
    }

    pub fn can_cue_segment(&self) -> bool {
        self.is_ready() && self.segment.end() > self.segment.start()
    }
}
