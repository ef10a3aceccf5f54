// Engine module
// Segment-loop playback engine and its state snapshots

pub mod loop_engine;
pub mod snapshot;

pub use loop_engine::LoopEngine;
pub use snapshot::EngineSnapshot;
