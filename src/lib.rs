// MusicLoop - Segment-loop practice player
// Library exports for the desktop app and tests

pub mod config;
pub mod engine;
pub mod interaction;
pub mod library;
pub mod messaging;
pub mod playback;
pub mod segment;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::{AppConfig, ConfigError};
pub use engine::{EngineSnapshot, LoopEngine};
pub use interaction::{InteractionSurface, TimelineGeometry};
pub use library::{AssetId, AssetLibrary, AudioAsset, DirectoryLibrary, LibraryError};
pub use messaging::{EngineEvent, EventConsumer, Notification};
pub use playback::{
    ClockEvent, ClockSource, LoopController, LoopMode, PlaybackFacade, PlaybackRate,
    PlaybackState, SimulatedClock,
};
pub use segment::{Handle, MIN_SEGMENT_WIDTH, Segment};
