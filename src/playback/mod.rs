// Playback module
// Clock source contract, loop boundary watching and the transport facade

pub mod clock;
pub mod facade;
pub mod loop_controller;
pub mod state;

pub use clock::{ClockEvent, ClockSource, SimulatedClock};
pub use facade::PlaybackFacade;
pub use loop_controller::{EndAction, LoopController};
pub use state::{LoopMode, PlaybackRate, PlaybackState, format_time, percent_of};
