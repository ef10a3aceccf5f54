// Segment module
// Start/end bounds of the practice loop and their clamped setters

pub mod model;

pub use model::{Handle, MIN_SEGMENT_WIDTH, Segment, min_width_for};
