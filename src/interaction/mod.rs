// Interaction module
// Pointer-driven segment editing: geometry, drag sessions, click-to-seek

pub mod drag;
pub mod geometry;
pub mod surface;

pub use drag::DragSession;
pub use geometry::TimelineGeometry;
pub use surface::{
    InteractionSurface, can_set_end_from, can_set_start_from, end_from_position,
    parse_time_entry, start_from_position,
};
