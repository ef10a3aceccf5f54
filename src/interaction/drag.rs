// Drag session - Transient state of an in-progress handle drag

use crate::segment::Handle;

/// Active only between pointer press on a handle and pointer release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub handle: Handle,
    /// Pointer coordinate at press time
    pub origin: f32,
}

impl DragSession {
    pub fn new(handle: Handle, origin: f32) -> Self {
        Self { handle, origin }
    }
}
