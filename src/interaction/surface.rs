// Interaction Surface - Pointer input to segment edits and seeks
// Handle drags only edit the segment; only timeline clicks (and the
// "from current position" actions) move the playhead.

use crate::interaction::drag::DragSession;
use crate::interaction::geometry::TimelineGeometry;
use crate::segment::{Handle, Segment};

/// Owns the drag session; at most one is open at a time
#[derive(Debug, Default)]
pub struct InteractionSurface {
    session: Option<DragSession>,
}

impl InteractionSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn active_handle(&self) -> Option<Handle> {
        self.session.map(|s| s.handle)
    }

    /// Open a drag on `handle`. Rejected (returns `false`) while another drag is open.
    pub fn begin_drag(&mut self, handle: Handle, pointer_x: f32) -> bool {
        if let Some(active) = &self.session {
            log::debug!(
                "Ignoring drag on {} handle, {} handle drag already active",
                handle,
                active.handle
            );
            return false;
        }
        self.session = Some(DragSession::new(handle, pointer_x));
        true
    }

    /// Move the dragged handle to the time under `pointer_x`.
    ///
    /// Clamps against `segment`, which must be the latest committed segment.
    /// Returns the new segment, or `None` when no drag is open.
    pub fn update_drag(
        &self,
        pointer_x: f32,
        geometry: &TimelineGeometry,
        segment: &Segment,
        duration: f64,
    ) -> Option<Segment> {
        let session = self.session?;
        let t = geometry.time_at(pointer_x, duration);
        Some(segment.set_bound(session.handle, t, duration))
    }

    /// Close the drag session; idempotent
    pub fn end_drag(&mut self) -> Option<DragSession> {
        self.session.take()
    }

    /// Drop any open drag without committing further edits
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!("Cancelled {} handle drag", session.handle);
        }
    }

    /// Seek target for a click on the timeline.
    /// Ignored while a drag is open, or while the duration is unknown.
    pub fn click_seek(
        &self,
        pointer_x: f32,
        geometry: &TimelineGeometry,
        duration: f64,
    ) -> Option<f64> {
        if self.session.is_some() || duration <= 0.0 {
            return None;
        }
        Some(geometry.time_at(pointer_x, duration).clamp(0.0, duration))
    }
}

/// Whether the live position can become the new start (`position < end`)
pub fn can_set_start_from(position: f64, segment: &Segment) -> bool {
    position < segment.end()
}

/// Whether the live position can become the new end (`position > start`)
pub fn can_set_end_from(position: f64, segment: &Segment) -> bool {
    position > segment.start()
}

/// New segment with the start moved to `position`, or `None` when disabled
pub fn start_from_position(position: f64, segment: &Segment, duration: f64) -> Option<Segment> {
    can_set_start_from(position, segment).then(|| segment.set_start(position, duration))
}

/// New segment with the end moved to `position`, or `None` when disabled
pub fn end_from_position(position: f64, segment: &Segment, duration: f64) -> Option<Segment> {
    can_set_end_from(position, segment).then(|| segment.set_end(position, duration))
}

/// Parse a numeric time entry, using `fallback` for malformed text
pub fn parse_time_entry(text: &str, fallback: f64) -> f64 {
    let text = text.trim();
    // Longest numeric prefix wins, so "12s" reads as 12
    (1..=text.len())
        .rev()
        .filter(|&end| text.is_char_boundary(end))
        .find_map(|end| text[..end].parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(fallback)
}
