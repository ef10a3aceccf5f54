// Loop Controller - Boundary watching over the clock's position stream
// Decides when playback must jump back to the segment start

use crate::playback::state::LoopMode;
use crate::segment::Segment;

/// What to do when the media ends on its own
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndAction {
    /// Seek to `to` and resume playing
    Restart { to: f64 },
    /// Stay paused at the end of the media
    Stop,
}

/// `{NotLooping, Looping}` state machine.
///
/// The controller never touches the clock: it inspects positions and returns
/// the seek the owner must issue. After requesting a wrap it treats further
/// ticks at or past the boundary as stale until the clock confirms the jump
/// (a `Seeked` baseline or a tick back inside the segment), so one crossing
/// yields exactly one seek.
#[derive(Debug, Default)]
pub struct LoopController {
    mode: LoopMode,
    awaiting_seek: bool,
    wrap_count: u64,
}

impl LoopController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> LoopMode {
        self.mode
    }

    pub fn is_looping(&self) -> bool {
        self.mode.is_looping()
    }

    /// Number of boundary wraps performed since creation
    pub fn wrap_count(&self) -> u64 {
        self.wrap_count
    }

    /// A wrap was requested and the clock has not confirmed it yet
    pub fn is_awaiting_seek(&self) -> bool {
        self.awaiting_seek
    }

    /// Flip looping on/off; no effect on position
    pub fn toggle(&mut self) -> LoopMode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.set_mode(if looping {
            LoopMode::Looping
        } else {
            LoopMode::NotLooping
        });
    }

    fn set_mode(&mut self, mode: LoopMode) {
        if self.mode != mode {
            log::debug!("Loop mode: {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
        self.awaiting_seek = false;
    }

    /// Back to `NotLooping` with no pending wrap
    pub fn reset(&mut self) {
        self.set_mode(LoopMode::NotLooping);
    }

    /// Inspect a position tick. Returns the seek target when the tick crosses
    /// the segment end while looping and playing.
    pub fn on_tick(
        &mut self,
        position: f64,
        is_playing: bool,
        segment: &Segment,
        duration: f64,
    ) -> Option<f64> {
        if !self.mode.is_looping() || !is_playing || !segment.is_loopable(duration) {
            return None;
        }

        // Ticks rarely land exactly on the boundary
        if position < segment.end() {
            self.awaiting_seek = false;
            return None;
        }

        if self.awaiting_seek {
            log::trace!("Ignoring stale tick at {:.3}s, wrap already requested", position);
            return None;
        }

        self.awaiting_seek = true;
        self.wrap_count += 1;
        log::debug!(
            "Loop boundary crossed at {:.3}s, wrapping to {:.3}s",
            position,
            segment.start()
        );
        Some(segment.start())
    }

    /// A seek landed; the new position is a baseline, never a crossing
    pub fn on_seeked(&mut self, _position: f64) {
        self.awaiting_seek = false;
    }

    /// Natural end-of-media
    pub fn on_ended(&mut self, segment: &Segment, duration: f64) -> EndAction {
        self.awaiting_seek = false;
        if self.mode.is_looping() && segment.is_loopable(duration) {
            self.wrap_count += 1;
            log::debug!("Media ended while looping, restarting at {:.3}s", segment.start());
            EndAction::Restart {
                to: segment.start(),
            }
        } else {
            EndAction::Stop
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment() -> Segment {
        Segment::reset(30.0).set_start(10.0, 30.0).set_end(20.0, 30.0)
    }

    fn looping() -> LoopController {
        let mut controller = LoopController::new();
        controller.toggle();
        controller
    }

    #[test]
    fn test_boundary_reached_exactly() {
        let mut controller = looping();
        assert_eq!(controller.on_tick(20.0, true, &segment(), 30.0), Some(10.0));
    }

    #[test]
    fn test_boundary_overshoot() {
        let mut controller = looping();
        assert_eq!(controller.on_tick(20.3, true, &segment(), 30.0), Some(10.0));
    }

    #[test]
    fn test_before_boundary_does_not_wrap() {
        let mut controller = looping();
        assert_eq!(controller.on_tick(19.9, true, &segment(), 30.0), None);
        assert_eq!(controller.wrap_count(), 0);
    }

    #[test]
    fn test_not_looping_never_wraps() {
        let mut controller = LoopController::new();
        assert_eq!(controller.on_tick(25.0, true, &segment(), 30.0), None);
    }

    #[test]
    fn test_paused_never_wraps() {
        let mut controller = looping();
        assert_eq!(controller.on_tick(25.0, false, &segment(), 30.0), None);
    }

    #[test]
    fn test_uninitialized_segment_never_wraps() {
        let mut controller = looping();
        assert_eq!(controller.on_tick(5.0, true, &Segment::ZERO, 0.0), None);
    }

    #[test]
    fn test_stale_ticks_after_wrap_are_ignored() {
        let mut controller = looping();
        let seg = segment();

        assert_eq!(controller.on_tick(20.1, true, &seg, 30.0), Some(10.0));
        assert_eq!(controller.on_tick(20.2, true, &seg, 30.0), None);
        assert!(controller.is_awaiting_seek());

        controller.on_seeked(10.0);
        assert!(!controller.is_awaiting_seek());
        assert_eq!(controller.on_tick(10.25, true, &seg, 30.0), None);
        assert_eq!(controller.on_tick(20.05, true, &seg, 30.0), Some(10.0));
        assert_eq!(controller.wrap_count(), 2);
    }

    #[test]
    fn test_tick_inside_segment_rearms_without_seeked() {
        let mut controller = looping();
        let seg = segment();

        assert_eq!(controller.on_tick(20.0, true, &seg, 30.0), Some(10.0));
        assert_eq!(controller.on_tick(10.1, true, &seg, 30.0), None);
        assert_eq!(controller.on_tick(20.0, true, &seg, 30.0), Some(10.0));
    }

    #[test]
    fn test_ended_while_looping_restarts() {
        let mut controller = looping();
        let seg = Segment::reset(20.0).set_start(10.0, 20.0);
        assert_eq!(controller.on_ended(&seg, 20.0), EndAction::Restart { to: 10.0 });
    }

    #[test]
    fn test_ended_without_looping_stops() {
        let mut controller = LoopController::new();
        let seg = Segment::reset(20.0).set_start(10.0, 20.0);
        assert_eq!(controller.on_ended(&seg, 20.0), EndAction::Stop);
    }

    #[test]
    fn test_toggle_has_no_retroactive_wrap() {
        let mut controller = LoopController::new();
        let seg = segment();
        assert_eq!(controller.on_tick(25.0, true, &seg, 30.0), None);

        controller.toggle();
        assert!(controller.is_looping());
        // The next tick is the first one checked
        assert_eq!(controller.on_tick(25.5, true, &seg, 30.0), Some(10.0));
    }

    #[test]
    fn test_reset_disarms() {
        let mut controller = looping();
        controller.reset();
        assert_eq!(controller.mode(), LoopMode::NotLooping);
    }
}
