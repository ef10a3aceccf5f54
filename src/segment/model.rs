// Segment - Start/end window within a track
// Every mutation returns a new, valid segment; out-of-range input is clamped, never rejected

use std::fmt;

/// Minimum width of a segment in seconds.
pub const MIN_SEGMENT_WIDTH: f64 = 1.0;

/// Which bound of a segment a handle controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Start,
    End,
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handle::Start => write!(f, "start"),
            Handle::End => write!(f, "end"),
        }
    }
}

/// User-selected `[start, end]` window, in seconds.
///
/// A segment built through [`Segment::reset`], [`Segment::set_start`] and
/// [`Segment::set_end`] always satisfies `0 <= start < end <= duration` once
/// the duration is known. The zero segment `{0, 0}` stands for "no media".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Segment {
    start: f64,
    end: f64,
}

impl Segment {
    /// The uninitialized segment, used while no media is loaded
    pub const ZERO: Segment = Segment {
        start: 0.0,
        end: 0.0,
    };

    /// Segment covering the whole track
    pub fn reset(duration: f64) -> Self {
        Self {
            start: 0.0,
            end: sanitize_duration(duration),
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Move the start bound to `t`, keeping it at least one minimum width before `end`
    pub fn set_start(self, t: f64, duration: f64) -> Self {
        if t.is_nan() {
            return self;
        }
        let width = min_width_for(duration);
        let upper = (self.end - width).max(0.0);
        Self {
            start: t.min(upper).max(0.0),
            end: self.end,
        }
    }

    /// Move the end bound to `t`, keeping it at least one minimum width after `start`
    pub fn set_end(self, t: f64, duration: f64) -> Self {
        if t.is_nan() {
            return self;
        }
        let duration = sanitize_duration(duration);
        let width = min_width_for(duration);
        let lower = (self.start + width).min(duration);
        Self {
            start: self.start,
            end: t.max(lower).min(duration),
        }
    }

    /// Apply `t` to whichever bound `handle` controls
    pub fn set_bound(self, handle: Handle, t: f64, duration: f64) -> Self {
        match handle {
            Handle::Start => self.set_start(t, duration),
            Handle::End => self.set_end(t, duration),
        }
    }

    pub fn bound(&self, handle: Handle) -> f64 {
        match handle {
            Handle::Start => self.start,
            Handle::End => self.end,
        }
    }

    /// Width in seconds (`end - start`)
    pub fn width_seconds(&self) -> f64 {
        self.end - self.start
    }

    /// True for the `{0, 0}` state (nothing loaded, or metadata pending)
    pub fn is_uninitialized(&self) -> bool {
        self.end <= 0.0
    }

    /// Whether this segment can drive looping for a track of `duration` seconds
    pub fn is_loopable(&self, duration: f64) -> bool {
        duration > 0.0 && self.end > self.start
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.2}s, {:.2}s]", self.start, self.end)
    }
}

/// Minimum width actually enforced for a track of `duration` seconds.
/// Tracks shorter than [`MIN_SEGMENT_WIDTH`] can only be looped as a whole.
pub fn min_width_for(duration: f64) -> f64 {
    MIN_SEGMENT_WIDTH.min(sanitize_duration(duration))
}

fn sanitize_duration(duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_covers_track() {
        let seg = Segment::reset(30.0);
        assert_eq!(seg.start(), 0.0);
        assert_eq!(seg.end(), 30.0);
        assert_eq!(seg.width_seconds(), 30.0);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let once = Segment::reset(42.5);
        let twice = Segment::reset(once.end());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_reset_with_unknown_duration() {
        assert_eq!(Segment::reset(0.0), Segment::ZERO);
        assert_eq!(Segment::reset(f64::NAN), Segment::ZERO);
        assert_eq!(Segment::reset(-3.0), Segment::ZERO);
        assert!(Segment::ZERO.is_uninitialized());
        assert!(!Segment::ZERO.is_loopable(0.0));
    }

    #[test]
    fn test_set_start_within_range() {
        let seg = Segment::reset(30.0).set_start(12.0, 30.0);
        assert_eq!(seg.start(), 12.0);
        assert_eq!(seg.end(), 30.0);
    }

    #[test]
    fn test_set_start_past_end_snaps_to_min_width() {
        let seg = Segment::reset(30.0).set_end(20.0, 30.0).set_start(25.0, 30.0);
        assert_eq!(seg.start(), 19.0);
        assert_eq!(seg.end(), 20.0);
    }

    #[test]
    fn test_set_start_negative_clamps_to_zero() {
        let seg = Segment::reset(30.0).set_start(-5.0, 30.0);
        assert_eq!(seg.start(), 0.0);
    }

    #[test]
    fn test_set_end_before_start_snaps_to_min_width() {
        let seg = Segment::reset(30.0).set_start(10.0, 30.0).set_end(3.0, 30.0);
        assert_eq!(seg.start(), 10.0);
        assert_eq!(seg.end(), 11.0);
    }

    #[test]
    fn test_set_end_beyond_duration_clamps() {
        let seg = Segment::reset(30.0).set_end(99.0, 30.0);
        assert_eq!(seg.end(), 30.0);
    }

    #[test]
    fn test_nan_input_leaves_segment_untouched() {
        let seg = Segment::reset(30.0).set_start(5.0, 30.0);
        assert_eq!(seg.set_start(f64::NAN, 30.0), seg);
        assert_eq!(seg.set_end(f64::NAN, 30.0), seg);
    }

    #[test]
    fn test_infinite_input_clamps() {
        let seg = Segment::reset(30.0);
        assert_eq!(seg.set_end(f64::INFINITY, 30.0).end(), 30.0);
        assert_eq!(seg.set_start(f64::NEG_INFINITY, 30.0).start(), 0.0);
        assert_eq!(seg.set_start(f64::INFINITY, 30.0).start(), 29.0);
    }

    #[test]
    fn test_short_track_keeps_whole_range() {
        let seg = Segment::reset(0.5);
        assert_eq!(min_width_for(0.5), 0.5);

        let moved = seg.set_start(0.3, 0.5).set_end(0.1, 0.5);
        assert_eq!(moved.start(), 0.0);
        assert_eq!(moved.end(), 0.5);
        assert!(moved.width_seconds() > 0.0);
    }

    #[test]
    fn test_setters_on_uninitialized_segment_do_not_panic() {
        let seg = Segment::ZERO.set_start(10.0, 0.0).set_end(10.0, 0.0);
        assert_eq!(seg, Segment::ZERO);
    }

    #[test]
    fn test_set_bound_dispatches_by_handle() {
        let seg = Segment::reset(30.0);
        assert_eq!(seg.set_bound(Handle::Start, 4.0, 30.0).start(), 4.0);
        assert_eq!(seg.set_bound(Handle::End, 8.0, 30.0).end(), 8.0);
        assert_eq!(seg.bound(Handle::End), 30.0);
    }

    #[test]
    fn test_contains_is_half_open() {
        let seg = Segment::reset(30.0).set_start(10.0, 30.0).set_end(20.0, 30.0);
        assert!(seg.contains(10.0));
        assert!(seg.contains(19.99));
        assert!(!seg.contains(20.0));
        assert!(!seg.contains(9.0));
    }
}
