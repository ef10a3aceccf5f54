// Timeline geometry - Pointer coordinate <-> track time mapping

use crate::segment::{Handle, Segment};

/// Horizontal extent of a timeline on screen, in pointer coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineGeometry {
    pub origin_x: f32,
    pub width: f32,
}

impl TimelineGeometry {
    pub fn new(origin_x: f32, width: f32) -> Self {
        Self { origin_x, width }
    }

    /// Fraction of the timeline under `pointer_x`, clamped to `[0, 1]`
    pub fn fraction_at(&self, pointer_x: f32) -> f64 {
        if self.width <= 0.0 || !self.width.is_finite() || pointer_x.is_nan() {
            return 0.0;
        }
        (((pointer_x - self.origin_x) / self.width) as f64).clamp(0.0, 1.0)
    }

    /// Track time under `pointer_x` for a track of `duration` seconds
    pub fn time_at(&self, pointer_x: f32, duration: f64) -> f64 {
        self.fraction_at(pointer_x) * duration.max(0.0)
    }

    /// Pointer coordinate of track time `t`
    pub fn x_for_time(&self, t: f64, duration: f64) -> f32 {
        if duration <= 0.0 {
            return self.origin_x;
        }
        let fraction = (t / duration).clamp(0.0, 1.0) as f32;
        self.origin_x + fraction * self.width
    }

    /// Segment handle within `grab_radius` of `pointer_x`, the closer one
    /// when both are in reach. Ties go to the end handle so a collapsed
    /// segment at the track start can still be widened.
    pub fn handle_at(
        &self,
        pointer_x: f32,
        segment: &Segment,
        duration: f64,
        grab_radius: f32,
    ) -> Option<Handle> {
        if duration <= 0.0 {
            return None;
        }
        let to_start = (pointer_x - self.x_for_time(segment.start(), duration)).abs();
        let to_end = (pointer_x - self.x_for_time(segment.end(), duration)).abs();

        match (to_start <= grab_radius, to_end <= grab_radius) {
            (false, false) => None,
            (true, false) => Some(Handle::Start),
            (false, true) => Some(Handle::End),
            (true, true) if to_start < to_end => Some(Handle::Start),
            (true, true) => Some(Handle::End),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_mapping() {
        let geometry = TimelineGeometry::new(100.0, 400.0);
        assert_eq!(geometry.time_at(100.0, 40.0), 0.0);
        assert_eq!(geometry.time_at(300.0, 40.0), 20.0);
        assert_eq!(geometry.time_at(500.0, 40.0), 40.0);
    }

    #[test]
    fn test_pointer_outside_is_clamped() {
        let geometry = TimelineGeometry::new(100.0, 400.0);
        assert_eq!(geometry.time_at(20.0, 40.0), 0.0);
        assert_eq!(geometry.time_at(900.0, 40.0), 40.0);
    }

    #[test]
    fn test_degenerate_geometry() {
        let geometry = TimelineGeometry::new(0.0, 0.0);
        assert_eq!(geometry.fraction_at(10.0), 0.0);
        assert_eq!(TimelineGeometry::new(0.0, 100.0).fraction_at(f32::NAN), 0.0);
    }

    #[test]
    fn test_x_for_time() {
        let geometry = TimelineGeometry::new(100.0, 400.0);
        assert_eq!(geometry.x_for_time(10.0, 40.0), 200.0);
        assert_eq!(geometry.x_for_time(10.0, 0.0), 100.0);
    }

    #[test]
    fn test_handle_hit_testing() {
        let geometry = TimelineGeometry::new(0.0, 400.0);
        let segment = Segment::reset(40.0).set_start(10.0, 40.0).set_end(20.0, 40.0);

        assert_eq!(geometry.handle_at(104.0, &segment, 40.0, 8.0), Some(Handle::Start));
        assert_eq!(geometry.handle_at(195.0, &segment, 40.0, 8.0), Some(Handle::End));
        assert_eq!(geometry.handle_at(150.0, &segment, 40.0, 8.0), None);
        assert_eq!(geometry.handle_at(100.0, &segment, 0.0, 8.0), None);
    }

    #[test]
    fn test_overlapping_handles_prefer_closest() {
        let geometry = TimelineGeometry::new(0.0, 400.0);
        let segment = Segment::reset(40.0).set_end(1.0, 40.0);

        assert_eq!(geometry.handle_at(1.0, &segment, 40.0, 8.0), Some(Handle::Start));
        assert_eq!(geometry.handle_at(5.0, &segment, 40.0, 8.0), Some(Handle::End));
        assert_eq!(geometry.handle_at(9.0, &segment, 40.0, 8.0), Some(Handle::End));
    }
}
