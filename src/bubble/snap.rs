//! Edge-snap animation
//!
//! Slides the bubble horizontally to its resting edge after a drag. The
//! animation is frame driven: the owner calls [`SnapAnimation::tick`] with
//! the current time and applies the returned position.

use crate::geometry::Position;

pub const SNAP_DURATION_MS: u64 = 300;

/// Decelerating interpolation (fast start, slow finish)
pub fn decelerate(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapAnimation {
    started_at_ms: u64,
    duration_ms: u64,
    from: Position,
    to: Position,
}

impl SnapAnimation {
    pub fn new(from: Position, to: Position, now_ms: u64) -> Self {
        Self {
            started_at_ms: now_ms,
            duration_ms: SNAP_DURATION_MS,
            from,
            to,
        }
    }

    pub fn target(&self) -> Position {
        self.to
    }

    /// Get the current animated position and whether the animation is complete
    pub fn tick(&self, now_ms: u64) -> (Position, bool) {
        let t = if self.duration_ms == 0 {
            1.0
        } else {
            let elapsed = now_ms.saturating_sub(self.started_at_ms) as f32;
            (elapsed / self.duration_ms as f32).clamp(0.0, 1.0)
        };

        let eased = decelerate(t);
        let x = self.from.x + ((self.to.x - self.from.x) as f32 * eased) as i32;
        let y = self.from.y + ((self.to.y - self.from.y) as f32 * eased) as i32;
        (Position { x, y }, t >= 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decelerate_endpoints() {
        assert_eq!(decelerate(0.0), 0.0);
        assert_eq!(decelerate(1.0), 1.0);
        assert_eq!(decelerate(0.5), 0.75);
    }

    #[test]
    fn test_tick_reaches_target_exactly() {
        let anim = SnapAnimation::new(Position::new(500, 300), Position::new(944, 300), 1000);

        let (start, done) = anim.tick(1000);
        assert_eq!(start, Position::new(500, 300));
        assert!(!done);

        let (end, done) = anim.tick(1000 + SNAP_DURATION_MS);
        assert_eq!(end, Position::new(944, 300));
        assert!(done);

        let (late, done) = anim.tick(5000);
        assert_eq!(late, Position::new(944, 300));
        assert!(done);
    }

    #[test]
    fn test_tick_is_monotonic_and_decelerating() {
        let anim = SnapAnimation::new(Position::new(400, 10), Position::new(16, 10), 0);

        let mut last_x = 400;
        let mut last_step = i32::MAX;
        for frame in 1..=18 {
            let (pos, _) = anim.tick(frame * 16);
            assert!(pos.x <= last_x, "moved backwards at frame {}", frame);
            assert_eq!(pos.y, 10);
            let step = last_x - pos.x;
            // Steps shrink (allow 1px of truncation jitter)
            assert!(step <= last_step.saturating_add(1), "accelerated at frame {}", frame);
            last_step = step;
            last_x = pos.x;
        }
    }

    #[test]
    fn test_clock_before_start_holds_origin() {
        let anim = SnapAnimation::new(Position::new(100, 0), Position::new(16, 0), 500);
        let (pos, done) = anim.tick(400);
        assert_eq!(pos, Position::new(100, 0));
        assert!(!done);
    }
}
