//! Pointer events delivered to the bubble

/// Pointer action kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Down,
    Move,
    Up,
}

/// A single pointer event in absolute screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub x: f32,
    pub y: f32,
    /// Milliseconds on the driver's monotonic clock
    pub time_ms: u64,
}

impl PointerEvent {
    pub fn down(x: f32, y: f32, time_ms: u64) -> Self {
        Self {
            action: PointerAction::Down,
            x,
            y,
            time_ms,
        }
    }

    pub fn moved(x: f32, y: f32, time_ms: u64) -> Self {
        Self {
            action: PointerAction::Move,
            x,
            y,
            time_ms,
        }
    }

    pub fn up(x: f32, y: f32, time_ms: u64) -> Self {
        Self {
            action: PointerAction::Up,
            x,
            y,
            time_ms,
        }
    }
}
