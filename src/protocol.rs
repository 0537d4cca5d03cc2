use crate::geometry::Position;
use crate::pointer::PointerEvent;
use serde::{Deserialize, Serialize};

/// Records read by the drivers, one per line
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputRecord {
    /// Finger touched the bubble
    Down {
        x: f32,
        y: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        t: Option<u64>,
    },
    /// Finger moved
    Move {
        x: f32,
        y: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        t: Option<u64>,
    },
    /// Finger lifted
    Up {
        x: f32,
        y: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        t: Option<u64>,
    },
    /// Close the expanded panel
    Dismiss {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        t: Option<u64>,
    },
    /// Stop the overlay service
    Stop,
}

impl InputRecord {
    /// Timestamp carried by the record, if any
    pub fn time_ms(&self) -> Option<u64> {
        match self {
            InputRecord::Down { t, .. }
            | InputRecord::Move { t, .. }
            | InputRecord::Up { t, .. }
            | InputRecord::Dismiss { t } => *t,
            InputRecord::Stop => None,
        }
    }

    /// Replace the record's timestamp
    pub fn with_time(self, time_ms: u64) -> Self {
        match self {
            InputRecord::Down { x, y, .. } => InputRecord::Down { x, y, t: Some(time_ms) },
            InputRecord::Move { x, y, .. } => InputRecord::Move { x, y, t: Some(time_ms) },
            InputRecord::Up { x, y, .. } => InputRecord::Up { x, y, t: Some(time_ms) },
            InputRecord::Dismiss { .. } => InputRecord::Dismiss { t: Some(time_ms) },
            InputRecord::Stop => InputRecord::Stop,
        }
    }

    /// Convert to a pointer event, stamping records without a timestamp
    /// with `now_ms`
    pub fn to_pointer(&self, now_ms: u64) -> Option<PointerEvent> {
        let time_ms = self.time_ms().unwrap_or(now_ms);
        match *self {
            InputRecord::Down { x, y, .. } => Some(PointerEvent::down(x, y, time_ms)),
            InputRecord::Move { x, y, .. } => Some(PointerEvent::moved(x, y, time_ms)),
            InputRecord::Up { x, y, .. } => Some(PointerEvent::up(x, y, time_ms)),
            InputRecord::Dismiss { .. } | InputRecord::Stop => None,
        }
    }
}

/// Signals emitted by the overlay
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OverlayEvent {
    /// Service started with the bubble at the restored position
    Started { x: i32, y: i32 },
    /// Bubble window placed
    Moved { x: i32, y: i32 },
    BubbleShown,
    BubbleHidden,
    /// Finger left the tap slop, bubble follows the pointer
    DragStarted,
    DeleteZoneShown,
    /// Bubble entered or left the delete target
    DeleteZoneHighlight { highlighted: bool },
    DeleteZoneHidden,
    Tapped,
    PanelOpened,
    PanelClosed,
    /// Snap finished and the final position was persisted
    Settled { x: i32, y: i32 },
    /// Bubble dropped onto the delete target
    Deleted,
    Stopped,
}

impl OverlayEvent {
    pub fn moved(position: Position) -> Self {
        OverlayEvent::Moved {
            x: position.x,
            y: position.y,
        }
    }

    pub fn settled(position: Position) -> Self {
        OverlayEvent::Settled {
            x: position.x,
            y: position.y,
        }
    }

    pub fn started(position: Position) -> Self {
        OverlayEvent::Started {
            x: position.x,
            y: position.y,
        }
    }
}
