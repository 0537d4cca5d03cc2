//! Visual properties of the bubble and the delete zone

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const DELETE_ACTIVE: Rgb = Rgb(255, 68, 68);
pub const DELETE_IDLE: Rgb = Rgb(102, 102, 102);

/// How the bubble is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleVisual {
    pub scale: f32,
    pub alpha: f32,
    pub elevation: f32,
}

impl BubbleVisual {
    pub fn for_drag(dragging: bool) -> Self {
        if dragging {
            Self {
                scale: 1.1,
                alpha: 0.9,
                elevation: 12.0,
            }
        } else {
            Self {
                scale: 1.0,
                alpha: 1.0,
                elevation: 8.0,
            }
        }
    }
}

/// How the delete target is drawn while a drag is in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeleteZoneVisual {
    pub highlighted: bool,
    pub scale: f32,
    pub alpha: f32,
    pub color: Rgb,
}

impl DeleteZoneVisual {
    pub fn for_highlight(highlighted: bool) -> Self {
        if highlighted {
            Self {
                highlighted,
                scale: 1.2,
                alpha: 0.9,
                color: DELETE_ACTIVE,
            }
        } else {
            Self {
                highlighted,
                scale: 1.0,
                alpha: 0.7,
                color: DELETE_IDLE,
            }
        }
    }
}
