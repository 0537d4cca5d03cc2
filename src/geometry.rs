//! Screen-space geometry for the bubble and the delete target
//!
//! All values are in screen pixels. Sizes come from an [`OverlayConfig`]
//! and are converted from dp once, up front.

use crate::config::OverlayConfig;
use serde::{Deserialize, Serialize};

/// Top-left corner of the bubble window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pixel geometry of the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BubbleGeometry {
    pub screen_width: i32,
    pub screen_height: i32,
    pub bubble_width: i32,
    pub bubble_height: i32,
    pub edge_margin: i32,
    pub delete_zone_height: i32,
    pub delete_button_size: i32,
}

impl BubbleGeometry {
    pub fn from_config(config: &OverlayConfig) -> Self {
        let bubble = config.dp_to_px(config.bubble_size_dp);
        Self {
            screen_width: config.screen_width,
            screen_height: config.screen_height,
            bubble_width: bubble,
            bubble_height: bubble,
            edge_margin: config.dp_to_px(config.edge_margin_dp),
            delete_zone_height: config.dp_to_px(config.delete_zone_height_dp),
            delete_button_size: config.dp_to_px(config.delete_button_size_dp),
        }
    }

    pub fn min_x(&self) -> i32 {
        self.edge_margin
    }

    /// Rightmost allowed x. Collapses onto `min_x` on screens too narrow
    /// for the bubble plus both margins.
    pub fn max_x(&self) -> i32 {
        self.screen_width
            .saturating_sub(self.bubble_width)
            .saturating_sub(self.edge_margin)
            .max(self.min_x())
    }

    pub fn max_y(&self) -> i32 {
        self.screen_height.saturating_sub(self.bubble_height).max(0)
    }

    /// Clamp a position into the allowed bubble area
    pub fn clamp(&self, position: Position) -> Position {
        Position {
            x: position.x.clamp(self.min_x(), self.max_x()),
            y: position.y.clamp(0, self.max_y()),
        }
    }

    #[cfg(test)]
    pub fn contains(&self, position: Position) -> bool {
        (self.min_x()..=self.max_x()).contains(&position.x)
            && (0..=self.max_y()).contains(&position.y)
    }

    pub fn bubble_center(&self, position: Position) -> (i32, i32) {
        (
            position.x + self.bubble_width / 2,
            position.y + self.bubble_height / 2,
        )
    }

    /// Center of the delete button: horizontally centered, vertically in the
    /// middle of the bottom delete zone
    pub fn delete_target_center(&self) -> (i32, i32) {
        (
            self.screen_width / 2,
            self.screen_height - self.delete_zone_height / 2,
        )
    }

    pub fn delete_trigger_radius(&self) -> f64 {
        (self.delete_button_size / 2) as f64 * 1.5
    }

    /// Whether a bubble at `position` overlaps the delete target
    pub fn is_in_delete_zone(&self, position: Position) -> bool {
        let (bubble_x, bubble_y) = self.bubble_center(position);
        let (target_x, target_y) = self.delete_target_center();

        let dx = (bubble_x - target_x) as f64;
        let dy = (bubble_y - target_y) as f64;
        dx.hypot(dy) <= self.delete_trigger_radius()
    }

    /// Edge the bubble should rest against after a drag. Ties go right.
    pub fn snap_target(&self, position: Position) -> Position {
        let (center_x, _) = self.bubble_center(position);
        let x = if center_x < self.screen_width / 2 {
            self.min_x()
        } else {
            self.max_x()
        };
        Position { x, y: position.y }
    }
}
