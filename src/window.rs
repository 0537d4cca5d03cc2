//! Window placement for the bubble overlay

use crate::geometry::Position;
use crate::protocol::OverlayEvent;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Window placement error types
#[derive(Error, Debug)]
pub enum WindowError {
    #[error("Bubble window is not attached")]
    Detached,
}

/// Something that can move and show/hide the bubble window
pub trait WindowPlacement {
    fn move_bubble(&mut self, position: Position) -> Result<(), WindowError>;

    fn set_visible(&mut self, visible: bool) -> Result<(), WindowError>;
}

/// Window that reports placements as overlay events on a channel.
///
/// Once the receiving side is gone the window counts as detached.
pub struct EventWindow {
    tx: Sender<OverlayEvent>,
}

impl EventWindow {
    pub fn new(tx: Sender<OverlayEvent>) -> Self {
        Self { tx }
    }
}

impl WindowPlacement for EventWindow {
    fn move_bubble(&mut self, position: Position) -> Result<(), WindowError> {
        self.tx
            .send(OverlayEvent::moved(position))
            .map_err(|_| WindowError::Detached)
    }

    fn set_visible(&mut self, visible: bool) -> Result<(), WindowError> {
        let event = if visible {
            OverlayEvent::BubbleShown
        } else {
            OverlayEvent::BubbleHidden
        };
        self.tx.send(event).map_err(|_| WindowError::Detached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_event_window_reports_moves() {
        let (tx, rx) = mpsc::channel();
        let mut window = EventWindow::new(tx);

        window.move_bubble(Position::new(16, 100)).unwrap();
        window.set_visible(false).unwrap();

        assert_eq!(rx.try_recv().unwrap(), OverlayEvent::Moved { x: 16, y: 100 });
        assert_eq!(rx.try_recv().unwrap(), OverlayEvent::BubbleHidden);
    }

    #[test]
    fn test_event_window_detached_after_receiver_dropped() {
        let (tx, rx) = mpsc::channel();
        let mut window = EventWindow::new(tx);
        drop(rx);

        assert!(matches!(
            window.move_bubble(Position::new(0, 0)),
            Err(WindowError::Detached)
        ));
    }
}
