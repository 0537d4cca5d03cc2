//! Overlay service: bubble lifecycle and the expanded panel
//!
//! Wraps a [`BubbleController`] with the service-level behavior around it:
//! a tap opens the panel and hides the bubble, dismissing the panel brings
//! the bubble back, and dropping the bubble on the delete target stops the
//! service.

mod visual;

pub use visual::{BubbleVisual, DeleteZoneVisual};

use crate::bubble::{BubbleController, DeleteHandler};
use crate::geometry::BubbleGeometry;
use crate::pointer::PointerEvent;
use crate::protocol::OverlayEvent;
use crate::store::PositionStore;
use crate::window::WindowPlacement;
use std::sync::mpsc::Sender;
use tracing::{debug, info};

pub struct OverlayService<W, S> {
    controller: BubbleController<W, S>,
    events: Sender<OverlayEvent>,
    panel_open: bool,
    running: bool,
}

impl<W: WindowPlacement, S: PositionStore> OverlayService<W, S> {
    /// Restore the bubble and put it on screen
    pub fn start(geometry: BubbleGeometry, window: W, store: S, events: Sender<OverlayEvent>) -> Self {
        let deleted_tx = events.clone();
        let on_deleted: DeleteHandler = Box::new(move || {
            let _ = deleted_tx.send(OverlayEvent::Deleted);
        });

        let mut controller = BubbleController::new(geometry, window, store, on_deleted, events.clone());
        info!("Starting overlay with bubble at {:?}", controller.position());
        let _ = events.send(OverlayEvent::started(controller.position()));
        controller.attach();

        Self {
            controller,
            events,
            panel_open: false,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn is_animating(&self) -> bool {
        self.controller.is_animating()
    }

    #[cfg(test)]
    pub fn position(&self) -> crate::geometry::Position {
        self.controller.position()
    }

    #[cfg(test)]
    pub fn controller(&self) -> &BubbleController<W, S> {
        &self.controller
    }

    pub fn bubble_visual(&self) -> BubbleVisual {
        BubbleVisual::for_drag(self.controller.is_dragging())
    }

    /// Delete target look, or None when the delete zone is not shown
    pub fn delete_zone_visual(&self) -> Option<DeleteZoneVisual> {
        self.controller
            .is_dragging()
            .then(|| DeleteZoneVisual::for_highlight(self.controller.in_delete_zone()))
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        // The bubble is hidden while the panel is open
        if !self.running || self.panel_open {
            debug!("Ignoring pointer event {:?}", event.action);
            return;
        }

        let tapped = self.controller.handle_pointer(event);

        if self.controller.is_deleted() {
            self.stop();
        } else if tapped {
            self.open_panel();
        }
    }

    pub fn on_frame(&mut self, now_ms: u64) {
        if self.running {
            self.controller.on_frame(now_ms);
        }
    }

    pub fn open_panel(&mut self) {
        if !self.running || self.panel_open {
            return;
        }
        self.panel_open = true;
        self.emit(OverlayEvent::PanelOpened);
        self.controller.set_bubble_visible(false);
    }

    pub fn dismiss_panel(&mut self) {
        if !self.panel_open {
            return;
        }
        self.panel_open = false;
        self.emit(OverlayEvent::PanelClosed);
        self.controller.set_bubble_visible(true);
    }

    /// Tear down: cancel the snap animation before anything else. Safe to
    /// call more than once.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.controller.shutdown();
        if self.panel_open {
            self.panel_open = false;
            self.emit(OverlayEvent::PanelClosed);
        }
        self.running = false;
        info!("Overlay stopped");
        self.emit(OverlayEvent::Stopped);
    }

    fn emit(&self, event: OverlayEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayConfig;
    use crate::geometry::Position;
    use crate::store::MemoryStore;
    use crate::window::EventWindow;
    use std::sync::mpsc::{self, Receiver};

    fn service(start: Position) -> (OverlayService<EventWindow, MemoryStore>, Receiver<OverlayEvent>) {
        let (tx, rx) = mpsc::channel();
        let geometry = BubbleGeometry::from_config(&OverlayConfig::default());
        let service = OverlayService::start(
            geometry,
            EventWindow::new(tx.clone()),
            MemoryStore::with_position(start),
            tx,
        );
        (service, rx)
    }

    fn tap(service: &mut OverlayService<EventWindow, MemoryStore>) {
        service.handle_pointer(&PointerEvent::down(100.0, 200.0, 0));
        service.handle_pointer(&PointerEvent::up(102.0, 201.0, 80));
    }

    #[test]
    fn test_start_places_restored_bubble() {
        let (_service, rx) = service(Position::new(0, 100));
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                OverlayEvent::Started { x: 16, y: 100 },
                OverlayEvent::Moved { x: 16, y: 100 },
            ]
        );
    }

    #[test]
    fn test_tap_opens_panel_and_hides_bubble() {
        let (mut service, rx) = service(Position::new(16, 100));
        rx.try_iter().count();

        tap(&mut service);
        assert!(service.is_panel_open());
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                OverlayEvent::Tapped,
                OverlayEvent::PanelOpened,
                OverlayEvent::BubbleHidden,
            ]
        );

        // Hidden bubble takes no input
        service.handle_pointer(&PointerEvent::down(100.0, 200.0, 500));
        service.handle_pointer(&PointerEvent::moved(400.0, 600.0, 520));
        assert_eq!(rx.try_iter().count(), 0);

        service.dismiss_panel();
        assert!(!service.is_panel_open());
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events, vec![OverlayEvent::PanelClosed, OverlayEvent::BubbleShown]);
    }

    #[test]
    fn test_delete_stops_service() {
        let (mut service, rx) = service(Position::new(500, 300));
        rx.try_iter().count();

        service.handle_pointer(&PointerEvent::down(560.0, 360.0, 0));
        service.handle_pointer(&PointerEvent::moved(540.0, 1880.0, 50));
        assert_eq!(
            service.delete_zone_visual(),
            Some(DeleteZoneVisual::for_highlight(true))
        );
        service.handle_pointer(&PointerEvent::up(540.0, 1880.0, 100));

        assert!(!service.is_running());
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.iter().filter(|e| **e == OverlayEvent::Deleted).count(), 1);
        assert_eq!(events.last(), Some(&OverlayEvent::Stopped));
        assert_eq!(service.controller().store().saves(), 0);
    }

    #[test]
    fn test_visuals_follow_drag() {
        let (mut service, _rx) = service(Position::new(500, 300));
        assert_eq!(service.bubble_visual(), BubbleVisual::for_drag(false));
        assert_eq!(service.delete_zone_visual(), None);

        service.handle_pointer(&PointerEvent::down(560.0, 360.0, 0));
        service.handle_pointer(&PointerEvent::moved(600.0, 500.0, 30));
        assert_eq!(service.bubble_visual().scale, 1.1);
        assert_eq!(
            service.delete_zone_visual(),
            Some(DeleteZoneVisual::for_highlight(false))
        );

        service.handle_pointer(&PointerEvent::up(600.0, 500.0, 60));
        assert_eq!(service.bubble_visual(), BubbleVisual::for_drag(false));
        assert!(service.is_animating());
    }

    #[test]
    fn test_stop_mid_snap_is_final() {
        let (mut service, rx) = service(Position::new(500, 300));
        service.handle_pointer(&PointerEvent::down(560.0, 360.0, 0));
        service.handle_pointer(&PointerEvent::moved(600.0, 360.0, 30));
        service.handle_pointer(&PointerEvent::up(600.0, 360.0, 60));
        service.on_frame(76);

        service.stop();
        service.stop();
        rx.try_iter().count();

        service.on_frame(500);
        assert!(!service.is_animating());
        assert_eq!(rx.try_iter().count(), 0);
        assert_eq!(service.controller().store().saves(), 0);
    }
}
