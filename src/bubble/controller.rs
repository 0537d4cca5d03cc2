//! Bubble interaction controller
//!
//! Owns the bubble's in-memory position, the gesture state and the snap
//! animation, and applies gesture effects to the injected collaborators.

use super::gesture::{Effect, Gesture};
use super::snap::SnapAnimation;
use crate::geometry::{BubbleGeometry, Position};
use crate::pointer::PointerEvent;
use crate::protocol::OverlayEvent;
use crate::store::{DEFAULT_POSITION, PositionStore};
use crate::window::WindowPlacement;
use std::sync::mpsc::Sender;
use tracing::{debug, info, warn};

/// Handler invoked once when the bubble is dropped on the delete target
pub type DeleteHandler = Box<dyn FnMut()>;

pub struct BubbleController<W, S> {
    geometry: BubbleGeometry,
    window: W,
    store: S,
    position: Position,
    gesture: Gesture,
    snap: Option<SnapAnimation>,
    deleted: bool,
    on_deleted: DeleteHandler,
    events: Sender<OverlayEvent>,
}

impl<W: WindowPlacement, S: PositionStore> BubbleController<W, S> {
    /// Create a controller with the bubble at the stored position (clamped
    /// to the current screen)
    pub fn new(
        geometry: BubbleGeometry,
        window: W,
        store: S,
        on_deleted: DeleteHandler,
        events: Sender<OverlayEvent>,
    ) -> Self {
        let saved = store.load().unwrap_or_else(|e| {
            warn!("Failed to load bubble position, using default: {}", e);
            DEFAULT_POSITION
        });

        Self {
            geometry,
            window,
            store,
            position: geometry.clamp(saved),
            gesture: Gesture::Idle,
            snap: None,
            deleted: false,
            on_deleted,
            events,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    pub fn in_delete_zone(&self) -> bool {
        self.gesture.in_delete_zone()
    }

    pub fn is_animating(&self) -> bool {
        self.snap.is_some()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Place the bubble window at the current in-memory position
    pub fn attach(&mut self) {
        self.place(self.position);
    }

    pub fn set_bubble_visible(&mut self, visible: bool) {
        if let Err(e) = self.window.set_visible(visible) {
            warn!("Failed to change bubble visibility: {}", e);
        }
    }

    /// Feed one pointer event. Returns true when the event completed a tap.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        if self.deleted {
            return false;
        }

        let transition = std::mem::take(&mut self.gesture).handle(event, self.position, &self.geometry);
        self.gesture = transition.next;

        let mut tapped = false;
        for effect in transition.effects {
            tapped |= effect == Effect::Tap;
            self.apply(effect);
        }
        tapped
    }

    /// Advance the snap animation to `now_ms`
    pub fn on_frame(&mut self, now_ms: u64) {
        let Some(snap) = self.snap else {
            return;
        };

        let (position, complete) = snap.tick(now_ms);
        self.place(position);

        if complete {
            self.snap = None;
            self.persist(position);
        }
    }

    /// Cancel any animation and close out an active drag
    pub fn shutdown(&mut self) {
        self.cancel_snap();
        if self.gesture.is_dragging() {
            self.emit(OverlayEvent::DeleteZoneHidden);
        }
        self.gesture = Gesture::Idle;
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::CancelSnap => self.cancel_snap(),
            Effect::DragStarted => {
                debug!("Drag started at {:?}", self.position);
                self.emit(OverlayEvent::DragStarted);
                self.emit(OverlayEvent::DeleteZoneShown);
            }
            Effect::MoveTo(position) => self.place(position),
            Effect::DeleteZoneHighlight(highlighted) => {
                debug!("Delete zone highlight: {}", highlighted);
                self.emit(OverlayEvent::DeleteZoneHighlight { highlighted });
            }
            Effect::DragEnded => self.emit(OverlayEvent::DeleteZoneHidden),
            Effect::Tap => {
                debug!("Tap on bubble");
                self.emit(OverlayEvent::Tapped);
            }
            Effect::Delete => {
                info!("Bubble dropped on delete target");
                self.deleted = true;
                (self.on_deleted)();
            }
            Effect::Snap { from, at_ms } => {
                let target = self.geometry.snap_target(from);
                debug!("Snapping from {:?} to {:?}", from, target);
                self.snap = Some(SnapAnimation::new(from, target, at_ms));
            }
        }
    }

    fn cancel_snap(&mut self) {
        if let Some(snap) = self.snap.take() {
            debug!("Cancelled snap toward {:?}", snap.target());
        }
    }

    /// Update the in-memory position and move the window. Placement
    /// failures are logged and otherwise ignored.
    fn place(&mut self, position: Position) {
        self.position = position;
        if let Err(e) = self.window.move_bubble(position) {
            warn!("Failed to move bubble to {:?}: {}", position, e);
        }
    }

    fn persist(&mut self, position: Position) {
        if let Err(e) = self.store.save(position) {
            warn!("Failed to save bubble position: {}", e);
        }
        info!("Bubble settled at {:?}", position);
        self.emit(OverlayEvent::settled(position));
    }

    fn emit(&self, event: OverlayEvent) {
        // Nobody listening is not an error
        let _ = self.events.send(event);
    }
}
