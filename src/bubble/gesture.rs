//! Drag gesture state machine
//!
//! The machine is a plain value: every pointer event consumes the current
//! [`Gesture`] and yields the next one together with the [`Effect`]s the
//! controller has to apply. Nothing here touches a window or a store.

use crate::geometry::{BubbleGeometry, Position};
use crate::pointer::{PointerAction, PointerEvent};

/// Movement (either axis) that turns a press into a drag
pub const TOUCH_SLOP_PX: f32 = 10.0;

/// Longest press that still counts as a tap
pub const TAP_TIMEOUT_MS: u64 = 200;

/// Where the bubble and the finger were when the finger went down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub start_position: Position,
    pub start_x: f32,
    pub start_y: f32,
    pub down_at_ms: u64,
}

impl DragSession {
    fn begin(position: Position, event: &PointerEvent) -> Self {
        Self {
            start_position: position,
            start_x: event.x,
            start_y: event.y,
            down_at_ms: event.time_ms,
        }
    }

    fn delta(&self, event: &PointerEvent) -> (f32, f32) {
        (event.x - self.start_x, event.y - self.start_y)
    }

    fn exceeds_slop(&self, event: &PointerEvent) -> bool {
        let (dx, dy) = self.delta(event);
        dx.abs() > TOUCH_SLOP_PX || dy.abs() > TOUCH_SLOP_PX
    }

    /// Bubble position that keeps the finger at the same spot on the bubble
    fn follow(&self, event: &PointerEvent, geometry: &BubbleGeometry) -> Position {
        let (dx, dy) = self.delta(event);
        // Float casts saturate, so far off-screen fingers pin to an edge
        geometry.clamp(Position {
            x: (self.start_position.x as f64 + dx as f64) as i32,
            y: (self.start_position.y as f64 + dy as f64) as i32,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Finger is down but has not left the tap slop
    PotentialTap(DragSession),
    Dragging {
        session: DragSession,
        position: Position,
        in_delete_zone: bool,
    },
}

/// Side effects requested by a transition, in order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    CancelSnap,
    /// Show the delete zone and the dragging look
    DragStarted,
    MoveTo(Position),
    DeleteZoneHighlight(bool),
    /// Hide the delete zone and drop the dragging look
    DragEnded,
    Tap,
    Delete,
    /// Start sliding from `from` to the nearest edge
    Snap { from: Position, at_ms: u64 },
}

/// Result of feeding one pointer event
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: Gesture,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(next: Gesture) -> Self {
        Self {
            next,
            effects: Vec::new(),
        }
    }
}

impl Gesture {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Gesture::Dragging { .. })
    }

    pub fn in_delete_zone(&self) -> bool {
        matches!(
            self,
            Gesture::Dragging {
                in_delete_zone: true,
                ..
            }
        )
    }

    /// Advance the machine by one pointer event. `current` is the bubble's
    /// in-memory position, used as the drag origin on pointer-down.
    pub fn handle(self, event: &PointerEvent, current: Position, geometry: &BubbleGeometry) -> Transition {
        match event.action {
            PointerAction::Down => self.on_down(event, current),
            PointerAction::Move => self.on_move(event, geometry),
            PointerAction::Up => self.on_up(event),
        }
    }

    fn on_down(self, event: &PointerEvent, current: Position) -> Transition {
        let mut effects = vec![Effect::CancelSnap];
        // A second down without an up: close out the old drag first
        if self.is_dragging() {
            effects.push(Effect::DragEnded);
        }
        Transition {
            next: Gesture::PotentialTap(DragSession::begin(current, event)),
            effects,
        }
    }

    fn on_move(self, event: &PointerEvent, geometry: &BubbleGeometry) -> Transition {
        let (session, was_in_zone, mut effects) = match self {
            Gesture::Idle => return Transition::to(Gesture::Idle),
            Gesture::PotentialTap(session) => {
                if !session.exceeds_slop(event) {
                    return Transition::to(self);
                }
                (session, false, vec![Effect::DragStarted])
            }
            Gesture::Dragging {
                session,
                in_delete_zone,
                ..
            } => (session, in_delete_zone, Vec::new()),
        };

        let position = session.follow(event, geometry);
        let in_delete_zone = geometry.is_in_delete_zone(position);

        effects.push(Effect::MoveTo(position));
        if in_delete_zone != was_in_zone {
            effects.push(Effect::DeleteZoneHighlight(in_delete_zone));
        }

        Transition {
            next: Gesture::Dragging {
                session,
                position,
                in_delete_zone,
            },
            effects,
        }
    }

    fn on_up(self, event: &PointerEvent) -> Transition {
        match self {
            Gesture::Idle => Transition::to(Gesture::Idle),
            Gesture::PotentialTap(session) => {
                let held_ms = event.time_ms.saturating_sub(session.down_at_ms);
                let effects = if held_ms < TAP_TIMEOUT_MS && !session.exceeds_slop(event) {
                    vec![Effect::Tap]
                } else {
                    Vec::new()
                };
                Transition {
                    next: Gesture::Idle,
                    effects,
                }
            }
            Gesture::Dragging {
                position,
                in_delete_zone,
                ..
            } => {
                let finish = if in_delete_zone {
                    Effect::Delete
                } else {
                    Effect::Snap {
                        from: position,
                        at_ms: event.time_ms,
                    }
                };
                Transition {
                    next: Gesture::Idle,
                    effects: vec![Effect::DragEnded, finish],
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayConfig;

    fn geometry() -> BubbleGeometry {
        BubbleGeometry::from_config(&OverlayConfig::default())
    }

    fn start() -> Position {
        Position::new(500, 300)
    }

    fn press() -> Gesture {
        let t = Gesture::Idle.handle(&PointerEvent::down(560.0, 360.0, 1000), start(), &geometry());
        assert_eq!(t.effects, vec![Effect::CancelSnap]);
        t.next
    }

    #[test]
    fn test_quick_release_is_tap() {
        let t = press().handle(&PointerEvent::up(565.0, 355.0, 1150), start(), &geometry());
        assert_eq!(t.next, Gesture::Idle);
        assert_eq!(t.effects, vec![Effect::Tap]);
    }

    #[test]
    fn test_slow_release_is_not_tap() {
        let t = press().handle(&PointerEvent::up(560.0, 360.0, 1200), start(), &geometry());
        assert_eq!(t.next, Gesture::Idle);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_release_outside_slop_without_move_is_not_tap() {
        let t = press().handle(&PointerEvent::up(575.0, 360.0, 1050), start(), &geometry());
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_small_move_stays_potential_tap() {
        let gesture = press();
        let t = gesture.handle(&PointerEvent::moved(570.0, 350.0, 1020), start(), &geometry());
        assert_eq!(t.next, gesture);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_move_past_slop_starts_drag() {
        let t = press().handle(&PointerEvent::moved(571.0, 360.0, 1020), start(), &geometry());
        assert!(t.next.is_dragging());
        assert_eq!(
            t.effects,
            vec![Effect::DragStarted, Effect::MoveTo(Position::new(511, 300))]
        );
    }

    #[test]
    fn test_drag_follows_pointer_clamped() {
        let g = geometry();
        let dragging = press()
            .handle(&PointerEvent::moved(600.0, 400.0, 1020), start(), &g)
            .next;
        let t = dragging.handle(&PointerEvent::moved(-400.0, -400.0, 1040), start(), &g);
        assert_eq!(t.effects, vec![Effect::MoveTo(Position::new(16, 0))]);
    }

    #[test]
    fn test_far_off_screen_moves_pin_to_edges() {
        let g = geometry();
        let t = press().handle(&PointerEvent::moved(3e9, 360.0, 1020), start(), &g);
        assert_eq!(
            t.effects,
            vec![Effect::DragStarted, Effect::MoveTo(Position::new(944, 300))]
        );

        let t = t.next.handle(&PointerEvent::moved(-3e9, 3e9, 1040), start(), &g);
        assert_eq!(t.effects, vec![Effect::MoveTo(Position::new(16, 1880))]);

        let t = t.next.handle(&PointerEvent::up(-3e9, 3e9, 1060), start(), &g);
        assert_eq!(t.next, Gesture::Idle);
        assert_eq!(
            t.effects,
            vec![
                Effect::DragEnded,
                Effect::Snap {
                    from: Position::new(16, 1880),
                    at_ms: 1060
                }
            ]
        );
    }

    #[test]
    fn test_highlight_only_on_change() {
        let g = geometry();
        // Bubble at (480, 1820) is centered on the delete target
        let pointer_for = |p: Position| (560.0 + (p.x - 500) as f32, 360.0 + (p.y - 300) as f32);

        let (x, y) = pointer_for(Position::new(480, 1820));
        let t = press().handle(&PointerEvent::moved(x, y, 1020), start(), &g);
        assert!(t.next.in_delete_zone());
        assert_eq!(
            t.effects,
            vec![
                Effect::DragStarted,
                Effect::MoveTo(Position::new(480, 1820)),
                Effect::DeleteZoneHighlight(true)
            ]
        );

        let (x, y) = pointer_for(Position::new(490, 1810));
        let t = t.next.handle(&PointerEvent::moved(x, y, 1040), start(), &g);
        assert_eq!(t.effects, vec![Effect::MoveTo(Position::new(490, 1810))]);

        let (x, y) = pointer_for(Position::new(490, 600));
        let t = t.next.handle(&PointerEvent::moved(x, y, 1060), start(), &g);
        assert!(!t.next.in_delete_zone());
        assert_eq!(
            t.effects,
            vec![
                Effect::MoveTo(Position::new(490, 600)),
                Effect::DeleteZoneHighlight(false)
            ]
        );
    }

    #[test]
    fn test_release_in_zone_deletes() {
        let g = geometry();
        let dragging = press()
            .handle(&PointerEvent::moved(540.0, 1880.0, 1020), start(), &g)
            .next;
        assert!(dragging.in_delete_zone());
        let t = dragging.handle(&PointerEvent::up(540.0, 1880.0, 1500), start(), &g);
        assert_eq!(t.next, Gesture::Idle);
        assert_eq!(t.effects, vec![Effect::DragEnded, Effect::Delete]);
    }

    #[test]
    fn test_release_outside_zone_snaps() {
        let g = geometry();
        let dragging = press()
            .handle(&PointerEvent::moved(600.0, 500.0, 1020), start(), &g)
            .next;
        let t = dragging.handle(&PointerEvent::up(600.0, 500.0, 1600), start(), &g);
        assert_eq!(
            t.effects,
            vec![
                Effect::DragEnded,
                Effect::Snap {
                    from: Position::new(540, 440),
                    at_ms: 1600
                }
            ]
        );
    }

    #[test]
    fn test_events_without_down_are_ignored() {
        let g = geometry();
        let t = Gesture::Idle.handle(&PointerEvent::moved(900.0, 900.0, 0), start(), &g);
        assert_eq!(t, Transition::to(Gesture::Idle));
        let t = Gesture::Idle.handle(&PointerEvent::up(900.0, 900.0, 10), start(), &g);
        assert_eq!(t, Transition::to(Gesture::Idle));
    }

    #[test]
    fn test_second_down_while_dragging_ends_drag() {
        let g = geometry();
        let dragging = press()
            .handle(&PointerEvent::moved(600.0, 500.0, 1020), start(), &g)
            .next;
        let t = dragging.handle(&PointerEvent::down(10.0, 10.0, 1100), Position::new(540, 440), &g);
        assert_eq!(t.effects, vec![Effect::CancelSnap, Effect::DragEnded]);
        match t.next {
            Gesture::PotentialTap(session) => {
                assert_eq!(session.start_position, Position::new(540, 440));
                assert_eq!(session.down_at_ms, 1100);
            }
            other => panic!("expected potential tap, got {:?}", other),
        }
    }
}
