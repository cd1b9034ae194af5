//! Single-contact touch gesture tracking with momentum

use tracing::trace;

use super::raw::{RawEvent, TouchEvent};
use super::types::{EventCategory, GestureEvent, Vec2};

/// Frame budget velocities are normalized to, in milliseconds
pub const FRAME_MS: f32 = 16.0;

/// Weight of the newest velocity sample in the momentum average
pub const MOMENTUM_SMOOTHING: f32 = 0.9;

/// Gesture state for the one contact that owns it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchGestureState {
    /// Identifier of the owning contact; `None` while no gesture is active
    pub owner_id: Option<u64>,
    pub last_position: Vec2,
    /// Exponentially smoothed velocity, in pixels per frame
    pub momentum: Vec2,
    pub last_sample_time_ms: f64,
}

/// Turns touch samples into deltas, pinned to the first contact
///
/// A touch surface reports every contact on every event. Only the contact
/// that started the gesture drives output; later fingers are ignored until it
/// lifts.
#[derive(Debug, Clone)]
pub struct TouchGestureTracker {
    state: TouchGestureState,
    multiplier: f32,
}

impl TouchGestureTracker {
    pub fn new(multiplier: f32) -> Self {
        Self {
            state: TouchGestureState::default(),
            multiplier,
        }
    }

    pub fn state(&self) -> &TouchGestureState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.owner_id.is_some()
    }

    /// Adopts the contact that started, unless a gesture is already owned
    ///
    /// Returns true when a new gesture began.
    pub fn on_touch_start(&mut self, event: &TouchEvent) -> bool {
        if self.is_active() {
            trace!("touch start ignored, gesture already owned");
            return false;
        }

        let Some(contact) = event
            .changed_touches
            .first()
            .or_else(|| event.touches.first())
        else {
            return false;
        };

        self.state = TouchGestureState {
            owner_id: Some(contact.id),
            last_position: contact.position,
            momentum: Vec2::ZERO,
            last_sample_time_ms: event.time_ms,
        };
        true
    }

    /// Delta for the owning contact's movement, opposite to the finger
    pub fn on_touch_move(&mut self, event: &TouchEvent) -> Option<GestureEvent> {
        let owner = self.state.owner_id?;
        let Some(contact) = event.find_touch(owner) else {
            trace!(owner, "touch move without the owning contact");
            return None;
        };

        let delta = -(contact.position - self.state.last_position) * self.multiplier;
        self.state.last_position = contact.position;

        let elapsed = event.time_ms - self.state.last_sample_time_ms;
        self.state.last_sample_time_ms = event.time_ms;

        // Pinch-to-zoom can deliver samples with identical timestamps.
        if elapsed > 0.0 {
            let velocity = delta * (FRAME_MS / elapsed as f32);
            self.state.momentum =
                velocity * MOMENTUM_SMOOTHING + self.state.momentum * (1.0 - MOMENTUM_SMOOTHING);
        }

        Some(GestureEvent::new(
            EventCategory::Touch,
            delta,
            RawEvent::Touch(event.clone()),
        ))
    }

    /// Releases the gesture and emits its momentum as a final fling delta
    pub fn on_touch_end(&mut self, event: &TouchEvent) -> Option<GestureEvent> {
        let owner = self.state.owner_id?;
        if event.find_changed(owner).is_none() {
            trace!(owner, "touch end for a contact that does not own the gesture");
            return None;
        }

        let momentum = self.state.momentum;
        self.state.owner_id = None;

        Some(GestureEvent::new(
            EventCategory::Touch,
            momentum,
            RawEvent::Touch(event.clone()),
        ))
    }

    /// Drops any active gesture without emitting
    pub fn reset(&mut self) {
        self.state = TouchGestureState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::raw::{TouchPhase, TouchPoint};

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    fn start(id: u64, x: f32, y: f32, t: f64) -> TouchEvent {
        TouchEvent::single(TouchPhase::Start, TouchPoint::new(id, x, y), t)
    }

    fn moved(id: u64, x: f32, y: f32, t: f64) -> TouchEvent {
        TouchEvent::single(TouchPhase::Move, TouchPoint::new(id, x, y), t)
    }

    fn end(id: u64, t: f64) -> TouchEvent {
        TouchEvent::single(TouchPhase::End, TouchPoint::new(id, 0.0, 0.0), t)
    }

    #[test]
    fn test_drag_is_sign_inverted() {
        let mut tracker = TouchGestureTracker::new(1.0);
        assert!(tracker.on_touch_start(&start(1, 100.0, 100.0, 0.0)));

        let event = tracker.on_touch_move(&moved(1, 90.0, 80.0, 16.0)).unwrap();
        assert_eq!(event.category, EventCategory::Touch);
        assert_eq!(event.delta, Vec2::new(10.0, 20.0));
        assert_eq!(tracker.state().last_position, Vec2::new(90.0, 80.0));
    }

    #[test]
    fn test_multiplier_scales_delta() {
        let mut tracker = TouchGestureTracker::new(2.5);
        tracker.on_touch_start(&start(1, 0.0, 0.0, 0.0));
        let event = tracker.on_touch_move(&moved(1, 0.0, -4.0, 16.0)).unwrap();
        assert_eq!(event.delta, Vec2::new(0.0, 10.0));
    }

    #[test]
    fn test_first_contact_wins() {
        let mut tracker = TouchGestureTracker::new(1.0);
        tracker.on_touch_start(&start(1, 100.0, 100.0, 0.0));
        assert!(!tracker.on_touch_start(&start(2, 400.0, 400.0, 5.0)));
        assert_eq!(tracker.state().owner_id, Some(1));

        // Second finger moves, owner stays put: no jump.
        let sample = TouchEvent::new(TouchPhase::Move, 10.0).with_touches(vec![
            TouchPoint::new(1, 100.0, 100.0),
            TouchPoint::new(2, 300.0, 300.0),
        ]);
        let event = tracker.on_touch_move(&sample).unwrap();
        assert_eq!(event.delta, Vec2::ZERO);
    }

    #[test]
    fn test_move_without_owner_is_ignored() {
        let mut tracker = TouchGestureTracker::new(1.0);
        assert!(tracker.on_touch_move(&moved(1, 5.0, 5.0, 16.0)).is_none());

        tracker.on_touch_start(&start(1, 0.0, 0.0, 0.0));
        assert!(tracker.on_touch_move(&moved(7, 5.0, 5.0, 16.0)).is_none());
        assert_eq!(tracker.state().last_position, Vec2::ZERO);
    }

    #[test]
    fn test_momentum_converges_without_overshoot() {
        let mut tracker = TouchGestureTracker::new(1.0);
        tracker.on_touch_start(&start(1, 100.0, 100.0, 0.0));

        tracker.on_touch_move(&moved(1, 90.0, 80.0, 16.0));
        let first = tracker.state().momentum;
        assert!(approx(first, Vec2::new(9.0, 18.0)));

        tracker.on_touch_move(&moved(1, 80.0, 60.0, 32.0));
        let second = tracker.state().momentum;
        assert!(approx(second, Vec2::new(9.9, 19.8)));
        assert!(second.x > first.x && second.x <= 10.0);
        assert!(second.y > first.y && second.y <= 20.0);
    }

    #[test]
    fn test_velocity_normalized_to_frame() {
        let mut tracker = TouchGestureTracker::new(1.0);
        tracker.on_touch_start(&start(1, 0.0, 0.0, 0.0));
        // 10px over 32ms is 5px per 16ms frame.
        tracker.on_touch_move(&moved(1, 0.0, -10.0, 32.0));
        assert!(approx(tracker.state().momentum, Vec2::new(0.0, 4.5)));
    }

    #[test]
    fn test_zero_elapsed_keeps_momentum() {
        let mut tracker = TouchGestureTracker::new(1.0);
        tracker.on_touch_start(&start(1, 0.0, 0.0, 0.0));
        tracker.on_touch_move(&moved(1, 0.0, -10.0, 16.0));
        let before = tracker.state().momentum;

        let event = tracker.on_touch_move(&moved(1, 0.0, -30.0, 16.0)).unwrap();
        assert_eq!(event.delta, Vec2::new(0.0, 20.0));
        assert_eq!(tracker.state().momentum, before);
        assert!(before.y.is_finite());
    }

    #[test]
    fn test_end_emits_momentum_once() {
        let mut tracker = TouchGestureTracker::new(1.0);
        tracker.on_touch_start(&start(1, 100.0, 100.0, 0.0));
        tracker.on_touch_move(&moved(1, 90.0, 80.0, 16.0));
        let momentum = tracker.state().momentum;

        let fling = tracker.on_touch_end(&end(1, 20.0)).unwrap();
        assert_eq!(fling.delta, momentum);
        assert_eq!(fling.category, EventCategory::Touch);
        assert!(!tracker.is_active());

        assert!(tracker.on_touch_end(&end(1, 25.0)).is_none());
    }

    #[test]
    fn test_end_for_other_contact_is_ignored() {
        let mut tracker = TouchGestureTracker::new(1.0);
        tracker.on_touch_start(&start(1, 0.0, 0.0, 0.0));
        assert!(tracker.on_touch_end(&end(2, 10.0)).is_none());
        assert!(tracker.is_active());
    }

    #[test]
    fn test_new_gesture_resets_momentum() {
        let mut tracker = TouchGestureTracker::new(1.0);
        tracker.on_touch_start(&start(1, 0.0, 0.0, 0.0));
        tracker.on_touch_move(&moved(1, 0.0, -10.0, 16.0));
        tracker.on_touch_end(&end(1, 20.0));

        assert!(tracker.on_touch_start(&start(2, 50.0, 50.0, 100.0)));
        assert_eq!(tracker.state().momentum, Vec2::ZERO);
        assert_eq!(tracker.state().owner_id, Some(2));
    }
}
