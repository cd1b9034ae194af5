//! Raw payload collection from winit window events

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WK, PhysicalKey};

use crate::gesture::{
    EventHost, KeyEvent, ListenOptions, Listener, RawEvent, ScrollOffsets, TargetId, TouchEvent,
    TouchPhase, TouchPoint, Vec2, WheelEvent,
};

/// Converts winit window events into the engine's raw payloads
///
/// Winit reports one contact per touch event, so the collector keeps the set
/// of active contacts to rebuild full touch lists.
pub struct WinitCollector {
    started: Instant,
    scale_factor: f32,
    contacts: Vec<TouchPoint>,
    text_input_active: bool,
}

impl WinitCollector {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            scale_factor: 1.0,
            contacts: Vec::new(),
            text_input_active: false,
        }
    }

    /// Update scale factor (DPI scaling)
    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        self.scale_factor = scale_factor;
    }

    /// Mark keyboard focus as being in a text field; key presses are then flagged editable
    pub fn set_text_input_active(&mut self, active: bool) {
        self.text_input_active = active;
    }

    /// Active touch contacts in logical pixels
    pub fn contacts(&self) -> &[TouchPoint] {
        &self.contacts
    }

    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    fn to_logical(&self, x: f64, y: f64) -> Vec2 {
        Vec2::new(x as f32 / self.scale_factor, y as f32 / self.scale_factor)
    }

    /// Translate a window event; `None` for events with no gesture meaning
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Option<RawEvent> {
        match event {
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = *scale_factor as f32;
                None
            }

            WindowEvent::MouseWheel { delta, .. } => {
                Some(RawEvent::Wheel(wheel_from_delta(*delta, self.scale_factor)))
            }

            WindowEvent::Touch(touch) => {
                let position = self.to_logical(touch.location.x, touch.location.y);
                Some(self.track_contact(touch.id, touch_phase(touch.phase), position))
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return None;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return None;
                };
                let key_code = dom_key_code(code)?;
                Some(RawEvent::Key(KeyEvent {
                    key_code,
                    editable_target: self.text_input_active,
                }))
            }

            WindowEvent::Focused(false) => self.cancel_contacts(),

            _ => None,
        }
    }

    /// Updates the contact list and builds the touch payload for one contact
    ///
    /// `position` is in logical pixels.
    pub fn track_contact(&mut self, id: u64, phase: TouchPhase, position: Vec2) -> RawEvent {
        let point = TouchPoint { id, position };

        match phase {
            TouchPhase::Start | TouchPhase::Move => {
                match self.contacts.iter_mut().find(|c| c.id == id) {
                    Some(contact) => *contact = point,
                    None => self.contacts.push(point),
                }
            }
            TouchPhase::End | TouchPhase::Cancel => {
                self.contacts.retain(|c| c.id != id);
            }
        }

        RawEvent::Touch(
            TouchEvent::new(phase, self.now_ms())
                .with_touches(self.contacts.clone())
                .with_changed(vec![point]),
        )
    }

    /// Drops every active contact, reporting them as cancelled
    ///
    /// Contacts lifted while the window is unfocused never report an end.
    /// `None` when no contact was active.
    pub fn cancel_contacts(&mut self) -> Option<RawEvent> {
        if self.contacts.is_empty() {
            return None;
        }
        let cancelled = std::mem::take(&mut self.contacts);
        Some(RawEvent::Touch(
            TouchEvent::new(TouchPhase::Cancel, self.now_ms()).with_changed(cancelled),
        ))
    }
}

/// Wheel payload for a winit scroll delta
///
/// Winit deltas move content; browser deltas move the viewport, so both axes
/// flip. Pixel deltas are converted to logical pixels.
pub fn wheel_from_delta(delta: MouseScrollDelta, scale_factor: f32) -> WheelEvent {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => WheelEvent::lines(-x, -y),
        MouseScrollDelta::PixelDelta(pos) => WheelEvent::pixels(
            -(pos.x as f32) / scale_factor,
            -(pos.y as f32) / scale_factor,
        ),
    }
}

fn touch_phase(phase: winit::event::TouchPhase) -> TouchPhase {
    match phase {
        winit::event::TouchPhase::Started => TouchPhase::Start,
        winit::event::TouchPhase::Moved => TouchPhase::Move,
        winit::event::TouchPhase::Ended => TouchPhase::End,
        winit::event::TouchPhase::Cancelled => TouchPhase::Cancel,
    }
}

impl Default for WinitCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// DOM `keyCode` for a physical key, where one exists
pub fn dom_key_code(key: WK) -> Option<u32> {
    let code = match key {
        WK::Backspace => 8,
        WK::Tab => 9,
        WK::Enter => 13,
        WK::Escape => 27,
        WK::Space => 32,
        WK::PageUp => 33,
        WK::PageDown => 34,
        WK::End => 35,
        WK::Home => 36,
        WK::ArrowLeft => 37,
        WK::ArrowUp => 38,
        WK::ArrowRight => 39,
        WK::ArrowDown => 40,

        WK::Digit0 => 48,
        WK::Digit1 => 49,
        WK::Digit2 => 50,
        WK::Digit3 => 51,
        WK::Digit4 => 52,
        WK::Digit5 => 53,
        WK::Digit6 => 54,
        WK::Digit7 => 55,
        WK::Digit8 => 56,
        WK::Digit9 => 57,

        WK::KeyA => 65,
        WK::KeyB => 66,
        WK::KeyC => 67,
        WK::KeyD => 68,
        WK::KeyE => 69,
        WK::KeyF => 70,
        WK::KeyG => 71,
        WK::KeyH => 72,
        WK::KeyI => 73,
        WK::KeyJ => 74,
        WK::KeyK => 75,
        WK::KeyL => 76,
        WK::KeyM => 77,
        WK::KeyN => 78,
        WK::KeyO => 79,
        WK::KeyP => 80,
        WK::KeyQ => 81,
        WK::KeyR => 82,
        WK::KeyS => 83,
        WK::KeyT => 84,
        WK::KeyU => 85,
        WK::KeyV => 86,
        WK::KeyW => 87,
        WK::KeyX => 88,
        WK::KeyY => 89,
        WK::KeyZ => 90,

        _ => return None,
    };
    Some(code)
}

/// [`EventHost`] for a winit window
///
/// Winit delivers every event regardless of subscriptions; the host records
/// them so the application can skip forwarding what nobody listens to.
/// Scroll offsets are whatever the application last reported.
#[derive(Debug, Default)]
pub struct WinitHost {
    subscriptions: HashSet<(TargetId, Listener)>,
    offsets: HashMap<TargetId, Vec2>,
    viewport_height: f32,
}

impl WinitHost {
    pub fn new(viewport_height: f32) -> Self {
        Self {
            viewport_height,
            ..Self::default()
        }
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height;
    }

    pub fn set_scroll_offset(&mut self, target: TargetId, offset: Vec2) {
        self.offsets.insert(target, offset);
    }

    pub fn is_subscribed(&self, target: TargetId, listener: Listener) -> bool {
        self.subscriptions.contains(&(target, listener))
    }
}

impl EventHost for WinitHost {
    fn subscribe(&mut self, target: TargetId, listener: Listener, _options: ListenOptions) {
        self.subscriptions.insert((target, listener));
    }

    fn unsubscribe(&mut self, target: TargetId, listener: Listener) {
        self.subscriptions.remove(&(target, listener));
    }

    fn scroll_offsets(&self, target: TargetId) -> ScrollOffsets {
        self.offsets
            .get(&target)
            .map(|offset| ScrollOffsets::local(*offset))
            .unwrap_or_default()
    }

    fn viewport_height(&self) -> f32 {
        self.viewport_height
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use winit::dpi::PhysicalPosition;

    use super::*;
    use crate::gesture::{Engine, EngineOptions, EventCategory, GestureEvent, Mode, RecordingHost};

    fn touch_ids(raw: &RawEvent) -> (TouchPhase, Vec<u64>, Vec<u64>) {
        let RawEvent::Touch(touch) = raw else {
            panic!("expected a touch payload, got {raw:?}");
        };
        (
            touch.phase,
            touch.touches.iter().map(|t| t.id).collect(),
            touch.changed_touches.iter().map(|t| t.id).collect(),
        )
    }

    #[test]
    fn test_line_delta_flips_sign() {
        let wheel = wheel_from_delta(MouseScrollDelta::LineDelta(1.0, -2.0), 2.0);
        assert_eq!(wheel, WheelEvent::lines(-1.0, 2.0));
    }

    #[test]
    fn test_pixel_delta_is_logical() {
        let delta = MouseScrollDelta::PixelDelta(PhysicalPosition::new(10.0, -20.0));
        assert_eq!(wheel_from_delta(delta, 2.0), WheelEvent::pixels(-5.0, 10.0));
    }

    #[test]
    fn test_touch_phase_mapping() {
        use winit::event::TouchPhase as W;
        assert_eq!(touch_phase(W::Started), TouchPhase::Start);
        assert_eq!(touch_phase(W::Moved), TouchPhase::Move);
        assert_eq!(touch_phase(W::Ended), TouchPhase::End);
        assert_eq!(touch_phase(W::Cancelled), TouchPhase::Cancel);
    }

    #[test]
    fn test_contact_list_is_rebuilt() {
        let mut collector = WinitCollector::new();

        collector.track_contact(1, TouchPhase::Start, Vec2::new(0.0, 0.0));
        let raw = collector.track_contact(2, TouchPhase::Start, Vec2::new(5.0, 5.0));
        assert_eq!(touch_ids(&raw), (TouchPhase::Start, vec![1, 2], vec![2]));

        collector.track_contact(1, TouchPhase::Move, Vec2::new(0.0, 10.0));
        assert_eq!(collector.contacts()[0].position, Vec2::new(0.0, 10.0));
        assert_eq!(collector.contacts().len(), 2);

        let raw = collector.track_contact(1, TouchPhase::End, Vec2::new(0.0, 12.0));
        assert_eq!(touch_ids(&raw), (TouchPhase::End, vec![2], vec![1]));
    }

    #[test]
    fn test_focus_loss_cancels_contacts() {
        let mut collector = WinitCollector::new();
        assert_eq!(collector.handle_window_event(&WindowEvent::Focused(false)), None);

        collector.track_contact(1, TouchPhase::Start, Vec2::ZERO);
        collector.track_contact(2, TouchPhase::Start, Vec2::ZERO);
        let raw = collector
            .handle_window_event(&WindowEvent::Focused(false))
            .unwrap();

        assert_eq!(touch_ids(&raw), (TouchPhase::Cancel, vec![], vec![1, 2]));
        assert!(collector.contacts().is_empty());
    }

    #[test]
    fn test_gesture_after_focus_loss_is_delivered() {
        let container = TargetId(0);
        let options =
            EngineOptions::new(Mode::Virtual, container).with_events([EventCategory::Touch]);
        let mut engine = Engine::new(options, RecordingHost::default()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        engine
            .on(move |event: &GestureEvent| sink.borrow_mut().push(event.delta))
            .unwrap();

        let mut collector = WinitCollector::new();
        engine.handle_event(
            container,
            collector.track_contact(1, TouchPhase::Start, Vec2::new(50.0, 50.0)),
        );
        let cancel = collector
            .handle_window_event(&WindowEvent::Focused(false))
            .unwrap();
        engine.handle_event(container, cancel);
        assert_eq!(engine.touch_state().owner_id, None);
        seen.borrow_mut().clear();

        engine.handle_event(
            container,
            collector.track_contact(2, TouchPhase::Start, Vec2::new(100.0, 100.0)),
        );
        engine.handle_event(
            container,
            collector.track_contact(2, TouchPhase::Move, Vec2::new(100.0, 80.0)),
        );

        assert_eq!(engine.touch_state().owner_id, Some(2));
        assert_eq!(seen.borrow().as_slice(), &[Vec2::new(0.0, 20.0)]);
    }

    #[test]
    fn test_dom_key_codes() {
        assert_eq!(dom_key_code(WK::Space), Some(32));
        assert_eq!(dom_key_code(WK::ArrowDown), Some(40));
        assert_eq!(dom_key_code(WK::KeyA), Some(65));
        assert_eq!(dom_key_code(WK::F1), None);
    }

    #[test]
    fn test_winit_host_offsets() {
        let mut host = WinitHost::new(600.0);
        assert_eq!(host.scroll_offsets(TargetId(0)).resolve(), Vec2::ZERO);
        host.set_scroll_offset(TargetId(0), Vec2::new(0.0, 42.0));
        assert_eq!(host.scroll_offsets(TargetId(0)).resolve(), Vec2::new(0.0, 42.0));
        assert_eq!(host.viewport_height(), 600.0);
    }

    #[test]
    fn test_winit_host_subscriptions() {
        let mut host = WinitHost::default();
        host.subscribe(TargetId(0), Listener::Wheel, ListenOptions::default());
        assert!(host.is_subscribed(TargetId(0), Listener::Wheel));
        host.unsubscribe(TargetId(0), Listener::Wheel);
        host.unsubscribe(TargetId(0), Listener::Wheel);
        assert!(!host.is_subscribed(TargetId(0), Listener::Wheel));
    }
}
