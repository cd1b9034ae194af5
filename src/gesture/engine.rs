//! Engine facade tying the normalizers, trackers, bindings and dispatcher together

use tracing::{debug, trace};

use super::binding::BindingManager;
use super::dispatch::{Broadcast, Dispatcher, GestureHandler};
use super::error::GestureError;
use super::host::{EventHost, ListenOptions, Listener, TargetId};
use super::normalize::{Normalize, NormalizeContext};
use super::options::{Configuration, EngineOptions};
use super::raw::{KeyEvent, RawEvent, TouchEvent, TouchPhase, WheelEvent};
use super::scroll::ScrollPositionTracker;
use super::touch::{TouchGestureState, TouchGestureTracker};
use super::types::{EventCategory, GestureEvent, KeyCode};

/// Gesture normalization engine over a host `H`
///
/// Idle until a handler is registered with [`on`](Self::on); active until
/// [`off`](Self::off) or [`destroy`](Self::destroy). Dropping the engine
/// unbinds its listeners.
pub struct Engine<H: EventHost> {
    config: Configuration,
    host: H,
    bindings: BindingManager,
    touch: TouchGestureTracker,
    scroll: ScrollPositionTracker,
    dispatcher: Dispatcher,
    excluded_touch_targets: Vec<TargetId>,
}

impl<H: EventHost> Engine<H> {
    /// Validates `options` and creates an idle engine
    pub fn new(options: EngineOptions, host: H) -> Result<Self, GestureError> {
        let config = options.validate()?;
        debug!(mode = %config.mode_name(), events = ?config.event_names(), "engine configured");

        Ok(Self {
            touch: TouchGestureTracker::new(config.touch_multiplier()),
            scroll: ScrollPositionTracker::new(),
            dispatcher: Dispatcher::new(config.emit_global()),
            bindings: BindingManager::new(),
            excluded_touch_targets: Vec::new(),
            config,
            host,
        })
    }

    /// Attaches the channel used when `emit_global` is enabled
    pub fn with_broadcast(mut self, broadcast: impl Broadcast + 'static) -> Self {
        self.dispatcher.set_broadcast(Box::new(broadcast));
        self
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn bindings(&self) -> &BindingManager {
        &self.bindings
    }

    pub fn touch_state(&self) -> &TouchGestureState {
        self.touch.state()
    }

    /// True while a handler is registered
    pub fn is_active(&self) -> bool {
        self.dispatcher.has_handler()
    }

    /// Registers the single consumer and binds fresh listeners
    pub fn on(&mut self, handler: impl GestureHandler + 'static) -> Result<(), GestureError> {
        if self.is_active() {
            return Err(GestureError::HandlerAlreadyRegistered);
        }

        self.dispatcher.set_handler(Box::new(handler));
        self.unbind();
        self.bind();
        debug!("handler registered");
        Ok(())
    }

    /// Clears the handler and removes every listener; a no-op when idle
    pub fn off(&mut self) {
        if self.is_active() {
            debug!("handler unregistered");
        }
        self.dispatcher.clear_handler();
        self.unbind();
    }

    /// Same as [`off`](Self::off), also releasing the broadcast channel
    pub fn destroy(&mut self) {
        self.off();
        self.dispatcher.take_broadcast();
    }

    /// Mutes or unmutes delivery without touching bindings or the handler
    pub fn set_listening(&mut self, listening: bool) {
        self.dispatcher.set_listening(listening);
    }

    pub fn is_listening(&self) -> bool {
        self.dispatcher.is_listening()
    }

    /// Targets on which a touch start never begins a gesture
    pub fn set_excluded_touch_targets(&mut self, targets: Vec<TargetId>) {
        self.excluded_touch_targets = targets;
    }

    /// Entry point for the host: a payload arrived on `target`
    ///
    /// Payloads for listeners that are not bound are ignored.
    pub fn handle_event(&mut self, target: TargetId, event: RawEvent) {
        let listener = event.listener();
        if !self.bindings.is_listening_to(target, listener) {
            trace!(event = listener.event_name(), ?target, "no bound listener");
            return;
        }

        match event {
            RawEvent::Wheel(wheel) => self.on_wheel(wheel),
            RawEvent::Key(key) => self.on_key(key),
            RawEvent::Touch(touch) => self.on_touch(target, touch),
            RawEvent::Scroll => self.on_scroll(target),
        }
    }

    fn bind(&mut self) {
        self.bindings.bind(&self.config, &mut self.host);
        if let Some(target) = self.config.scroll_target() {
            self.scroll.bind(self.host.scroll_offsets(target));
        }
    }

    fn unbind(&mut self) {
        self.bindings.unbind(&mut self.host);
        self.touch.reset();
    }

    fn normalize_context(&self) -> NormalizeContext<'_> {
        NormalizeContext {
            key_multiplier: self.config.key_multiplier(),
            viewport_height: self.host.viewport_height(),
        }
    }

    fn on_wheel(&mut self, wheel: WheelEvent) {
        let delta = wheel.normalize(&self.normalize_context());
        self.dispatcher.dispatch(GestureEvent::new(
            EventCategory::Wheel,
            delta,
            RawEvent::Wheel(wheel),
        ));
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.editable_target {
            trace!(key_code = key.key_code, "key in editable target");
            return;
        }
        let Some(category) = self.key_category(key.key_code) else {
            return;
        };

        let delta = key.normalize(&self.normalize_context());
        self.dispatcher
            .dispatch(GestureEvent::new(category, delta, RawEvent::Key(key)));
    }

    /// Category a key press is reported under, given the enabled categories
    fn key_category(&self, key_code: u32) -> Option<EventCategory> {
        let key = KeyCode::from_code(key_code)?;
        if self.config.has_category(EventCategory::Keys) {
            Some(EventCategory::Keys)
        } else if key == KeyCode::Space && self.config.has_category(EventCategory::Spacebar) {
            Some(EventCategory::Spacebar)
        } else if key.is_arrow() && self.config.has_category(EventCategory::Arrows) {
            Some(EventCategory::Arrows)
        } else {
            None
        }
    }

    fn on_touch(&mut self, target: TargetId, touch: TouchEvent) {
        match touch.phase {
            TouchPhase::Start => {
                if touch
                    .origin
                    .is_some_and(|origin| self.excluded_touch_targets.contains(&origin))
                {
                    trace!("touch start on excluded target");
                    return;
                }
                if self.touch.on_touch_start(&touch) {
                    let options = ListenOptions {
                        passive: self.config.passive(),
                    };
                    self.bindings
                        .attach(&mut self.host, target, Listener::TouchMove, options);
                }
            }
            TouchPhase::Move => {
                if let Some(event) = self.touch.on_touch_move(&touch) {
                    self.dispatcher.dispatch(event);
                }
            }
            TouchPhase::End | TouchPhase::Cancel => {
                if let Some(event) = self.touch.on_touch_end(&touch) {
                    self.bindings
                        .detach(&mut self.host, target, Listener::TouchMove);
                    self.dispatcher.dispatch(event);
                }
            }
        }
    }

    fn on_scroll(&mut self, target: TargetId) {
        let event = self.scroll.on_scroll(self.host.scroll_offsets(target));
        self.dispatcher.dispatch(event);
    }
}

impl<H: EventHost> Drop for Engine<H> {
    fn drop(&mut self) {
        self.unbind();
    }
}

impl<H: EventHost + std::fmt::Debug> std::fmt::Debug for Engine<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("host", &self.host)
            .field("bindings", &self.bindings)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::gesture::host::RecordingHost;
    use crate::gesture::raw::TouchPoint;
    use crate::gesture::types::{Mode, Vec2};

    const CONTAINER: TargetId = TargetId(0);

    fn engine(events: &[EventCategory]) -> (Engine<RecordingHost>, Rc<RefCell<Vec<GestureEvent>>>) {
        let options = EngineOptions::new(Mode::Virtual, CONTAINER).with_events(events.iter().copied());
        let mut engine = Engine::new(options, RecordingHost::new(600.0)).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        engine
            .on(move |event: &GestureEvent| sink.borrow_mut().push(event.clone()))
            .unwrap();
        (engine, seen)
    }

    fn categories(seen: &Rc<RefCell<Vec<GestureEvent>>>) -> Vec<EventCategory> {
        seen.borrow().iter().map(|e| e.category).collect()
    }

    #[test]
    fn test_keys_category_wins() {
        let (mut engine, seen) = engine(&[
            EventCategory::Spacebar,
            EventCategory::Arrows,
            EventCategory::Keys,
        ]);
        engine.handle_event(CONTAINER, RawEvent::Key(KeyEvent::new(32)));
        engine.handle_event(CONTAINER, RawEvent::Key(KeyEvent::new(40)));
        assert_eq!(
            categories(&seen),
            vec![EventCategory::Keys, EventCategory::Keys]
        );
        assert_eq!(seen.borrow()[0].delta, Vec2::new(0.0, 600.0));
    }

    #[test]
    fn test_spacebar_only_ignores_arrows() {
        let (mut engine, seen) = engine(&[EventCategory::Spacebar]);
        engine.handle_event(CONTAINER, RawEvent::Key(KeyEvent::new(40)));
        engine.handle_event(CONTAINER, RawEvent::Key(KeyEvent::new(32)));
        assert_eq!(categories(&seen), vec![EventCategory::Spacebar]);
    }

    #[test]
    fn test_arrows_only_ignores_paging() {
        let (mut engine, seen) = engine(&[EventCategory::Arrows]);
        engine.handle_event(CONTAINER, RawEvent::Key(KeyEvent::new(34)));
        engine.handle_event(CONTAINER, RawEvent::Key(KeyEvent::new(37)));
        assert_eq!(categories(&seen), vec![EventCategory::Arrows]);
        assert_eq!(seen.borrow()[0].delta, Vec2::new(-80.0, 0.0));
    }

    #[test]
    fn test_editable_targets_and_unknown_keys_emit_nothing() {
        let (mut engine, seen) = engine(&[EventCategory::Keys]);
        engine.handle_event(CONTAINER, RawEvent::Key(KeyEvent::new(32).in_editable()));
        engine.handle_event(CONTAINER, RawEvent::Key(KeyEvent::new(65)));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_touch_move_listener_follows_gesture() {
        let (mut engine, seen) = engine(&[EventCategory::Touch]);
        assert!(!engine.host().is_subscribed(CONTAINER, Listener::TouchMove));

        let start = TouchEvent::single(TouchPhase::Start, TouchPoint::new(1, 100.0, 100.0), 0.0);
        engine.handle_event(CONTAINER, RawEvent::Touch(start));
        assert!(engine.host().is_subscribed(CONTAINER, Listener::TouchMove));

        let moved = TouchEvent::single(TouchPhase::Move, TouchPoint::new(1, 90.0, 80.0), 16.0);
        engine.handle_event(CONTAINER, RawEvent::Touch(moved));

        let end = TouchEvent::single(TouchPhase::Cancel, TouchPoint::new(1, 90.0, 80.0), 20.0);
        engine.handle_event(CONTAINER, RawEvent::Touch(end));
        assert!(!engine.host().is_subscribed(CONTAINER, Listener::TouchMove));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].delta, Vec2::new(10.0, 20.0));
        assert_eq!(seen[1].delta, engine.touch_state().momentum);
    }

    #[test]
    fn test_move_before_start_is_not_delivered() {
        let (mut engine, seen) = engine(&[EventCategory::Touch]);
        let moved = TouchEvent::single(TouchPhase::Move, TouchPoint::new(1, 90.0, 80.0), 16.0);
        engine.handle_event(CONTAINER, RawEvent::Touch(moved));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_excluded_touch_target() {
        let (mut engine, seen) = engine(&[EventCategory::Touch]);
        engine.set_excluded_touch_targets(vec![TargetId(9)]);

        let start = TouchEvent::single(TouchPhase::Start, TouchPoint::new(1, 0.0, 0.0), 0.0)
            .with_origin(TargetId(9));
        engine.handle_event(CONTAINER, RawEvent::Touch(start));
        assert!(engine.touch_state().owner_id.is_none());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_wheel_from_other_target_is_ignored() {
        let (mut engine, seen) = engine(&[EventCategory::Wheel]);
        engine.handle_event(TargetId(5), RawEvent::Wheel(WheelEvent::pixels(0.0, 3.0)));
        assert!(seen.borrow().is_empty());

        engine.handle_event(CONTAINER, RawEvent::Wheel(WheelEvent::pixels(0.0, 3.0)));
        assert_eq!(categories(&seen), vec![EventCategory::Wheel]);
    }
}
