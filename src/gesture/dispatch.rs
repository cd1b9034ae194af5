//! Single-consumer delivery with an optional global re-broadcast

use futures::channel::mpsc;
use tracing::{debug, trace};

use super::error::BroadcastError;
use super::types::GestureEvent;

/// Consumer of normalized gesture events
///
/// Implemented for any `FnMut(&GestureEvent)`.
pub trait GestureHandler {
    fn handle(&mut self, event: &GestureEvent);
}

impl<F> GestureHandler for F
where
    F: FnMut(&GestureEvent),
{
    fn handle(&mut self, event: &GestureEvent) {
        self(event)
    }
}

/// Process-wide publish capability, keyed by event name
pub trait Broadcast {
    fn publish(&mut self, name: &str, event: &GestureEvent) -> Result<(), BroadcastError>;
}

/// Message carried by [`ChannelBroadcast`]
#[derive(Debug, Clone, PartialEq)]
pub struct Broadcasted {
    pub name: String,
    pub event: GestureEvent,
}

/// [`Broadcast`] over a bounded futures channel
#[derive(Debug, Clone)]
pub struct ChannelBroadcast {
    sender: mpsc::Sender<Broadcasted>,
}

impl ChannelBroadcast {
    /// Creates the publishing side and the receiver observers read from
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Broadcasted>) {
        let (sender, receiver) = mpsc::channel(buffer);
        (Self { sender }, receiver)
    }
}

impl Broadcast for ChannelBroadcast {
    fn publish(&mut self, name: &str, event: &GestureEvent) -> Result<(), BroadcastError> {
        let message = Broadcasted {
            name: name.to_string(),
            event: event.clone(),
        };
        self.sender.try_send(message).map_err(|err| {
            if err.is_full() {
                BroadcastError::Full
            } else {
                BroadcastError::Disconnected
            }
        })
    }
}

/// Applies the mute gate and hands events to the registered handler
pub struct Dispatcher {
    handler: Option<Box<dyn GestureHandler>>,
    listening: bool,
    emit_global: bool,
    broadcast: Option<Box<dyn Broadcast>>,
}

impl Dispatcher {
    pub fn new(emit_global: bool) -> Self {
        Self {
            handler: None,
            listening: true,
            emit_global,
            broadcast: None,
        }
    }

    pub fn set_broadcast(&mut self, broadcast: Box<dyn Broadcast>) {
        self.broadcast = Some(broadcast);
    }

    pub fn take_broadcast(&mut self) -> Option<Box<dyn Broadcast>> {
        self.broadcast.take()
    }

    pub fn set_handler(&mut self, handler: Box<dyn GestureHandler>) {
        self.handler = Some(handler);
    }

    pub fn clear_handler(&mut self) {
        self.handler = None;
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub fn set_listening(&mut self, listening: bool) {
        self.listening = listening;
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Delivers `event` unless muted
    ///
    /// A failed re-broadcast is logged and never affects primary delivery.
    pub fn dispatch(&mut self, event: GestureEvent) {
        if !self.listening {
            trace!(category = %event.category, "muted, dropping event");
            return;
        }

        if let Some(handler) = self.handler.as_mut() {
            handler.handle(&event);
        }

        if self.emit_global
            && let Some(broadcast) = self.broadcast.as_mut()
        {
            let name = event.category.broadcast_name();
            if let Err(err) = broadcast.publish(&name, &event) {
                debug!(%name, error = %err, "global re-broadcast dropped");
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("has_handler", &self.has_handler())
            .field("listening", &self.listening)
            .field("emit_global", &self.emit_global)
            .field("has_broadcast", &self.broadcast.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::gesture::raw::{RawEvent, WheelEvent};
    use crate::gesture::types::{EventCategory, Vec2};

    fn wheel_event() -> GestureEvent {
        GestureEvent::new(
            EventCategory::Wheel,
            Vec2::new(0.0, 10.0),
            RawEvent::Wheel(WheelEvent::pixels(0.0, 10.0)),
        )
    }

    fn collecting(dispatcher: &mut Dispatcher) -> Rc<RefCell<Vec<GestureEvent>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        dispatcher.set_handler(Box::new(move |event: &GestureEvent| {
            sink.borrow_mut().push(event.clone())
        }));
        seen
    }

    struct FailingBroadcast;

    impl Broadcast for FailingBroadcast {
        fn publish(&mut self, _: &str, _: &GestureEvent) -> Result<(), BroadcastError> {
            Err(BroadcastError::Disconnected)
        }
    }

    #[test]
    fn test_delivers_to_handler() {
        let mut dispatcher = Dispatcher::new(false);
        let seen = collecting(&mut dispatcher);
        dispatcher.dispatch(wheel_event());
        assert_eq!(seen.borrow().as_slice(), &[wheel_event()]);
    }

    #[test]
    fn test_muted_drops_events() {
        let mut dispatcher = Dispatcher::new(false);
        let seen = collecting(&mut dispatcher);
        dispatcher.set_listening(false);
        dispatcher.dispatch(wheel_event());
        assert!(seen.borrow().is_empty());

        dispatcher.set_listening(true);
        dispatcher.dispatch(wheel_event());
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_rebroadcast_under_category_name() {
        let (broadcast, mut receiver) = ChannelBroadcast::channel(4);
        let mut dispatcher = Dispatcher::new(true);
        dispatcher.set_broadcast(Box::new(broadcast));
        let seen = collecting(&mut dispatcher);

        dispatcher.dispatch(wheel_event());

        assert_eq!(seen.borrow().len(), 1);
        let message = receiver.try_next().unwrap().unwrap();
        assert_eq!(message.name, "gesture-wheel");
        assert_eq!(message.event, wheel_event());
    }

    #[test]
    fn test_no_rebroadcast_when_disabled() {
        let (broadcast, mut receiver) = ChannelBroadcast::channel(4);
        let mut dispatcher = Dispatcher::new(false);
        dispatcher.set_broadcast(Box::new(broadcast));
        dispatcher.dispatch(wheel_event());
        assert!(receiver.try_next().is_err());
    }

    #[test]
    fn test_rebroadcast_failure_is_not_fatal() {
        let mut dispatcher = Dispatcher::new(true);
        dispatcher.set_broadcast(Box::new(FailingBroadcast));
        let seen = collecting(&mut dispatcher);

        dispatcher.dispatch(wheel_event());
        dispatcher.dispatch(wheel_event());
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_channel_reports_disconnect() {
        let (mut broadcast, receiver) = ChannelBroadcast::channel(4);
        drop(receiver);
        assert_eq!(
            broadcast.publish("gesture-wheel", &wheel_event()),
            Err(BroadcastError::Disconnected)
        );
    }

    #[test]
    fn test_emit_global_without_channel() {
        let mut dispatcher = Dispatcher::new(true);
        let seen = collecting(&mut dispatcher);
        dispatcher.dispatch(wheel_event());
        assert_eq!(seen.borrow().len(), 1);
    }
}
