//! Boundary to the host environment's event subscription primitives

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::Vec2;

/// Opaque handle to an element (or the window) owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub u32);

/// Low-level listener kinds the engine can subscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    Wheel,
    LegacyWheel,
    TouchStart,
    TouchMove,
    TouchEnd,
    TouchCancel,
    KeyDown,
    Scroll,
}

impl Listener {
    /// Host event name
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Wheel => "wheel",
            Self::LegacyWheel => "mousewheel",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
            Self::TouchCancel => "touchcancel",
            Self::KeyDown => "keydown",
            Self::Scroll => "scroll",
        }
    }
}

/// Options passed along with every subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenOptions {
    /// Listener promises never to cancel the default action
    pub passive: bool,
}

/// Scroll offsets a host can report for a target
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffsets {
    /// Window-style global page offset
    pub page: Option<Vec2>,
    /// Element-local scroll offset
    pub local: Option<Vec2>,
}

impl ScrollOffsets {
    pub fn page(offset: Vec2) -> Self {
        Self {
            page: Some(offset),
            local: None,
        }
    }

    pub fn local(offset: Vec2) -> Self {
        Self {
            page: None,
            local: Some(offset),
        }
    }

    /// Page offset first, then the local offset, then zero
    pub fn resolve(self) -> Vec2 {
        self.page.or(self.local).unwrap_or_default()
    }
}

/// Host-side event plumbing the engine consumes
///
/// The host delivers payloads for subscribed listeners through
/// [`Engine::handle_event`](super::Engine::handle_event).
pub trait EventHost {
    /// Start delivering `listener` events for `target`
    fn subscribe(&mut self, target: TargetId, listener: Listener, options: ListenOptions);

    /// Stop delivering `listener` events for `target`
    ///
    /// Must be a silent no-op if the pair was never subscribed.
    fn unsubscribe(&mut self, target: TargetId, listener: Listener);

    /// Current scroll offsets of `target`
    fn scroll_offsets(&self, target: TargetId) -> ScrollOffsets;

    /// Height of the visible viewport in logical pixels
    fn viewport_height(&self) -> f32;
}

/// In-memory host that records subscriptions and serves scripted offsets
///
/// Used by the self-checks and the test suite.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    subscriptions: Vec<(TargetId, Listener, ListenOptions)>,
    offsets: HashMap<TargetId, ScrollOffsets>,
    viewport_height: f32,
    subscribe_calls: usize,
    unsubscribe_calls: usize,
}

impl RecordingHost {
    pub fn new(viewport_height: f32) -> Self {
        Self {
            subscriptions: Vec::new(),
            offsets: HashMap::new(),
            viewport_height,
            subscribe_calls: 0,
            unsubscribe_calls: 0,
        }
    }

    pub fn set_scroll_offsets(&mut self, target: TargetId, offsets: ScrollOffsets) {
        self.offsets.insert(target, offsets);
    }

    pub fn is_subscribed(&self, target: TargetId, listener: Listener) -> bool {
        self.subscriptions
            .iter()
            .any(|(t, l, _)| *t == target && *l == listener)
    }

    pub fn options_for(&self, target: TargetId, listener: Listener) -> Option<ListenOptions> {
        self.subscriptions
            .iter()
            .find(|(t, l, _)| *t == target && *l == listener)
            .map(|(_, _, options)| *options)
    }

    /// Listeners currently subscribed on `target`
    pub fn listeners(&self, target: TargetId) -> Vec<Listener> {
        self.subscriptions
            .iter()
            .filter(|(t, _, _)| *t == target)
            .map(|(_, l, _)| *l)
            .collect()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls
    }

    pub fn unsubscribe_calls(&self) -> usize {
        self.unsubscribe_calls
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new(800.0)
    }
}

impl EventHost for RecordingHost {
    fn subscribe(&mut self, target: TargetId, listener: Listener, options: ListenOptions) {
        self.subscribe_calls += 1;
        if !self.is_subscribed(target, listener) {
            self.subscriptions.push((target, listener, options));
        }
    }

    fn unsubscribe(&mut self, target: TargetId, listener: Listener) {
        self.unsubscribe_calls += 1;
        self.subscriptions
            .retain(|(t, l, _)| !(*t == target && *l == listener));
    }

    fn scroll_offsets(&self, target: TargetId) -> ScrollOffsets {
        self.offsets.get(&target).copied().unwrap_or_default()
    }

    fn viewport_height(&self) -> f32 {
        self.viewport_height
    }
}
