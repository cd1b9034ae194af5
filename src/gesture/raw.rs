//! Raw platform event payloads
//!
//! These mirror what a browser-like host hands to a listener. Nothing here is
//! normalized yet; see [`super::normalize`] and the trackers for that.

use super::host::{Listener, TargetId};
use super::types::Vec2;

/// Any payload a bound listener can receive
#[derive(Debug, Clone, PartialEq)]
pub enum RawEvent {
    Wheel(WheelEvent),
    Touch(TouchEvent),
    Key(KeyEvent),
    /// The target's scroll position changed; the offset is read back from the host
    Scroll,
}

impl RawEvent {
    /// The low-level listener this payload is delivered through
    pub fn listener(&self) -> Listener {
        match self {
            Self::Wheel(WheelEvent::Standard { .. }) => Listener::Wheel,
            Self::Wheel(_) => Listener::LegacyWheel,
            Self::Touch(touch) => match touch.phase {
                TouchPhase::Start => Listener::TouchStart,
                TouchPhase::Move => Listener::TouchMove,
                TouchPhase::End => Listener::TouchEnd,
                TouchPhase::Cancel => Listener::TouchCancel,
            },
            Self::Key(_) => Listener::KeyDown,
            Self::Scroll => Listener::Scroll,
        }
    }
}

/// Wheel payloads in the three shapes browsers have shipped over the years
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelEvent {
    /// Signed per-axis deltas plus a delta-mode enumerant (0 = pixel, 1 = line, 2 = page)
    Standard {
        delta_x: f32,
        delta_y: f32,
        delta_mode: u32,
    },
    /// Legacy per-axis wheel deltas in ±120 steps, inverted sign
    Legacy {
        wheel_delta_x: f32,
        wheel_delta_y: f32,
    },
    /// Legacy single-axis wheel delta (old touchpad path)
    LegacySingleAxis { wheel_delta: f32 },
}

impl WheelEvent {
    pub const DELTA_MODE_PIXEL: u32 = 0;
    pub const DELTA_MODE_LINE: u32 = 1;
    pub const DELTA_MODE_PAGE: u32 = 2;

    pub fn pixels(delta_x: f32, delta_y: f32) -> Self {
        Self::Standard {
            delta_x,
            delta_y,
            delta_mode: Self::DELTA_MODE_PIXEL,
        }
    }

    pub fn lines(delta_x: f32, delta_y: f32) -> Self {
        Self::Standard {
            delta_x,
            delta_y,
            delta_mode: Self::DELTA_MODE_LINE,
        }
    }
}

/// Lifecycle stage of a touch payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// One contact on a touch surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Stable for the lifetime of the contact
    pub id: u64,
    /// Client position in logical pixels
    pub position: Vec2,
}

impl TouchPoint {
    pub fn new(id: u64, x: f32, y: f32) -> Self {
        Self {
            id,
            position: Vec2::new(x, y),
        }
    }
}

/// Touch payload
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    /// Every contact currently on the surface
    pub touches: Vec<TouchPoint>,
    /// Contacts that started, moved or lifted in this event
    pub changed_touches: Vec<TouchPoint>,
    /// Event timestamp in milliseconds
    pub time_ms: f64,
    /// Element the touch landed on, if the host knows it
    pub origin: Option<TargetId>,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, time_ms: f64) -> Self {
        Self {
            phase,
            touches: Vec::new(),
            changed_touches: Vec::new(),
            time_ms,
            origin: None,
        }
    }

    /// Builds a payload where `changed` is also listed among the active contacts
    /// (or removed from them, for end and cancel)
    pub fn single(phase: TouchPhase, changed: TouchPoint, time_ms: f64) -> Self {
        let touches = match phase {
            TouchPhase::End | TouchPhase::Cancel => Vec::new(),
            _ => vec![changed],
        };
        Self {
            phase,
            touches,
            changed_touches: vec![changed],
            time_ms,
            origin: None,
        }
    }

    pub fn with_touches(mut self, touches: Vec<TouchPoint>) -> Self {
        self.touches = touches;
        self
    }

    pub fn with_changed(mut self, changed: Vec<TouchPoint>) -> Self {
        self.changed_touches = changed;
        self
    }

    pub fn with_origin(mut self, origin: TargetId) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn find_touch(&self, id: u64) -> Option<&TouchPoint> {
        self.touches.iter().find(|touch| touch.id == id)
    }

    pub fn find_changed(&self, id: u64) -> Option<&TouchPoint> {
        self.changed_touches.iter().find(|touch| touch.id == id)
    }
}

/// Key-down payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// DOM `keyCode`
    pub key_code: u32,
    /// Target is a text-editing control; the key belongs to the user's typing
    pub editable_target: bool,
}

impl KeyEvent {
    pub fn new(key_code: u32) -> Self {
        Self {
            key_code,
            editable_target: false,
        }
    }

    pub fn in_editable(mut self) -> Self {
        self.editable_target = true;
        self
    }
}
