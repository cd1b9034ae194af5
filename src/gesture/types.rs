//! Canonical gesture values

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::raw::RawEvent;

/// 2D displacement or position in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from([x, y]: [f32; 2]) -> Self {
        Self::new(x, y)
    }
}

/// Kind of input a [`GestureEvent`] was normalized from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Wheel,
    Touch,
    Spacebar,
    Arrows,
    Keys,
    Scroll,
}

impl EventCategory {
    pub const ALL: [EventCategory; 6] = [
        Self::Wheel,
        Self::Touch,
        Self::Spacebar,
        Self::Arrows,
        Self::Keys,
        Self::Scroll,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wheel => "wheel",
            Self::Touch => "touch",
            Self::Spacebar => "spacebar",
            Self::Arrows => "arrows",
            Self::Keys => "keys",
            Self::Scroll => "scroll",
        }
    }

    /// Name used when the event is re-broadcast on the global channel
    pub fn broadcast_name(self) -> String {
        format!("gesture-{}", self.as_str())
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Strategy for sourcing scroll-equivalent input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Synthesize deltas from wheel, touch and key events; the target never scrolls
    Virtual,
    /// Diff the real scroll position of the container
    Native,
    /// Diff the scroll position of a decoy hook element
    Fake,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Self::Virtual, Self::Native, Self::Fake];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Virtual => "virtual",
            Self::Native => "native",
            Self::Fake => "fake",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Key codes with a scroll meaning (DOM `keyCode` values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum KeyCode {
    Space = 32,
    PageUp = 33,
    PageDown = 34,
    End = 35,
    Home = 36,
    Left = 37,
    Up = 38,
    Right = 39,
    Down = 40,
}

impl KeyCode {
    pub const ALL: [KeyCode; 9] = [
        Self::Space,
        Self::PageUp,
        Self::PageDown,
        Self::End,
        Self::Home,
        Self::Left,
        Self::Up,
        Self::Right,
        Self::Down,
    ];

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.code() == code)
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn is_arrow(self) -> bool {
        matches!(self, Self::Left | Self::Up | Self::Right | Self::Down)
    }
}

/// A normalized input occurrence handed to the registered handler
#[derive(Debug, Clone, PartialEq)]
pub struct GestureEvent {
    pub category: EventCategory,
    /// Displacement the content should conceptually move by
    pub delta: Vec2,
    /// Platform payload the delta was computed from
    pub source: RawEvent,
}

impl GestureEvent {
    pub fn new(category: EventCategory, delta: Vec2, source: RawEvent) -> Self {
        Self {
            category,
            delta,
            source,
        }
    }
}
