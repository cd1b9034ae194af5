//! Gesture normalization and dispatch
//!
//! Turns wheel, touch, keyboard and scroll input into one stream of
//! [`GestureEvent`]s, each carrying a canonical 2D delta:
//! - Wheel deltas in pixel, line, page or legacy units collapse to pixels
//! - Touch drags follow a single owning contact and produce a momentum fling on release
//! - Key presses map to fixed displacements (arrows, paging, Home/End)
//! - Real scroll containers report the change in offset since the last sample
//!
//! # Architecture
//!
//! ```text
//! Host event → BindingManager (is this listener bound?)
//!                   ↓
//!     normalize / TouchGestureTracker / ScrollPositionTracker
//!                   ↓
//!             GestureEvent → Dispatcher (mute gate)
//!                               ↓            ↘
//!                           handler     global broadcast (optional)
//! ```
//!
//! # Usage
//!
//! ```
//! use gesture_relay::gesture::{
//!     Engine, EngineOptions, GestureEvent, Mode, RawEvent, RecordingHost, TargetId, WheelEvent,
//! };
//!
//! let container = TargetId(0);
//! let mut engine = Engine::new(
//!     EngineOptions::new(Mode::Virtual, container),
//!     RecordingHost::default(),
//! )?;
//! engine.on(|event: &GestureEvent| println!("{:?} {:?}", event.category, event.delta))?;
//!
//! // The host forwards payloads for the listeners the engine subscribed.
//! engine.handle_event(container, RawEvent::Wheel(WheelEvent::lines(0.0, 3.0)));
//!
//! engine.off();
//! # Ok::<(), gesture_relay::gesture::GestureError>(())
//! ```

mod binding;
mod dispatch;
mod engine;
mod error;
mod host;
mod normalize;
mod options;
mod raw;
mod scroll;
mod touch;
mod types;

// Re-export public API
pub use binding::{Binding, BindingManager, BindingState};
pub use dispatch::{Broadcast, Broadcasted, ChannelBroadcast, Dispatcher, GestureHandler};
pub use engine::Engine;
pub use error::{BroadcastError, GestureError};
pub use host::{EventHost, ListenOptions, Listener, RecordingHost, ScrollOffsets, TargetId};
pub use normalize::{
    ARROW_STEP, DELTA_MODE_SCALE, JUMP_SENTINEL, LEGACY_DELTA_SCALE, Normalize, NormalizeContext,
    STANDARD_DELTA_SCALE, normalize_key, normalize_wheel,
};
pub use options::{Configuration, EngineOptions, KeyMultiplier};
pub use raw::{KeyEvent, RawEvent, TouchEvent, TouchPhase, TouchPoint, WheelEvent};
pub use scroll::ScrollPositionTracker;
pub use touch::{FRAME_MS, MOMENTUM_SMOOTHING, TouchGestureState, TouchGestureTracker};
pub use types::{EventCategory, GestureEvent, KeyCode, Mode, Vec2};
