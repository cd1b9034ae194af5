//! Stateless conversion of wheel and key payloads into deltas

use super::options::KeyMultiplier;
use super::raw::{KeyEvent, WheelEvent};
use super::types::{KeyCode, Vec2};

/// Pixels per unit, indexed by wheel delta-mode (pixel, line, page)
pub const DELTA_MODE_SCALE: [f32; 3] = [1.0, 28.0, 500.0];

/// Divisor for standard wheel deltas
pub const STANDARD_DELTA_SCALE: f32 = 1.0;

/// Divisor for legacy wheel deltas; also flips their sign
pub const LEGACY_DELTA_SCALE: f32 = -3.0;

/// Arrow key step in pixels
pub const ARROW_STEP: f32 = 80.0;

/// Jump distance for Home/End
pub const JUMP_SENTINEL: f32 = 9_999_999.0;

/// Inputs a key normalization needs besides the payload itself
#[derive(Debug, Clone, Copy)]
pub struct NormalizeContext<'a> {
    pub key_multiplier: &'a KeyMultiplier,
    pub viewport_height: f32,
}

/// A raw payload that maps directly onto a delta
pub trait Normalize {
    fn normalize(&self, ctx: &NormalizeContext<'_>) -> Vec2;
}

impl Normalize for WheelEvent {
    fn normalize(&self, _ctx: &NormalizeContext<'_>) -> Vec2 {
        normalize_wheel(self)
    }
}

impl Normalize for KeyEvent {
    fn normalize(&self, ctx: &NormalizeContext<'_>) -> Vec2 {
        normalize_key(self.key_code, ctx.key_multiplier, ctx.viewport_height)
    }
}

fn delta_mode_scale(delta_mode: u32) -> f32 {
    DELTA_MODE_SCALE
        .get(delta_mode as usize)
        .copied()
        .unwrap_or(DELTA_MODE_SCALE[0])
}

/// Collapses the three wheel unit schemes into pixel-equivalent deltas
pub fn normalize_wheel(event: &WheelEvent) -> Vec2 {
    match *event {
        WheelEvent::Standard {
            delta_x,
            delta_y,
            delta_mode,
        } => {
            let scale = delta_mode_scale(delta_mode);
            Vec2::new(
                delta_x / STANDARD_DELTA_SCALE * scale,
                delta_y / STANDARD_DELTA_SCALE * scale,
            )
        }
        WheelEvent::Legacy {
            wheel_delta_x,
            wheel_delta_y,
        } => Vec2::new(
            wheel_delta_x / LEGACY_DELTA_SCALE,
            wheel_delta_y / LEGACY_DELTA_SCALE,
        ),
        WheelEvent::LegacySingleAxis { wheel_delta } => {
            Vec2::new(0.0, wheel_delta / LEGACY_DELTA_SCALE)
        }
    }
}

/// Displacement for a key press; unrecognized keys yield zero
///
/// Home and End jump by a fixed sentinel that the multiplier does not scale.
pub fn normalize_key(key_code: u32, multiplier: &KeyMultiplier, viewport_height: f32) -> Vec2 {
    let Some(key) = KeyCode::from_code(key_code) else {
        return Vec2::ZERO;
    };
    let m = multiplier.resolve(key_code);

    match key {
        KeyCode::Space | KeyCode::PageDown => Vec2::new(0.0, viewport_height * m),
        KeyCode::PageUp => Vec2::new(0.0, -viewport_height * m),
        KeyCode::Home => Vec2::new(0.0, -JUMP_SENTINEL),
        KeyCode::End => Vec2::new(0.0, JUMP_SENTINEL),
        KeyCode::Down => Vec2::new(0.0, ARROW_STEP * m),
        KeyCode::Up => Vec2::new(0.0, -ARROW_STEP * m),
        KeyCode::Right => Vec2::new(ARROW_STEP * m, 0.0),
        KeyCode::Left => Vec2::new(-ARROW_STEP * m, 0.0),
    }
}
