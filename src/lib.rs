//! Gesture Relay
//!
//! Normalizes wheel, touch, keyboard and scroll input into a single stream
//! of gesture deltas, with a winit front end for desktop windows.

/// Build-time information (version, timestamp, toolchain)
pub mod build_info;

/// Layered configuration (profile files and environment)
pub mod config;

/// Gesture normalization engine
pub mod gesture;

/// Self-checks run by `relay --check`
pub mod health;

/// Platform adapters feeding raw input into the engine
pub mod platform;
