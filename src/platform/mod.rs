//! Platform adapters feeding raw payloads into the engine
//!
//! ```text
//! winit WindowEvent → WinitCollector → RawEvent → Engine::handle_event
//! ```

mod desktop;

pub use desktop::{WinitCollector, WinitHost, dom_key_code, wheel_from_delta};
