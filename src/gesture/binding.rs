//! Listener binding lifecycle
//!
//! The manager owns the table of every `(target, listener)` pair it has
//! subscribed, so unbinding removes exactly what binding (and any dynamic
//! attach since) added.

use tracing::{debug, warn};

use super::host::{EventHost, ListenOptions, Listener, TargetId};
use super::options::Configuration;
use super::types::{EventCategory, Mode};

/// Whether listeners are currently attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingState {
    #[default]
    Unbound,
    Bound,
}

/// One subscribed listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    pub target: TargetId,
    pub listener: Listener,
}

/// Attaches and detaches the listener set a configuration calls for
#[derive(Debug, Default)]
pub struct BindingManager {
    state: BindingState,
    bindings: Vec<Binding>,
}

impl BindingManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BindingState {
        self.state
    }

    pub fn is_bound(&self) -> bool {
        self.state == BindingState::Bound
    }

    /// Currently subscribed listeners
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn is_listening_to(&self, target: TargetId, listener: Listener) -> bool {
        self.bindings.contains(&Binding { target, listener })
    }

    /// Listeners `config` calls for at bind time
    ///
    /// Unknown categories and modes are reported here and contribute nothing.
    pub fn plan(config: &Configuration) -> Vec<Binding> {
        let mut plan = Vec::new();

        match config.mode() {
            Some(Mode::Virtual) => {
                let Some(container) = config.container() else {
                    return plan;
                };
                let keys = config.has_category(EventCategory::Keys);

                for name in config.event_names() {
                    let Ok(category) = name.parse::<EventCategory>() else {
                        warn!(category = %name, "unrecognized event category, skipping");
                        continue;
                    };
                    match category {
                        EventCategory::Wheel => {
                            push_unique(&mut plan, container, Listener::Wheel);
                            push_unique(&mut plan, container, Listener::LegacyWheel);
                        }
                        EventCategory::Touch => {
                            push_unique(&mut plan, container, Listener::TouchStart);
                            push_unique(&mut plan, container, Listener::TouchEnd);
                            push_unique(&mut plan, container, Listener::TouchCancel);
                        }
                        EventCategory::Keys => push_unique(&mut plan, container, Listener::KeyDown),
                        EventCategory::Spacebar | EventCategory::Arrows => {
                            if !keys {
                                push_unique(&mut plan, container, Listener::KeyDown);
                            }
                        }
                        EventCategory::Scroll => {
                            debug!("scroll category has no listener in virtual mode");
                        }
                    }
                }
            }
            Some(Mode::Native) => {
                if let Some(container) = config.container() {
                    push_unique(&mut plan, container, Listener::Scroll);
                }
            }
            Some(Mode::Fake) => {
                if let Some(hook) = config.hook() {
                    push_unique(&mut plan, hook, Listener::Scroll);
                }
            }
            None => {
                warn!(mode = %config.mode_name(), "unsupported mode, no listeners attached");
            }
        }

        plan
    }

    /// Subscribes every planned listener
    ///
    /// Returns false without touching the host when already bound.
    pub fn bind<H: EventHost + ?Sized>(&mut self, config: &Configuration, host: &mut H) -> bool {
        if self.is_bound() {
            warn!("bind requested while already bound, ignoring");
            return false;
        }

        let options = ListenOptions {
            passive: config.passive(),
        };
        for binding in Self::plan(config) {
            host.subscribe(binding.target, binding.listener, options);
            self.bindings.push(binding);
        }
        self.state = BindingState::Bound;
        debug!(
            mode = %config.mode_name(),
            listeners = self.bindings.len(),
            "listeners bound"
        );
        true
    }

    /// Removes every recorded listener; safe to call in any state
    pub fn unbind<H: EventHost + ?Sized>(&mut self, host: &mut H) {
        for binding in self.bindings.drain(..) {
            host.unsubscribe(binding.target, binding.listener);
        }
        if self.state == BindingState::Bound {
            debug!("listeners unbound");
        }
        self.state = BindingState::Unbound;
    }

    /// Adds a listener while bound (e.g. touch-move during a gesture)
    pub fn attach<H: EventHost + ?Sized>(
        &mut self,
        host: &mut H,
        target: TargetId,
        listener: Listener,
        options: ListenOptions,
    ) -> bool {
        if !self.is_bound() || self.is_listening_to(target, listener) {
            return false;
        }
        host.subscribe(target, listener, options);
        self.bindings.push(Binding { target, listener });
        debug!(event = listener.event_name(), "listener attached");
        true
    }

    /// Removes a single listener if present
    pub fn detach<H: EventHost + ?Sized>(
        &mut self,
        host: &mut H,
        target: TargetId,
        listener: Listener,
    ) -> bool {
        let binding = Binding { target, listener };
        let Some(index) = self.bindings.iter().position(|b| *b == binding) else {
            return false;
        };
        self.bindings.remove(index);
        host.unsubscribe(target, listener);
        debug!(event = listener.event_name(), "listener detached");
        true
    }
}

fn push_unique(plan: &mut Vec<Binding>, target: TargetId, listener: Listener) {
    let binding = Binding { target, listener };
    if !plan.contains(&binding) {
        plan.push(binding);
    }
}
