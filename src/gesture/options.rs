//! Engine options and their validated form

use std::collections::HashMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::error::GestureError;
use super::host::TargetId;
use super::types::{EventCategory, Mode};

/// Key multiplier: one factor for every key, or a factor per key code
///
/// Config files can only carry string map keys, so per-key tables are read
/// as `"40" = 0.5` and the codes parsed on load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KeyMultiplier {
    Uniform(f32),
    PerKey(HashMap<u32, f32>),
}

impl<'de> Deserialize<'de> for KeyMultiplier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Uniform(f32),
            PerKey(HashMap<String, f32>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Uniform(factor) => Ok(Self::Uniform(factor)),
            Repr::PerKey(table) => table
                .into_iter()
                .map(|(code, factor)| {
                    code.trim()
                        .parse::<u32>()
                        .map(|code| (code, factor))
                        .map_err(|_| D::Error::custom(format!("key code `{code}` is not a number")))
                })
                .collect::<Result<HashMap<_, _>, _>>()
                .map(Self::PerKey),
        }
    }
}

impl KeyMultiplier {
    /// Factor for `key_code`; absent, zero or NaN entries fall back to 1
    pub fn resolve(&self, key_code: u32) -> f32 {
        let factor = match self {
            Self::Uniform(factor) => Some(*factor),
            Self::PerKey(map) => map.get(&key_code).copied(),
        };
        match factor {
            Some(f) if f != 0.0 && !f.is_nan() => f,
            _ => 1.0,
        }
    }
}

impl Default for KeyMultiplier {
    fn default() -> Self {
        Self::Uniform(1.0)
    }
}

/// User-facing engine options
///
/// `mode` and `events` are kept as names so that unknown values survive until
/// binding, where they are reported and skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub mode: String,
    pub events: Vec<String>,
    pub container: Option<TargetId>,
    pub hook: Option<TargetId>,
    pub passive: bool,
    pub emit_global: bool,
    pub touch_multiplier: f32,
    pub key_multiplier: KeyMultiplier,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Virtual.as_str().to_string(),
            events: [EventCategory::Wheel, EventCategory::Touch, EventCategory::Keys]
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
            container: None,
            hook: None,
            passive: true,
            emit_global: false,
            touch_multiplier: 1.0,
            key_multiplier: KeyMultiplier::default(),
        }
    }
}

impl EngineOptions {
    /// Default options in `mode` with `container` as the primary target
    pub fn new(mode: Mode, container: TargetId) -> Self {
        Self {
            mode: mode.as_str().to_string(),
            container: Some(container),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn with_events<I>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = EventCategory>,
    {
        self.events = events.into_iter().map(|c| c.as_str().to_string()).collect();
        self
    }

    /// Replace the event list with raw names, unknown ones included
    pub fn with_event_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_container(mut self, container: TargetId) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_hook(mut self, hook: TargetId) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn with_passive(mut self, passive: bool) -> Self {
        self.passive = passive;
        self
    }

    pub fn with_emit_global(mut self, emit_global: bool) -> Self {
        self.emit_global = emit_global;
        self
    }

    pub fn with_touch_multiplier(mut self, multiplier: f32) -> Self {
        self.touch_multiplier = multiplier;
        self
    }

    pub fn with_key_multiplier(mut self, multiplier: KeyMultiplier) -> Self {
        self.key_multiplier = multiplier;
        self
    }

    /// Checks target requirements and freezes the options
    pub fn validate(self) -> Result<Configuration, GestureError> {
        Configuration::try_from(self)
    }
}

/// Validated, immutable engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    mode_name: String,
    mode: Option<Mode>,
    events: Vec<String>,
    container: Option<TargetId>,
    hook: Option<TargetId>,
    passive: bool,
    emit_global: bool,
    touch_multiplier: f32,
    key_multiplier: KeyMultiplier,
}

impl TryFrom<EngineOptions> for Configuration {
    type Error = GestureError;

    fn try_from(options: EngineOptions) -> Result<Self, Self::Error> {
        let mode = options.mode.parse::<Mode>().ok();

        match mode {
            Some(mode @ (Mode::Virtual | Mode::Native)) if options.container.is_none() => {
                return Err(GestureError::MissingContainer { mode });
            }
            Some(Mode::Fake) if options.hook.is_none() => {
                return Err(GestureError::MissingHook);
            }
            _ => {}
        }

        Ok(Self {
            mode_name: options.mode,
            mode,
            events: options.events,
            container: options.container,
            hook: options.hook,
            passive: options.passive,
            emit_global: options.emit_global,
            touch_multiplier: options.touch_multiplier,
            key_multiplier: options.key_multiplier,
        })
    }
}

impl Configuration {
    /// Parsed mode, `None` when the configured name is outside the known set
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn mode_name(&self) -> &str {
        &self.mode_name
    }

    /// Event category names as configured
    pub fn event_names(&self) -> &[String] {
        &self.events
    }

    /// Recognized categories, in configuration order, without duplicates
    pub fn categories(&self) -> Vec<EventCategory> {
        let mut categories = Vec::new();
        for category in self.events.iter().filter_map(|name| name.parse().ok()) {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        categories
    }

    pub fn has_category(&self, category: EventCategory) -> bool {
        self.events.iter().any(|name| name == category.as_str())
    }

    pub fn container(&self) -> Option<TargetId> {
        self.container
    }

    pub fn hook(&self) -> Option<TargetId> {
        self.hook
    }

    /// Target whose scroll position is observed in native and fake modes
    pub fn scroll_target(&self) -> Option<TargetId> {
        match self.mode? {
            Mode::Native => self.container,
            Mode::Fake => self.hook,
            Mode::Virtual => None,
        }
    }

    pub fn passive(&self) -> bool {
        self.passive
    }

    pub fn emit_global(&self) -> bool {
        self.emit_global
    }

    pub fn touch_multiplier(&self) -> f32 {
        self.touch_multiplier
    }

    pub fn key_multiplier(&self) -> &KeyMultiplier {
        &self.key_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EngineOptions::default();
        assert_eq!(options.mode, "virtual");
        assert_eq!(options.events, vec!["wheel", "touch", "keys"]);
        assert!(options.passive);
        assert!(!options.emit_global);
        assert_eq!(options.touch_multiplier, 1.0);
    }

    #[test]
    fn test_virtual_and_native_need_container() {
        let err = EngineOptions::default().validate().unwrap_err();
        assert_eq!(err, GestureError::MissingContainer { mode: Mode::Virtual });

        let err = EngineOptions::default()
            .with_mode("native")
            .validate()
            .unwrap_err();
        assert_eq!(err, GestureError::MissingContainer { mode: Mode::Native });
    }

    #[test]
    fn test_fake_needs_hook() {
        let err = EngineOptions::new(Mode::Fake, TargetId(1))
            .validate()
            .unwrap_err();
        assert_eq!(err, GestureError::MissingHook);

        let config = EngineOptions::new(Mode::Fake, TargetId(1))
            .with_hook(TargetId(2))
            .validate()
            .unwrap();
        assert_eq!(config.scroll_target(), Some(TargetId(2)));
    }

    #[test]
    fn test_unknown_mode_validates() {
        let config = EngineOptions::default()
            .with_mode("sideways")
            .validate()
            .unwrap();
        assert_eq!(config.mode(), None);
        assert_eq!(config.mode_name(), "sideways");
    }

    #[test]
    fn test_categories_skip_unknown_and_duplicates() {
        let config = EngineOptions::new(Mode::Virtual, TargetId(0))
            .with_event_names(["wheel", "pinch", "wheel", "touch"])
            .validate()
            .unwrap();
        assert_eq!(
            config.categories(),
            vec![EventCategory::Wheel, EventCategory::Touch]
        );
        assert!(!config.has_category(EventCategory::Keys));
    }

    #[test]
    fn test_key_multiplier_resolution() {
        assert_eq!(KeyMultiplier::Uniform(2.0).resolve(32), 2.0);
        assert_eq!(KeyMultiplier::Uniform(0.0).resolve(32), 1.0);
        assert_eq!(KeyMultiplier::Uniform(f32::NAN).resolve(32), 1.0);

        let per_key = KeyMultiplier::PerKey(HashMap::from([(40, 3.0), (38, 0.0)]));
        assert_eq!(per_key.resolve(40), 3.0);
        assert_eq!(per_key.resolve(38), 1.0);
        assert_eq!(per_key.resolve(32), 1.0);
    }
}
