//! Configuration profile check

use crate::config::RelayConfig;
use crate::health::check::{CheckResult, CheckStatus, SystemCheck};

/// Loads each profile and validates its engine options
pub struct ConfigCheck {
    profiles: Vec<&'static str>,
}

impl ConfigCheck {
    pub fn new() -> Self {
        Self::with_profiles(vec!["debug", "release"])
    }

    pub fn with_profiles(profiles: Vec<&'static str>) -> Self {
        Self { profiles }
    }
}

impl Default for ConfigCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for ConfigCheck {
    fn name(&self) -> &'static str {
        "Configuration"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Loads every profile and validates its engine options")
    }

    fn check(&self) -> CheckResult {
        let mut status = CheckStatus::Pass;
        let mut details = Vec::new();

        for profile in &self.profiles {
            let config = match RelayConfig::load(profile) {
                Ok(config) => config,
                Err(e) => {
                    details.push(format!("✗ {profile}: failed to load: {e}"));
                    status = CheckStatus::Fail;
                    continue;
                }
            };

            match config.engine.clone().validate() {
                Ok(engine) => {
                    let unknown: Vec<&String> = engine
                        .event_names()
                        .iter()
                        .filter(|name| name.parse::<crate::gesture::EventCategory>().is_err())
                        .collect();
                    if engine.mode().is_none() || !unknown.is_empty() {
                        details.push(format!(
                            "⚠ {profile}: mode '{}', unknown events {unknown:?}",
                            engine.mode_name()
                        ));
                        status = status.worst(CheckStatus::Warn);
                    } else {
                        details.push(format!(
                            "✓ {profile}: {} mode, events {:?}",
                            engine.mode_name(),
                            engine.event_names()
                        ));
                    }
                }
                Err(e) => {
                    details.push(format!("✗ {profile}: invalid engine options: {e}"));
                    status = CheckStatus::Fail;
                }
            }
        }

        let message = match status {
            CheckStatus::Pass => format!("{} profiles validated", self.profiles.len()),
            CheckStatus::Warn => "profiles load with warnings".to_string(),
            CheckStatus::Fail => "one or more profiles are invalid".to_string(),
        };
        CheckResult::new(status, message).with_details(details)
    }
}
