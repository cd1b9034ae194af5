//! Check trait and result types

use std::time::Duration;

use colored::Colorize;

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Everything checked out
    Pass,
    /// Usable, but something looked off
    Warn,
    /// The checked subsystem is broken
    Fail,
}

impl CheckStatus {
    /// Pass or Warn
    pub fn is_ok(&self) -> bool {
        !self.is_fail()
    }

    /// Fail only
    pub fn is_fail(&self) -> bool {
        matches!(self, CheckStatus::Fail)
    }

    /// Colored label for terminal output
    pub fn label(&self) -> String {
        match self {
            CheckStatus::Pass => "PASS".green().to_string(),
            CheckStatus::Warn => "WARN".yellow().to_string(),
            CheckStatus::Fail => "FAIL".red().to_string(),
        }
    }

    /// The worse of two statuses
    pub fn worst(self, other: CheckStatus) -> CheckStatus {
        match (self, other) {
            (CheckStatus::Fail, _) | (_, CheckStatus::Fail) => CheckStatus::Fail,
            (CheckStatus::Warn, _) | (_, CheckStatus::Warn) => CheckStatus::Warn,
            _ => CheckStatus::Pass,
        }
    }
}

/// Result of a check, with optional detail lines
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Outcome of the check
    pub status: CheckStatus,
    /// One-line summary shown in the report table
    pub message: String,
    /// Extra lines printed under the table, one per observation
    pub details: Vec<String>,
    /// Filled in by the runner
    pub duration: Duration,
}

impl CheckResult {
    /// Creates a result with the given status and no details
    pub fn new(status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    /// Creates a passing result
    pub fn pass(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Pass, message)
    }

    /// Creates a warning result
    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Warn, message)
    }

    /// Creates a failing result
    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Fail, message)
    }

    /// Replaces the detail lines
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// Records how long the check took
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// A named self-check
pub trait SystemCheck {
    /// Row label in the report
    fn name(&self) -> &'static str;

    /// Runs the check
    fn check(&self) -> CheckResult;

    /// What the check validates, if worth saying
    fn description(&self) -> Option<&'static str> {
        None
    }
}
