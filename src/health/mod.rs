//! Self-checks for the relay
//!
//! Validates that configuration profiles load and that the gesture pipeline
//! produces the expected deltas end to end. Used by `relay --check` and CI.
//!
//! # Example
//!
//! ```no_run
//! use gesture_relay::health::{HealthCheckRunner, checks::*};
//!
//! let report = HealthCheckRunner::new()
//!     .add_check(ConfigCheck::new())
//!     .add_check(PipelineCheck::new())
//!     .run();
//!
//! if report.is_healthy() {
//!     println!("pipeline ok");
//! }
//! ```

pub mod check;
pub mod checks;
pub mod reporter;
pub mod runner;

pub use check::{CheckResult, CheckStatus, SystemCheck};
pub use reporter::{format_report, print_report};
pub use runner::{HealthCheckReport, HealthCheckRunner};

/// Runs all default health checks and returns a report
pub fn run_all_checks() -> HealthCheckReport {
    HealthCheckRunner::new()
        .add_check(checks::ConfigCheck::new())
        .add_check(checks::PipelineCheck::new())
        .add_check(checks::BuildInfoCheck)
        .run()
}
