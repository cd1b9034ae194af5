//! Runs checks and tallies their results

use std::time::Instant;

use tracing::debug;

use super::check::{CheckResult, CheckStatus, SystemCheck};

/// Results from running a set of checks
#[derive(Debug)]
pub struct HealthCheckReport {
    /// Check name and result, in run order
    pub results: Vec<(String, CheckResult)>,
    /// Checks run
    pub total: usize,
    /// Checks that passed cleanly
    pub passed: usize,
    /// Checks that passed with a warning
    pub warned: usize,
    /// Checks that failed
    pub failed: usize,
}

impl HealthCheckReport {
    /// No check failed
    pub fn is_healthy(&self) -> bool {
        self.failed == 0
    }

    /// At least one check warned
    pub fn has_warnings(&self) -> bool {
        self.warned > 0
    }

    /// Process exit code for the report
    ///
    /// 0 = all pass, 1 = any fail, 2 = any warn (but no fail)
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else if self.warned > 0 {
            2
        } else {
            0
        }
    }
}

/// Collects checks and runs them in order
#[derive(Default)]
pub struct HealthCheckRunner {
    checks: Vec<Box<dyn SystemCheck>>,
}

impl HealthCheckRunner {
    /// Runner with no checks
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a check; checks run in the order added
    pub fn add_check<C: SystemCheck + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Runs every check, timing each, and tallies the results
    pub fn run(self) -> HealthCheckReport {
        let mut report = HealthCheckReport {
            results: Vec::with_capacity(self.checks.len()),
            total: 0,
            passed: 0,
            warned: 0,
            failed: 0,
        };

        for check in self.checks {
            let start = Instant::now();
            let result = check.check().with_duration(start.elapsed());
            debug!(check = check.name(), status = ?result.status, "check finished");

            match result.status {
                CheckStatus::Pass => report.passed += 1,
                CheckStatus::Warn => report.warned += 1,
                CheckStatus::Fail => report.failed += 1,
            }
            report.results.push((check.name().to_string(), result));
        }

        report.total = report.results.len();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(CheckStatus);

    impl SystemCheck for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn check(&self) -> CheckResult {
            CheckResult::new(self.0, "fixed")
        }
    }

    #[test]
    fn test_exit_codes() {
        let report = HealthCheckRunner::new().add_check(Fixed(CheckStatus::Pass)).run();
        assert_eq!(report.exit_code(), 0);

        let report = HealthCheckRunner::new()
            .add_check(Fixed(CheckStatus::Pass))
            .add_check(Fixed(CheckStatus::Warn))
            .run();
        assert_eq!(report.exit_code(), 2);
        assert!(report.is_healthy());

        let report = HealthCheckRunner::new()
            .add_check(Fixed(CheckStatus::Warn))
            .add_check(Fixed(CheckStatus::Fail))
            .run();
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.total, 2);
    }
}
