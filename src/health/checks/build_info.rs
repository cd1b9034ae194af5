//! Build metadata check

use crate::build_info;
use crate::health::check::{CheckResult, SystemCheck};

/// Reports the build metadata baked into the binary
pub struct BuildInfoCheck;

impl SystemCheck for BuildInfoCheck {
    fn name(&self) -> &'static str {
        "Build Info"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Reports build metadata (rustc, target, timestamp)")
    }

    fn check(&self) -> CheckResult {
        let details = build_info::detailed_info()
            .lines()
            .map(str::to_string)
            .collect();
        CheckResult::pass(build_info::version_string()).with_details(details)
    }
}
