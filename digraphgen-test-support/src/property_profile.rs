//! Property-test run profile parsing.
//!
//! Generation properties are cheap per case but the suites run many of them,
//! so CI and local runs tune case counts and forking through environment
//! variables shared by every property suite.

use std::env;

/// Environment variable controlling proptest case counts.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable controlling proptest process forking.
pub const DIGRAPHGEN_PBT_FORK_ENV_KEY: &str = "DIGRAPHGEN_PBT_FORK";

/// Case count and fork setting for one property suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Builds a profile from the suite's defaults and any environment
    /// overrides. Malformed overrides are logged and ignored.
    ///
    /// # Examples
    /// ```
    /// use digraphgen_test_support::property_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: env_override(PROGTEST_CASES_ENV_KEY, parse_cases).unwrap_or(default_cases),
            fork: env_override(DIGRAPHGEN_PBT_FORK_ENV_KEY, parse_switch).unwrap_or(default_fork),
        }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub const fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether to run cases in forked subprocesses.
    #[must_use]
    pub const fn fork(&self) -> bool {
        self.fork
    }
}

/// Returns the parsed value of `key`, or `None` when it is unset or invalid.
fn env_override<T>(key: &'static str, parse: fn(&str) -> Option<T>) -> Option<T> {
    let raw = env::var(key).ok()?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        tracing::warn!(env = key, raw = %raw, "ignoring malformed property-test override");
    }
    parsed
}

fn parse_cases(raw: &str) -> Option<u32> {
    raw.parse().ok().filter(|&cases| cases > 0)
}

fn parse_switch(raw: &str) -> Option<bool> {
    const ON: [&str; 4] = ["1", "true", "yes", "on"];
    const OFF: [&str; 4] = ["0", "false", "no", "off"];
    let lowered = raw.to_ascii_lowercase();
    if ON.contains(&lowered.as_str()) {
        Some(true)
    } else if OFF.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}
