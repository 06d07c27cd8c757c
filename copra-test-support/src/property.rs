//! Property-test case counts with an environment override.

use std::env;

/// Environment variable overriding the number of cases per property.
pub const CASES_ENV_KEY: &str = "COPRA_PROPTEST_CASES";

/// Returns the case count for a property suite.
///
/// Reads [`CASES_ENV_KEY`]; a missing, zero or unparsable value falls back to
/// `default_cases` with a warning.
///
/// # Examples
/// ```
/// use copra_test_support::property::case_count;
///
/// assert!(case_count(32) > 0);
/// ```
#[must_use]
pub fn case_count(default_cases: u32) -> u32 {
    let Ok(raw) = env::var(CASES_ENV_KEY) else {
        return default_cases;
    };
    match parse_cases(&raw) {
        Ok(cases) => cases,
        Err(reason) => {
            tracing::warn!(
                env = CASES_ENV_KEY,
                raw = %raw,
                reason = %reason,
                "invalid property case override; using default",
            );
            default_cases
        }
    }
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    let parsed = raw
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("parse error: {error}"))?;
    if parsed == 0 {
        return Err("cases must be > 0".to_owned());
    }
    Ok(parsed)
}
