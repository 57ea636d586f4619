// src/types.rs

use std::str::FromStr;
use serde::Deserialize;

/// Which extension rule decides whether a changed file is a source file.
///
/// - `Ignore`: every file triggers a build unless its extension is in the
///   fixed ignore list (default behaviour).
/// - `Allow`: only files whose extension is in the fixed allow list trigger a
///   build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionPolicy {
    Ignore,
    Allow,
}

impl Default for ExtensionPolicy {
    fn default() -> Self {
        ExtensionPolicy::Ignore
    }
}

impl FromStr for ExtensionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ignore" => Ok(ExtensionPolicy::Ignore),
            "allow" => Ok(ExtensionPolicy::Allow),
            other => Err(format!(
                "invalid extension_policy: {other} (expected \"ignore\" or \"allow\")"
            )),
        }
    }
}

/// What to do when the build command exits with a non-zero status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CommandFailurePolicy {
    /// Log the failure and keep watching.
    Ignore,
    /// Report the failure and stop with a non-zero exit status.
    Fatal,
}

impl Default for CommandFailurePolicy {
    fn default() -> Self {
        CommandFailurePolicy::Ignore
    }
}

impl FromStr for CommandFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ignore" => Ok(CommandFailurePolicy::Ignore),
            "fatal" => Ok(CommandFailurePolicy::Fatal),
            other => Err(format!(
                "invalid on_failure: {other} (expected \"ignore\" or \"fatal\")"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policies_parse_case_insensitively() {
        assert_eq!("Allow".parse::<ExtensionPolicy>(), Ok(ExtensionPolicy::Allow));
        assert_eq!(" fatal ".parse::<CommandFailurePolicy>(), Ok(CommandFailurePolicy::Fatal));
        assert!("sometimes".parse::<CommandFailurePolicy>().is_err());
    }
}
