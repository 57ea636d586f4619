// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Arguments clap does not know are dropped before parsing, so stray
//! flags never stop the watcher from starting.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser, ValueEnum};

use crate::types::{CommandFailurePolicy, ExtensionPolicy};

/// Version line: crate version plus the git revision it was built from.
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " - git: ", env!("CAMUS_GIT_SHA"));

/// Command-line arguments for `camus`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "camus",
    version = VERSION,
    about = "Run make whenever a source file under the current directory changes.",
    long_about = None,
    disable_version_flag = true
)]
pub struct CliArgs {
    /// Print version information.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Build target passed to make.
    #[arg(short = 't', long = "target", value_name = "TARGET")]
    pub target: Option<String>,

    /// Path to the config file (TOML).
    ///
    /// Default: `Camus.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Directory to watch.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Which extension rule selects source files.
    #[arg(long = "extensions", value_enum, value_name = "POLICY")]
    pub extension_policy: Option<ExtensionPolicy>,

    /// What to do when the build command fails.
    #[arg(long = "on-failure", value_enum, value_name = "POLICY")]
    pub on_failure: Option<CommandFailurePolicy>,

    /// Watch only the root directory, not its subdirectories.
    #[arg(long)]
    pub no_recursive: bool,

    /// Wait this long for changes to settle before building.
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Upper bound on the length of the build command line, in bytes.
    #[arg(long, value_name = "BYTES")]
    pub max_command_len: Option<usize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CAMUS_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Parse the process arguments.
pub fn parse() -> Result<CliArgs, clap::Error> {
    parse_from(std::env::args_os())
}

/// Parse `args` (including the binary name), ignoring unknown arguments.
pub fn parse_from<I, T>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    CliArgs::try_parse_from(retain_known_args(args))
}

/// Drop every argument that is neither a known flag nor the value of one.
fn retain_known_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut cmd = CliArgs::command();
    cmd.build();

    let mut args = args.into_iter().map(Into::into);
    let mut kept: Vec<OsString> = args.next().into_iter().collect();
    let mut value_pending = false;

    for arg in args {
        if value_pending {
            value_pending = false;
            kept.push(arg);
            continue;
        }

        let text = arg.to_string_lossy().into_owned();
        let known = if let Some(long) = text.strip_prefix("--") {
            let (name, inline_value) = match long.split_once('=') {
                Some((name, _)) => (name, true),
                None => (long, false),
            };
            cmd.get_arguments()
                .find(|a| !name.is_empty() && a.get_long() == Some(name))
                .map(|a| a.get_action().takes_values() && !inline_value)
        } else if let Some(short) = text.strip_prefix('-') {
            let mut chars = short.chars();
            chars.next().and_then(|c| {
                cmd.get_arguments()
                    .find(|a| a.get_short() == Some(c))
                    .map(|a| a.get_action().takes_values() && chars.as_str().is_empty())
            })
        } else {
            None
        };

        if let Some(takes_value) = known {
            value_pending = takes_value;
            kept.push(arg);
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_flag_sets_target() {
        let args = parse_from(["camus", "-t", "install"]).unwrap();
        assert_eq!(args.target.as_deref(), Some("install"));

        let args = parse_from(["camus", "--target=all"]).unwrap();
        assert_eq!(args.target.as_deref(), Some("all"));

        let args = parse_from(["camus", "-ttest"]).unwrap();
        assert_eq!(args.target.as_deref(), Some("test"));
    }

    #[test]
    fn missing_target_value_is_an_error() {
        let err = parse_from(["camus", "-t"]).unwrap_err();
        assert!(err.use_stderr());
        assert!(err.to_string().contains("--target"));
    }

    #[test]
    fn unknown_arguments_are_ignored() {
        let args = parse_from(["camus", "-x", "stray", "--bogus", "-t", "all", "--what=1"]).unwrap();
        assert_eq!(args.target.as_deref(), Some("all"));
    }

    #[test]
    fn version_and_help_exit_cleanly() {
        let err = parse_from(["camus", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        assert!(!err.use_stderr());

        let err = parse_from(["camus", "-h"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert!(!err.use_stderr());
    }

    #[test]
    fn policy_flags_parse() {
        let args = parse_from([
            "camus",
            "--extensions",
            "allow",
            "--on-failure",
            "fatal",
            "--no-recursive",
            "--debounce-ms",
            "250",
        ])
        .unwrap();
        assert_eq!(args.extension_policy, Some(ExtensionPolicy::Allow));
        assert_eq!(args.on_failure, Some(CommandFailurePolicy::Fatal));
        assert!(args.no_recursive);
        assert_eq!(args.debounce_ms, Some(250));
    }

    #[test]
    fn clap_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }
}
