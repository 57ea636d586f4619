// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{CamusError, Result};
use crate::exec::BASE_COMMAND;

/// Longest coalescing window accepted, in milliseconds.
pub const MAX_DEBOUNCE_MS: u64 = 60_000;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = CamusError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.watch, raw.command))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_watch(cfg)?;
    validate_command(cfg)?;
    Ok(())
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.root.as_os_str().is_empty() {
        return Err(CamusError::ConfigError(
            "[watch].root must not be empty".to_string(),
        ));
    }

    if cfg.watch.debounce_ms > MAX_DEBOUNCE_MS {
        return Err(CamusError::ConfigError(format!(
            "[watch].debounce_ms must be <= {} (got {})",
            MAX_DEBOUNCE_MS, cfg.watch.debounce_ms
        )));
    }

    Ok(())
}

fn validate_command(cfg: &RawConfigFile) -> Result<()> {
    if cfg.command.max_len < BASE_COMMAND.len() {
        return Err(CamusError::ConfigError(format!(
            "[command].max_len must be >= {} (got {})",
            BASE_COMMAND.len(),
            cfg.command.max_len
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn defaults_are_valid() {
        assert!(ConfigFile::try_from(RawConfigFile::default()).is_ok());
    }

    #[test]
    fn max_len_shorter_than_base_command_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.command.max_len = 2;
        match ConfigFile::try_from(raw) {
            Err(CamusError::ConfigError(msg)) => assert!(msg.contains("max_len")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn huge_debounce_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.watch.debounce_ms = MAX_DEBOUNCE_MS + 1;
        assert!(matches!(
            ConfigFile::try_from(raw),
            Err(CamusError::ConfigError(_))
        ));
    }

    #[test]
    fn empty_root_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.watch.root = PathBuf::new();
        assert!(matches!(
            ConfigFile::try_from(raw),
            Err(CamusError::ConfigError(_))
        ));
    }
}
