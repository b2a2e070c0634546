// src/config/validate.rs

use crate::config::duration::parse_duration;
use crate::config::model::{
    ConfigFile, DEFAULT_RETRY_DELAY, ExecSection, ExecSettings, RawConfigFile, RetrySection,
};
use crate::errors::{Result, ToolrunError};
use crate::retry::RetryPolicy;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::ToolrunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let retry = validate_retry(raw.retry)?;
        let exec = validate_exec(raw.exec)?;
        Ok(ConfigFile::new_unchecked(retry, exec))
    }
}

fn validate_retry(section: RetrySection) -> Result<RetryPolicy> {
    let delay = match section.delay {
        Some(ref s) => parse_duration(s)
            .map_err(|e| ToolrunError::ConfigError(format!("[retry].delay: {}", e)))?,
        None => DEFAULT_RETRY_DELAY,
    };

    RetryPolicy::new(section.max_attempts, delay, section.signatures)
}

fn validate_exec(section: ExecSection) -> Result<ExecSettings> {
    let timeout = match section.timeout {
        Some(ref s) => {
            let timeout = parse_duration(s)
                .map_err(|e| ToolrunError::ConfigError(format!("[exec].timeout: {}", e)))?;
            if timeout.is_zero() {
                return Err(ToolrunError::ConfigError(
                    "[exec].timeout must be greater than zero".to_string(),
                ));
            }
            Some(timeout)
        }
        None => None,
    };

    if section.env.keys().any(|k| k.is_empty() || k.contains('=')) {
        return Err(ToolrunError::ConfigError(
            "[exec.env] keys must be non-empty and must not contain '='".to_string(),
        ));
    }

    Ok(ExecSettings {
        timeout,
        working_dir: section.working_dir,
        env: section.env,
        output: section.output,
    })
}
