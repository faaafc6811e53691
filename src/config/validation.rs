use super::defaults::{
    MAX_CONNECT_TIMEOUT_MS, MAX_SUMMARY_LINE_MAGNITUDE, MIN_CONNECT_TIMEOUT_MS,
};
use super::AppConfig;
use anyhow::{bail, Result};
use clap::Parser;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values before anything touches a subprocess or a socket.
    pub fn validate(&self) -> Result<()> {
        if self.rspec_cmd.trim().is_empty() {
            bail!("--rspec-cmd must not be empty");
        }

        if self.port == 0 {
            bail!("--port must be nonzero");
        }
        if self.host.trim().is_empty() {
            bail!("--host must not be empty");
        }

        if !(2..=255).contains(&self.failure_exit_code) {
            bail!(
                "--failure-exit-code must be between 2 and 255 (1 is the crash sentinel), got {}",
                self.failure_exit_code
            );
        }

        if self.summary_line.abs() > MAX_SUMMARY_LINE_MAGNITUDE {
            bail!(
                "--summary-line magnitude must not exceed {MAX_SUMMARY_LINE_MAGNITUDE}, got {}",
                self.summary_line
            );
        }

        if !(MIN_CONNECT_TIMEOUT_MS..=MAX_CONNECT_TIMEOUT_MS).contains(&self.connect_timeout_ms) {
            bail!(
                "--connect-timeout-ms must be between {MIN_CONNECT_TIMEOUT_MS} and {MAX_CONNECT_TIMEOUT_MS}, got {}",
                self.connect_timeout_ms
            );
        }

        if let Some(slot_id) = &self.slot_id {
            validate_atom_flag("--slot-id", slot_id)?;
        }
        validate_atom_flag("--handler-fn", &self.handler_fn)?;
        validate_atom_flag("--mouse-handler", &self.mouse_handler)?;

        Ok(())
    }
}

/// Slot ids and handler names end up as lisp symbols on the wire; reject
/// anything that could not form one.
fn validate_atom_flag(flag: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        bail!("{flag} must not be empty");
    }
    if value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"'))
    {
        bail!("{flag} must be a symbol-safe name, got {value:?}");
    }
    Ok(())
}
