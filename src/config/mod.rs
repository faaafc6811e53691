//! Command-line parsing and validation helpers.

mod defaults;
mod validation;

use clap::{ArgAction, Parser};

pub use defaults::{
    default_slot_id, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_ENOTIFY_PORT, DEFAULT_FAILURE_EXIT_CODE,
    DEFAULT_SUMMARY_LINE,
};

/// CLI options for specnotify. Validated values keep the suite subprocess
/// and the listener connection safe.
#[derive(Debug, Parser, Clone)]
#[command(
    about = "specnotify: push rspec results to an enotify listener",
    author,
    version
)]
pub struct AppConfig {
    /// Path to the rspec binary
    #[arg(long = "rspec-cmd", default_value = "rspec")]
    pub rspec_cmd: String,

    /// Extra arguments to pass to rspec (repeatable)
    #[arg(
        long = "rspec-arg",
        action = ArgAction::Append,
        value_name = "ARG",
        allow_hyphen_values = true
    )]
    pub rspec_args: Vec<String>,

    /// Prefix the suite command with `bundle exec`
    #[arg(long = "bundle", default_value_t = false)]
    pub bundle: bool,

    /// Exit code rspec uses for test failures (distinct from 1, which means
    /// rspec crashed)
    #[arg(long = "failure-exit-code", default_value_t = DEFAULT_FAILURE_EXIT_CODE)]
    pub failure_exit_code: i32,

    /// Enotify listener host
    #[arg(long, env = "ENOTIFY_HOST", default_value = "localhost")]
    pub host: String,

    /// Enotify listener port
    #[arg(long, env = "ENOTIFY_PORT", default_value_t = DEFAULT_ENOTIFY_PORT)]
    pub port: u16,

    /// Slot id registered with the listener (default: derived from the
    /// working directory name)
    #[arg(long = "slot-id")]
    pub slot_id: Option<String>,

    /// Handler function the listener invokes for our result messages
    #[arg(
        long = "handler-fn",
        default_value = "enotify_rspec_result_message_handler"
    )]
    pub handler_fn: String,

    /// Handler function bound to mouse-1 on the status glyph
    #[arg(long = "mouse-handler", default_value = "enotify_rspec_mouse_1_handler")]
    pub mouse_handler: String,

    /// Line of the suite output holding the summary; negative counts from
    /// the end
    #[arg(
        long = "summary-line",
        default_value_t = DEFAULT_SUMMARY_LINE,
        allow_hyphen_values = true
    )]
    pub summary_line: i64,

    /// Connect timeout towards the listener (milliseconds)
    #[arg(long = "connect-timeout-ms", default_value_t = DEFAULT_CONNECT_TIMEOUT_MS)]
    pub connect_timeout_ms: u64,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "SPECNOTIFY_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "SPECNOTIFY_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow logging suite output snippets (debug log only)
    #[arg(
        long = "log-content",
        env = "SPECNOTIFY_LOG_CONTENT",
        default_value_t = false
    )]
    pub log_content: bool,

    /// Spec files or directories passed through to rspec
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,
}

impl AppConfig {
    /// Slot id to register, falling back to the cwd-derived default.
    pub fn slot_id(&self) -> String {
        self.slot_id.clone().unwrap_or_else(default_slot_id)
    }
}
