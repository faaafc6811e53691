//! One test-run cycle: run the suite, extract the summary, notify the
//! listener.


use crate::channel::{NotificationChannel, Transport};
use crate::config::AppConfig;
use crate::log_debug;
use crate::protocol::Notification;
use crate::sexp::Atom;
use crate::summary::{extract_with_recovery, LineIndexPrompt, ResultStats, Status, SummaryExtractor};
use anyhow::{Context, Result};
use chrono::Local;

/// What a finished suite process left behind.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs the suite command. A trait seam so cycles can be driven in tests
/// without spawning processes.
pub trait CommandRunner {
    fn run(&self, command: &str) -> Result<CommandOutput>;
}

/// Real runner: shell-words argv split, captured output, trimmed.
pub struct ShellCommandRunner;

impl CommandRunner for ShellCommandRunner {
    fn run(&self, command: &str) -> Result<CommandOutput> {
        use std::process::Command;

        let argv = shell_words::split(command)
            .with_context(|| format!("cannot parse command {command:?}"))?;
        let (program, args) = argv
            .split_first()
            .context("empty test command")?;
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to run {program:?}"))?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Assemble the suite invocation: optional `bundle exec` prefix, the custom
/// failure exit code, then user args. Failures exiting with a distinct code
/// keeps them apart from an rspec crash, which exits 1.
pub fn rspec_command(config: &AppConfig, extra_args: &[String]) -> String {
    let mut parts: Vec<String> = Vec::new();
    if config.bundle {
        parts.push("bundle".to_string());
        parts.push("exec".to_string());
    }
    parts.push(config.rspec_cmd.clone());
    parts.push("--failure-exit-code".to_string());
    parts.push(config.failure_exit_code.to_string());
    parts.extend(config.rspec_args.iter().cloned());
    parts.extend(extra_args.iter().cloned());
    shell_words::join(parts.iter().map(String::as_str))
}

/// Glyph and face shown in the listener's modeline per status.
#[derive(Debug, Clone)]
pub struct StatusStyle {
    pub success_text: String,
    pub pending_text: String,
    pub failure_text: String,
}

impl Default for StatusStyle {
    fn default() -> Self {
        Self {
            success_text: "S".to_string(),
            pending_text: "P".to_string(),
            failure_text: "F".to_string(),
        }
    }
}

impl StatusStyle {
    pub fn text(&self, status: Status) -> &str {
        match status {
            Status::Success => &self.success_text,
            Status::Pending => &self.pending_text,
            Status::Failure => &self.failure_text,
        }
    }

    /// Face atom in keyword form. Pending runs reuse the listener's warning
    /// face.
    pub fn face(&self, status: Status) -> Atom {
        let name = match status {
            Status::Success => "success",
            Status::Pending => "warning",
            Status::Failure => "failure",
        };
        Atom::new(name).keyword()
    }
}

/// Tooltip shown when hovering the status glyph.
pub fn format_tooltip(stats: &ResultStats) -> String {
    let stamp = Local::now().format("%Y-%m-%d -- %H:%M:%S");
    let pending = if stats.pending > 0 {
        format!(", {} pending.\n", stats.pending)
    } else {
        ".\n".to_string()
    };
    format!(
        "{stamp}\n{} examples, {} failures{pending}\nmouse-1: switch to rspec output buffer",
        stats.examples, stats.failures
    )
}

/// Build the notification payload for one finished run.
pub fn build_notification(
    slot_id: &Atom,
    mouse_handler: &Atom,
    style: &StatusStyle,
    stats: &ResultStats,
    raw_output: &str,
) -> Notification {
    Notification {
        slot_id: slot_id.clone(),
        text: style.text(stats.status).to_string(),
        face: style.face(stats.status),
        help: format_tooltip(stats),
        mouse_1: mouse_handler.clone(),
        data: raw_output.to_string(),
    }
}

/// Outcome of one cycle, for the caller's status line.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Summary extracted and notification delivered.
    Notified(ResultStats),
    /// The suite itself crashed (sentinel exit code 1); no notification.
    SuiteCrashed(CommandOutput),
}

/// Run the suite once and push the result to the listener.
///
/// Exit code 1 means rspec crashed before producing results: the output is
/// surfaced and no notification is sent. Any other exit code, including the
/// configured failure exit code, goes through summary extraction.
pub fn run_cycle<T: Transport>(
    config: &AppConfig,
    runner: &dyn CommandRunner,
    extractor: &dyn SummaryExtractor,
    prompt: &mut dyn LineIndexPrompt,
    channel: &mut NotificationChannel<T>,
    extra_args: &[String],
) -> Result<CycleOutcome> {
    let command = rspec_command(config, extra_args);
    eprintln!("=== running: {command}");
    log_debug(&format!("running suite: {command}"));
    let output = runner.run(&command)?;
    crate::log_debug_content(&format!(
        "suite exited {:?}, last line: {:?}",
        output.code,
        output.stdout.lines().last().unwrap_or("")
    ));

    if output.code == Some(1) {
        log_debug("suite exited with the crash sentinel, skipping notification");
        return Ok(CycleOutcome::SuiteCrashed(output));
    }

    let stats = extract_with_recovery(extractor, prompt, &output.stdout, config.summary_line)
        .map_err(|err| {
            anyhow::anyhow!(
                "{err}\n--- suite stdout:\n{}\n--- suite stderr:\n{}",
                output.stdout,
                output.stderr
            )
        })?;
    log_debug(&format!(
        "summary: {} examples, {} failures, {} pending ({})",
        stats.examples,
        stats.failures,
        stats.pending,
        stats.status.label()
    ));

    tracing::info!(
        examples = stats.examples,
        failures = stats.failures,
        pending = stats.pending,
        status = stats.status.label(),
        "suite finished"
    );

    let slot_id = config.slot_id();
    let note = build_notification(
        &Atom::new(slot_id.clone()),
        &Atom::new(config.mouse_handler.clone()),
        &StatusStyle::default(),
        &stats,
        &output.stdout,
    );
    eprint!(
        "--- Sending notification to {} through {}... ",
        channel.endpoint(),
        slot_id
    );
    match channel.send(&note.to_sexp()) {
        Ok(()) => eprintln!("ok"),
        Err(err) => {
            eprintln!("failed");
            return Err(err);
        }
    }
    Ok(CycleOutcome::Notified(stats))
}
