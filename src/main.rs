use anyhow::Result;
use specnotify::channel::{Endpoint, NotificationChannel, StdinRecovery, TcpTransport};
use specnotify::config::{AppConfig, DEFAULT_ENOTIFY_PORT};
use specnotify::runner::{run_cycle, CycleOutcome, ShellCommandRunner};
use specnotify::sexp::Atom;
use specnotify::summary::{RspecSummaryExtractor, StdinLineIndexPrompt};
use specnotify::{init_logging, init_tracing};
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    let config = match AppConfig::parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("specnotify: {err}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config);
    init_tracing(&config);

    match run(&config) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("specnotify: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &AppConfig) -> Result<ExitCode> {
    let slot_id = config.slot_id();
    let mut channel = NotificationChannel::new(
        TcpTransport,
        Endpoint::new(config.host.clone(), config.port),
        Atom::new(slot_id.clone()),
        Atom::new(config.handler_fn.clone()),
        Duration::from_millis(config.connect_timeout_ms),
        Box::new(StdinRecovery {
            default_port: DEFAULT_ENOTIFY_PORT,
        }),
    );
    channel.connect()?;

    let runner = ShellCommandRunner;
    let extractor = RspecSummaryExtractor::new();
    let mut prompt = StdinLineIndexPrompt;

    let outcome = run_cycle(
        config,
        &runner,
        &extractor,
        &mut prompt,
        &mut channel,
        &config.paths,
    )?;

    match outcome {
        CycleOutcome::Notified(stats) => {
            println!("{}", stats.summary);
            Ok(ExitCode::SUCCESS)
        }
        CycleOutcome::SuiteCrashed(output) => {
            eprintln!("An error occurred when running the tests");
            eprintln!("STDERR:");
            eprintln!("{}", output.stderr);
            eprintln!("{}", "-".repeat(80));
            eprintln!("STDOUT:");
            eprintln!("{}", output.stdout);
            Ok(ExitCode::FAILURE)
        }
    }
}
