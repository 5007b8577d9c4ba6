mod exit;
mod logging;
mod relay;

use std::fs::File;
use std::path::PathBuf;

use actbridge_spawn::{ensure_settings, is_acceptable_result, WorkerPipes, WorkerSupervisor};
use clap::Parser;

use crate::exit::{spawn_error, CliResult, FAILURE, SUCCESS};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::relay::{spawn_relay, DebugEcho};

#[derive(Parser, Debug)]
#[command(
    name = "actbridge",
    version,
    about = "Run an Actions Runner.Worker behind a transcoding pipe bridge"
)]
struct Cli {
    /// Path to the worker executable (Runner.Worker or Runner.Worker.dll).
    worker: PathBuf,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

fn run(cli: Cli) -> CliResult<i32> {
    ensure_settings(&cli.worker).map_err(|err| spawn_error("settings bootstrap failed", err))?;

    let (parent, child_ends) = WorkerPipes::open()
        .and_then(WorkerPipes::split)
        .map_err(|err| spawn_error("pipe setup failed", err))?;

    let worker = WorkerSupervisor::new(&cli.worker)
        .spawn(child_ends)
        .map_err(|err| spawn_error("worker launch failed", err))?;

    spawn_relay(File::from(parent.inbound_write), DebugEcho::from_env())
        .map_err(|err| exit::io_error("relay thread setup failed", err))?;

    // The worker's own output channel stays open, unread, for its lifetime.
    let _outbound_read = parent.outbound_read;

    let code = worker
        .wait()
        .map_err(|err| spawn_error("worker wait failed", err))?;

    println!("{code}");

    Ok(if is_acceptable_result(code) {
        SUCCESS
    } else {
        FAILURE
    })
}
