//! Milli - a small terminal text editor.
//!
//! Usage: milli [FILE]

use milli_ui::{run, Config};
use std::env;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

/// Sends log output to the file named by `MILLI_LOG`, if set.
///
/// The terminal is in raw mode while the editor runs, so logs never go to
/// stderr.
fn init_logging() {
    let Some(path) = env::var_os("MILLI_LOG") else {
        return;
    };
    match File::create(&path) {
        Ok(file) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(err) => eprintln!("milli: cannot open log file {:?}: {}", path, err),
    }
}

fn main() -> ExitCode {
    init_logging();
    log::info!("Starting Milli {}", env!("CARGO_PKG_VERSION"));

    let mut args = env::args_os().skip(1);
    let file_path = args.next().map(PathBuf::from);
    let extra = args.count();
    if extra > 0 {
        log::warn!("ignoring {} extra argument(s)", extra);
    }

    if let Some(path) = &file_path {
        log::info!("Opening file: {}", path.display());
    }

    match run(file_path.as_deref(), Config::from_env()) {
        Ok(()) => {
            log::info!("Milli exited");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("fatal: {}", err);
            eprintln!("milli: {}", err);
            ExitCode::FAILURE
        }
    }
}
