mod actions;
mod cli;
mod pool;
mod repo;
mod types;
mod utils;
mod worker;

use anyhow::Result;
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use types::config::{Config, Opts};
use utils::arch::ArchInfo;
use worker::{Signals, Worker};

/// Print info and debug messages
pub static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Exit codes:
/// 0 => input closed, parent gone or termination requested
/// 1 => bad command or the package index could not be read
fn main() {
    if let Err(err) = try_main() {
        error!("{}", err.to_string());
        err.chain().skip(1).for_each(|cause| {
            due_to!("{}", cause);
        });
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let opts = Opts::parse();
    VERBOSE.store(opts.verbose, Ordering::Relaxed);

    let config = Config::load(&opts.config)?;
    let arch = ArchInfo::detect(&config)?;
    debug!(
        "Native architecture {}, compatible: {}",
        arch.native(),
        arch.compatible().join(" ")
    );

    let signals = Signals::new();
    signals.install()?;
    let (input, output) = worker::open_channels(&opts)?;

    let mut worker = Worker::new(config, arch);
    worker.run(input, output, &signals)
}
