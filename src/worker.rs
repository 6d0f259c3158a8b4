use crate::{
    actions, debug, info,
    pool::{source, PkgIndex, Scope},
    types::{config::{Config, Opts}, Command},
    utils::arch::ArchInfo,
};

use anyhow::{format_err, Context, Result};
use nix::{
    fcntl::{fcntl, FcntlArg},
    unistd::{getppid, Pid},
};
use std::{
    fs::File,
    io::{self, BufRead, BufReader, ErrorKind, Write},
    os::unix::io::{FromRawFd, RawFd},
};

/// Builds the package index on first use
pub type IndexLoader = Box<dyn Fn(&Config, &ArchInfo) -> Result<Box<dyn PkgIndex>>>;

/// Termination conditions of the command loop
#[derive(Clone, Copy, Debug)]
pub struct Signals {
    parent: Pid,
}

impl Signals {
    pub fn new() -> Self {
        Signals::with_parent(getppid())
    }

    /// Watch for `parent` going away instead of our current parent
    pub fn with_parent(parent: Pid) -> Self {
        Signals { parent }
    }

    /// Exit on SIGINT, SIGTERM and SIGHUP, whether idle or in the middle of a query
    pub fn install(&self) -> Result<()> {
        ctrlc::set_handler(|| std::process::exit(0))
            .context("Failed to set up signal handler")?;

        Ok(())
    }

    pub fn should_exit(&self) -> bool {
        // Reparented, so whoever started us is gone
        if getppid() != self.parent {
            debug!("Parent process exited");
            return true;
        }

        false
    }
}

pub struct Worker {
    config: Config,
    arch: ArchInfo,
    index: Option<Box<dyn PkgIndex>>,
    loader: IndexLoader,
}

impl Worker {
    pub fn new(config: Config, arch: ArchInfo) -> Self {
        Worker::with_loader(config, arch, Box::new(source::create_index))
    }

    pub fn with_loader(config: Config, arch: ArchInfo, loader: IndexLoader) -> Self {
        Worker {
            config,
            arch,
            index: None,
            loader,
        }
    }

    fn index(&mut self) -> Result<&mut (dyn PkgIndex + 'static)> {
        if self.index.is_none() {
            info!("Loading package index...");
            let index =
                (self.loader)(&self.config, &self.arch).context("Failed to load package index")?;
            self.index = Some(index);
        }

        self.index
            .as_deref_mut()
            .ok_or_else(|| format_err!("Package index is not loaded"))
    }

    /// Run one command line, returning the answer line without its newline
    pub fn handle_line(&mut self, line: &str) -> Result<String> {
        let cmd = Command::try_from(line.trim_end())?;
        debug!("Handling {:?}", cmd);

        let answer = match cmd {
            Command::WhatInstalled(q) => actions::query(self.index()?, Scope::Installed, &q)?,
            Command::WhatAvailable(q) => actions::query(self.index()?, Scope::Available, &q)?,
            Command::VersionCompare { versions: [a, b] } => {
                actions::compare_versions(&self.arch, a.as_deref(), b.as_deref())?.to_string()
            }
            Command::InstallOnlyPkgs { package } => {
                actions::installonlypkgs(&self.config, &package)
            }
            Command::FlushCache => {
                // Rebuilt on the next query
                self.index = None;
                "OK".to_string()
            }
        };

        Ok(answer)
    }

    /// Answer commands until the input ends or we are asked to exit
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut output: W,
        signals: &Signals,
    ) -> Result<()> {
        let mut line = String::new();
        loop {
            if signals.should_exit() {
                return Ok(());
            }
            line.clear();
            let len = input
                .read_line(&mut line)
                .context("Failed to read command")?;
            if len == 0 {
                info!("Input closed, exiting");
                return Ok(());
            }

            let answer = self.handle_line(&line)?;
            match writeln!(output, "{}", answer).and_then(|_| output.flush()) {
                Ok(()) => (),
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    debug!("Output closed, exiting");
                    return Ok(());
                }
                Err(e) => return Err(e).context("Failed to write answer"),
            }
        }
    }
}

fn fd_to_file(fd: RawFd) -> Result<File> {
    fcntl(fd, FcntlArg::F_GETFD).context(format!("Invalid file descriptor {}", fd))?;
    // The parent handed this descriptor to us, nothing else in this process owns it
    Ok(unsafe { File::from_raw_fd(fd) })
}

/// The command pipe pair from the arguments, or stdin/stdout
pub fn open_channels(opts: &Opts) -> Result<(Box<dyn BufRead>, Box<dyn Write>)> {
    match (opts.infd, opts.outfd) {
        (Some(infd), Some(outfd)) => {
            debug!("Using file descriptors {} and {}", infd, outfd);
            let input = fd_to_file(infd)?;
            let output = fd_to_file(outfd)?;
            Ok((Box::new(BufReader::new(input)), Box::new(output)))
        }
        _ => Ok((
            Box::new(BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )),
    }
}
