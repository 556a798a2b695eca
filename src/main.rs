//! widget-bar: a one-line status summary for desktop bars (dwm, i3bar, tmux).
//!
//! Segments, in order:
//!   - Work timer (only while running)
//!   - Network throughput for one interface, from sysfs counters
//!   - Headset battery, volume, RAM usage, date/time
//!
//! Prints once by default; `--watch` prints a fresh line every interval.

mod app;
mod config;
mod error;
mod logging;
mod system;
mod timer;

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser};

use app::App;
use config::Config;
use timer::TimerCommand;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None, disable_version_flag = true)]
struct Args {
    /// Network interface to use
    #[arg(short = 'i', long = "interface")]
    interface: Option<String>,

    /// Argument for timer
    #[arg(long, value_enum, default_value_t = TimerCommand::Get)]
    timer_command: TimerCommand,

    /// Print a new line every interval instead of once
    #[arg(short, long)]
    watch: bool,

    /// Milliseconds between lines in watch mode
    #[arg(long, value_name = "MS")]
    interval: Option<u64>,

    /// Timer state file
    #[arg(long, value_name = "PATH")]
    timer_state: Option<PathBuf>,

    /// Read RAM and date natively instead of through shell commands
    #[arg(long)]
    native: bool,

    /// Config file (defaults to <config dir>/widget-bar/widgetbarrc)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    write_config: bool,

    /// Log debug output to stderr
    #[arg(long)]
    verbose: bool,

    /// Prints the version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,
}

impl Args {
    /// Layer command line flags over the loaded config
    fn apply_to(&self, cfg: &mut Config) {
        if let Some(interface) = &self.interface {
            cfg.interface = interface.clone();
        }
        if let Some(ms) = self.interval {
            cfg.interval_ms = ms.clamp(200, 10000);
        }
        if let Some(path) = &self.timer_state {
            cfg.timer_state = path.clone();
        }
        if self.native {
            cfg.native_metrics = true;
        }
    }
}

/// Rewrite single-dash long flags (`-timer-command`, `-version=...`) to `--`.
///
/// Bar configs written for the flag-package CLI spell every long flag with
/// one dash. Short flags and anything that is not a known long flag pass through.
fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let command = Args::command();
    let longs: Vec<&str> = command.get_arguments().filter_map(|a| a.get_long()).collect();

    args.into_iter()
        .map(|arg| {
            let arg: OsString = arg.into();
            let rewritten = arg.to_str().and_then(|s| {
                let flag = s.strip_prefix('-').filter(|f| !f.starts_with('-'))?;
                let name = flag.split_once('=').map_or(flag, |(name, _)| name);
                longs.contains(&name).then(|| format!("-{}", s))
            });
            rewritten.map(OsString::from).unwrap_or(arg)
        })
        .collect()
}

fn main() {
    let args = Args::parse_from(normalize_args(std::env::args_os()));
    logging::init(args.verbose);

    if let Err(e) = run(args) {
        report_fatal(&e, &mut io::stderr().lock());
        std::process::exit(1);
    }
}

/// Print a fatal error once, with its context chain on one line
fn report_fatal(e: &anyhow::Error, out: &mut impl Write) {
    let _ = writeln!(out, "Error: {:#}", e);
}

fn run(args: Args) -> Result<()> {
    let config_path = args.config.clone().or_else(config::config_path);
    let mut cfg = match &config_path {
        Some(path) => Config::load(path),
        None => Config::default(),
    };
    args.apply_to(&mut cfg);
    log::debug!("effective config: {:?}", cfg);

    if args.write_config {
        let path = config_path.context("could not determine config path")?;
        cfg.save(&path)?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut app = App::new(&cfg);
    app.apply_timer(args.timer_command)?;

    let mut stdout = io::stdout().lock();
    if args.watch {
        app.run_watch(&mut stdout, None)
    } else {
        app.run_once(&mut stdout)
    }
}
