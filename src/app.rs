use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::system::collector::Collector;
use crate::timer::{self, Timer, TimerCommand};

/// Main application state
pub struct App {
    pub separator: String,
    pub interval: Duration,
    timer: Timer,
    collector: Collector,
    /// Unix clock, swappable for tests
    clock: fn() -> i64,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self::with_parts(config, Timer::new(&config.timer_state), Collector::from_config(config))
    }

    pub fn with_parts(config: &Config, timer: Timer, collector: Collector) -> Self {
        Self {
            separator: config.separator.clone(),
            interval: Duration::from_millis(config.interval_ms),
            timer,
            collector,
            clock: timer::now,
        }
    }

    /// Apply a timer sub-command before anything is rendered
    pub fn apply_timer(&self, command: TimerCommand) -> Result<()> {
        self.timer
            .handle(command, (self.clock)())
            .with_context(|| format!("timer {:?} failed ({})", command, self.timer.path().display()))?;
        Ok(())
    }

    /// Build one status line: timer, network, battery, volume, RAM, date
    pub fn status_line(&mut self) -> Result<String> {
        let timer_out = self
            .timer
            .handle(TimerCommand::Get, (self.clock)())
            .context("failed to read timer")?;
        let metrics = self.collector.refresh().context("failed to sample network counters")?;

        let mut parts = Vec::with_capacity(metrics.len() + 1);
        parts.push(timer_out);
        parts.extend(metrics);
        Ok(join_segments(&parts, &self.separator))
    }

    /// Print a single line
    pub fn run_once(&mut self, out: &mut impl Write) -> Result<()> {
        let line = self.status_line()?;
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }

    /// Print a line every interval until the process is killed.
    ///
    /// Counters are seeded first so every line shows a true per-interval rate.
    pub fn run_watch(&mut self, out: &mut impl Write, ticks: Option<usize>) -> Result<()> {
        self.collector.prime().context("failed to sample network counters")?;

        let mut printed = 0usize;
        while ticks.map_or(true, |n| printed < n) {
            thread::sleep(self.interval);
            self.run_once(out)?;
            printed += 1;
        }
        Ok(())
    }
}

/// Join the non-empty segments with `separator`
pub fn join_segments(parts: &[String], separator: &str) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}
