use std::cell::RefCell;
use std::process::Command;

use sysinfo::System;

use crate::config::Config;
use crate::error::Result;
use crate::system::memory::MemoryInfo;
use crate::system::network::NetworkSampler;

/// Produces one status segment. Never fails: errors become a placeholder.
pub trait MetricSource {
    fn produce(&self) -> String;
}

/// Runs a command through `bash -c` and reports its trimmed combined output
#[derive(Debug, Clone)]
pub struct ShellSource {
    command: String,
    placeholder: String,
}

impl ShellSource {
    pub fn new(command: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            placeholder: placeholder.into(),
        }
    }
}

impl MetricSource for ShellSource {
    fn produce(&self) -> String {
        let output = match Command::new("bash").arg("-c").arg(&self.command).output() {
            Ok(o) => o,
            Err(e) => {
                log::debug!("failed to launch `{}`: {}", self.command, e);
                return self.placeholder.clone();
            }
        };

        if !output.status.success() {
            log::debug!("`{}` exited with {}", self.command, output.status);
            return self.placeholder.clone();
        }

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        combined.trim().to_string()
    }
}

/// Substitutes a placeholder when the inner source produces nothing
pub struct Fallback<S> {
    inner: S,
    placeholder: String,
}

impl<S: MetricSource> Fallback<S> {
    pub fn new(inner: S, placeholder: impl Into<String>) -> Self {
        Self {
            inner,
            placeholder: placeholder.into(),
        }
    }
}

impl<S: MetricSource> MetricSource for Fallback<S> {
    fn produce(&self) -> String {
        let value = self.inner.produce();
        if value.is_empty() {
            self.placeholder.clone()
        } else {
            value
        }
    }
}

/// RAM usage read through `sysinfo` instead of `free -h`
pub struct SysinfoRam {
    // refresh_memory needs &mut; produce() only gets &self
    sys: RefCell<System>,
}

impl SysinfoRam {
    pub fn new() -> Self {
        Self {
            sys: RefCell::new(System::new()),
        }
    }
}

impl Default for SysinfoRam {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for SysinfoRam {
    fn produce(&self) -> String {
        let mut sys = self.sys.borrow_mut();
        sys.refresh_memory();
        MemoryInfo::new(sys.total_memory(), sys.used_memory()).summary()
    }
}

/// Local wall-clock time through `chrono` instead of `date`
pub struct LocalClock {
    format: String,
}

impl LocalClock {
    pub fn new(format: impl Into<String>) -> Self {
        Self { format: format.into() }
    }
}

impl MetricSource for LocalClock {
    fn produce(&self) -> String {
        chrono::Local::now().format(&self.format).to_string()
    }
}

/// Owns the network samplers and auxiliary sources across ticks
pub struct Collector {
    network: NetworkSampler,
    /// In output order: battery, volume, RAM, date
    sources: Vec<Box<dyn MetricSource>>,
}

impl Collector {
    pub fn new(network: NetworkSampler, sources: Vec<Box<dyn MetricSource>>) -> Self {
        Self { network, sources }
    }

    /// Build the collector described by `config`
    pub fn from_config(config: &Config) -> Self {
        let placeholder = config.placeholder.as_str();
        let battery = Fallback::new(ShellSource::new(&config.battery_cmd, placeholder), "-");
        let volume = ShellSource::new(&config.volume_cmd, placeholder);

        let (ram, date): (Box<dyn MetricSource>, Box<dyn MetricSource>) = if config.native_metrics {
            (Box::new(SysinfoRam::new()), Box::new(LocalClock::new(DATE_FORMAT)))
        } else {
            (
                Box::new(ShellSource::new(&config.ram_cmd, placeholder)),
                Box::new(ShellSource::new(&config.date_cmd, placeholder)),
            )
        };

        let sources: Vec<Box<dyn MetricSource>> = vec![Box::new(battery), Box::new(volume), ram, date];
        Self::new(NetworkSampler::for_interface(&config.interface), sources)
    }

    /// Seed the counters so the next refresh reports a true rate
    pub fn prime(&mut self) -> Result<()> {
        self.network.prime()
    }

    /// Sample everything once. Only the network counters can fail.
    pub fn refresh(&mut self) -> Result<Vec<String>> {
        let net = self.network.sample()?;

        let mut segments = Vec::with_capacity(self.sources.len() + 1);
        segments.push(net.render());
        segments.extend(self.sources.iter().map(|s| s.produce()));
        Ok(segments)
    }
}

/// Clock format shared by the `date` command and the native clock
pub const DATE_FORMAT: &str = "%H:%M %d.%m.%Y";

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    struct Fixed(&'static str);

    impl MetricSource for Fixed {
        fn produce(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn shell_output_is_trimmed() {
        let src = ShellSource::new("echo '  42%  '", "?");
        assert_eq!(src.produce(), "42%");
    }

    #[test]
    fn shell_captures_stderr() {
        let src = ShellSource::new("echo warn >&2", "?");
        assert_eq!(src.produce(), "warn");
    }

    #[test]
    fn failing_command_gives_placeholder() {
        assert_eq!(ShellSource::new("exit 3", "?").produce(), "?");
        assert_eq!(
            ShellSource::new("widget-bar-no-such-utility --query", "?").produce(),
            "?"
        );
    }

    #[test]
    fn fallback_only_replaces_empty_output() {
        assert_eq!(Fallback::new(Fixed(""), "-").produce(), "-");
        assert_eq!(Fallback::new(Fixed("87%"), "-").produce(), "87%");
        assert_eq!(Fallback::new(ShellSource::new("true", "?"), "-").produce(), "-");
    }

    #[test]
    fn native_sources_produce_text() {
        let ram = SysinfoRam::new().produce();
        assert!(ram.contains('/'), "unexpected ram summary {:?}", ram);

        let clock = LocalClock::new("%Y").produce();
        assert_eq!(clock.len(), 4);
    }

    #[test]
    fn refresh_orders_network_before_sources() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("rx_bytes"), "100").unwrap();
        fs::write(dir.path().join("tx_bytes"), "200").unwrap();

        let sources: Vec<Box<dyn MetricSource>> =
            vec![Box::new(Fixed("a")), Box::new(Fixed("")), Box::new(Fixed("b"))];
        let mut collector = Collector::new(NetworkSampler::with_statistics_dir(dir.path()), sources);
        collector.prime().unwrap();
        fs::write(dir.path().join("rx_bytes"), "150").unwrap();

        let segments = collector.refresh().unwrap();
        assert_eq!(segments, vec!["|🔻   50B 🔺    0B|", "a", "", "b"]);
    }

    #[test]
    fn refresh_fails_without_counters() {
        let dir = tempfile::tempdir().unwrap();
        let mut collector = Collector::new(NetworkSampler::with_statistics_dir(dir.path()), vec![]);
        assert!(collector.refresh().is_err());
    }
}
