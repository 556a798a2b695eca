//! widget-bar configuration persistence (htoprc-style key=value format)
//!
//! Saves/loads settings to `$XDG_CONFIG_HOME/widget-bar/widgetbarrc`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::system::collector::DATE_FORMAT;
use crate::timer;

const DEFAULT_VOLUME_CMD: &str = "amixer get Master | sed '$!d' | grep -E -o '[0-9]+%'";
const DEFAULT_RAM_CMD: &str = "free -h | awk '/^Mem/ { print $3\"/\"$2 }' | sed s/i//g";
const DEFAULT_BATTERY_CMD: &str =
    "upower --dump | grep -A3 'headset' | grep 'percentage' | tr -d -c 0-9 | sed -e 's/$/%/'";

/// Get the default config file path: <config dir>/widget-bar/widgetbarrc
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("widget-bar").join("widgetbarrc"))
}

/// Persistable settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interface whose sysfs counters are sampled
    pub interface: String,
    pub interval_ms: u64,
    pub separator: String,
    pub timer_state: PathBuf,
    /// Use sysinfo/chrono for RAM and date instead of shell commands
    pub native_metrics: bool,
    pub placeholder: String,

    // Shell commands
    pub volume_cmd: String,
    pub ram_cmd: String,
    pub battery_cmd: String,
    pub date_cmd: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interface: "eth1".to_string(),
            interval_ms: 1000,
            separator: "  ".to_string(),
            timer_state: timer::default_state_path(),
            native_metrics: false,
            placeholder: "?".to_string(),
            volume_cmd: DEFAULT_VOLUME_CMD.to_string(),
            ram_cmd: DEFAULT_RAM_CMD.to_string(),
            battery_cmd: DEFAULT_BATTERY_CMD.to_string(),
            date_cmd: format!("date '+{}'", DATE_FORMAT),
        }
    }
}

impl Config {
    /// Load config from `path`, returning defaults if the file doesn't exist
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => {
                log::debug!("loaded config from {}", path.display());
                Self::parse(&content)
            }
            Err(e) => {
                log::debug!("no config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse `key=value` lines on top of the defaults
    pub fn parse(content: &str) -> Self {
        let mut cfg = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            // Only the first '=' splits: shell commands contain their own
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();
                match key {
                    "interface" => {
                        if !value.is_empty() {
                            cfg.interface = value.to_string();
                        }
                    }
                    "interval_ms" => {
                        if let Ok(v) = value.parse::<u64>() {
                            cfg.interval_ms = v.clamp(200, 10000);
                        }
                    }
                    // Trimming would eat a whitespace separator
                    "separator" => cfg.separator = unquote(value),
                    "timer_state" => cfg.timer_state = PathBuf::from(value),
                    "native_metrics" => cfg.native_metrics = value == "1",
                    "placeholder" => cfg.placeholder = value.to_string(),
                    "volume_cmd" => cfg.volume_cmd = value.to_string(),
                    "ram_cmd" => cfg.ram_cmd = value.to_string(),
                    "battery_cmd" => cfg.battery_cmd = value.to_string(),
                    "date_cmd" => cfg.date_cmd = value.to_string(),
                    _ => log::warn!("ignoring unknown config key {:?}", key),
                }
            }
        }

        cfg
    }

    /// Save config to `path`, creating its directory
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::ConfigSave(format!("failed to create config dir: {}", e)))?;
        }

        let b = |v: bool| if v { "1" } else { "0" };

        let lines = [
            "# widget-bar configuration file".to_string(),
            String::new(),
            format!("interface={}", self.interface),
            format!("interval_ms={}", self.interval_ms),
            format!("separator=\"{}\"", self.separator),
            format!("timer_state={}", self.timer_state.display()),
            format!("native_metrics={}", b(self.native_metrics)),
            format!("placeholder={}", self.placeholder),
            format!("volume_cmd={}", self.volume_cmd),
            format!("ram_cmd={}", self.ram_cmd),
            format!("battery_cmd={}", self.battery_cmd),
            format!("date_cmd={}", self.date_cmd),
        ];

        let content = lines.join("\n") + "\n";
        let mut file = fs::File::create(path)
            .map_err(|e| Error::ConfigSave(format!("failed to create config file: {}", e)))?;
        file.write_all(content.as_bytes())
            .map_err(|e| Error::ConfigSave(format!("failed to write config file: {}", e)))?;

        Ok(())
    }
}

/// Strip one pair of surrounding double quotes
fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}
