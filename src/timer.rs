//! Work timer persisted between invocations.
//!
//! Each run loads the state file, applies one command and writes it back.
//! The file keeps the `{"Mode": <int>, "StartTime": <unix secs>}` layout so
//! existing state survives upgrades.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name of the state file inside the temp directory
const STATE_FILE_NAME: &str = "widget-bar_timer_state";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum TimerMode {
    #[default]
    Stopped,
    Running,
    /// Never entered by any command; `get` rejects it.
    Paused,
    /// Integer outside the known modes; `get` rejects it, `start`/`stop` overwrite it.
    Unknown(i64),
}

impl From<i64> for TimerMode {
    fn from(value: i64) -> Self {
        match value {
            0 => Self::Stopped,
            1 => Self::Running,
            2 => Self::Paused,
            other => Self::Unknown(other),
        }
    }
}

impl From<TimerMode> for i64 {
    fn from(mode: TimerMode) -> Self {
        match mode {
            TimerMode::Stopped => 0,
            TimerMode::Running => 1,
            TimerMode::Paused => 2,
            TimerMode::Unknown(other) => other,
        }
    }
}

/// Missing fields fall back to their defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerState {
    #[serde(rename = "Mode")]
    pub mode: TimerMode,
    /// Unix seconds of the last `start`; left untouched by `stop`
    #[serde(rename = "StartTime")]
    pub start_time: i64,
}

/// Sub-command given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TimerCommand {
    Start,
    Stop,
    Get,
}

/// Default location: `<temp dir>/widget-bar_timer_state`
pub fn default_state_path() -> PathBuf {
    std::env::temp_dir().join(STATE_FILE_NAME)
}

/// Timer bound to its state file
#[derive(Debug, Clone)]
pub struct Timer {
    path: PathBuf,
}

impl Timer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state, or the stopped default when the file does not exist
    pub fn load(&self) -> Result<TimerState> {
        let data = match fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(TimerState::default()),
            Err(e) => return Err(self.load_error(e)),
        };
        serde_json::from_str(&data).map_err(|e| self.load_error(e))
    }

    pub fn save(&self, state: &TimerState) -> Result<()> {
        let data = serde_json::to_string_pretty(state).map_err(|e| self.save_error(e))?;
        fs::write(&self.path, data).map_err(|e| self.save_error(e))
    }

    /// Apply `command` at unix time `now` and return the segment to display.
    ///
    /// `start` and `stop` persist the new state and display nothing.
    pub fn handle(&self, command: TimerCommand, now: i64) -> Result<String> {
        let mut state = self.load()?;

        match command {
            TimerCommand::Start => {
                state.mode = TimerMode::Running;
                state.start_time = now;
                self.save(&state)?;
                log::info!("timer started at {}", now);
                Ok(String::new())
            }
            TimerCommand::Stop => {
                state.mode = TimerMode::Stopped;
                self.save(&state)?;
                log::info!("timer stopped");
                Ok(String::new())
            }
            TimerCommand::Get => match state.mode {
                TimerMode::Stopped => Ok(String::new()),
                TimerMode::Running => Ok(format_elapsed(now.saturating_sub(state.start_time))),
                TimerMode::Paused | TimerMode::Unknown(_) => Err(Error::InvalidTimerState),
            },
        }
    }

    fn load_error(&self, e: impl ToString) -> Error {
        Error::TimerLoad {
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }

    fn save_error(&self, e: impl ToString) -> Error {
        Error::TimerSave {
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }
}

/// `\rHH:MM:SS`; hours keep counting past 24, negative spans show as zero
pub fn format_elapsed(secs: i64) -> String {
    let secs = secs.max(0);
    let hours = secs / 3600;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("\r{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Current unix time in seconds
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_timer() -> (tempfile::TempDir, Timer) {
        let dir = tempfile::tempdir().unwrap();
        let timer = Timer::new(dir.path().join(STATE_FILE_NAME));
        (dir, timer)
    }

    #[test]
    fn missing_file_is_stopped() {
        let (_dir, timer) = scratch_timer();
        assert_eq!(timer.load().unwrap(), TimerState::default());
        assert_eq!(timer.handle(TimerCommand::Get, 1_000).unwrap(), "");
        assert!(!timer.path().exists());
    }

    #[test]
    fn start_then_get_reports_elapsed() {
        let (_dir, timer) = scratch_timer();
        assert_eq!(timer.handle(TimerCommand::Start, 1_000).unwrap(), "");
        assert_eq!(timer.handle(TimerCommand::Get, 1_002).unwrap(), "\r00:00:02");
        assert_eq!(timer.handle(TimerCommand::Get, 1_000 + 3_723).unwrap(), "\r01:02:03");
    }

    #[test]
    fn stop_hides_timer_and_keeps_start_time() {
        let (_dir, timer) = scratch_timer();
        timer.handle(TimerCommand::Start, 500).unwrap();
        timer.handle(TimerCommand::Stop, 900).unwrap();

        assert_eq!(timer.handle(TimerCommand::Get, 1_000).unwrap(), "");
        let state = timer.load().unwrap();
        assert_eq!(state.mode, TimerMode::Stopped);
        assert_eq!(state.start_time, 500);
    }

    #[test]
    fn state_file_layout() {
        let (_dir, timer) = scratch_timer();
        timer.handle(TimerCommand::Start, 1_700_000_000).unwrap();
        let raw = fs::read_to_string(timer.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({"Mode": 1, "StartTime": 1_700_000_000i64}));
    }

    #[test]
    fn paused_state_is_rejected() {
        let (_dir, timer) = scratch_timer();
        fs::write(timer.path(), r#"{"Mode": 2, "StartTime": 10}"#).unwrap();
        assert!(matches!(
            timer.handle(TimerCommand::Get, 20),
            Err(Error::InvalidTimerState)
        ));
    }

    #[test]
    fn corrupt_state_is_reported() {
        let (_dir, timer) = scratch_timer();
        fs::write(timer.path(), "not json").unwrap();
        assert!(matches!(timer.handle(TimerCommand::Get, 0), Err(Error::TimerLoad { .. })));
    }

    #[test]
    fn missing_fields_load_as_defaults() {
        let (_dir, timer) = scratch_timer();
        fs::write(timer.path(), r#"{"Mode": 1}"#).unwrap();
        let state = timer.load().unwrap();
        assert_eq!(state, TimerState { mode: TimerMode::Running, start_time: 0 });

        fs::write(timer.path(), "{}").unwrap();
        assert_eq!(timer.load().unwrap(), TimerState::default());
    }

    #[test]
    fn unknown_mode_is_rejected_by_get_and_repaired_by_start() {
        let (_dir, timer) = scratch_timer();
        fs::write(timer.path(), r#"{"Mode": 7, "StartTime": 0}"#).unwrap();
        assert_eq!(timer.load().unwrap().mode, TimerMode::Unknown(7));
        assert!(matches!(timer.handle(TimerCommand::Get, 5), Err(Error::InvalidTimerState)));

        timer.handle(TimerCommand::Start, 100).unwrap();
        assert_eq!(timer.handle(TimerCommand::Get, 130).unwrap(), "\r00:00:30");

        fs::write(timer.path(), r#"{"Mode": -3, "StartTime": 0}"#).unwrap();
        timer.handle(TimerCommand::Stop, 0).unwrap();
        assert_eq!(timer.load().unwrap().mode, TimerMode::Stopped);
    }

    #[test]
    fn unwritable_state_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let timer = Timer::new(dir.path().join("missing").join(STATE_FILE_NAME));
        assert!(matches!(
            timer.handle(TimerCommand::Start, 0),
            Err(Error::TimerSave { .. })
        ));
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(0), "\r00:00:00");
        assert_eq!(format_elapsed(-30), "\r00:00:00");
        assert_eq!(format_elapsed(100 * 3600 + 59), "\r100:00:59");
    }
}
