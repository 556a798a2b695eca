use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::system::memory::parse_bytes;

/// Delta sampler over a monotonically increasing counter file
#[derive(Debug, Clone)]
pub struct CounterSampler {
    path: PathBuf,
    /// Previous reading; 0 until the first sample
    last: u64,
}

impl CounterSampler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last(&self) -> u64 {
        self.last
    }

    /// Read the counter and return the change since the previous read.
    ///
    /// The first call reports the absolute counter value. A counter that went
    /// backwards (interface reset) yields a negative delta, saturated to `i64`.
    pub fn sample(&mut self) -> Result<i64> {
        let content = fs::read_to_string(&self.path).map_err(|source| Error::CounterRead {
            path: self.path.clone(),
            source,
        })?;
        let current = content
            .trim()
            .parse::<u64>()
            .map_err(|source| Error::CounterParse {
                path: self.path.clone(),
                source,
            })?;

        let diff = (i128::from(current) - i128::from(self.last))
            .clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;
        self.last = current;
        log::trace!("{}: {} (+{})", self.path.display(), current, diff);
        Ok(diff)
    }

    /// Take a reading only to seed the previous value
    pub fn prime(&mut self) -> Result<()> {
        self.sample().map(|_| ())
    }
}

/// Network throughput for one tick, in bytes since the previous tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetworkInfo {
    pub rx_bytes: i64,
    pub tx_bytes: i64,
}

impl NetworkInfo {
    /// `|🔻 1.1KB 🔺  439B|`
    pub fn render(&self) -> String {
        format!("|🔻 {} 🔺 {}|", parse_bytes(self.rx_bytes), parse_bytes(self.tx_bytes))
    }
}

/// Receive/transmit samplers for one interface
#[derive(Debug, Clone)]
pub struct NetworkSampler {
    rx: CounterSampler,
    tx: CounterSampler,
}

impl NetworkSampler {
    /// Samplers over `/sys/class/net/<interface>/statistics`
    pub fn for_interface(interface: &str) -> Self {
        Self::with_statistics_dir(Path::new("/sys/class/net").join(interface).join("statistics"))
    }

    pub fn with_statistics_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            rx: CounterSampler::new(dir.join("rx_bytes")),
            tx: CounterSampler::new(dir.join("tx_bytes")),
        }
    }

    pub fn prime(&mut self) -> Result<()> {
        self.rx.prime()?;
        self.tx.prime()?;
        log::debug!(
            "seeded {} at {}, {} at {}",
            self.rx.path().display(),
            self.rx.last(),
            self.tx.path().display(),
            self.tx.last()
        );
        Ok(())
    }

    pub fn sample(&mut self) -> Result<NetworkInfo> {
        Ok(NetworkInfo {
            rx_bytes: self.rx.sample()?,
            tx_bytes: self.tx.sample()?,
        })
    }
}
