/// Units for [`parse_bytes`], indexed by how many times the value was divided by 1024
const ENDINGS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Fixed display width of a formatted byte delta
const DESIRED_LENGTH: usize = 5;

/// Memory usage as reported by the native RAM source
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryInfo {
    pub total_mem: u64, // bytes
    pub used_mem: u64,  // bytes
}

impl MemoryInfo {
    pub fn new(total_mem: u64, used_mem: u64) -> Self {
        Self { total_mem, used_mem }
    }

    /// `used/total` in the same shape as `free -h` with the `i` suffix stripped
    pub fn summary(&self) -> String {
        format!("{}/{}", format_size(self.used_mem), format_size(self.total_mem))
    }
}

/// Format a byte delta as a 5-column human-readable magnitude, like `numfmt --to=iec`.
///
/// The value is divided by 1024 while it is at least 1000. Raw bytes get no
/// decimals, scaled values below 10 get one. Anything past GB is `>=1TB`.
/// Results wider than 5 columns are not truncated.
pub fn parse_bytes(n: i64) -> String {
    let mut level = 0usize;
    let mut curr = n as f64;
    while curr >= 1000.0 {
        curr /= 1024.0;
        level += 1;
    }

    let result = match ENDINGS.get(level) {
        None => ">=1TB".to_string(),
        Some(ending) if level > 0 && curr < 10.0 => format!("{:.1}{}", curr, ending),
        Some(ending) => format!("{:.0}{}", curr, ending),
    };

    format!("{:>width$}", result, width = DESIRED_LENGTH)
}

/// Units for [`format_size`], matching `free -h` once the `i` is stripped
const SIZE_UNITS: [&str; 6] = ["B", "K", "M", "G", "T", "P"];

/// Format bytes the way `free -h` does: scale by 1024 until below 1024,
/// one decimal only for scaled values under 10.
pub fn format_size(bytes: u64) -> String {
    let mut level = 0usize;
    let mut value = bytes as f64;
    while value >= 1024.0 && level + 1 < SIZE_UNITS.len() {
        value /= 1024.0;
        level += 1;
    }

    if level > 0 && value < 10.0 {
        format!("{:.1}{}", value, SIZE_UNITS[level])
    } else {
        format!("{:.0}{}", value, SIZE_UNITS[level])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: i64 = 1024 * 1024 * 1024;

    #[test]
    fn raw_bytes_are_padded_to_five_columns() {
        assert_eq!(parse_bytes(0), "   0B");
        assert_eq!(parse_bytes(439), " 439B");
        assert_eq!(parse_bytes(999), " 999B");
    }

    #[test]
    fn small_scaled_values_keep_one_decimal() {
        assert_eq!(parse_bytes(1000), "1.0KB");
        assert_eq!(parse_bytes(1536), "1.5KB");
        assert_eq!(parse_bytes(3 * 1024 * 1024), "3.0MB");
    }

    #[test]
    fn large_scaled_values_drop_decimals() {
        assert_eq!(parse_bytes(20 * 1024), " 20KB");
        assert_eq!(parse_bytes(512 * 1024 * 1024), "512MB");
        assert_eq!(parse_bytes(999 * GIB), "999GB");
    }

    #[test]
    fn wide_results_are_not_truncated() {
        // 9.99 KB rounds up to two integer digits
        assert_eq!(parse_bytes(10_230), "10.0KB");
    }

    #[test]
    fn past_gigabytes_is_capped() {
        assert_eq!(parse_bytes(1000 * GIB), ">=1TB");
        assert_eq!(parse_bytes(i64::MAX), ">=1TB");
    }

    #[test]
    fn negative_deltas_stay_raw() {
        assert_eq!(parse_bytes(-500), "-500B");
    }

    #[test]
    fn memory_summary_uses_compact_sizes() {
        let info = MemoryInfo::new(16 * 1024 * 1024 * 1024, 5 * 1024 * 1024 * 1024 + 200 * 1024 * 1024);
        assert_eq!(info.summary(), "5.2G/16G");
    }

    #[test]
    fn sizes_follow_free_rounding() {
        assert_eq!(format_size(512), "512B");
        assert_eq!(format_size(1023), "1023B");
        assert_eq!(format_size(1536), "1.5K");
        assert_eq!(format_size(300 * 1024 * 1024), "300M");
        assert_eq!(format_size(15 * 1024 * 1024 * 1024 + 400 * 1024 * 1024), "15G");
    }
}
