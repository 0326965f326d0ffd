//! Size reporting.

use std::fmt;

/// Format a byte count with decimal (SI) units: B, KB, MB, GB.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1_000;
    const MB: u64 = 1_000_000;
    const GB: u64 = 1_000_000_000;

    let (value, unit) = match bytes {
        b if b < KB => return format!("{} B", b),
        b if b < MB => (b as f64 / KB as f64, "KB"),
        b if b < GB => (b as f64 / MB as f64, "MB"),
        b => (b as f64 / GB as f64, "GB"),
    };

    format!("{} {}", to_fixed_2(value), unit)
}

/// Two-decimal formatting of the stored value with ties rounded up, like
/// JS `toFixed(2)`: 1.125 gives "1.13" but 1.045 (stored as 1.04499...) gives "1.04".
fn to_fixed_2(value: f64) -> String {
    // An exact hundredths tie is an odd multiple of 1/8
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        let hundredths = (eighths as u64 * 25 + 1) / 2;
        return format!("{}.{:02}", hundredths / 100, hundredths % 100);
    }
    format!("{:.2}", value)
}

/// Percentage by which `reduced` is smaller than `original`.
///
/// `None` when either size is unknown or `original` is zero. Negative when
/// the output grew.
pub fn percentage_reduction(original: Option<u64>, reduced: Option<u64>) -> Option<f64> {
    let (original, reduced) = (original?, reduced?);
    if original == 0 {
        return None;
    }
    Some((original as f64 - reduced as f64) / original as f64 * 100.0)
}

/// Sizes before and after a reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeReport {
    pub original: u64,
    pub reduced: u64,
}

impl SizeReport {
    pub fn new(original: usize, reduced: usize) -> Self {
        Self {
            original: original as u64,
            reduced: reduced as u64,
        }
    }

    pub fn percentage(&self) -> Option<f64> {
        percentage_reduction(Some(self.original), Some(self.reduced))
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            format_file_size(self.original),
            format_file_size(self.reduced)
        )?;
        match self.percentage() {
            Some(pct) if pct >= 0.0 => write!(f, " ({:.2}% smaller)", pct),
            Some(pct) => write!(f, " ({:.2}% larger)", -pct),
            None => Ok(()),
        }
    }
}
