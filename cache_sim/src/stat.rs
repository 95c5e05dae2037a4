use std::{fmt, io::Write};

use serde::{Serialize, Serializer};

use crate::cache::AccessResult;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStat {
    hit_count: u64,
    miss_count: u64,
}

impl CacheStat {
    pub fn update_stat(&mut self, result: AccessResult) {
        if result.is_hit() {
            self.hit_count += 1;
        } else {
            self.miss_count += 1;
        }
    }
    pub fn hit_count(&self) -> u64 {
        self.hit_count
    }
    pub fn miss_count(&self) -> u64 {
        self.miss_count
    }
    pub fn total(&self) -> u64 {
        self.hit_count + self.miss_count
    }
    pub fn report(&self) -> Report {
        let total = self.total();
        let (hit_rate_percent, miss_rate_percent) = if total == 0 {
            (Percent::ZERO, Percent::ZERO)
        } else {
            let hit = Percent::ratio(self.hit_count, total);
            (hit, Percent::HUNDRED - hit)
        };
        Report {
            total_accesses: total,
            hit_count: self.hit_count,
            miss_count: self.miss_count,
            hit_rate_percent,
            miss_rate_percent,
        }
    }
}

/// percentage in hundredths of a percent, so that `12.34%` is `Percent(1234)`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percent(u32);

impl Percent {
    pub const ZERO: Self = Self(0);
    pub const HUNDRED: Self = Self(100_00);

    /// `100 * num / den` rounded half-up to two decimals. `den` must be non-zero.
    fn ratio(num: u64, den: u64) -> Self {
        let scaled = (2 * 100_00 * num as u128 + den as u128) / (2 * den as u128);
        Self(scaled as u32)
    }
    pub fn hundredths(self) -> u32 {
        self.0
    }
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 100.
    }
}

impl std::ops::Sub for Percent {
    type Output = Percent;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{}.{:02}", self.0 / 100, self.0 % 100))
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// aggregate result of a run.
///
/// With no accesses at all both rates are `0.00`; otherwise they add up to
/// exactly `100.00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Report {
    pub total_accesses: u64,
    pub hit_count: u64,
    pub miss_count: u64,
    pub hit_rate_percent: Percent,
    pub miss_rate_percent: Percent,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.total_accesses == 0
    }
    /// writes the one-line summary followed by a newline.
    pub fn write_summary(&self, mut sink: impl Write) -> std::io::Result<()> {
        writeln!(sink, "{self}")
    }
    pub fn view(&self) -> ReportView<'_> {
        ReportView { report: self }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Out of {} memory accesses, there was a {}% cache hit rate and a {}% miss rate.",
            self.total_accesses, self.hit_rate_percent, self.miss_rate_percent
        )
    }
}

/// multi-line table for logs.
pub struct ReportView<'a> {
    report: &'a Report,
}

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Report {
            total_accesses,
            hit_count,
            miss_count,
            hit_rate_percent,
            miss_rate_percent,
        } = self.report;
        writeln!(f, "{:-^33}", " cache stat ")?;
        writeln!(f, " accesses: {total_accesses:>10}")?;
        writeln!(f, "      hit: {hit_count:>10} ({hit_rate_percent:>6}%)")?;
        writeln!(f, "     miss: {miss_count:>10} ({miss_rate_percent:>6}%)")?;
        write!(f, "{:-<33}", "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat_of(hits: u64, misses: u64) -> CacheStat {
        CacheStat {
            hit_count: hits,
            miss_count: misses,
        }
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(Percent(1667).to_string(), "16.67");
        assert_eq!(Percent(5).to_string(), "0.05");
        assert_eq!(Percent::HUNDRED.to_string(), "100.00");
        assert_eq!(Percent::ZERO.to_string(), "0.00");
    }
    #[test]
    fn test_percent_rounding() {
        assert_eq!(Percent::ratio(1, 6), Percent(1667));
        assert_eq!(Percent::ratio(2, 3), Percent(6667));
        assert_eq!(Percent::ratio(1, 8), Percent(1250));
        // 0.125% rounds half-up
        assert_eq!(Percent::ratio(1, 800), Percent(13));
        assert_eq!(Percent::ratio(7, 7), Percent::HUNDRED);
    }
    #[test]
    fn test_rates_sum_to_hundred() {
        for total in 1..=50u64 {
            for hits in 0..=total {
                let r = stat_of(hits, total - hits).report();
                assert_eq!(
                    r.hit_rate_percent.hundredths() + r.miss_rate_percent.hundredths(),
                    100_00,
                    "hits {hits} of {total}"
                );
            }
        }
    }
    #[test]
    fn test_update_stat() {
        let mut s = CacheStat::default();
        s.update_stat(AccessResult::Miss);
        s.update_stat(AccessResult::Hit);
        s.update_stat(AccessResult::Miss);
        assert_eq!(s.hit_count(), 1);
        assert_eq!(s.miss_count(), 2);
        assert_eq!(s.total(), 3);
    }
    #[test]
    fn test_empty_report() {
        let r = CacheStat::default().report();
        assert!(r.is_empty());
        assert_eq!(r.hit_rate_percent, Percent::ZERO);
        assert_eq!(r.miss_rate_percent, Percent::ZERO);
        assert_eq!(
            r.to_string(),
            "Out of 0 memory accesses, there was a 0.00% cache hit rate and a 0.00% miss rate."
        );
    }
    #[test]
    fn test_write_summary() {
        let mut buf = Vec::new();
        stat_of(1, 5).report().write_summary(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Out of 6 memory accesses, there was a 16.67% cache hit rate and a 83.33% miss rate.\n"
        );
    }
    #[test]
    fn test_view() {
        let view = stat_of(1, 3).report().view().to_string();
        assert!(view.contains("      hit:          1 ( 25.00%)"));
        assert!(view.contains("     miss:          3 ( 75.00%)"));
    }
}
