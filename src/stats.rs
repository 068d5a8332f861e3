use crate::record::Record;
use once_cell::sync::Lazy;
use regex::Regex;

static RUNTIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):([0-5]?\d):([0-5]?\d)$").expect("runtime pattern compiles")
});

/// A record whose `runTime` is not `H:MM:SS`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record #{rank} \"{title}\" has malformed runTime {value:?} (expected H:MM:SS)")]
pub struct MalformedRuntime {
    pub rank: i64,
    pub title: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatasetStats {
    pub total_videos: usize,
    pub total_runtime_secs: u64,
}

impl DatasetStats {
    /// Fails on the first record with an unparsable runtime.
    pub fn compute(records: &[Record]) -> Result<Self, MalformedRuntime> {
        let mut total_runtime_secs: u64 = 0;
        for record in records {
            let secs = parse_runtime(&record.run_time).ok_or_else(|| MalformedRuntime {
                rank: record.rank,
                title: record.title.clone(),
                value: record.run_time.clone(),
            })?;
            total_runtime_secs = total_runtime_secs.saturating_add(secs);
        }

        Ok(Self {
            total_videos: records.len(),
            total_runtime_secs,
        })
    }

    pub fn total_runtime(&self) -> String {
        format_runtime(self.total_runtime_secs)
    }
}

/// Parses `H:MM:SS` into seconds. Hours are unbounded.
pub fn parse_runtime(value: &str) -> Option<u64> {
    let caps = RUNTIME_PATTERN.captures(value.trim())?;
    let hours: u64 = caps[1].parse().ok()?;
    let minutes: u64 = caps[2].parse().ok()?;
    let seconds: u64 = caps[3].parse().ok()?;
    hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)
}

pub fn format_runtime(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::sample;

    #[test]
    fn parses_runtimes() {
        assert_eq!(parse_runtime("1:02:03"), Some(3723));
        assert_eq!(parse_runtime("0:00:10"), Some(10));
        assert_eq!(parse_runtime("125:00:00"), Some(450_000));
        assert_eq!(parse_runtime(" 0:5:7 "), Some(307));
    }

    #[test]
    fn rejects_malformed_runtimes() {
        assert_eq!(parse_runtime("10:05"), None);
        assert_eq!(parse_runtime("1:60:00"), None);
        assert_eq!(parse_runtime("abc"), None);
        assert_eq!(parse_runtime(""), None);
        assert_eq!(parse_runtime("1:02:03:04"), None);
    }

    #[test]
    fn formats_with_padded_minutes_and_seconds() {
        assert_eq!(format_runtime(0), "0:00:00");
        assert_eq!(format_runtime(3733), "1:02:13");
        assert_eq!(format_runtime(360_000 + 61), "100:01:01");
    }

    #[test]
    fn sums_runtime_across_records() {
        let mut a = sample(2020, 1, "a", "Essay");
        a.run_time = "1:02:03".to_string();
        let mut b = sample(2020, 2, "b", "Essay");
        b.run_time = "0:00:10".to_string();

        let stats = DatasetStats::compute(&[a, b]).unwrap();
        assert_eq!(stats.total_videos, 2);
        assert_eq!(stats.total_runtime_secs, 3733);
        assert_eq!(stats.total_runtime(), "1:02:13");
    }

    #[test]
    fn empty_dataset_has_zero_totals() {
        let stats = DatasetStats::compute(&[]).unwrap();
        assert_eq!(stats, DatasetStats::default());
        assert_eq!(stats.total_runtime(), "0:00:00");
    }

    #[test]
    fn malformed_runtime_names_the_record() {
        let good = sample(2020, 1, "fine", "Essay");
        let mut bad = sample(2020, 7, "broken", "Essay");
        bad.run_time = "12:34".to_string();

        let err = DatasetStats::compute(&[good, bad]).unwrap_err();
        assert_eq!(err.rank, 7);
        assert_eq!(err.title, "broken");
        assert!(err.to_string().contains("12:34"));
    }
}
