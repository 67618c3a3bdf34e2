use std::fmt;

use crate::http_probe::result::ProbeResult;

pub const STATS_BANNER: &str = "------------------------Profiling Stats------------------------";
pub const STATS_FOOTER: &str = "---------------------------------------------------------------";

/// Only a plain 200 counts as a success in the report.
const SUCCESS_STATUS: u16 = 200;

/// Aggregate view over the results of a profiling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    pub count: usize,
    pub fastest_ms: u64,
    pub slowest_ms: u64,
    pub mean_ms: u64,
    /// Element `count / 2` of the sorted latencies, i.e. the upper median for even counts.
    pub median_ms: u64,
    pub success_percent: u32,
    /// Every status other than 200, in repetition order.
    pub error_codes: Vec<u16>,
    pub smallest_bytes: usize,
    pub largest_bytes: usize,
}

impl ProfileSummary {
    /// Returns `None` when there is nothing to summarize.
    pub fn from_results(results: &[ProbeResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }
        let count = results.len();

        let error_codes: Vec<u16> = results
            .iter()
            .map(|r| r.status_code)
            .filter(|code| *code != SUCCESS_STATUS)
            .collect();

        let mut times: Vec<u64> = results.iter().map(|r| r.time_taken_ms).collect();
        let mut sizes: Vec<usize> = results.iter().map(|r| r.response_size).collect();
        times.sort_unstable();
        sizes.sort_unstable();

        let time_sum: u64 = times.iter().sum();
        let successes = count - error_codes.len();
        let success_percent = (successes as f64 / count as f64 * 100.0).round() as u32;

        Some(Self {
            count,
            fastest_ms: times[0],
            slowest_ms: times[count - 1],
            mean_ms: time_sum / count as u64,
            median_ms: times[count / 2],
            success_percent,
            error_codes,
            smallest_bytes: sizes[0],
            largest_bytes: sizes[count - 1],
        })
    }
}

impl fmt::Display for ProfileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let error_codes = self
            .error_codes
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(" ");

        writeln!(f, "{STATS_BANNER}")?;
        writeln!(f, "Number of requests: {}", self.count)?;
        writeln!(f, "Fastest Time: {}", self.fastest_ms)?;
        writeln!(f, "Slowest Time: {}", self.slowest_ms)?;
        writeln!(f, "Mean Time: {}", self.mean_ms)?;
        writeln!(f, "Median Time: {}", self.median_ms)?;
        writeln!(f, "Percent of successful requests: {}%", self.success_percent)?;
        writeln!(f, "Error Codes: [{error_codes}]")?;
        writeln!(f, "Size in bytes of the smallest response: {}", self.smallest_bytes)?;
        writeln!(f, "Size in bytes of the largest response: {}", self.largest_bytes)?;
        write!(f, "{STATS_FOOTER}")
    }
}
