// Run-level statistics, derived once from the full outcome sequence.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::{RequestOutcome, Voice};

/// How many failures the report lists individually; the rest are
/// summarized as a remainder count.
const FAILURE_LISTING_CAP: usize = 5;

/// Duration statistics over the successful requests of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationStats {
    pub mean: Duration,
    pub median: Duration,
    pub min: Duration,
    pub max: Duration,
}

impl DurationStats {
    fn from_durations(durations: &[Duration]) -> Option<Self> {
        if durations.is_empty() {
            return None;
        }
        let mut sorted = durations.to_vec();
        sorted.sort();

        let sum: Duration = sorted.iter().sum();
        let mean = sum / sorted.len() as u32;
        let median = if sorted.len() % 2 == 0 {
            (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2]) / 2
        } else {
            sorted[sorted.len() / 2]
        };

        Some(Self {
            mean,
            median,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }
}

/// One line of the capped failure listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureDetail {
    pub sequence: u64,
    pub voice: Voice,
    pub duration: Duration,
    pub reason: String,
}

/// Aggregate view of a finished run.
///
/// Computed once from the completed record sequence; duration and
/// size statistics cover successful requests only, while the success
/// rate and request rate cover every attempted request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    /// Percentage of attempted requests that succeeded; 0 when
    /// nothing was attempted.
    pub success_rate: f64,
    /// Wall-clock span from first dispatch to last batch completion.
    pub total_duration: Duration,
    /// Absent when no request succeeded.
    pub durations: Option<DurationStats>,
    pub mean_response_bytes: f64,
    pub total_bytes: u64,
    pub requests_per_second: f64,
    pub throughput_mbps: f64,
    pub failures: Vec<FailureDetail>,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[RequestOutcome], total_duration: Duration) -> Self {
        let total_requests = outcomes.len() as u64;
        let successes: Vec<&RequestOutcome> = outcomes.iter().filter(|o| o.success).collect();
        let successful_requests = successes.len() as u64;
        let failed_requests = total_requests - successful_requests;

        let success_rate = if total_requests == 0 {
            0.0
        } else {
            successful_requests as f64 / total_requests as f64 * 100.0
        };

        let success_durations: Vec<Duration> = successes.iter().map(|o| o.duration).collect();
        let durations = DurationStats::from_durations(&success_durations);
        let total_bytes: u64 = successes.iter().map(|o| o.response_bytes).sum();
        let mean_response_bytes = if successes.is_empty() {
            0.0
        } else {
            total_bytes as f64 / successes.len() as f64
        };

        let secs = total_duration.as_secs_f64();
        let requests_per_second = if secs > 0.0 {
            total_requests as f64 / secs
        } else {
            0.0
        };
        let throughput_mbps = if secs > 0.0 {
            total_bytes as f64 * 8.0 / 1_000_000.0 / secs
        } else {
            0.0
        };

        let failures = outcomes
            .iter()
            .filter(|o| !o.success)
            .map(|o| FailureDetail {
                sequence: o.sequence,
                voice: o.voice,
                duration: o.duration,
                reason: o.failure_reason(),
            })
            .collect();

        Self {
            total_requests,
            successful_requests,
            failed_requests,
            success_rate,
            total_duration,
            durations,
            mean_response_bytes,
            total_bytes,
            requests_per_second,
            throughput_mbps,
            failures,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.durations {
            Some(stats) => {
                writeln!(
                    f,
                    "Total Successful Requests: {}",
                    self.successful_requests
                )?;
                writeln!(f, "Success Rate: {:.1}%", self.success_rate)?;
                writeln!(
                    f,
                    "Total Test Duration: {:.2} seconds",
                    self.total_duration.as_secs_f64()
                )?;
                writeln!(
                    f,
                    "Average Response Time: {:.3} seconds",
                    stats.mean.as_secs_f64()
                )?;
                writeln!(
                    f,
                    "Median Response Time: {:.3} seconds",
                    stats.median.as_secs_f64()
                )?;
                writeln!(
                    f,
                    "Min Response Time: {:.3} seconds",
                    stats.min.as_secs_f64()
                )?;
                writeln!(
                    f,
                    "Max Response Time: {:.3} seconds",
                    stats.max.as_secs_f64()
                )?;
                writeln!(
                    f,
                    "Average Response Size: {:.1} KB",
                    self.mean_response_bytes / 1024.0
                )?;
                writeln!(
                    f,
                    "Total Data Transferred: {:.2} MB",
                    self.total_bytes as f64 / (1024.0 * 1024.0)
                )?;
                writeln!(f, "Requests per Second: {:.2}", self.requests_per_second)?;
                writeln!(f, "Throughput: {:.2} Mbps", self.throughput_mbps)?;
            }
            None => {
                writeln!(f, "Success Rate: 0%")?;
                writeln!(
                    f,
                    "Total Test Duration: {:.2} seconds",
                    self.total_duration.as_secs_f64()
                )?;
            }
        }

        if !self.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Failure Details:")?;
            let listed = self.failures.iter().take(FAILURE_LISTING_CAP);
            let listed_count = self.failures.len().min(FAILURE_LISTING_CAP);
            for (i, failure) in listed.enumerate() {
                writeln!(f, "  Request Number: {}", failure.sequence)?;
                writeln!(f, "  Voice: {}", failure.voice)?;
                writeln!(f, "  Error: {}", failure.reason)?;
                writeln!(
                    f,
                    "  Duration: {:.2} seconds",
                    failure.duration.as_secs_f64()
                )?;
                if i + 1 < listed_count {
                    writeln!(f, "  ---")?;
                }
            }
            if self.failures.len() > FAILURE_LISTING_CAP {
                writeln!(
                    f,
                    "  ... and {} more failures",
                    self.failures.len() - FAILURE_LISTING_CAP
                )?;
            }
        }

        Ok(())
    }
}
