//! Timing report model and benchmark aggregate

use serde::Serialize;

/// One recorded stage duration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingEntry {
    pub stage: String,
    pub microseconds: f64,
}

/// Aggregate over repeated-run samples, all values in microseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BenchSummary {
    pub runs: usize,
    pub min_microseconds: f64,
    pub max_microseconds: f64,
    pub mean_microseconds: f64,
    pub median_microseconds: f64,
    /// Population standard deviation (divides by `runs`)
    pub stddev_microseconds: f64,
}

impl BenchSummary {
    /// Summarize samples; an empty slice gives `runs == 0` and zeros
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let n = samples.len() as f64;
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = samples.iter().sum::<f64>() / n;

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        let variance = samples
            .iter()
            .map(|s| {
                let delta = s - mean;
                delta * delta
            })
            .sum::<f64>()
            / n;

        Self {
            runs: samples.len(),
            min_microseconds: min,
            max_microseconds: max,
            mean_microseconds: mean,
            median_microseconds: median,
            stddev_microseconds: variance.sqrt(),
        }
    }
}

/// Everything the stats writer persists for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsReport {
    pub stages: Vec<TimingEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bench_summary: Option<BenchSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_samples() {
        let summary = BenchSummary::from_samples(&[]);
        assert_eq!(summary, BenchSummary::default());
        assert_eq!(summary.runs, 0);
    }

    #[test]
    fn test_odd_count() {
        let summary = BenchSummary::from_samples(&[5.0, 1.0, 3.0]);
        assert_eq!(summary.runs, 3);
        assert_eq!(summary.min_microseconds, 1.0);
        assert_eq!(summary.max_microseconds, 5.0);
        assert_eq!(summary.mean_microseconds, 3.0);
        assert_eq!(summary.median_microseconds, 3.0);
    }

    #[test]
    fn test_even_count_median_averages_middle_pair() {
        let summary = BenchSummary::from_samples(&[4.0, 1.0, 2.0, 10.0]);
        assert_eq!(summary.median_microseconds, 3.0);
    }

    #[test]
    fn test_population_stddev() {
        // mean 5, squared deviations sum to 32, population variance 4
        let summary = BenchSummary::from_samples(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(summary.mean_microseconds, 5.0);
        assert_eq!(summary.stddev_microseconds, 2.0);
    }

    #[test]
    fn test_single_sample() {
        let summary = BenchSummary::from_samples(&[42.0]);
        assert_eq!(summary.runs, 1);
        assert_eq!(summary.median_microseconds, 42.0);
        assert_eq!(summary.stddev_microseconds, 0.0);
    }

    #[test]
    fn test_report_serialization_omits_missing_summary() {
        let report = StatsReport {
            stages: vec![TimingEntry {
                stage: "cpu_skinning".into(),
                microseconds: 12.5,
            }],
            bench_summary: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["stages"][0]["stage"], "cpu_skinning");
        assert_eq!(json["stages"][0]["microseconds"], 12.5);
        assert!(json.get("bench_summary").is_none());
    }
}
