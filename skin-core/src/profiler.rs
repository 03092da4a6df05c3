//! Stage timing
//!
//! A [`TimingSink`] receives named durations. [`ScopedStage`] measures a
//! region and reports to the sink when dropped, so the sample is recorded on
//! every exit path: normal return, `?` propagation, or unwinding.
//!
//! There is no global profiler. Each run owns its own [`Profiler`], which
//! keeps repeated runs in one process (tests, benchmarks) from mixing
//! samples.

use std::time::{Duration, Instant};

use crate::stats::{BenchSummary, StatsReport, TimingEntry};

/// Receiver for stage durations
pub trait TimingSink {
    fn record(&mut self, stage: &str, elapsed: Duration);

    /// Start timing `stage`; the sample is recorded when the guard drops
    fn stage(&mut self, stage: &'static str) -> ScopedStage<'_, Self>
    where
        Self: Sized,
    {
        ScopedStage::new(self, stage)
    }
}

/// Guard that records its lifetime into a [`TimingSink`] exactly once
pub struct ScopedStage<'a, S: TimingSink + ?Sized> {
    sink: &'a mut S,
    stage: &'static str,
    start: Instant,
}

impl<'a, S: TimingSink + ?Sized> ScopedStage<'a, S> {
    pub fn new(sink: &'a mut S, stage: &'static str) -> Self {
        Self {
            sink,
            stage,
            start: Instant::now(),
        }
    }
}

impl<S: TimingSink + ?Sized> Drop for ScopedStage<'_, S> {
    fn drop(&mut self) {
        self.sink.record(self.stage, self.start.elapsed());
    }
}

/// Per-run collection of stage timings, in recording order
#[derive(Debug, Default, Clone)]
pub struct Profiler {
    entries: Vec<TimingEntry>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a duration given directly in microseconds
    pub fn record_micros(&mut self, stage: &str, microseconds: f64) {
        self.entries.push(TimingEntry {
            stage: stage.to_string(),
            microseconds,
        });
    }

    pub fn entries(&self) -> &[TimingEntry] {
        &self.entries
    }

    /// All samples recorded under `stage`, in order
    pub fn samples(&self, stage: &str) -> Vec<f64> {
        self.entries
            .iter()
            .filter(|entry| entry.stage == stage)
            .map(|entry| entry.microseconds)
            .collect()
    }

    /// Snapshot the timings as a report, optionally with a bench aggregate
    pub fn report(&self, bench_summary: Option<BenchSummary>) -> StatsReport {
        StatsReport {
            stages: self.entries.clone(),
            bench_summary,
        }
    }
}

impl TimingSink for Profiler {
    fn record(&mut self, stage: &str, elapsed: Duration) {
        self.record_micros(stage, elapsed.as_secs_f64() * 1_000_000.0);
    }
}
