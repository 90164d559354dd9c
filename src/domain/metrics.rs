// Metrics domain models
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// A point-in-time set of host metrics, replaced wholesale on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
    pub network_in: f64,
    pub network_out: f64,
    #[serde(default = "Utc::now")]
    pub captured_at: DateTime<Utc>,
}

impl MetricsSnapshot {
    pub fn new(
        cpu_percent: f64,
        memory_percent: f64,
        disk_percent: f64,
        network_in: f64,
        network_out: f64,
    ) -> Self {
        Self {
            cpu_percent: clamp_percent(cpu_percent),
            memory_percent: clamp_percent(memory_percent),
            disk_percent: clamp_percent(disk_percent),
            network_in: clamp_rate(network_in),
            network_out: clamp_rate(network_out),
            captured_at: Utc::now(),
        }
    }

    /// The all-zero snapshot shown before the first fetch resolves.
    pub fn empty() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// Re-applies the range constraints, for snapshots decoded from a remote source.
    pub fn normalized(self) -> Self {
        Self {
            captured_at: self.captured_at,
            ..Self::new(
                self.cpu_percent,
                self.memory_percent,
                self.disk_percent,
                self.network_in,
                self.network_out,
            )
        }
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

fn clamp_rate(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSample {
    pub time: DateTime<Utc>,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
    pub network_in: f64,
    pub network_out: f64,
}

impl MetricsSample {
    pub fn at(time: DateTime<Utc>, snapshot: &MetricsSnapshot) -> Self {
        Self {
            time,
            cpu_percent: snapshot.cpu_percent,
            memory_percent: snapshot.memory_percent,
            disk_percent: snapshot.disk_percent,
            network_in: snapshot.network_in,
            network_out: snapshot.network_out,
        }
    }
}

/// Bounded ring of recent samples for the monitoring charts.
#[derive(Debug, Clone)]
pub struct MetricsHistory {
    capacity: usize,
    samples: VecDeque<MetricsSample>,
}

impl MetricsHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample: MetricsSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn samples(&self) -> Vec<MetricsSample> {
        self.samples.iter().cloned().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for MetricsHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_clamps_out_of_range_values() {
        let snapshot = MetricsSnapshot::new(120.0, -3.0, f64::NAN, -10.0, 2048.5);
        assert_eq!(snapshot.cpu_percent, 100.0);
        assert_eq!(snapshot.memory_percent, 0.0);
        assert_eq!(snapshot.disk_percent, 0.0);
        assert_eq!(snapshot.network_in, 0.0);
        assert_eq!(snapshot.network_out, 2048.5);
    }

    #[test]
    fn test_history_keeps_most_recent_samples() {
        let mut history = MetricsHistory::new(3);
        for cpu in [10.0, 20.0, 30.0, 40.0, 50.0] {
            let snapshot = MetricsSnapshot::new(cpu, 0.0, 0.0, 0.0, 0.0);
            history.push(MetricsSample::at(snapshot.captured_at, &snapshot));
        }

        let cpu: Vec<f64> = history.samples().iter().map(|s| s.cpu_percent).collect();
        assert_eq!(cpu, vec![30.0, 40.0, 50.0]);
        assert_eq!(history.samples().len(), 3);
    }

    #[test]
    fn test_history_capacity_is_at_least_one() {
        let history = MetricsHistory::new(0);
        assert_eq!(history.capacity(), 1);
        assert_eq!(MetricsHistory::default().capacity(), DEFAULT_HISTORY_CAPACITY);
    }
}
