// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Timing summaries.

use std::time::Duration;

use comfy_table::Table;
use serde::Serialize;

/// One timed update.
#[derive(Debug, Clone, Copy)]
pub struct RunStats {
    pub elapsed: Duration,
    pub pairs: u64,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub scenario: &'static str,
    pub objects: usize,
    pub runs: Vec<RunStats>,
    /// Known pair count, when the scene has one.
    pub expected_pairs: Option<u64>,
}

/// Serializable digest printed with `--json`.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub scenario: &'static str,
    pub objects: usize,
    pub runs: usize,
    pub average_ms: f64,
    pub average_pairs: u64,
    pub expected_pairs: Option<u64>,
    pub pairs_per_run: Vec<u64>,
}

impl Report {
    pub const fn new(scenario: &'static str, objects: usize) -> Self {
        Self {
            scenario,
            objects,
            runs: Vec::new(),
            expected_pairs: None,
        }
    }

    pub fn average_time(&self) -> Duration {
        let total: Duration = self.runs.iter().map(|r| r.elapsed).sum();
        u32::try_from(self.runs.len())
            .ok()
            .filter(|&n| n > 0)
            .map_or(Duration::ZERO, |n| total / n)
    }

    pub fn average_pairs(&self) -> u64 {
        let total: u64 = self.runs.iter().map(|r| r.pairs).sum();
        total.checked_div(self.runs.len() as u64).unwrap_or(0)
    }

    pub fn summary(&self) -> Summary {
        Summary {
            scenario: self.scenario,
            objects: self.objects,
            runs: self.runs.len(),
            average_ms: self.average_time().as_secs_f64() * 1e3,
            average_pairs: self.average_pairs(),
            expected_pairs: self.expected_pairs,
            pairs_per_run: self.runs.iter().map(|r| r.pairs).collect(),
        }
    }

    /// Per-run table followed by averages.
    pub fn render(&self) -> String {
        let mut table = Table::new();
        table.set_header(vec!["run", "time (ms)", "pairs"]);
        for (i, run) in self.runs.iter().enumerate() {
            table.add_row(vec![
                i.to_string(),
                format!("{:.3}", run.elapsed.as_secs_f64() * 1e3),
                run.pairs.to_string(),
            ]);
        }

        let mut out = format!("{} scene, {} objects\n{table}\n", self.scenario, self.objects);
        out.push_str(&format!(
            "avg. time:  {:.3}ms\navg. pairs: {}",
            self.average_time().as_secs_f64() * 1e3,
            self.average_pairs()
        ));
        if let Some(expected) = self.expected_pairs {
            out.push_str(&format!("\nexpected pairs: {expected}"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> Report {
        let mut report = Report::new("random", 10);
        report.runs.push(RunStats {
            elapsed: Duration::from_millis(4),
            pairs: 10,
        });
        report.runs.push(RunStats {
            elapsed: Duration::from_millis(6),
            pairs: 21,
        });
        report
    }

    #[test]
    fn averages_over_runs() {
        let report = report();
        assert_eq!(report.average_time(), Duration::from_millis(5));
        assert_eq!(report.average_pairs(), 15);
        assert_eq!(Report::new("uniform", 0).average_time(), Duration::ZERO);
        assert_eq!(Report::new("uniform", 0).average_pairs(), 0);
    }

    #[test]
    fn render_lists_every_run() {
        let text = report().render();
        assert!(text.starts_with("random scene, 10 objects"));
        assert!(text.contains("21"));
        assert!(text.contains("avg. pairs: 15"));
        assert!(!text.contains("expected"));
    }

    #[test]
    fn summary_serializes() {
        let json = serde_json::to_value(report().summary()).unwrap_or_default();
        assert_eq!(json["pairs_per_run"], serde_json::json!([10, 21]));
        assert_eq!(json["expected_pairs"], serde_json::Value::Null);
    }
}
