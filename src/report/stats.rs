use serde::Serialize;
use std::fmt;

use crate::core::TargetRecord;

/// Helper function to convert usize count to f64 with explicit precision loss allowance
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Tile statistics for a finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStats {
    /// Number of targets scanned
    pub total: usize,
    /// Number of targets above the cutoff
    pub passed_threshold: usize,
    /// Mean matching ratio of the passing targets, if any passed
    pub mean_matching_ratio: Option<f64>,
    /// Number of targets accepted by adjacency refinement, if it ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed_adjacency: Option<usize>,
}

impl RunStats {
    #[must_use]
    pub fn from_records(records: &[TargetRecord]) -> Self {
        let passed: Vec<&TargetRecord> = records.iter().filter(|r| r.pass_threshold).collect();

        let mean_matching_ratio = if passed.is_empty() {
            None
        } else {
            Some(passed.iter().map(|r| r.matching_ratio).sum::<f64>() / count_to_f64(passed.len()))
        };

        let passed_adjacency = if records.iter().any(|r| r.pass_adjacency.is_some()) {
            Some(
                records
                    .iter()
                    .filter(|r| r.pass_adjacency == Some(true))
                    .count(),
            )
        } else {
            None
        };

        Self {
            total: records.len(),
            passed_threshold: passed.len(),
            mean_matching_ratio,
            passed_adjacency,
        }
    }

    /// Tab-separated header matching [`RunStats::to_tsv_row`]
    #[must_use]
    pub fn tsv_header() -> &'static str {
        "total\tpass_threshold\tmean_matching_ratio\tpass_adjacency"
    }

    #[must_use]
    pub fn to_tsv_row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.total,
            self.passed_threshold,
            self.mean_matching_ratio
                .map(|m| format!("{m:.4}"))
                .unwrap_or_default(),
            self.passed_adjacency
                .map(|n| n.to_string())
                .unwrap_or_default(),
        )
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tile statistics:")?;
        writeln!(f, "   TOTAL: {}", self.total)?;
        writeln!(f, "   PASS: {}", self.passed_threshold)?;
        match self.mean_matching_ratio {
            Some(mean) => writeln!(f, "   AVERAGE MATCHING RATIO: {mean:.4}")?,
            None => writeln!(f, "   AVERAGE MATCHING RATIO: n/a")?,
        }
        if let Some(n) = self.passed_adjacency {
            writeln!(f, "   PASS ADJACENCY: {n}")?;
        }
        Ok(())
    }
}
