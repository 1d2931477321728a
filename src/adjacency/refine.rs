use std::collections::{BTreeSet, HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info};

use crate::adjacency::community::label_propagation;
use crate::adjacency::graph::AdjacencyGraph;
use crate::core::TargetRecord;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AdjacencyError {
    #[error("Not all passed tiles are available in the graph, missing: {}", .0.join(", "))]
    MissingNodes(Vec<String>),

    #[error("No target passed the threshold, adjacency could not be determined")]
    NoPassingTargets,
}

/// Default upper bound on label propagation sweeps
pub const DEFAULT_MAX_SWEEPS: usize = 1000;

/// Configuration for adjacency refinement
#[derive(Debug, Clone)]
pub struct RefinerConfig {
    /// Seed for label propagation ordering and tie-breaking
    pub seed: u64,
    /// Upper bound on label propagation sweeps
    pub max_sweeps: usize,
}

impl Default for RefinerConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_sweeps: DEFAULT_MAX_SWEEPS,
        }
    }
}

/// A community of passing targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Community {
    /// Member ids, sorted
    pub members: Vec<String>,
    /// Sum of `n_matching` over the members
    pub total_matching: usize,
}

/// Outcome of a refinement run
#[derive(Debug, Clone)]
pub struct Refinement {
    /// Communities ordered by their smallest member id
    pub communities: Vec<Community>,
    /// Index of the selected community in `communities`
    pub best: usize,
    /// Accepted targets: the best community and its one-hop neighbours
    pub dilated: BTreeSet<String>,
}

impl Refinement {
    #[must_use]
    pub fn best_community(&self) -> &Community {
        &self.communities[self.best]
    }
}

/// Edge weight between two targets: the geometric mean of their ratios
#[must_use]
pub fn edge_weight(ratio_u: f64, ratio_v: f64) -> f64 {
    (ratio_u * ratio_v).sqrt()
}

/// One-hop neighbourhood of `members` over the full graph, members included
#[must_use]
pub fn dilate(graph: &AdjacencyGraph, members: &[String]) -> BTreeSet<String> {
    let mut dilated = BTreeSet::new();

    for member in members {
        let Some(idx) = graph.node_index(member) else {
            continue;
        };
        dilated.insert(member.clone());
        for neighbor in graph.neighbors(idx) {
            dilated.insert(graph.node_id(neighbor).to_string());
        }
    }

    dilated
}

/// Refines threshold calls using the spatial adjacency of targets
pub struct AdjacencyRefiner<'a> {
    graph: &'a AdjacencyGraph,
    config: RefinerConfig,
}

impl<'a> AdjacencyRefiner<'a> {
    pub fn new(graph: &'a AdjacencyGraph, config: RefinerConfig) -> Self {
        Self { graph, config }
    }

    /// Compute the dilated best community and set `pass_adjacency` on every
    /// record. Records are left untouched when an error is returned.
    ///
    /// # Errors
    ///
    /// Returns `AdjacencyError::MissingNodes` if a passing target is not in
    /// the graph, or `AdjacencyError::NoPassingTargets` if no target passed.
    pub fn refine(&self, records: &mut [TargetRecord]) -> Result<Refinement, AdjacencyError> {
        let refinement = self.evaluate(records)?;

        for record in records.iter_mut() {
            record.pass_adjacency = Some(refinement.dilated.contains(&record.id));
        }

        Ok(refinement)
    }

    /// Compute the refinement without modifying the records
    ///
    /// # Errors
    ///
    /// See [`AdjacencyRefiner::refine`].
    pub fn evaluate(&self, records: &[TargetRecord]) -> Result<Refinement, AdjacencyError> {
        // The first row wins when an id appears more than once
        let mut by_id: HashMap<&str, &TargetRecord> = HashMap::new();
        for record in records {
            by_id.entry(record.id.as_str()).or_insert(record);
        }

        let passed: HashSet<&str> = records
            .iter()
            .filter(|r| r.pass_threshold)
            .map(|r| r.id.as_str())
            .collect();

        let mut missing: Vec<String> = passed
            .iter()
            .filter(|id| !self.graph.contains(id))
            .map(|id| (*id).to_string())
            .collect();
        if !missing.is_empty() {
            missing.sort();
            return Err(AdjacencyError::MissingNodes(missing));
        }

        let ratios: Vec<f64> = self
            .graph
            .nodes()
            .iter()
            .map(|id| by_id.get(id.as_str()).map_or(0.0, |r| r.matching_ratio))
            .collect();

        // Subgraph induced by the passing targets, in graph node order
        let members: Vec<usize> = (0..self.graph.node_count())
            .filter(|&idx| passed.contains(self.graph.node_id(idx)))
            .collect();
        let local: HashMap<usize, usize> = members
            .iter()
            .enumerate()
            .map(|(local_idx, &idx)| (idx, local_idx))
            .collect();

        let adjacency: Vec<Vec<(usize, f64)>> = members
            .iter()
            .map(|&u| {
                self.graph
                    .neighbors(u)
                    .filter_map(|v| {
                        local
                            .get(&v)
                            .map(|&local_v| (local_v, edge_weight(ratios[u], ratios[v])))
                    })
                    .collect()
            })
            .collect();

        debug!(
            nodes = members.len(),
            edges = adjacency.iter().map(Vec::len).sum::<usize>() / 2,
            "Built passing-target subgraph"
        );

        let mut communities: Vec<Community> =
            label_propagation(&adjacency, self.config.seed, self.config.max_sweeps)
                .into_iter()
                .map(|group| {
                    let mut ids: Vec<String> = group
                        .into_iter()
                        .map(|local_idx| self.graph.node_id(members[local_idx]).to_string())
                        .collect();
                    ids.sort();
                    let total_matching = ids
                        .iter()
                        .map(|id| by_id.get(id.as_str()).map_or(0, |r| r.n_matching))
                        .sum();
                    Community {
                        members: ids,
                        total_matching,
                    }
                })
                .collect();

        if communities.is_empty() {
            return Err(AdjacencyError::NoPassingTargets);
        }

        communities.sort_by(|a, b| a.members.cmp(&b.members));

        // Strictly greater total replaces the current best, so ties keep the
        // community with the smallest member id
        let mut best = 0;
        for (i, community) in communities.iter().enumerate().skip(1) {
            if community.total_matching > communities[best].total_matching {
                best = i;
            }
        }

        let dilated = dilate(self.graph, &communities[best].members);

        info!(
            communities = communities.len(),
            best_size = communities[best].members.len(),
            best_total_matching = communities[best].total_matching,
            dilated = dilated.len(),
            "Selected best community"
        );

        Ok(Refinement {
            communities,
            best,
            dilated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TargetSpec;

    fn record(id: &str, n_barcodes: usize, n_matching: usize, pass: bool) -> TargetRecord {
        let mut record = TargetRecord::from_counts(
            &TargetSpec::new(format!("{id}.txt"), id),
            n_barcodes,
            n_matching,
        );
        record.pass_threshold = pass;
        record
    }

    #[test]
    fn test_edge_weight_geometric_mean() {
        assert!((edge_weight(0.25, 1.0) - 0.5).abs() < 1e-12);
        assert!(edge_weight(0.0, 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_single_passing_target_dilates_one_hop() {
        let graph = AdjacencyGraph::from_edges([("T1", "T2"), ("T2", "T3")]);
        let mut records = vec![
            record("T1", 10, 8, true),
            record("T2", 10, 0, false),
            record("T3", 10, 0, false),
        ];

        let refinement = AdjacencyRefiner::new(&graph, RefinerConfig::default())
            .refine(&mut records)
            .unwrap();

        assert_eq!(refinement.communities.len(), 1);
        assert_eq!(refinement.best_community().members, vec!["T1"]);
        let dilated: Vec<&str> = refinement.dilated.iter().map(String::as_str).collect();
        assert_eq!(dilated, vec!["T1", "T2"]);

        let flags: Vec<Option<bool>> = records.iter().map(|r| r.pass_adjacency).collect();
        assert_eq!(flags, vec![Some(true), Some(true), Some(false)]);
    }

    #[test]
    fn test_isolated_false_positive_is_rejected() {
        // A contiguous run T1-T2-T3 and an isolated false positive far away
        let graph = AdjacencyGraph::from_edges([
            ("T1", "T2"),
            ("T2", "T3"),
            ("T3", "T4"),
            ("T4", "T5"),
            ("T5", "T6"),
            ("T6", "T7"),
        ]);
        let mut records = vec![
            record("T1", 100, 60, true),
            record("T2", 100, 70, true),
            record("T3", 100, 50, true),
            record("T4", 100, 1, false),
            record("T5", 100, 0, false),
            record("T6", 100, 0, false),
            record("T7", 100, 30, true),
        ];

        let refinement = AdjacencyRefiner::new(&graph, RefinerConfig::default())
            .refine(&mut records)
            .unwrap();

        assert_eq!(refinement.best_community().members, vec!["T1", "T2", "T3"]);
        assert_eq!(refinement.best_community().total_matching, 180);

        let accepted: Vec<&str> = records
            .iter()
            .filter(|r| r.pass_adjacency == Some(true))
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(accepted, vec!["T1", "T2", "T3", "T4"]);
    }

    #[test]
    fn test_selection_uses_n_matching_not_ratio() {
        // T1 has the higher ratio, T5 the larger absolute overlap
        let graph = AdjacencyGraph::from_edges([("T1", "T2"), ("T3", "T4"), ("T4", "T5")]);
        let records = vec![
            record("T1", 10, 9, true),
            record("T2", 10, 0, false),
            record("T3", 10, 0, false),
            record("T4", 10, 0, false),
            record("T5", 1000, 500, true),
        ];

        let refinement = AdjacencyRefiner::new(&graph, RefinerConfig::default())
            .evaluate(&records)
            .unwrap();
        assert_eq!(refinement.best_community().members, vec!["T5"]);
        assert!(refinement.dilated.contains("T4"));
        assert!(!refinement.dilated.contains("T1"));
    }

    #[test]
    fn test_tie_picks_smallest_member_id() {
        let graph = AdjacencyGraph::from_edges([("B", "X"), ("A", "Y")]);
        let records = vec![record("B", 10, 5, true), record("A", 10, 5, true)];

        let refinement = AdjacencyRefiner::new(&graph, RefinerConfig::default())
            .evaluate(&records)
            .unwrap();
        assert_eq!(refinement.best_community().members, vec!["A"]);
        assert_eq!(refinement.best, 0);
    }

    #[test]
    fn test_missing_passed_target_fails() {
        let graph = AdjacencyGraph::from_edges([("T1", "T2")]);
        let mut records = vec![record("T1", 10, 5, true), record("T9", 10, 5, true)];

        let err = AdjacencyRefiner::new(&graph, RefinerConfig::default())
            .refine(&mut records)
            .unwrap_err();
        assert_eq!(err, AdjacencyError::MissingNodes(vec!["T9".to_string()]));
        assert!(records.iter().all(|r| r.pass_adjacency.is_none()));
    }

    #[test]
    fn test_missing_failed_target_is_fine() {
        let graph = AdjacencyGraph::from_edges([("T1", "T2")]);
        let records = vec![record("T1", 10, 5, true), record("T9", 10, 0, false)];

        assert!(AdjacencyRefiner::new(&graph, RefinerConfig::default())
            .evaluate(&records)
            .is_ok());
    }

    #[test]
    fn test_no_passing_targets_fails() {
        let graph = AdjacencyGraph::from_edges([("T1", "T2")]);
        let records = vec![record("T1", 10, 0, false), record("T2", 10, 0, false)];

        let err = AdjacencyRefiner::new(&graph, RefinerConfig::default())
            .evaluate(&records)
            .unwrap_err();
        assert_eq!(err, AdjacencyError::NoPassingTargets);
    }

    #[test]
    fn test_refinement_is_idempotent() {
        let graph = AdjacencyGraph::from_edges([
            ("T1", "T2"),
            ("T2", "T3"),
            ("T3", "T1"),
            ("T3", "T4"),
            ("T4", "T5"),
            ("T5", "T6"),
            ("T6", "T4"),
        ]);
        let records: Vec<TargetRecord> = ["T1", "T2", "T3", "T4", "T5", "T6"]
            .iter()
            .enumerate()
            .map(|(i, id)| record(id, 100, 40 + i, true))
            .collect();

        let refiner = AdjacencyRefiner::new(
            &graph,
            RefinerConfig {
                seed: 11,
                ..RefinerConfig::default()
            },
        );
        let first = refiner.evaluate(&records).unwrap();
        let second = refiner.evaluate(&records).unwrap();
        assert_eq!(first.communities, second.communities);
        assert_eq!(first.dilated, second.dilated);
    }

    #[test]
    fn test_dilate_ignores_unknown_members() {
        let graph = AdjacencyGraph::from_edges([("T1", "T2")]);
        let dilated = dilate(&graph, &["T1".to_string(), "T9".to_string()]);
        assert_eq!(dilated.len(), 2);
        assert!(!dilated.contains("T9"));
    }
}
