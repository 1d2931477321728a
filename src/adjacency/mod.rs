//! Spatial refinement of threshold calls.
//!
//! True-positive tiles tend to sit next to each other on the flow cell while
//! false positives are isolated. Given an adjacency graph between targets,
//! the [`AdjacencyRefiner`]:
//!
//! 1. Checks that every passing target is a node of the graph
//! 2. Copies each target's matching ratio onto its node (0 for unknown nodes)
//! 3. Restricts the graph to the passing targets
//! 4. Weights each edge with the geometric mean of its endpoints' ratios
//! 5. Detects communities with weighted label propagation
//! 6. Picks the community with the largest total `n_matching`
//! 7. Dilates it by one hop over the full graph
//!
//! Targets inside the dilated set get `pass_adjacency = true`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use puck_matcher::adjacency::{AdjacencyRefiner, RefinerConfig};
//! use puck_matcher::parsing::edgelist::parse_edge_list_file;
//! use std::path::Path;
//!
//! # fn records() -> Vec<puck_matcher::core::TargetRecord> { Vec::new() }
//! let graph = parse_edge_list_file(Path::new("tiles.edgelist")).unwrap();
//! let mut records = records();
//! let refiner = AdjacencyRefiner::new(&graph, RefinerConfig::default());
//! let refinement = refiner.refine(&mut records).unwrap();
//! println!("accepted {} tiles", refinement.dilated.len());
//! ```

pub mod community;
pub mod graph;
pub mod refine;

pub use community::label_propagation;
pub use graph::AdjacencyGraph;
pub use refine::{
    dilate, edge_weight, AdjacencyError, AdjacencyRefiner, Community, Refinement, RefinerConfig,
};
