use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Weighted asynchronous label propagation.
///
/// `adjacency[u]` lists `(v, weight)` for every neighbour `v` of `u`. Every
/// node starts with its own label. Each sweep visits the nodes in a shuffled
/// order and moves a node to the label carrying the greatest total edge
/// weight among its neighbours, unless its current label is already one of
/// the best. Ties are broken with the seeded RNG, so the partition is fully
/// determined by `seed`.
///
/// Returns the communities as lists of node indices, ordered by label.
#[must_use]
pub fn label_propagation(
    adjacency: &[Vec<(usize, f64)>],
    seed: u64,
    max_sweeps: usize,
) -> Vec<Vec<usize>> {
    let n = adjacency.len();
    let mut labels: Vec<usize> = (0..n).collect();
    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);

    let mut converged = false;
    for sweep in 0..max_sweeps {
        order.shuffle(&mut rng);
        let mut changed = false;

        for &node in &order {
            if adjacency[node].is_empty() {
                continue;
            }

            let best = best_labels(&adjacency[node], &labels);
            if best.contains(&labels[node]) {
                continue;
            }
            if let Some(&label) = best.choose(&mut rng) {
                labels[node] = label;
                changed = true;
            }
        }

        if !changed {
            debug!(sweeps = sweep + 1, "Label propagation converged");
            converged = true;
            break;
        }
    }

    if !converged && n > 0 {
        warn!(max_sweeps, "Label propagation did not converge");
    }

    let mut communities: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (node, label) in labels.into_iter().enumerate() {
        communities.entry(label).or_default().push(node);
    }
    communities.into_values().collect()
}

/// Labels with the highest summed weight among a node's neighbours
fn best_labels(neighbors: &[(usize, f64)], labels: &[usize]) -> Vec<usize> {
    let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
    for &(v, weight) in neighbors {
        *weights.entry(labels[v]).or_insert(0.0) += weight;
    }

    let max = weights.values().copied().fold(f64::NEG_INFINITY, f64::max);
    #[allow(clippy::float_cmp)]
    weights
        .into_iter()
        .filter(|&(_, w)| w == max)
        .map(|(label, _)| label)
        .collect()
}
