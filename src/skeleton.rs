use serde::Serialize;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::eval::Limits;
use crate::gate::Gate;

/// Minimal dependency DAG over the collision relation. Nodes are gate
/// indices in sequence order; an edge `(i, j)` means gate `i` must precede
/// gate `j` in any valid linearization. Purely a visualization and reasoning
/// aid; building one never reorders gates.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Skeleton {
    /// Transitive reduction of the order-respecting collision relation,
    /// sorted by source then destination index.
    pub edges: Vec<(usize, usize)>,
    /// Longest incoming path per gate over the reduced edges, for layered
    /// rendering. Ties within a level keep sequence order.
    pub levels: Vec<usize>,
}

/// Build the skeleton, or refuse when the gate count blows the quadratic
/// budget.
pub fn build_skeleton(gates: &[Gate], limits: &Limits) -> Result<Skeleton> {
    let n = gates.len();
    if n > limits.skeleton_gate_max {
        debug!(gates = n, budget = limits.skeleton_gate_max, "skeleton refused");
        return Err(EngineError::InfeasibleComputation(format!(
            "skeleton over {n} gates exceeds the gate budget {}",
            limits.skeleton_gate_max
        )));
    }

    // reach[i][j]: a collision path i -> ... -> j with at least one hop
    let mut reach = vec![vec![false; n]; n];
    for i in (0..n).rev() {
        for j in (i + 1)..n {
            if gates[i].collides(&gates[j]) {
                reach[i][j] = true;
                for k in (j + 1)..n {
                    if reach[j][k] {
                        reach[i][k] = true;
                    }
                }
            }
        }
    }

    // keep (i, j) only when no longer collision path already carries i's
    // influence to j
    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if !gates[i].collides(&gates[j]) {
                continue;
            }
            let bypassed =
                ((i + 1)..j).any(|k| gates[i].collides(&gates[k]) && reach[k][j]);
            if !bypassed {
                edges.push((i, j));
            }
        }
    }

    // standard DAG layering; edges arrive grouped by ascending source, so a
    // single pass sees final source levels
    let mut levels = vec![0usize; n];
    for &(i, j) in &edges {
        levels[j] = levels[j].max(levels[i] + 1);
    }

    Ok(Skeleton { edges, levels })
}
