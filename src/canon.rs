use serde::Serialize;

use crate::gate::Gate;

/// The two layering algorithms the dashboards grew independently. They do
/// not always agree on level structure for the same gate set, and neither is
/// authoritative; callers pick one by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanonicalizationStrategy {
    /// Kahn's algorithm over the full collision DAG, largest target wire
    /// first among ready gates; levels are longest incoming collision paths.
    Topological,
    /// First-fit packing in sequence order: each gate lands on the earliest
    /// level holding nothing it collides with, never reflowing earlier
    /// levels.
    GreedyPack,
}

/// A gate order plus a level per gate, both indexed against the input
/// sequence: `order[k]` is the input index of the k-th gate in the produced
/// order, `levels[i]` is the level of input gate `i`.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Layering {
    pub order: Vec<usize>,
    pub levels: Vec<usize>,
}

/// The canonical "push-left" reordering: a deterministic linear extension of
/// the collision partial order, so the result implements the same
/// permutation as the input. Step indices are positional in the output.
pub fn canonicalize(gates: &[Gate]) -> Vec<Gate> {
    topological_order(gates)
        .into_iter()
        .map(|i| gates[i])
        .collect()
}

/// One interface over both layering strategies.
pub fn canonicalize_with(gates: &[Gate], strategy: CanonicalizationStrategy) -> Layering {
    match strategy {
        CanonicalizationStrategy::Topological => Layering {
            order: topological_order(gates),
            levels: longest_path_levels(gates),
        },
        CanonicalizationStrategy::GreedyPack => Layering {
            order: (0..gates.len()).collect(),
            levels: greedy_pack_levels(gates),
        },
    }
}

fn topological_order(gates: &[Gate]) -> Vec<usize> {
    let n = gates.len();
    let mut indegree = vec![0usize; n];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in 0..n {
        for j in (i + 1)..n {
            if gates[i].collides(&gates[j]) {
                successors[i].push(j);
                indegree[j] += 1;
            }
        }
    }

    let mut ready: Vec<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while !ready.is_empty() {
        // largest target wire wins; equal targets fall back to sequence order
        let pos = ready
            .iter()
            .enumerate()
            .max_by_key(|&(_, &node)| (gates[node].target(), std::cmp::Reverse(node)))
            .map(|(pos, _)| pos)
            .expect("ready set is non-empty");
        let node = ready.swap_remove(pos);
        order.push(node);
        for &s in &successors[node] {
            indegree[s] -= 1;
            if indegree[s] == 0 {
                ready.push(s);
            }
        }
    }
    order
}

fn longest_path_levels(gates: &[Gate]) -> Vec<usize> {
    let n = gates.len();
    let mut levels = vec![0usize; n];
    for j in 0..n {
        for i in 0..j {
            if gates[i].collides(&gates[j]) {
                levels[j] = levels[j].max(levels[i] + 1);
            }
        }
    }
    levels
}

fn greedy_pack_levels(gates: &[Gate]) -> Vec<usize> {
    let mut levels = vec![0usize; gates.len()];
    let mut buckets: Vec<Vec<usize>> = Vec::new();
    for (idx, gate) in gates.iter().enumerate() {
        let slot = buckets
            .iter()
            .position(|members| members.iter().all(|&m| !gates[m].collides(gate)));
        let level = match slot {
            Some(level) => level,
            None => {
                buckets.push(Vec::new());
                buckets.len() - 1
            }
        };
        buckets[level].push(idx);
        levels[idx] = level;
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Circuit;
    use crate::eval::{evaluate_exact, Limits};

    #[test]
    fn canonical_order_is_a_linear_extension() {
        for _ in 0..20 {
            let c = Circuit::random(5, 20);
            let order = canonicalize_with(&c.gates, CanonicalizationStrategy::Topological).order;
            let mut position = vec![0usize; order.len()];
            for (pos, &idx) in order.iter().enumerate() {
                position[idx] = pos;
            }
            for i in 0..c.gates.len() {
                for j in (i + 1)..c.gates.len() {
                    if c.gates[i].collides(&c.gates[j]) {
                        assert!(position[i] < position[j], "inverted pair ({i}, {j})");
                    }
                }
            }
        }
    }

    #[test]
    fn canonicalization_preserves_the_permutation() {
        let limits = Limits::default();
        for _ in 0..10 {
            let c = Circuit::random(5, 20);
            let reordered = Circuit {
                width: c.width,
                gates: canonicalize(&c.gates),
            };
            assert_eq!(
                evaluate_exact(&reordered, &limits).unwrap(),
                evaluate_exact(&c, &limits).unwrap()
            );
        }
    }

    #[test]
    fn canonicalization_is_idempotent() {
        for _ in 0..20 {
            let c = Circuit::random(6, 25);
            let once = canonicalize(&c.gates);
            let twice = canonicalize(&once);
            assert_eq!(twice, once);
        }
    }

    #[test]
    fn ready_ties_pick_the_larger_target() {
        // both gates are ready at the start and do not collide
        let gates = [Gate::x(0), Gate::x(3)];
        let order = canonicalize_with(&gates, CanonicalizationStrategy::Topological).order;
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn greedy_pack_levels_hold_no_internal_collisions() {
        for _ in 0..20 {
            let c = Circuit::random(6, 25);
            let levels = canonicalize_with(&c.gates, CanonicalizationStrategy::GreedyPack).levels;
            for i in 0..c.gates.len() {
                for j in (i + 1)..c.gates.len() {
                    if levels[i] == levels[j] {
                        assert!(
                            !c.gates[i].collides(&c.gates[j]),
                            "colliding pair ({i}, {j}) share level {}",
                            levels[i]
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn strategies_can_disagree_on_levels() {
        // c repeats a and collides with nothing on level 0, so GreedyPack
        // packs it next to a even though the collision path a -> b -> c puts
        // it two levels down
        let a = Gate::cx(0, 1).unwrap();
        let b = Gate::cx(1, 0).unwrap();
        let c = Gate::cx(0, 1).unwrap();
        let d = Gate::cx(2, 1).unwrap();
        let gates = [a, b, c, d];
        let topo = canonicalize_with(&gates, CanonicalizationStrategy::Topological).levels;
        let greedy = canonicalize_with(&gates, CanonicalizationStrategy::GreedyPack).levels;
        assert_eq!(topo, vec![0, 1, 2, 2]);
        assert_eq!(greedy, vec![0, 1, 0, 0]);
    }

    #[test]
    fn greedy_pack_keeps_sequence_order() {
        let c = Circuit::random(5, 10);
        let layering = canonicalize_with(&c.gates, CanonicalizationStrategy::GreedyPack);
        assert_eq!(layering.order, (0..10).collect::<Vec<_>>());
    }
}
