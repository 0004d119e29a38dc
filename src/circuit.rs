use std::collections::{BTreeSet, HashMap};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::gate::Gate;

/// An ordered gate sequence over `width` wires. Sequence order is evaluation
/// order; simultaneous display steps are a caller concern.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Circuit {
    pub width: u32,
    pub gates: Vec<Gate>,
}

impl Circuit {
    pub fn new(width: u32, gates: Vec<Gate>) -> Result<Circuit> {
        let c = Circuit { width, gates };
        c.validate()?;
        Ok(c)
    }

    /// Check gate invariants and that every referenced wire fits the width.
    /// Run this on circuits that arrive through deserialization or after a
    /// width reduction; affected gates are reported, never dropped.
    ///
    /// States are u64 bit vectors, so widths beyond 64 wires are not
    /// representable and are refused outright.
    pub fn validate(&self) -> Result<()> {
        if self.width > 64 {
            return Err(EngineError::InfeasibleComputation(format!(
                "width {} exceeds the 64-wire machine-state representation",
                self.width
            )));
        }
        for g in &self.gates {
            g.check()?;
            for w in g.wires() {
                if w >= self.width {
                    return Err(EngineError::DimensionMismatch {
                        wire: w,
                        width: self.width,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn used_wires(&self) -> BTreeSet<u32> {
        self.gates.iter().flat_map(|g| g.wires()).collect()
    }

    /// Random circuit mixing all four gate kinds. Needs width >= 3 so that
    /// three distinct wires always exist.
    pub fn random(width: u32, num_gates: usize) -> Circuit {
        debug_assert!(width >= 3);
        let mut rng = rand::thread_rng();
        let mut gates = Vec::with_capacity(num_gates);
        for _ in 0..num_gates {
            let target = rng.gen_range(0..width);
            let mut c0 = rng.gen_range(0..width);
            while c0 == target {
                c0 = rng.gen_range(0..width);
            }
            let mut c1 = rng.gen_range(0..width);
            while c1 == target || c1 == c0 {
                c1 = rng.gen_range(0..width);
            }
            let gate = match rng.gen_range(0..4) {
                0 => Gate::x(target),
                1 => Gate::Cx {
                    target,
                    control: c0,
                },
                2 => Gate::Ccx {
                    target,
                    controls: [c0, c1],
                },
                _ => Gate::Eca57 {
                    target,
                    controls: [c0, c1],
                },
            };
            gates.push(gate);
        }
        Circuit { width, gates }
    }

    /// A random circuit followed by its mirror. Every gate kind is an
    /// involution, so the whole sequence evaluates to the identity.
    pub fn random_identity(width: u32, half_gates: usize) -> Circuit {
        let forward = Circuit::random(width, half_gates);
        let mut gates = forward.gates.clone();
        gates.extend(forward.gates.iter().rev().cloned());
        Circuit { width, gates }
    }
}

/// Slice out the selected gates (parent order preserved, duplicates ignored)
/// and renumber their wires onto the minimal contiguous range starting at 0.
/// The renumbering is a bijection on the wires actually used, so collision
/// relationships among the extracted gates survive unchanged.
pub fn extract_subcircuit(gates: &[Gate], selected: &[usize]) -> Result<Circuit> {
    let mut indices: Vec<usize> = selected.to_vec();
    indices.sort_unstable();
    indices.dedup();
    if let Some(&bad) = indices.iter().find(|&&i| i >= gates.len()) {
        return Err(EngineError::InvalidSelection {
            index: bad,
            len: gates.len(),
        });
    }

    let picked: Vec<Gate> = indices.iter().map(|&i| gates[i]).collect();
    let mut wires: Vec<u32> = picked.iter().flat_map(|g| g.wires()).collect();
    wires.sort_unstable();
    wires.dedup();
    let rank: HashMap<u32, u32> = wires
        .iter()
        .enumerate()
        .map(|(r, &w)| (w, r as u32))
        .collect();

    let gates = picked.iter().map(|g| g.remap(|w| rank[&w])).collect();
    Ok(Circuit {
        width: wires.len() as u32,
        gates,
    })
}
