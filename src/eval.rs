use std::fmt;

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::circuit::Circuit;
use crate::error::{EngineError, Result};
use crate::gate::Gate;
use crate::perm::Permutation;

/// Budgets that gate algorithm selection. Exact evaluation is exponential in
/// width and skeleton construction quadratic in gate count, so callers that
/// need bounded latency enforce these up front; nothing aborts mid-flight.
#[derive(Clone, Copy, Debug)]
pub struct Limits {
    /// Widths above this route to the sampling path.
    pub exact_width_max: u32,
    /// Gate counts above this make skeleton construction infeasible.
    pub skeleton_gate_max: usize,
    /// Hard cap on identity-sampling draws.
    pub sample_cap: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            exact_width_max: 16,
            skeleton_gate_max: 200,
            sample_cap: 1000,
        }
    }
}

/// What [`evaluate`] produced. An exact permutation and a sampled verdict are
/// deliberately distinct types: a verdict from sampling is a probabilistic
/// claim and must never be mistaken for a proven table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Evaluation {
    Exact(Permutation),
    Sampled(SampledVerdict),
}

/// Outcome of the random-sampling identity check for wide circuits.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SampledVerdict {
    pub is_identity: bool,
    pub samples_tested: usize,
    /// First input found with `output != input`.
    pub counterexample: Option<(u64, u64)>,
}

impl fmt::Display for SampledVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.counterexample {
            Some((input, output)) => write!(
                f,
                "not identity: state {input} maps to {output} (found after {} samples)",
                self.samples_tested
            ),
            None => write!(
                f,
                "identity not refuted after {} samples",
                self.samples_tested
            ),
        }
    }
}

/// Evaluate a circuit, routing on width: exact permutation table up to
/// `limits.exact_width_max`, random identity sampling above it. The exact
/// table is never allocated on the sampling path.
pub fn evaluate(circuit: &Circuit, limits: &Limits) -> Result<Evaluation> {
    circuit.validate()?;
    if circuit.width <= limits.exact_width_max {
        Ok(Evaluation::Exact(exact_permutation(circuit)))
    } else {
        debug!(
            width = circuit.width,
            budget = limits.exact_width_max,
            "width above exact budget, sampling"
        );
        Ok(Evaluation::Sampled(sample(circuit, limits)))
    }
}

/// Exact evaluation or an explicit refusal; never silently degrades to
/// sampling.
pub fn evaluate_exact(circuit: &Circuit, limits: &Limits) -> Result<Permutation> {
    circuit.validate()?;
    if circuit.width > limits.exact_width_max {
        return Err(EngineError::InfeasibleComputation(format!(
            "exact evaluation at width {} exceeds the width budget {}",
            circuit.width, limits.exact_width_max
        )));
    }
    Ok(exact_permutation(circuit))
}

/// The opt-in approximate path: `min(sample_cap, gates * 10)` uniform random
/// states through the full sequence, stopping at the first mismatch. An empty
/// gate list is the identity without sampling.
pub fn sample_identity(circuit: &Circuit, limits: &Limits) -> Result<SampledVerdict> {
    circuit.validate()?;
    Ok(sample(circuit, limits))
}

fn exact_permutation(circuit: &Circuit) -> Permutation {
    let size = 1u64 << circuit.width;
    let map = (0..size).map(|s| apply_all(&circuit.gates, s)).collect();
    Permutation::from_raw(circuit.width, map)
}

fn apply_all(gates: &[Gate], state: u64) -> u64 {
    gates.iter().fold(state, |s, g| g.apply(s))
}

fn sample(circuit: &Circuit, limits: &Limits) -> SampledVerdict {
    if circuit.gates.is_empty() {
        return SampledVerdict {
            is_identity: true,
            samples_tested: 0,
            counterexample: None,
        };
    }
    let samples = limits.sample_cap.min(circuit.gates.len() * 10);
    let mut rng = rand::thread_rng();
    for tested in 0..samples {
        let input = random_state(&mut rng, circuit.width);
        let output = apply_all(&circuit.gates, input);
        if output != input {
            return SampledVerdict {
                is_identity: false,
                samples_tested: tested + 1,
                counterexample: Some((input, output)),
            };
        }
    }
    SampledVerdict {
        is_identity: true,
        samples_tested: samples,
        counterexample: None,
    }
}

fn random_state(rng: &mut impl Rng, width: u32) -> u64 {
    if width >= 64 {
        rng.gen()
    } else {
        rng.gen_range(0..1u64 << width)
    }
}
