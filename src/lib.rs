//! Semantics engine for reversible logic circuits built from the X, CX, CCX
//! and ECA57 gate alphabet: exact permutation evaluation with a sampling
//! fallback for wide circuits, the gate collision relation, skeleton
//! (transitively reduced dependency) graphs, canonical push-left reordering,
//! disjoint-cycle notation and subcircuit wire reduction.
//!
//! Everything here is a pure function of its inputs; the engine holds no
//! state between calls and never mutates a caller's circuit.

mod canon;
mod circuit;
mod error;
mod eval;
mod gate;
mod perm;
mod skeleton;

pub use canon::{canonicalize, canonicalize_with, CanonicalizationStrategy, Layering};
pub use circuit::{extract_subcircuit, Circuit};
pub use error::{EngineError, Result};
pub use eval::{evaluate, evaluate_exact, sample_identity, Evaluation, Limits, SampledVerdict};
pub use gate::Gate;
pub use perm::Permutation;
pub use skeleton::{build_skeleton, Skeleton};
