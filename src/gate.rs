use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// One reversible gate. The control arity is fixed by the variant, so a CX
/// with two controls is unrepresentable rather than rejected at runtime.
///
/// For `Ccx` both controls are positive AND-conditions. For `Eca57` the
/// control order matters: `controls[0]` is a positive control, `controls[1]`
/// an inverted one, and the gate fires iff `c0 | !c1`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(tag = "kind")]
pub enum Gate {
    X {
        target: u32,
    },
    #[serde(rename = "CX")]
    Cx {
        target: u32,
        control: u32,
    },
    #[serde(rename = "CCX")]
    Ccx {
        target: u32,
        controls: [u32; 2],
    },
    #[serde(rename = "ECA57")]
    Eca57 {
        target: u32,
        controls: [u32; 2],
    },
}

fn bit(state: u64, wire: u32) -> bool {
    (state >> wire) & 1 == 1
}

impl Gate {
    pub fn x(target: u32) -> Gate {
        Gate::X { target }
    }

    pub fn cx(target: u32, control: u32) -> Result<Gate> {
        let g = Gate::Cx { target, control };
        g.check()?;
        Ok(g)
    }

    pub fn ccx(target: u32, controls: [u32; 2]) -> Result<Gate> {
        let g = Gate::Ccx { target, controls };
        g.check()?;
        Ok(g)
    }

    pub fn eca57(target: u32, controls: [u32; 2]) -> Result<Gate> {
        let g = Gate::Eca57 { target, controls };
        g.check()?;
        Ok(g)
    }

    /// Re-check the wire invariants. The constructors already enforce them;
    /// this exists for gates that arrive through deserialization.
    pub fn check(&self) -> Result<()> {
        let target = self.target();
        let controls = self.controls();
        if controls.contains(&target) {
            return Err(EngineError::InvalidGate(format!(
                "target wire {target} also appears as a control"
            )));
        }
        if controls.len() == 2 && controls[0] == controls[1] {
            return Err(EngineError::InvalidGate(format!(
                "duplicate control wire {}",
                controls[0]
            )));
        }
        Ok(())
    }

    pub fn target(&self) -> u32 {
        match self {
            Gate::X { target }
            | Gate::Cx { target, .. }
            | Gate::Ccx { target, .. }
            | Gate::Eca57 { target, .. } => *target,
        }
    }

    pub fn controls(&self) -> &[u32] {
        match self {
            Gate::X { .. } => &[],
            Gate::Cx { control, .. } => std::slice::from_ref(control),
            Gate::Ccx { controls, .. } | Gate::Eca57 { controls, .. } => controls,
        }
    }

    /// Target first, then controls in declaration order.
    pub fn wires(&self) -> impl Iterator<Item = u32> + '_ {
        std::iter::once(self.target()).chain(self.controls().iter().copied())
    }

    /// Apply the gate to one machine state (bit i = wire i).
    pub fn apply(&self, state: u64) -> u64 {
        let fire = match self {
            Gate::X { .. } => true,
            Gate::Cx { control, .. } => bit(state, *control),
            Gate::Ccx { controls, .. } => bit(state, controls[0]) && bit(state, controls[1]),
            Gate::Eca57 { controls, .. } => bit(state, controls[0]) || !bit(state, controls[1]),
        };
        if fire {
            state ^ (1 << self.target())
        } else {
            state
        }
    }

    /// True iff the two gates cannot be reordered without changing the
    /// circuit's permutation: one gate's target feeds the other's controls.
    /// Sharing a target alone is not a collision.
    pub fn collides(&self, other: &Gate) -> bool {
        other.controls().contains(&self.target()) || self.controls().contains(&other.target())
    }

    pub(crate) fn remap(&self, f: impl Fn(u32) -> u32) -> Gate {
        match *self {
            Gate::X { target } => Gate::X { target: f(target) },
            Gate::Cx { target, control } => Gate::Cx {
                target: f(target),
                control: f(control),
            },
            Gate::Ccx { target, controls } => Gate::Ccx {
                target: f(target),
                controls: [f(controls[0]), f(controls[1])],
            },
            Gate::Eca57 { target, controls } => Gate::Eca57 {
                target: f(target),
                controls: [f(controls[0]), f(controls[1])],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x_flips_target_unconditionally() {
        let g = Gate::x(0);
        assert_eq!(g.apply(0b0), 0b1);
        assert_eq!(g.apply(0b1), 0b0);
        assert_eq!(g.apply(0b110), 0b111);
    }

    #[test]
    fn cx_fires_only_on_control() {
        let g = Gate::cx(1, 0).unwrap();
        assert_eq!(g.apply(0b001), 0b011);
        assert_eq!(g.apply(0b000), 0b000);
        assert_eq!(g.apply(0b011), 0b001);
    }

    #[test]
    fn ccx_requires_both_controls() {
        let g = Gate::ccx(0, [1, 2]).unwrap();
        assert_eq!(g.apply(0b110), 0b111);
        assert_eq!(g.apply(0b010), 0b010);
        assert_eq!(g.apply(0b100), 0b100);
        assert_eq!(g.apply(0b000), 0b000);
    }

    #[test]
    fn eca57_truth_table() {
        // fires iff c0 | !c1, with c0 = wire 1 and c1 = wire 2
        let g = Gate::eca57(0, [1, 2]).unwrap();
        assert_eq!(g.apply(0b000), 0b001); // c0=0 c1=0 -> !c1 fires
        assert_eq!(g.apply(0b010), 0b011); // c0=1 c1=0 -> fires
        assert_eq!(g.apply(0b100), 0b100); // c0=0 c1=1 -> quiet
        assert_eq!(g.apply(0b110), 0b111); // c0=1 c1=1 -> fires
    }

    #[test]
    fn every_kind_is_an_involution() {
        let gates = [
            Gate::x(2),
            Gate::cx(0, 3).unwrap(),
            Gate::ccx(1, [0, 3]).unwrap(),
            Gate::eca57(3, [1, 2]).unwrap(),
        ];
        for g in gates {
            for state in 0..16u64 {
                assert_eq!(g.apply(g.apply(state)), state, "{g:?} on {state:#b}");
            }
        }
    }

    #[test]
    fn construction_rejects_overlap_and_duplicates() {
        assert!(Gate::cx(1, 1).is_err());
        assert!(Gate::ccx(0, [0, 2]).is_err());
        assert!(Gate::ccx(0, [2, 2]).is_err());
        assert!(Gate::eca57(3, [3, 1]).is_err());
        assert!(Gate::eca57(3, [1, 1]).is_err());
    }

    #[test]
    fn collision_is_target_into_controls() {
        let a = Gate::eca57(0, [1, 2]).unwrap();
        let b = Gate::eca57(1, [3, 4]).unwrap(); // b's target feeds a's controls
        let c = Gate::eca57(0, [3, 4]).unwrap(); // shares a's target, controls disjoint
        assert!(a.collides(&b));
        assert!(b.collides(&a));
        assert!(!a.collides(&c));
        assert!(!Gate::x(0).collides(&Gate::x(0)));
    }

    #[test]
    fn serde_tagged_representation() {
        let g = Gate::eca57(0, [1, 2]).unwrap();
        let json = serde_json::to_string(&g).unwrap();
        assert!(json.contains("\"kind\":\"ECA57\""), "{json}");
        let back: Gate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }
}
