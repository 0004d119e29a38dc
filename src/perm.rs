use serde::Serialize;

use crate::error::{EngineError, Result};

// Cycle reconstruction allocates the full 2^width table; anything past this
// is dashboard-hostile and refused.
const MAX_CYCLE_WIDTH: u32 = 24;

/// A bijection on the `2^width` machine states, stored as a lookup table.
/// Only ever produced for exact-evaluation widths.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
    width: u32,
    map: Vec<u64>,
}

impl Permutation {
    pub fn identity(width: u32) -> Permutation {
        Permutation {
            width,
            map: (0..1u64 << width).collect(),
        }
    }

    pub(crate) fn from_raw(width: u32, map: Vec<u64>) -> Permutation {
        debug_assert_eq!(map.len(), 1 << width);
        Permutation { width, map }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.map
    }

    pub fn is_identity(&self) -> bool {
        self.map.iter().enumerate().all(|(s, &t)| s as u64 == t)
    }

    /// True iff every state in `[0, 2^width)` appears exactly once.
    pub fn is_bijection(&self) -> bool {
        let mut seen = vec![false; self.map.len()];
        for &t in &self.map {
            match seen.get_mut(t as usize) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }

    /// Disjoint cycles in order of first-visited representative, fixed
    /// points omitted.
    pub fn cycles(&self) -> Vec<Vec<u64>> {
        let mut visited = vec![false; self.map.len()];
        let mut out = Vec::new();
        for start in 0..self.map.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            let mut cycle = vec![start as u64];
            let mut s = self.map[start] as usize;
            while s != start {
                visited[s] = true;
                cycle.push(s as u64);
                s = self.map[s] as usize;
            }
            if cycle.len() > 1 {
                out.push(cycle);
            }
        }
        out
    }

    /// Disjoint-cycle notation, e.g. `"(0 1)(2 4 3)"`; identity is `"()"`.
    pub fn cycle_notation(&self) -> String {
        let cycles = self.cycles();
        if cycles.is_empty() {
            return "()".into();
        }
        cycles
            .iter()
            .map(|c| {
                let inner = c
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("({inner})")
            })
            .collect()
    }

    /// Rebuild a permutation from explicit cycles. States absent from every
    /// cycle are fixed points.
    pub fn from_cycles(width: u32, cycles: &[Vec<u64>]) -> Result<Permutation> {
        if width > MAX_CYCLE_WIDTH {
            return Err(EngineError::InfeasibleComputation(format!(
                "cycle reconstruction at width {width} exceeds the exact-table budget {MAX_CYCLE_WIDTH}"
            )));
        }
        let size = 1u64 << width;
        let mut map: Vec<u64> = (0..size).collect();
        let mut seen = vec![false; size as usize];
        for cycle in cycles {
            if cycle.len() < 2 {
                return Err(EngineError::BadCycleNotation(
                    "cycle shorter than two states".into(),
                ));
            }
            for (i, &a) in cycle.iter().enumerate() {
                if a >= size {
                    return Err(EngineError::BadCycleNotation(format!(
                        "state {a} out of range for width {width}"
                    )));
                }
                if seen[a as usize] {
                    return Err(EngineError::BadCycleNotation(format!(
                        "state {a} appears in more than one position"
                    )));
                }
                seen[a as usize] = true;
                map[a as usize] = cycle[(i + 1) % cycle.len()];
            }
        }
        Ok(Permutation { width, map })
    }

    /// Inverse of [`cycle_notation`](Self::cycle_notation).
    pub fn from_cycle_notation(s: &str, width: u32) -> Result<Permutation> {
        let mut cycles: Vec<Vec<u64>> = Vec::new();
        let mut rest = s.trim();
        while !rest.is_empty() {
            let body = rest.strip_prefix('(').ok_or_else(|| {
                EngineError::BadCycleNotation(format!("expected '(' at {rest:?}"))
            })?;
            let close = body
                .find(')')
                .ok_or_else(|| EngineError::BadCycleNotation("unclosed '('".into()))?;
            let mut cycle = Vec::new();
            for token in body[..close].split_whitespace() {
                let state: u64 = token.parse().map_err(|_| {
                    EngineError::BadCycleNotation(format!("not a state: {token:?}"))
                })?;
                cycle.push(state);
            }
            // "()" denotes the identity and contributes no cycle
            if !cycle.is_empty() {
                cycles.push(cycle);
            }
            rest = body[close + 1..].trim_start();
        }
        Permutation::from_cycles(width, &cycles)
    }
}
