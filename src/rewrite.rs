//! Local rewriting of an [`Aig`].
//!
//! A rewrite is a fixed schedule of [`REWRITE_ROUNDS`] rounds. Each round:
//! - restructures gates to expose shared logic (phase 1),
//! - canonicalizes with [`Aig::optimize`],
//! - simplifies gates using local Boolean identities (phase 2), then canonicalizes again.
//!
//! Phase 1 only applies a restructuring when the gates it makes dead pay for the gates it
//! needs (see [`RewriteOptions::gated`]).

use crate::{Aig, AigNode, Lit, NodeId, Result};

/// Number of rounds performed by [`Aig::rewrite`]. Rounds are not iterated to a fixed point.
pub const REWRITE_ROUNDS: usize = 3;

/// Knobs of the rewrite engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Only extract a common factor when `gain >= cost`, where `gain` is the number of
    /// sub-gates left without consumers and `cost` the number of gates to create.
    /// Rounds that end up with more gates than they started with are rolled back.
    ///
    /// When false, common factors are always extracted, which may increase the gate count.
    pub gated: bool,
    /// Also rotate `AND(AND(p, q), c)` into `AND(p, AND(q, c))` when this does not cost any gate.
    pub reassociate: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        RewriteOptions {
            gated: true,
            reassociate: false,
        }
    }
}

impl Aig {
    /// Rewrites the AIG with the default [`RewriteOptions`].
    ///
    /// ```rust
    /// use aigopt::{Aig, Lit};
    /// let mut aig = Aig::new();
    /// let a = Lit::new(aig.add_input(), false);
    /// let b = Lit::new(aig.add_input(), false);
    /// let c = Lit::new(aig.add_input(), false);
    /// let ab = aig.add_and(a, b).unwrap();
    /// let ac = aig.add_and(a, c).unwrap();
    /// let g = aig.add_and(ab, ac).unwrap();
    /// aig.add_output(g).unwrap();
    /// aig.rewrite().unwrap(); // a & (b & c)
    /// assert_eq!(aig.gate_count(), 2);
    /// ```
    pub fn rewrite(&mut self) -> Result<()> {
        self.rewrite_with(&RewriteOptions::default())
    }

    /// Rewrites the AIG: canonicalizes it, then runs [`REWRITE_ROUNDS`] rounds.
    pub fn rewrite_with(&mut self, options: &RewriteOptions) -> Result<()> {
        self.optimize()?;
        let initial = self.gate_count();

        for round in 0..REWRITE_ROUNDS {
            let snapshot = options.gated.then(|| self.clone());
            let before = self.gate_count();

            let restructured = self.rewrite_phase1(options)?;
            self.optimize()?;
            let simplified = self.rewrite_phase2()?;

            let after = self.gate_count();
            log::debug!(
                "rewrite round {}: {} restructured, {} simplified, {} -> {} gates",
                round,
                restructured,
                simplified,
                before,
                after
            );

            if let Some(snapshot) = snapshot {
                if self.restore_if_grown(snapshot) {
                    log::debug!("rewrite round {}: rolled back", round);
                }
            }
        }

        log::info!("rewrite: {} -> {} gates", initial, self.gate_count());
        Ok(())
    }

    /// Puts `snapshot` back if the AIG now has more gates than it. Returns true if it did.
    fn restore_if_grown(&mut self, snapshot: Aig) -> bool {
        if self.gate_count() > snapshot.gate_count() {
            *self = snapshot;
            true
        } else {
            false
        }
    }

    /// Fanins of `lit` if it is the non-inverted output of an and gate.
    fn positive_and(&self, lit: Lit) -> Option<(Lit, Lit)> {
        if lit.is_inverted() {
            return None;
        }
        self.get_node(lit.node_id())?.get_and_fanins()
    }

    /// Restructuring phase. Returns the number of rewritten gates.
    ///
    /// A rewritten gate `g` becomes `AND(new, 1)`: it is swept by the next canonicalization.
    /// Gates created by this phase are not visited.
    fn rewrite_phase1(&mut self, options: &RewriteOptions) -> Result<usize> {
        let refs = self.fanout_counts();
        let n = self.nodes.len() as NodeId;
        let mut count = 0;

        for id in 1..n {
            let Some((x, y)) = self.nodes[id as usize].get_and_fanins() else {
                continue;
            };

            let mut new_lit = self.common_factor(x, y, &refs, options.gated)?;
            if new_lit.is_none() && options.reassociate {
                new_lit = self.reassociate(x, y, &refs)?;
            }

            if let Some(lit) = new_lit {
                // Structural hashing may hand back the gate itself
                if lit.node_id() == id {
                    continue;
                }
                log::trace!("phase 1: gate {} -> {}", id, lit);
                self.set_fanins(id, lit, Lit::TRUE)?;
                count += 1;
            }
        }

        Ok(count)
    }

    /// `AND(AND(a, b), AND(a, b'))` -> `AND(a, AND(b, b'))`.
    fn common_factor(&mut self, x: Lit, y: Lit, refs: &[u32], gated: bool) -> Result<Option<Lit>> {
        let (Some((xa, xb)), Some((ya, yb))) = (self.positive_and(x), self.positive_and(y)) else {
            return Ok(None);
        };

        let (a, b, b2) = if xa == ya {
            (xa, xb, yb)
        } else if xa == yb {
            (xa, xb, ya)
        } else if xb == ya {
            (xb, xa, yb)
        } else if xb == yb {
            (xb, xa, ya)
        } else {
            return Ok(None);
        };

        if gated {
            let gain = [x, y]
                .iter()
                .filter(|lit| refs.get(lit.node_id() as usize) == Some(&1))
                .count();
            let cost = 1 + usize::from(!self.has_and(b, b2));
            if gain < cost {
                return Ok(None);
            }
        }

        let t = self.add_and(b, b2)?;
        Ok(Some(self.add_and(a, t)?))
    }

    /// `AND(AND(p, q), c)` -> `AND(p, AND(q, c))` (or `AND(q, AND(p, c))`), only when
    /// `AND(p, q)` has no other consumer and the inner gate already exists.
    fn reassociate(&mut self, x: Lit, y: Lit, refs: &[u32]) -> Result<Option<Lit>> {
        for (child, c) in [(x, y), (y, x)] {
            let Some((p, q)) = self.positive_and(child) else {
                continue;
            };
            if refs.get(child.node_id() as usize) != Some(&1) {
                continue;
            }
            for (keep, pair) in [(p, q), (q, p)] {
                if self.has_and(pair, c) {
                    let t = self.add_and(pair, c)?;
                    return Ok(Some(self.add_and(keep, t)?));
                }
            }
        }
        Ok(None)
    }

    /// Local simplification of `AND(x, y)`, without creating any gate.
    fn simplify_gate(&self, x: Lit, y: Lit) -> Option<Lit> {
        // x & !x = 0
        if x.is_complement_of(y) {
            return Some(Lit::FALSE);
        }

        for (u, v) in [(x, y), (y, x)] {
            if let Some((ua, ub)) = self.positive_and(u) {
                // (v & z) & v = v & z
                if ua == v || ub == v {
                    return Some(u);
                }
                // (!v & z) & v = 0
                if ua.is_complement_of(v) || ub.is_complement_of(v) {
                    return Some(Lit::FALSE);
                }
            }
        }

        // x & x = x
        if x == y {
            return Some(x);
        }

        None
    }

    /// Simplification phase. Returns the number of simplified gates.
    fn rewrite_phase2(&mut self) -> Result<usize> {
        let mut replace: Vec<Option<Lit>> = vec![None; self.nodes.len()];
        for (id, node) in self.nodes.iter().enumerate() {
            if let Some((x, y)) = node.get_and_fanins() {
                replace[id] = self.simplify_gate(x, y);
                if let Some(lit) = replace[id] {
                    log::trace!("phase 2: gate {} -> {}", id, lit);
                }
            }
        }
        let count = replace.iter().flatten().count();

        let rewire = |lit: &mut Lit| {
            if let Some(new) = replace[lit.node_id() as usize] {
                *lit = new ^ lit.is_inverted();
            }
        };
        // Outputs keep their literal: a replaced gate driving an output survives
        for node in &mut self.nodes {
            if let AigNode::And { fanin0, fanin1 } = node {
                rewire(fanin0);
                rewire(fanin1);
            }
        }

        self.optimize()?;
        Ok(count)
    }
}
