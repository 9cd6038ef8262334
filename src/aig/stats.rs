//! Read-only summary statistics of an [`Aig`]: size, logic depth and inverters.

use std::fmt::Display;

use crate::{Aig, AigNode, dfs::PostOrder};

/// Summary of an AIG, as reported before and after optimization.
///
/// Displayed as `pis=<inputs>, pos=<outputs>, area=<gates>, depth=<depth>, not=<inverters>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub inputs: usize,
    pub outputs: usize,
    pub gates: usize,
    pub depth: u32,
    pub inverters: usize,
}

impl Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pis={}, pos={}, area={}, depth={}, not={}",
            self.inputs, self.outputs, self.gates, self.depth, self.inverters
        )
    }
}

impl Aig {
    /// Logic depth: the largest number of and gates on a path from an output back to an input
    /// or the constant. Inputs and the constant have depth 0.
    pub fn depth(&self) -> u32 {
        let mut memo = vec![0u32; self.nodes.len()];
        let mut dfs = PostOrder::from_outputs(self);
        while let Some(id) = dfs.next(self) {
            if let AigNode::And { fanin0, fanin1 } = self.nodes[id as usize] {
                let d0 = memo[fanin0.node_id() as usize];
                let d1 = memo[fanin1.node_id() as usize];
                memo[id as usize] = d0.max(d1) + 1;
            }
        }

        self.outputs
            .iter()
            .filter_map(|lit| memo.get(lit.node_id() as usize))
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Number of and gates.
    pub fn gate_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_and()).count()
    }

    /// Number of nodes consumed in inverted form by a gate or an output.
    ///
    /// A node is counted once however many inverted consumers it has
    /// (one physical inverter shared by all of them).
    pub fn inverter_count(&self) -> usize {
        let mut inverted_used = vec![false; self.nodes.len()];
        let fanins = self
            .nodes
            .iter()
            .filter_map(|node| node.get_and_fanins())
            .flat_map(|(fanin0, fanin1)| [fanin0, fanin1]);

        for lit in fanins.chain(self.outputs.iter().copied()) {
            if lit.is_inverted() {
                inverted_used[lit.node_id() as usize] = true;
            }
        }

        inverted_used.into_iter().filter(|&used| used).count()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            inputs: self.inputs.len(),
            outputs: self.outputs.len(),
            gates: self.gate_count(),
            depth: self.depth(),
            inverters: self.inverter_count(),
        }
    }
}
