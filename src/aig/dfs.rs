//! Provides an iterative post-order visitor to allow AIG traversal without recursion.
//!
//! See [`PostOrder`] for details.

use crate::{Aig, NodeId};

/// A post-order DFS visitor.
///
/// A node is yielded once all of its fanins have been yielded, and each node is yielded exactly once.
/// You can:
/// - start from a node using [`from_node`]
/// - or visit the fanin cones of all outputs using [`from_outputs`].
///
/// In the latter case, the cone of the first output is visited first, then all
/// non-previously-visited nodes of the second output cone, and so on.
/// Within a gate, `fanin0` is explored before `fanin1`.
///
/// The traversal uses an explicit stack, so deep circuits cannot overflow the call stack.
/// Nodes that are not reachable from the starting points are never yielded.
///
/// [`from_node`]: PostOrder::from_node
/// [`from_outputs`]: PostOrder::from_outputs
///
/// Example:
///
/// ```rust
/// use aigopt::{Aig, Lit, dfs::PostOrder};
/// let mut aig = Aig::new();
/// let a = Lit::new(aig.add_input(), false);
/// let b = Lit::new(aig.add_input(), false);
/// let g = aig.add_and(a, !b).unwrap();
/// aig.add_output(g).unwrap();
/// let mut dfs = PostOrder::from_outputs(&aig);
/// let mut order = Vec::new();
/// while let Some(id) = dfs.next(&aig) {
///     order.push(id);
/// }
/// assert_eq!(order, vec![1, 2, 3]);
/// ```
pub struct PostOrder {
    /// Pending nodes. The flag is set once the fanins of the node have been pushed.
    stack: Vec<(NodeId, bool)>,
    done: Vec<bool>,
    /// Remaining starting points, last one on top.
    starts: Vec<NodeId>,
}

impl PostOrder {
    /// Create a visitor yielding the fanin cone of `start`, `start` included.
    pub fn from_node(aig: &Aig, start: NodeId) -> Self {
        PostOrder {
            stack: Vec::new(),
            done: vec![false; aig.node_count()],
            starts: vec![start],
        }
    }

    /// Create a visitor yielding the fanin cones of all outputs, in output order.
    pub fn from_outputs(aig: &Aig) -> Self {
        PostOrder {
            stack: Vec::new(),
            done: vec![false; aig.node_count()],
            starts: aig
                .get_outputs()
                .iter()
                .rev()
                .map(|lit| lit.node_id())
                .collect(),
        }
    }

    fn is_done(&self, id: NodeId) -> bool {
        self.done.get(id as usize).copied().unwrap_or(true)
    }

    /// Yield the next node of the traversal, or None if it is done.
    ///
    /// Ids out of the range of `aig` are skipped.
    pub fn next(&mut self, aig: &Aig) -> Option<NodeId> {
        loop {
            let Some((id, expanded)) = self.stack.pop() else {
                let start = self.starts.pop()?;
                if !self.is_done(start) {
                    self.stack.push((start, false));
                }
                continue;
            };

            if self.is_done(id) {
                continue;
            }

            if expanded {
                self.done[id as usize] = true;
                return Some(id);
            }

            self.stack.push((id, true));
            if let Some((fanin0, fanin1)) = aig.get_node(id).and_then(|n| n.get_and_fanins()) {
                for fanin in [fanin1, fanin0] {
                    if !self.is_done(fanin.node_id()) {
                        self.stack.push((fanin.node_id(), false));
                    }
                }
            }
        }
    }
}
