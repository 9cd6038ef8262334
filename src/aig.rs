//! Module defining the [`Aig`] struct, as well as [`AigNode`], [`Lit`] and some others relevant structs.
//!
//! To reduce a circuit, check [`Aig::optimize`] and [`Aig::rewrite`].

pub mod dfs;
pub mod error;
mod integrity;
pub mod literal;
pub mod node;
mod parser;
pub mod stats;

use std::collections::HashMap;

pub use error::{AigError, ParserError, Result};
pub use literal::Lit;
pub(crate) use node::{normalize, simplify_and};
pub use node::{AigNode, NodeId};

/// Structural hash table: normalized fanin pair -> literal of the gate computing it.
///
/// Keyed by value, never by node address, so it can be thrown away and rebuilt at will.
pub(crate) type StrashTable = HashMap<(Lit, Lit), Lit>;

/// A whole AIG.
///
/// Nodes live in a single arena and refer to each other through [`Lit`]s.
/// Node 0 is always the constant [`AigNode::False`].
///
/// The graph is built incrementally with [`add_input`], [`add_and`] and [`add_output`].
/// Every AND gate goes through algebraic simplification and structural hashing, so that
/// building the same function twice only allocates it once:
///
/// ```rust
/// use aigopt::{Aig, Lit};
/// let mut aig = Aig::new();
/// let a = Lit::new(aig.add_input(), false);
/// let b = Lit::new(aig.add_input(), false);
/// let ab = aig.add_and(a, b).unwrap();
/// assert_eq!(aig.add_and(b, a).unwrap(), ab); // dedup hit
/// assert_eq!(aig.add_and(a, !a).unwrap(), Lit::FALSE); // no gate created
/// aig.add_output(ab).unwrap();
/// assert_eq!(aig.gate_count(), 1);
/// ```
///
/// [`add_input`]: Aig::add_input
/// [`add_and`]: Aig::add_and
/// [`add_output`]: Aig::add_output
#[derive(Debug, Clone)]
pub struct Aig {
    pub(crate) nodes: Vec<AigNode>,
    /// Primary inputs, in circuit order.
    pub(crate) inputs: Vec<NodeId>,
    /// Primary outputs. The same literal may appear several times.
    pub(crate) outputs: Vec<Lit>,
    /// Only valid for the current id space, see [`Aig::optimize`].
    pub(crate) strash: StrashTable,
}

impl Default for Aig {
    fn default() -> Self {
        Self::new()
    }
}

impl Aig {
    /// Create a brand new AIG (constant node [`AigNode::False`] included).
    pub fn new() -> Self {
        Aig {
            nodes: vec![AigNode::False],
            inputs: Vec::new(),
            outputs: Vec::new(),
            strash: StrashTable::new(),
        }
    }

    /// Retrieves a node from its id.
    pub fn get_node(&self, id: NodeId) -> Option<&AigNode> {
        self.nodes.get(id as usize)
    }

    /// Number of nodes, constant and inputs included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Retrieves inputs id, in circuit order.
    pub fn get_inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Retrieves outputs, in circuit order.
    pub fn get_outputs(&self) -> &[Lit] {
        &self.outputs
    }

    fn check_lit(&self, lit: Lit) -> Result<()> {
        if (lit.node_id() as usize) < self.nodes.len() {
            Ok(())
        } else {
            Err(AigError::InvalidReference(lit))
        }
    }

    /// Create a new primary input and return its id.
    pub fn add_input(&mut self) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(AigNode::Input);
        self.inputs.push(id);
        id
    }

    /// Create a new and gate (or retrieve it if the same gate already exists) and return its literal.
    ///
    /// Trivial gates (constant fanin, equal or complementary fanins) are never allocated:
    /// their result is returned directly. This fails if a fanin refers to a node that does
    /// not exist yet.
    pub fn add_and(&mut self, lit0: Lit, lit1: Lit) -> Result<Lit> {
        if let Some(res) = simplify_and(lit0, lit1) {
            return Ok(res);
        }

        let key = normalize(lit0, lit1);
        if let Some(&res) = self.strash.get(&key) {
            return Ok(res);
        }

        self.check_lit(key.0)?;
        self.check_lit(key.1)?;

        let id = self.nodes.len() as NodeId;
        self.nodes.push(AigNode::And {
            fanin0: key.0,
            fanin1: key.1,
        });
        let res = Lit::new(id, false);
        self.strash.insert(key, res);
        Ok(res)
    }

    /// Mark an existing signal as an output.
    pub fn add_output(&mut self, lit: Lit) -> Result<()> {
        self.check_lit(lit)?;
        self.outputs.push(lit);
        Ok(())
    }

    /// Returns true if [`Aig::add_and`] would not allocate a new gate for these fanins.
    pub fn has_and(&self, lit0: Lit, lit1: Lit) -> bool {
        simplify_and(lit0, lit1).is_some() || self.strash.contains_key(&normalize(lit0, lit1))
    }

    /// Overwrites the fanins of an existing and gate.
    ///
    /// The structural hash table is left untouched: callers must make sure the gate keeps
    /// computing the same function, or canonicalize right after.
    pub(crate) fn set_fanins(&mut self, id: NodeId, fanin0: Lit, fanin1: Lit) -> Result<()> {
        match self.nodes.get_mut(id as usize) {
            Some(AigNode::And { fanin0: f0, fanin1: f1 }) => {
                *f0 = fanin0;
                *f1 = fanin1;
                Ok(())
            }
            _ => Err(AigError::InvalidState(format!(
                "node {} is not an and gate",
                id
            ))),
        }
    }

    /// Number of gates (fanins and outputs) consuming each node.
    pub(crate) fn fanout_counts(&self) -> Vec<u32> {
        let mut refs = vec![0; self.nodes.len()];
        for node in &self.nodes {
            if let AigNode::And { fanin0, fanin1 } = node {
                refs[fanin0.node_id() as usize] += 1;
                refs[fanin1.node_id() as usize] += 1;
            }
        }
        for output in &self.outputs {
            refs[output.node_id() as usize] += 1;
        }
        refs
    }
}
