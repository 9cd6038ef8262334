use super::Lit;

/// A node id.
///
/// The constant node [`AigNode::False`] has id 0 by convention.
/// Ids are indices into the node arena of an [`Aig`] and change whenever the graph is canonicalized.
///
/// [`Aig`]: crate::Aig
pub type NodeId = u32;

/// An AIG node.
///
/// A node does not store its own id: its id is its position in the owning [`Aig`].
///
/// [`Aig`]: crate::Aig
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AigNode {
    /// The constant low/false signal.
    False,
    /// A primary input (latches are imported as inputs too).
    Input,
    /// An AND gate with two fanins.
    And { fanin0: Lit, fanin1: Lit },
}

impl AigNode {
    pub fn is_false(&self) -> bool {
        matches!(self, AigNode::False)
    }

    pub fn is_input(&self) -> bool {
        matches!(self, AigNode::Input)
    }

    pub fn is_and(&self) -> bool {
        matches!(self, AigNode::And { .. })
    }

    /// Returns both fanins if the node is an and gate, else returns [`None`].
    pub fn get_and_fanins(&self) -> Option<(Lit, Lit)> {
        match *self {
            AigNode::And { fanin0, fanin1 } => Some((fanin0, fanin1)),
            _ => None,
        }
    }

    pub fn get_fanins(&self) -> Vec<Lit> {
        match *self {
            AigNode::And { fanin0, fanin1 } => vec![fanin0, fanin1],
            _ => vec![],
        }
    }
}

/// Tries to compute `AND(lit0, lit1)` without allocating a gate.
///
/// The rules are applied in this order:
/// `AND(x, 0) = 0`, `AND(1, x) = x`, `AND(x, 1) = x`, `AND(x, x) = x`, `AND(x, !x) = 0`.
pub(crate) fn simplify_and(lit0: Lit, lit1: Lit) -> Option<Lit> {
    if lit0 == Lit::FALSE || lit1 == Lit::FALSE {
        Some(Lit::FALSE)
    } else if lit0 == Lit::TRUE {
        Some(lit1)
    } else if lit1 == Lit::TRUE || lit0 == lit1 {
        Some(lit0)
    } else if lit0.is_complement_of(lit1) {
        Some(Lit::FALSE)
    } else {
        None
    }
}

/// Orders a fanin pair so that the smaller literal comes first.
/// This is the key used for structural hashing.
pub(crate) fn normalize(lit0: Lit, lit1: Lit) -> (Lit, Lit) {
    if lit0 > lit1 { (lit1, lit0) } else { (lit0, lit1) }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn simplify_and_test() {
        let a = Lit::new(1, false);
        let b = Lit::new(2, true);

        assert_eq!(simplify_and(a, Lit::FALSE), Some(Lit::FALSE));
        assert_eq!(simplify_and(Lit::FALSE, a), Some(Lit::FALSE));
        assert_eq!(simplify_and(Lit::TRUE, a), Some(a));
        assert_eq!(simplify_and(a, Lit::TRUE), Some(a));
        assert_eq!(simplify_and(Lit::TRUE, Lit::TRUE), Some(Lit::TRUE));
        assert_eq!(simplify_and(b, b), Some(b));
        assert_eq!(simplify_and(a, !a), Some(Lit::FALSE));
        assert_eq!(simplify_and(!b, b), Some(Lit::FALSE));
        assert_eq!(simplify_and(a, b), None);
    }

    #[test]
    fn normalize_test() {
        let a = Lit::new(1, true);
        let b = Lit::new(2, false);
        assert_eq!(normalize(a, b), (a, b));
        assert_eq!(normalize(b, a), (a, b));
    }

    #[test]
    fn node_fanins_test() {
        let a = Lit::new(1, false);
        let b = Lit::new(2, true);
        let and = AigNode::And {
            fanin0: a,
            fanin1: b,
        };
        assert!(and.is_and());
        assert_eq!(and.get_and_fanins(), Some((a, b)));
        assert_eq!(and.get_fanins(), vec![a, b]);
        assert!(AigNode::Input.get_fanins().is_empty());
        assert_eq!(AigNode::False.get_and_fanins(), None);
        assert!(AigNode::False.is_false());
        assert!(AigNode::Input.is_input());
    }
}
