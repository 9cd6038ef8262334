//! A [`Lit`] points at an [`AigNode`] and can be complemented (indicates the presence of a NOT gate).
//!
//! Literals are encoded the AIGER way: `(node_id << 1) | complement`.
//! Literal `0` is the constant false signal, literal `1` the constant true signal.
//!
//! [`AigNode`]: crate::AigNode

use std::{
    fmt::Display,
    ops::{BitXor, Not},
};

use super::NodeId;

/// A signal reference: a node id plus an inversion bit.
///
/// For example:
///
/// ```rust
/// use aigopt::Lit;
/// let a = Lit::new(3, false);
/// assert_eq!(a.node_id(), 3);
/// assert!(!a.is_inverted());
/// assert!((!a).is_inverted());
/// assert_eq!(!Lit::FALSE, Lit::TRUE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Lit(u32);

impl Lit {
    /// The constant false signal.
    pub const FALSE: Lit = Lit(0);
    /// The constant true signal (node 0 inverted).
    pub const TRUE: Lit = Lit(1);

    /// Creates the literal of node `id`, complemented if `inverted`.
    ///
    /// Ids must fit in 31 bits.
    pub const fn new(id: NodeId, inverted: bool) -> Self {
        Lit((id << 1) | inverted as u32)
    }

    /// Wraps an already encoded literal.
    pub const fn from_raw(raw: u32) -> Self {
        Lit(raw)
    }

    /// Returns the encoded literal.
    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn node_id(self) -> NodeId {
        self.0 >> 1
    }

    pub const fn is_inverted(self) -> bool {
        self.0 & 1 != 0
    }

    /// Same node, without the inversion.
    pub const fn positive(self) -> Self {
        Lit(self.0 & !1)
    }

    pub const fn is_const(self) -> bool {
        self.0 < 2
    }

    pub fn is_complement_of(self, other: Lit) -> bool {
        self.0 ^ 1 == other.0
    }
}

impl Not for Lit {
    type Output = Self;

    fn not(self) -> Self::Output {
        Lit(self.0 ^ 1)
    }
}

/// `lit ^ true` complements `lit`, `lit ^ false` leaves it untouched.
impl BitXor<bool> for Lit {
    type Output = Self;

    fn bitxor(self, rhs: bool) -> Self::Output {
        Lit(self.0 ^ rhs as u32)
    }
}

impl Display for Lit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encode_decode_test() {
        for id in [0, 1, 2, 17, (1 << 31) - 1] {
            for inv in [false, true] {
                let lit = Lit::new(id, inv);
                assert_eq!(lit.node_id(), id);
                assert_eq!(lit.is_inverted(), inv);
            }
        }
        assert_eq!(Lit::new(3, true).raw(), 7);
        assert_eq!(Lit::from_raw(6), Lit::new(3, false));
    }

    #[test]
    fn constants_test() {
        assert_eq!(Lit::FALSE, Lit::new(0, false));
        assert_eq!(Lit::TRUE, Lit::new(0, true));
        assert!(Lit::FALSE.is_const());
        assert!(Lit::TRUE.is_const());
        assert!(!Lit::new(1, false).is_const());
    }

    #[test]
    fn complement_test() {
        let a = Lit::new(5, false);
        assert_eq!(!a, Lit::new(5, true));
        assert_eq!(!!a, a);
        assert_eq!(a ^ false, a);
        assert_eq!(a ^ true, !a);
        assert_eq!((!a).positive(), a);
        assert!(a.is_complement_of(!a));
        assert!((!a).is_complement_of(a));
        assert!(!a.is_complement_of(a));
        assert!(!a.is_complement_of(Lit::new(4, true)));
    }
}
