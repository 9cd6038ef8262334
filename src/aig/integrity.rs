use std::collections::HashSet;

use crate::{Aig, AigError, AigNode, Lit, NodeId, Result, aig::normalize};

impl Aig {
    /// Checking if the AIG structure is correct.
    ///
    /// This function was written for debug purposes, as the library is supposed to maintain
    /// integrity of the AIG after every public operation. It checks that:
    /// - node 0, and only node 0, is the constant
    /// - the input list contains exactly the input nodes, each once
    /// - every and gate only refers to nodes with smaller ids
    /// - no and gate is trivial (constant, equal or complementary fanins)
    /// - no two and gates share the same normalized fanin pair
    /// - every output refers to an existing node
    /// - every entry of the structural hash table refers to existing nodes.
    pub fn check_integrity(&self) -> Result<()> {
        if self.nodes.first() != Some(&AigNode::False) {
            return Err(AigError::InvalidState(
                "node 0 is not the constant node".to_string(),
            ));
        }

        let mut pairs = HashSet::new();
        for (id, node) in self.nodes.iter().enumerate().skip(1) {
            let id = id as NodeId;
            match *node {
                AigNode::False => {
                    return Err(AigError::InvalidState(format!(
                        "node {} is a second constant node",
                        id
                    )));
                }
                AigNode::Input => (),
                AigNode::And { fanin0, fanin1 } => {
                    self.check_gate_integrity(id, fanin0, fanin1)?;
                    if !pairs.insert(normalize(fanin0, fanin1)) {
                        return Err(AigError::InvalidState(format!(
                            "gate {} duplicates the fanin pair ({}, {})",
                            id, fanin0, fanin1
                        )));
                    }
                }
            }
        }

        self.check_inputs_integrity()?;

        for &output in &self.outputs {
            self.check_lit(output)?;
        }

        for (&(lit0, lit1), &lit) in &self.strash {
            for l in [lit0, lit1, lit] {
                self.check_lit(l).map_err(|_| {
                    AigError::InvalidState(format!(
                        "structural hash entry ({}, {}) -> {} is stale",
                        lit0, lit1, lit
                    ))
                })?;
            }
        }

        Ok(())
    }

    fn check_gate_integrity(&self, id: NodeId, fanin0: Lit, fanin1: Lit) -> Result<()> {
        for fanin in [fanin0, fanin1] {
            if fanin.node_id() >= id {
                return Err(AigError::InvalidState(format!(
                    "id of gate {} should be strictly larger than its fanin {}",
                    id,
                    fanin.node_id()
                )));
            }
            if fanin.is_const() {
                return Err(AigError::InvalidState(format!(
                    "gate {} has a constant fanin",
                    id
                )));
            }
        }
        if fanin0.positive() == fanin1.positive() {
            return Err(AigError::InvalidState(format!(
                "gate {} has fanins ({}, {}) on the same node",
                id, fanin0, fanin1
            )));
        }
        Ok(())
    }

    fn check_inputs_integrity(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for &id in &self.inputs {
            if self.get_node(id) != Some(&AigNode::Input) {
                return Err(AigError::InvalidState(format!(
                    "input list refers to node {} which is not an input",
                    id
                )));
            }
            if !seen.insert(id) {
                return Err(AigError::InvalidState(format!(
                    "input {} is listed twice",
                    id
                )));
            }
        }
        let n_inputs = self.nodes.iter().filter(|node| node.is_input()).count();
        if n_inputs != self.inputs.len() {
            return Err(AigError::InvalidState(format!(
                "{} input nodes but {} listed inputs",
                n_inputs,
                self.inputs.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{Aig, AigNode, Lit};

    fn sample() -> (Aig, Vec<Lit>) {
        let mut aig = Aig::new();
        let v: Vec<Lit> = (0..3).map(|_| Lit::new(aig.add_input(), false)).collect();
        let g = aig.add_and(v[0], !v[1]).unwrap();
        let h = aig.add_and(g, v[2]).unwrap();
        aig.add_output(!h).unwrap();
        (aig, v)
    }

    #[test]
    fn valid_aig_test() {
        let (aig, _) = sample();
        assert!(aig.check_integrity().is_ok());
        assert!(Aig::new().check_integrity().is_ok());
    }

    #[test]
    fn forward_reference_test() {
        let (mut aig, v) = sample();
        aig.set_fanins(4, Lit::new(5, false), v[0]).unwrap();
        assert!(aig.check_integrity().is_err());
    }

    #[test]
    fn trivial_gate_test() {
        let (mut aig, v) = sample();
        aig.set_fanins(4, v[0], Lit::TRUE).unwrap();
        assert!(aig.check_integrity().is_err());

        let (mut aig, v) = sample();
        aig.set_fanins(4, v[0], !v[0]).unwrap();
        assert!(aig.check_integrity().is_err());
    }

    #[test]
    fn duplicate_pair_test() {
        let (mut aig, v) = sample();
        aig.nodes.push(AigNode::And {
            fanin0: !v[1],
            fanin1: v[0],
        });
        assert!(aig.check_integrity().is_err());
    }

    #[test]
    fn broken_inputs_test() {
        let (mut aig, _) = sample();
        aig.inputs.pop();
        assert!(aig.check_integrity().is_err());

        let (mut aig, _) = sample();
        aig.inputs.push(4);
        assert!(aig.check_integrity().is_err());
    }

    #[test]
    fn stale_strash_test() {
        let (mut aig, _) = sample();
        aig.strash
            .insert((Lit::new(8, false), Lit::new(9, false)), Lit::new(10, false));
        assert!(aig.check_integrity().is_err());
    }
}
