//! Global canonicalization of an [`Aig`]: constant propagation, structural hashing and
//! dead-code elimination in a single rebuild.

use crate::{
    Aig, AigError, AigNode, Lit, NodeId, Result,
    aig::{StrashTable, normalize, simplify_and},
    dfs::PostOrder,
};

impl Aig {
    /// Rebuilds the AIG from its outputs.
    ///
    /// Gates are recreated in post-order from the outputs (in output order), going through
    /// the same simplification rules as [`Aig::add_and`] and deduplicated against the gates
    /// already rebuilt. Gates not reachable from any output are dropped.
    ///
    /// Inputs are recreated first, in the same order, so input `k` of the new AIG is input `k`
    /// of the old one. Node ids change: the structural hash table is replaced by the one
    /// built during the rebuild.
    ///
    /// ```rust
    /// use aigopt::{Aig, Lit};
    /// let mut aig = Aig::new();
    /// let a = Lit::new(aig.add_input(), false);
    /// let b = Lit::new(aig.add_input(), false);
    /// let dead = aig.add_and(a, !b).unwrap();
    /// let g = aig.add_and(a, b).unwrap();
    /// aig.add_output(!g).unwrap();
    /// assert_eq!(aig.gate_count(), 2);
    /// aig.optimize().unwrap();
    /// assert_eq!(aig.gate_count(), 1);
    /// # let _ = dead;
    /// ```
    pub fn optimize(&mut self) -> Result<()> {
        let gates_before = self.gate_count();

        let mut nodes = vec![AigNode::False];
        let mut inputs = Vec::with_capacity(self.inputs.len());
        let mut strash = StrashTable::new();

        // Old id -> new literal
        let mut old2new: Vec<Option<Lit>> = vec![None; self.nodes.len()];
        old2new[0] = Some(Lit::FALSE);

        for &old_id in &self.inputs {
            let new_id = nodes.len() as NodeId;
            nodes.push(AigNode::Input);
            inputs.push(new_id);
            let slot = old2new
                .get_mut(old_id as usize)
                .ok_or(AigError::InvalidReference(Lit::new(old_id, false)))?;
            *slot = Some(Lit::new(new_id, false));
        }

        let map = |old2new: &[Option<Lit>], lit: Lit| -> Result<Lit> {
            old2new
                .get(lit.node_id() as usize)
                .copied()
                .flatten()
                .map(|new| new ^ lit.is_inverted())
                .ok_or(AigError::InvalidReference(lit))
        };

        let mut dfs = PostOrder::from_outputs(self);
        while let Some(id) = dfs.next(self) {
            if old2new[id as usize].is_some() {
                continue;
            }

            let (fanin0, fanin1) = match self.nodes[id as usize] {
                AigNode::And { fanin0, fanin1 } => (fanin0, fanin1),
                _ => {
                    return Err(AigError::InvalidState(format!(
                        "node {} is neither a listed input nor a gate",
                        id
                    )));
                }
            };

            let lit0 = map(&old2new, fanin0)?;
            let lit1 = map(&old2new, fanin1)?;

            let res = match simplify_and(lit0, lit1) {
                Some(res) => res,
                None => {
                    let key = normalize(lit0, lit1);
                    *strash.entry(key).or_insert_with(|| {
                        let new_id = nodes.len() as NodeId;
                        nodes.push(AigNode::And {
                            fanin0: key.0,
                            fanin1: key.1,
                        });
                        Lit::new(new_id, false)
                    })
                }
            };

            old2new[id as usize] = Some(res);
        }

        let outputs = self
            .outputs
            .iter()
            .map(|&lit| map(&old2new, lit))
            .collect::<Result<Vec<Lit>>>()?;

        self.nodes = nodes;
        self.inputs = inputs;
        self.outputs = outputs;
        // Ids have changed: the previous table is meaningless now
        self.strash = strash;

        log::debug!(
            "optimize: {} -> {} gates",
            gates_before,
            self.gate_count()
        );

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{Aig, AigNode, Lit};

    fn inputs(aig: &mut Aig, n: usize) -> Vec<Lit> {
        (0..n).map(|_| Lit::new(aig.add_input(), false)).collect()
    }

    #[test]
    fn optimize_removes_dead_gates_test() {
        let mut aig = Aig::new();
        let v = inputs(&mut aig, 3);
        let g1 = aig.add_and(v[0], v[1]).unwrap();
        let _dead = aig.add_and(g1, v[2]).unwrap();
        let g3 = aig.add_and(!g1, !v[2]).unwrap();
        aig.add_output(g3).unwrap();

        aig.optimize().unwrap();
        assert_eq!(aig.gate_count(), 2);
        assert_eq!(aig.get_inputs(), &[1, 2, 3]);
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn optimize_keeps_unused_inputs_test() {
        let mut aig = Aig::new();
        let v = inputs(&mut aig, 3);
        aig.add_output(v[2]).unwrap();
        aig.add_output(!v[0]).unwrap();
        aig.optimize().unwrap();
        assert_eq!(aig.node_count(), 4);
        assert_eq!(aig.get_inputs(), &[1, 2, 3]);
        assert_eq!(aig.get_outputs(), &[v[2], !v[0]]);
    }

    #[test]
    fn optimize_renumbers_in_output_order_test() {
        let mut aig = Aig::new();
        let v = inputs(&mut aig, 3);
        let g1 = aig.add_and(v[0], v[1]).unwrap();
        let g2 = aig.add_and(v[1], v[2]).unwrap();
        aig.add_output(!g2).unwrap();
        aig.add_output(g1).unwrap();
        aig.add_output(!g2).unwrap();

        aig.optimize().unwrap();
        assert_eq!(
            aig.get_outputs(),
            &[Lit::new(4, true), Lit::new(5, false), Lit::new(4, true)]
        );
        assert_eq!(
            aig.get_node(4),
            Some(&AigNode::And {
                fanin0: v[1],
                fanin1: v[2]
            })
        );
    }

    #[test]
    fn optimize_collapses_trivial_gates_test() {
        let mut aig = Aig::new();
        let v = inputs(&mut aig, 2);
        let g1 = aig.add_and(v[0], v[1]).unwrap();
        let g2 = aig.add_and(v[0], !v[1]).unwrap();
        aig.add_output(g1).unwrap();
        aig.add_output(g2).unwrap();

        // Rewire g2 to an equivalent of g1 behind the store's back:
        // both must merge, and a gate wired to a constant must vanish.
        aig.set_fanins(g2.node_id(), v[1], v[0]).unwrap();
        let g3 = Lit::new(aig.node_count() as u32, false);
        aig.nodes.push(AigNode::And {
            fanin0: g1,
            fanin1: Lit::TRUE,
        });
        aig.add_output(!g3).unwrap();

        aig.optimize().unwrap();
        assert_eq!(aig.gate_count(), 1);
        let g = Lit::new(3, false);
        assert_eq!(aig.get_outputs(), &[g, g, !g]);
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn optimize_reseeds_strash_test() {
        let mut aig = Aig::new();
        let v = inputs(&mut aig, 3);
        let _dead = aig.add_and(v[0], v[2]).unwrap();
        let g = aig.add_and(v[1], v[2]).unwrap();
        aig.add_output(g).unwrap();
        aig.optimize().unwrap();

        let g = aig.get_outputs()[0];
        assert!(aig.has_and(v[1], v[2]));
        assert!(!aig.has_and(v[0], v[2]));
        let n = aig.node_count();
        assert_eq!(aig.add_and(v[2], v[1]).unwrap(), g);
        assert_eq!(aig.node_count(), n);
    }

    #[test]
    fn optimize_deep_chain_test() {
        let mut aig = Aig::new();
        let v = inputs(&mut aig, 2);
        let mut acc = v[0];
        for k in 0..200_000 {
            acc = !aig.add_and(acc, v[k % 2] ^ (k % 3 == 0)).unwrap();
        }
        aig.add_output(acc).unwrap();
        let before = aig.gate_count();
        aig.optimize().unwrap();
        assert!(aig.gate_count() <= before);
        assert!(aig.check_integrity().is_ok());
    }
}
