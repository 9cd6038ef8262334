//! Bit-parallel simulation of an [`Aig`], used to check that two AIGs compute the same functions.
//!
//! Every signal carries a 64-bit word: bit `k` of a word is the value of the signal in
//! sample `k`.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{Aig, AigError, AigNode, Lit, Result, dfs::PostOrder};

/// Largest number of inputs for which [`Aig::truth_tables`] enumerates every assignment.
pub const MAX_EXHAUSTIVE_INPUTS: usize = 16;

/// Words of the 6 first input variables of a truth table.
const VAR_PATTERNS: [u64; 6] = [
    0xAAAA_AAAA_AAAA_AAAA,
    0xCCCC_CCCC_CCCC_CCCC,
    0xF0F0_F0F0_F0F0_F0F0,
    0xFF00_FF00_FF00_FF00,
    0xFFFF_0000_FFFF_0000,
    0xFFFF_FFFF_0000_0000,
];

impl Aig {
    /// Simulates 64 samples at once: one word per input (in input order), one word per
    /// output (in output order). Dead gates are not evaluated.
    pub fn simulate(&self, patterns: &[u64]) -> Result<Vec<u64>> {
        if patterns.len() != self.inputs.len() {
            return Err(AigError::InputCountMismatch {
                expected: self.inputs.len(),
                found: patterns.len(),
            });
        }

        let mut values = vec![0u64; self.nodes.len()];
        for (&id, &pattern) in self.inputs.iter().zip(patterns) {
            values[id as usize] = pattern;
        }

        let value = |values: &[u64], lit: Lit| -> Result<u64> {
            let word = values
                .get(lit.node_id() as usize)
                .ok_or(AigError::InvalidReference(lit))?;
            Ok(if lit.is_inverted() { !word } else { *word })
        };

        let mut dfs = PostOrder::from_outputs(self);
        while let Some(id) = dfs.next(self) {
            if let AigNode::And { fanin0, fanin1 } = self.nodes[id as usize] {
                let word = value(&values, fanin0)? & value(&values, fanin1)?;
                values[id as usize] = word;
            }
        }

        self.outputs.iter().map(|&lit| value(&values, lit)).collect()
    }

    /// Complete truth table of every output, `max(1, 2^n / 64)` words each.
    ///
    /// Assignment `k` sets input `i` to bit `i` of `k`. With less than 6 inputs, the bits
    /// above `2^n` are cleared.
    pub fn truth_tables(&self) -> Result<Vec<Vec<u64>>> {
        let n = self.inputs.len();
        if n > MAX_EXHAUSTIVE_INPUTS {
            return Err(AigError::TooManyInputs(n));
        }

        let words = if n > 6 { 1usize << (n - 6) } else { 1 };
        let mask = if n < 6 {
            (1u64 << (1 << n)) - 1
        } else {
            u64::MAX
        };

        let mut tables = vec![Vec::with_capacity(words); self.outputs.len()];
        for w in 0..words {
            let patterns: Vec<u64> = (0..n)
                .map(|i| {
                    if i < 6 {
                        VAR_PATTERNS[i]
                    } else if (w >> (i - 6)) & 1 == 1 {
                        u64::MAX
                    } else {
                        0
                    }
                })
                .collect();
            for (table, word) in tables.iter_mut().zip(self.simulate(&patterns)?) {
                table.push(word & mask);
            }
        }

        Ok(tables)
    }

    /// Signature of every output over `64 * words` random samples drawn from `seed`.
    ///
    /// Two AIGs with the same number of inputs get the same samples for the same seed.
    pub fn random_signatures(&self, seed: u64, words: usize) -> Result<Vec<Vec<u64>>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut signatures = vec![Vec::with_capacity(words); self.outputs.len()];
        for _ in 0..words {
            let patterns: Vec<u64> = (0..self.inputs.len()).map(|_| rng.r#gen()).collect();
            for (signature, word) in signatures.iter_mut().zip(self.simulate(&patterns)?) {
                signature.push(word);
            }
        }
        Ok(signatures)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn xor(aig: &mut Aig, a: Lit, b: Lit) -> Lit {
        let l = aig.add_and(a, !b).unwrap();
        let r = aig.add_and(!a, b).unwrap();
        !aig.add_and(!l, !r).unwrap()
    }

    #[test]
    fn simulate_test() {
        let mut aig = Aig::new();
        let a = Lit::new(aig.add_input(), false);
        let b = Lit::new(aig.add_input(), false);
        let g = aig.add_and(a, !b).unwrap();
        aig.add_output(g).unwrap();
        aig.add_output(!g).unwrap();
        aig.add_output(Lit::TRUE).unwrap();
        aig.add_output(b).unwrap();

        let res = aig.simulate(&[0b1100, 0b1010]).unwrap();
        assert_eq!(res, vec![0b0100, !0b0100, u64::MAX, 0b1010]);
    }

    #[test]
    fn simulate_arity_test() {
        let mut aig = Aig::new();
        aig.add_input();
        assert!(matches!(
            aig.simulate(&[]),
            Err(AigError::InputCountMismatch {
                expected: 1,
                found: 0
            })
        ));
    }

    #[test]
    fn truth_tables_small_test() {
        let mut aig = Aig::new();
        let a = Lit::new(aig.add_input(), false);
        let b = Lit::new(aig.add_input(), false);
        let x = xor(&mut aig, a, b);
        aig.add_output(x).unwrap();
        aig.add_output(!a).unwrap();
        aig.add_output(Lit::TRUE).unwrap();

        assert_eq!(
            aig.truth_tables().unwrap(),
            vec![vec![0b0110], vec![0b0101], vec![0b1111]]
        );

        let mut empty = Aig::new();
        empty.add_output(Lit::TRUE).unwrap();
        assert_eq!(empty.truth_tables().unwrap(), vec![vec![1]]);
    }

    #[test]
    fn truth_tables_wide_test() {
        let mut aig = Aig::new();
        let v: Vec<Lit> = (0..8).map(|_| Lit::new(aig.add_input(), false)).collect();
        aig.add_output(v[7]).unwrap();
        aig.add_output(v[0]).unwrap();

        let tables = aig.truth_tables().unwrap();
        assert_eq!(tables[0], vec![0, 0, u64::MAX, u64::MAX]);
        assert_eq!(tables[1], vec![VAR_PATTERNS[0]; 4]);
    }

    #[test]
    fn truth_tables_too_many_inputs_test() {
        let mut aig = Aig::new();
        for _ in 0..=MAX_EXHAUSTIVE_INPUTS {
            aig.add_input();
        }
        assert!(matches!(
            aig.truth_tables(),
            Err(AigError::TooManyInputs(17))
        ));
    }

    #[test]
    fn random_signatures_test() {
        let mut aig = Aig::new();
        let a = Lit::new(aig.add_input(), false);
        let b = Lit::new(aig.add_input(), false);
        let x = xor(&mut aig, a, b);
        aig.add_output(x).unwrap();

        // Same function, different structure
        let mut other = Aig::new();
        let a = Lit::new(other.add_input(), false);
        let b = Lit::new(other.add_input(), false);
        let or = !other.add_and(!a, !b).unwrap();
        let nand = !other.add_and(a, b).unwrap();
        let x = other.add_and(or, nand).unwrap();
        other.add_output(x).unwrap();

        let s1 = aig.random_signatures(7, 4).unwrap();
        assert_eq!(s1.len(), 1);
        assert_eq!(s1[0].len(), 4);
        assert_eq!(s1, aig.random_signatures(7, 4).unwrap());
        assert_eq!(s1, other.random_signatures(7, 4).unwrap());
    }
}
