//! Backend A: pure combinatorial canonicalization by sorting each index's
//! "fingerprint" (diagonal bit, row sum, column sum) and then brute-force
//! searching the subgroup of permutations that merely reorder within
//! same-fingerprint blocks. Ported from the original's `repr_perm.h`.
//!
//! Only supports the shared row/column permutation regime (`SWAP=0`): the
//! fingerprint argument that makes this tractable — row sum and column sum
//! are each invariant under a *single* permutation applied to both axes —
//! does not hold once rows and columns move independently.

use cnot_core::{Matrix, Permutation};

use super::{CanonicalBackend, CanonicalForm, CanonicalPerm, FACTORIAL};
use crate::error::EngineError;

/// Per-index fingerprint: `(diagonal_is_zero, row_sum, col_sum, original_index)`.
/// Sorting by this tuple is exactly what groups indices into the blocks that
/// [`explore_orbit`] is allowed to permute within.
type Finger = (bool, u8, u8, u8);

fn fingerprint(x: Matrix) -> [Finger; 8] {
    let n = x.n();
    let mut finger = [(false, 0u8, 0u8, 0u8); 8];
    for i in 0..n {
        finger[i as usize] = (true, 0, 0, i);
    }
    for i in 0..n {
        for j in 0..n {
            if x.get(i, j) {
                if i == j {
                    finger[i as usize].0 = false;
                } else {
                    finger[i as usize].1 += 1;
                    finger[j as usize].2 += 1;
                }
            }
        }
    }
    finger
}

/// Sort the fingerprint and derive the permutation that carries `x` onto the
/// sorted layout.
fn normalize(x: Matrix) -> (Matrix, Permutation, Vec<Finger>) {
    let n = x.n();
    let mut finger: Vec<Finger> = fingerprint(x)[..n as usize].to_vec();
    finger.sort_unstable();
    let pi = Permutation::from_slice(
        &finger.iter().map(|f| f.3).collect::<Vec<u8>>(),
    );
    (x.permute(&pi), pi, finger)
}

/// From the sorted fingerprint, find the first essential index and the
/// sizes of the consecutive equal-fingerprint runs after it.
fn compute_cycles(finger: &[Finger]) -> (u8, Vec<u8>) {
    let n = finger.len();
    let mut i = 0;
    while i < n && !(finger[i].0 || finger[i].1 != 0 || finger[i].2 != 0) {
        i += 1;
    }
    let essential = i as u8;
    let mut cycles = Vec::new();
    while i < n {
        let mut j = i + 1;
        while j < n
            && finger[i].0 == finger[j].0
            && finger[i].1 == finger[j].1
            && finger[i].2 == finger[j].2
        {
            j += 1;
        }
        cycles.push((j - i) as u8);
        i = j;
    }
    (essential, cycles)
}

fn permutations_of(values: &[u8]) -> Vec<Vec<u8>> {
    fn heap(k: usize, values: &mut Vec<u8>, out: &mut Vec<Vec<u8>>) {
        if k == 1 {
            out.push(values.clone());
            return;
        }
        for i in 0..k {
            heap(k - 1, values, out);
            if k % 2 == 0 {
                values.swap(i, k - 1);
            } else {
                values.swap(0, k - 1);
            }
        }
    }
    if values.is_empty() {
        return vec![Vec::new()];
    }
    let mut values = values.to_vec();
    let mut out = Vec::new();
    heap(values.len(), &mut values, &mut out);
    out
}

fn cartesian(blocks: &[Vec<Vec<u8>>]) -> Vec<Vec<u8>> {
    let mut acc: Vec<Vec<u8>> = vec![Vec::new()];
    for block in blocks {
        let mut next = Vec::with_capacity(acc.len() * block.len());
        for prefix in &acc {
            for option in block {
                let mut v = prefix.clone();
                v.extend(option);
                next.push(v);
            }
        }
        acc = next;
    }
    acc
}

/// Enumerate every permutation fixing indices `< essential` and permuting
/// only within each fingerprint block, returning the smallest image of `y`,
/// the number of those permutations that fix `y` (stabilizers), and the
/// permutation achieving the smallest image.
fn explore_orbit(y: Matrix, essential: u8, cycles: &[u8]) -> (Matrix, u64, Permutation) {
    let n = y.n();
    let prefix: Vec<u8> = (0..essential).collect();
    let mut blocks = Vec::with_capacity(cycles.len());
    let mut idx = essential;
    for &len in cycles {
        let block: Vec<u8> = (idx..idx + len).collect();
        blocks.push(permutations_of(&block));
        idx += len;
    }
    let mut smallest = y;
    let mut best_perm = Permutation::identity(n);
    let mut stabilizers = 0u64;
    for suffix in cartesian(&blocks) {
        let mut values = prefix.clone();
        values.extend(suffix);
        let pi = Permutation::from_slice(&values);
        let z = y.permute(&pi);
        if z == y {
            stabilizers += 1;
        } else if z.bits() < smallest.bits() {
            smallest = z;
            best_perm = pi;
        }
    }
    (smallest, stabilizers, best_perm)
}

/// Pure combinatorial canonicalizer, `SWAP=0` only.
#[derive(Debug, Default, Clone, Copy)]
pub struct FingerprintBackend;

impl CanonicalBackend for FingerprintBackend {
    fn canonicalize(&self, x: Matrix, swap: bool) -> Result<CanonicalForm, EngineError> {
        if swap {
            return Err(EngineError::Config {
                reason: "fingerprint backend does not support independent row/column \
                         permutations; select the graph backend for SWAP=1"
                    .to_string(),
            });
        }
        let (y, pi1, finger) = normalize(x);
        let (essential, cycles) = compute_cycles(&finger);
        let (smallest, stabilizers, pi2) = explore_orbit(y, essential, &cycles);
        let pi = pi2.compose(&pi1);
        debug_assert_eq!(x.permute(&pi), smallest);
        let orbit_size =
            FACTORIAL[x.n() as usize] / (stabilizers * FACTORIAL[essential as usize]);
        Ok(CanonicalForm {
            representative: smallest,
            perm: CanonicalPerm::Single(pi),
            orbit_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_its_own_representative() {
        let id = Matrix::identity(4);
        let form = FingerprintBackend.canonicalize(id, false).unwrap();
        assert_eq!(form.representative, id);
        assert_eq!(form.orbit_size, 1);
    }

    #[test]
    fn canonical_perm_actually_reaches_representative() {
        let m = Matrix::identity(4).cnot(0, 1).cnot(2, 3);
        let form = FingerprintBackend.canonicalize(m, false).unwrap();
        let CanonicalPerm::Single(pi) = &form.perm else {
            panic!("expected Single");
        };
        assert_eq!(m.permute(pi), form.representative);
    }

    #[test]
    fn permuted_matrices_share_a_representative() {
        let m = Matrix::identity(5).cnot(0, 1).cnot(1, 2).cnot(3, 4);
        let shuffle = Permutation::from_slice(&[4, 2, 0, 1, 3]);
        let shuffled = m.permute(&shuffle);
        let a = FingerprintBackend.canonicalize(m, false).unwrap();
        let b = FingerprintBackend.canonicalize(shuffled, false).unwrap();
        assert_eq!(a.representative, b.representative);
        assert_eq!(a.orbit_size, b.orbit_size);
    }

    #[test]
    fn orbit_size_divides_factorial() {
        let m = Matrix::identity(4).cnot(0, 1);
        let form = FingerprintBackend.canonicalize(m, false).unwrap();
        assert_eq!(FACTORIAL[4] % form.orbit_size, 0);
    }

    #[test]
    fn swap_mode_is_rejected() {
        let id = Matrix::identity(3);
        assert!(FingerprintBackend.canonicalize(id, true).is_err());
    }
}
