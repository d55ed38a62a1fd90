//! Packed N×N boolean matrices — a 64-bit word where bit `i*n+j` holds
//! entry (row i, col j). The all-zero word is reserved as a hash-table
//! sentinel and never occurs on a reachable (invertible) matrix.

use std::fmt;

use crate::error::MatrixError;
use crate::permutation::Permutation;

/// An N×N boolean matrix packed row-major into a `u64`, N <= 8.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Matrix {
    bits: u64,
    n: u8,
}

impl Matrix {
    /// Build a matrix from its dimension and raw packed bits.
    ///
    /// # Panics
    ///
    /// Debug-asserts `n` is in `1..=8`.
    #[inline]
    pub const fn from_bits(n: u8, bits: u64) -> Self {
        debug_assert!(n >= 1 && n <= 8);
        Self { bits, n }
    }

    /// The `n x n` identity matrix.
    pub fn identity(n: u8) -> Self {
        let mut bits = 0u64;
        for i in 0..n {
            bits |= 1u64 << (i as u32 * n as u32 + i as u32);
        }
        Self { bits, n }
    }

    /// Validate `n` is in the supported range, returning the configuration error otherwise.
    pub fn check_dimension(n: u8) -> Result<(), MatrixError> {
        if (1..=8).contains(&n) {
            Ok(())
        } else {
            Err(MatrixError::DimensionOutOfRange { n })
        }
    }

    /// Dimension of this matrix.
    #[inline]
    pub fn n(&self) -> u8 {
        self.n
    }

    /// Raw packed bits — the value stored as a hash-table key.
    #[inline]
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// `true` for the reserved all-zero sentinel (never a real matrix state).
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.bits == 0
    }

    /// Read entry (row, col).
    #[inline]
    pub fn get(&self, row: u8, col: u8) -> bool {
        let idx = row as u32 * self.n as u32 + col as u32;
        (self.bits >> idx) & 1 != 0
    }

    /// Extract row `i` as a right-aligned `n`-bit value.
    #[inline]
    pub fn row(&self, i: u8) -> u64 {
        let n = self.n as u32;
        (self.bits >> (i as u32 * n)) & ((1u64 << n) - 1)
    }

    /// The fundamental CNOT rewrite: XOR row `i` into row `j` (`i != j`).
    ///
    /// This is its own inverse under XOR, which `traceback` relies on.
    #[inline]
    pub fn cnot(&self, i: u8, j: u8) -> Matrix {
        debug_assert_ne!(i, j);
        let n = self.n as u32;
        let row_i = self.row(i);
        Matrix {
            bits: self.bits ^ (row_i << (j as u32 * n)),
            n: self.n,
        }
    }

    /// Apply a single permutation to both rows and columns: `y[i][j] = x[pi(i)][pi(j)]`.
    pub fn permute(&self, pi: &Permutation) -> Matrix {
        debug_assert_eq!(pi.n(), self.n);
        let n = self.n;
        let mut y = 0u64;
        for i in 0..n {
            for j in 0..n {
                if self.get(pi.apply(i), pi.apply(j)) {
                    y |= 1u64 << (i as u32 * n as u32 + j as u32);
                }
            }
        }
        Matrix { bits: y, n }
    }

    /// Apply independent row/column permutations (SWAP regime):
    /// `y[i][j] = x[sigma(i)][tau(j)]`.
    pub fn permute2(&self, sigma: &Permutation, tau: &Permutation) -> Matrix {
        debug_assert_eq!(sigma.n(), self.n);
        debug_assert_eq!(tau.n(), self.n);
        let n = self.n;
        let mut y = 0u64;
        for i in 0..n {
            for j in 0..n {
                if self.get(sigma.apply(i), tau.apply(j)) {
                    y |= 1u64 << (i as u32 * n as u32 + j as u32);
                }
            }
        }
        Matrix { bits: y, n }
    }

    /// An index is essential if its diagonal bit is zero, or it participates
    /// in any off-diagonal bit in its row or column.
    pub fn is_essential(&self, i: u8) -> bool {
        if !self.get(i, i) {
            return true;
        }
        for j in 0..self.n {
            if j != i && (self.get(i, j) || self.get(j, i)) {
                return true;
            }
        }
        false
    }

    /// Count essential indices.
    pub fn count_essential(&self) -> u8 {
        (0..self.n).filter(|&i| self.is_essential(i)).count() as u8
    }

    /// Parse a matrix from whitespace-separated `0`/`1` characters (row-major).
    ///
    /// Any of space/tab/LF/CR is a separator; any other non-`0`/`1` character
    /// is a parse error. Exactly `n*n` entries are required.
    pub fn parse(n: u8, text: &str) -> Result<Matrix, MatrixError> {
        Self::check_dimension(n)?;
        let mut bits = 0u64;
        let mut count = 0usize;
        for c in text.chars() {
            match c {
                ' ' | '\t' | '\n' | '\r' => continue,
                '0' => {
                    count += 1;
                }
                '1' => {
                    bits |= 1u64 << count;
                    count += 1;
                }
                other => return Err(MatrixError::InvalidChar { character: other }),
            }
            if count > (n as usize) * (n as usize) {
                break;
            }
        }
        let expected = n as usize * n as usize;
        if count != expected {
            return Err(MatrixError::WrongEntryCount {
                n,
                expected,
                found: count,
            });
        }
        if bits == 0 {
            return Err(MatrixError::AllZero);
        }
        Ok(Matrix { bits, n })
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for i in 0..self.n {
            for j in 0..self.n {
                write!(f, "{} ", self.get(i, j) as u8)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_roundtrip() {
        let id = Matrix::identity(4);
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(id.get(i, j), i == j);
            }
        }
    }

    #[test]
    fn cnot_is_its_own_inverse() {
        let m = Matrix::identity(3);
        let once = m.cnot(0, 1);
        let twice = once.cnot(0, 1);
        assert_eq!(m, twice);
    }

    #[test]
    fn permute_identity_is_noop() {
        let m = Matrix::identity(3).cnot(0, 1).cnot(1, 2);
        let id_perm = Permutation::identity(3);
        assert_eq!(m.permute(&id_perm), m);
    }

    #[test]
    fn permute_composition_law() {
        // Applying p1 then p2 equals applying the single permutation
        // `p2.compose(&p1)` — p1's image positions are where p2 looks next,
        // so composition order is reversed relative to application order.
        let m = Matrix::identity(4).cnot(0, 1).cnot(2, 3).cnot(1, 3);
        let p1 = Permutation::from_slice(&[1, 0, 3, 2]);
        let p2 = Permutation::from_slice(&[0, 2, 1, 3]);
        let composed = p2.compose(&p1);
        assert_eq!(m.permute(&p1).permute(&p2), m.permute(&composed));
    }

    #[test]
    fn essential_index_detection() {
        // identity has a diagonal 1 everywhere and no off-diagonal bits:
        // every index is inessential under this definition (diagonal=1, no off-diag).
        let id = Matrix::identity(3);
        assert_eq!(id.count_essential(), 0);

        let m = id.cnot(0, 1); // sets bit (0,1): row 0 gains an off-diagonal entry
        assert!(m.is_essential(0));
        assert!(m.is_essential(1));
        assert!(!m.is_essential(2));
    }

    #[test]
    fn parse_accepts_whitespace_variants() {
        let m = Matrix::parse(2, "1 0\n0\t1\r").unwrap();
        assert_eq!(m, Matrix::identity(2));
    }

    #[test]
    fn parse_rejects_bad_char() {
        let err = Matrix::parse(2, "1 0 0 2").unwrap_err();
        assert!(matches!(err, MatrixError::InvalidChar { character: '2' }));
    }

    #[test]
    fn parse_rejects_wrong_count() {
        let err = Matrix::parse(2, "1 0 0").unwrap_err();
        assert!(matches!(err, MatrixError::WrongEntryCount { .. }));
    }

    #[test]
    fn parse_rejects_all_zero() {
        let err = Matrix::parse(2, "0 0 0 0").unwrap_err();
        assert!(matches!(err, MatrixError::AllZero));
    }
}
