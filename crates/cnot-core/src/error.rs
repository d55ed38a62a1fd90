//! Error types for matrix/goal-file parsing and dimension validation.

/// Errors raised while constructing or validating a [`Matrix`](crate::matrix::Matrix).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// The requested dimension is outside the supported range.
    #[error("N={n} not supported, only N=1..=8")]
    DimensionOutOfRange {
        /// The requested dimension.
        n: u8,
    },
    /// A goal-file character was not `0`, `1`, or whitespace.
    #[error("invalid character '{character}' in matrix input, expected '0' or '1'")]
    InvalidChar {
        /// The offending character.
        character: char,
    },
    /// The goal-file did not contain exactly `N*N` entries.
    #[error("expected {expected} matrix entries for N={n}, found {found}")]
    WrongEntryCount {
        /// Matrix dimension.
        n: u8,
        /// Entries required (`n*n`).
        expected: usize,
        /// Entries actually read before EOF.
        found: usize,
    },
    /// The parsed matrix is all-zero, which can never be an invertible target.
    #[error("matrix is all-zero, which is never invertible")]
    AllZero,
}

#[cfg(test)]
mod tests {
    use super::MatrixError;

    #[test]
    fn dimension_out_of_range_display() {
        let err = MatrixError::DimensionOutOfRange { n: 9 };
        assert_eq!(format!("{err}"), "N=9 not supported, only N=1..=8");
    }

    #[test]
    fn invalid_char_display() {
        let err = MatrixError::InvalidChar { character: 'x' };
        assert_eq!(
            format!("{err}"),
            "invalid character 'x' in matrix input, expected '0' or '1'"
        );
    }
}
