//! Goal-matrix file I/O: read a whitespace-tolerant ASCII 0/1 matrix from
//! disk. Ported from `original_source/matrix.h`'s `read_matrix`.

use std::fs;

use cnot_core::Matrix;

use crate::error::CliError;

/// Read and parse the goal matrix at `path`, for a matrix of dimension `n`.
pub fn read_goal(path: &str, n: u8) -> Result<Matrix, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::GoalFileIo {
        path: path.to_string(),
        source,
    })?;
    Matrix::parse(n, &text).map_err(|source| CliError::GoalFileMatrix {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_a_well_formed_file() {
        let file = Scratch::with_contents("1 0\n0 1\n");
        let m = read_goal(&file.path_str(), 2).unwrap();
        assert_eq!(m, Matrix::identity(2));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_goal("/nonexistent/path/to/goal.txt", 3).unwrap_err();
        assert!(matches!(err, CliError::GoalFileIo { .. }));
    }

    #[test]
    fn malformed_contents_is_a_matrix_error() {
        let file = Scratch::with_contents("1 0 2 1\n");
        let err = read_goal(&file.path_str(), 2).unwrap_err();
        assert!(matches!(err, CliError::GoalFileMatrix { .. }));
    }

    /// Minimal scratch-file helper so these tests don't need a dev-dependency
    /// on `tempfile` just to write two lines.
    struct Scratch {
        path: std::path::PathBuf,
    }

    impl Scratch {
        fn with_contents(contents: &str) -> Self {
            let mut path = std::env::temp_dir();
            path.push(format!(
                "cnot-goalfile-test-{:?}-{contents_len}.txt",
                std::thread::current().id(),
                contents_len = contents.len()
            ));
            let mut f = fs::File::create(&path).unwrap();
            f.write_all(contents.as_bytes()).unwrap();
            Scratch { path }
        }

        fn path_str(&self) -> String {
            self.path.to_string_lossy().into_owned()
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.path);
        }
    }
}
