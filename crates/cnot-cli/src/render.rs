//! User-facing text output: progress lines, pretty-printed matrices and
//! permutations, and the QASM circuit dump with its correctness self-check.
//! Ported from `matrix.h::pretty_matrix`/`pretty_perm` and
//! `trace_back.h::print_trace`; printed straight to stdout, the same split
//! `cesso-uci` makes between protocol/user output and `tracing` diagnostics.

use cnot_core::{Matrix, Permutation, Trace};
use cnot_engine::traceback::TraceEndPerm;

/// `Depth d (2^s): (t s) (k elts) (q orbits)`.
pub fn progress_line(depth: usize, scale: u32, elapsed_secs: u64, elements: u64, orbits: u64) -> String {
    format!("Depth {depth} (2^{scale}): ({elapsed_secs} s) ({elements} elts) ({orbits} orbits)")
}

/// Render a matrix as an `n`-line grid of `0`/`1` characters.
pub fn pretty_matrix(m: &Matrix) -> String {
    let n = m.n();
    let mut out = String::new();
    for i in 0..n {
        for j in 0..n {
            out.push(if m.get(i, j) { '1' } else { '0' });
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

/// Render a permutation as its image sequence, e.g. `[2 0 1]`.
pub fn pretty_permutation(pi: &Permutation) -> String {
    let values: Vec<String> = (0..pi.n()).map(|i| pi.apply(i).to_string()).collect();
    format!("[{}]", values.join(" "))
}

/// Render the recovered circuit as OpenQASM 2.0, then self-check it against
/// `start`/`goal` and report the outcome in the returned text.
pub fn render_circuit(n: u8, start: Matrix, goal: Matrix, trace: &Trace, end_perm: &TraceEndPerm) -> String {
    let mut out = String::new();
    out.push_str("\nOPENQASM 2.0;\n");
    out.push_str("include \"qelib1.inc\";\n");
    out.push_str(&format!("qreg q[{n}];\n\n"));
    for gate in &trace.0 {
        out.push_str(&format!("cx q[{}],q[{}];\n", gate.i, gate.j));
    }

    let result = trace.apply(start);
    out.push_str("\nResult of the circuit:\n");
    out.push_str(&pretty_matrix(&result));

    let (checked, residual) = match end_perm {
        TraceEndPerm::Single(pi) => (result.permute(pi), None),
        TraceEndPerm::RowCol(sigma, tau) => (result.permute2(sigma, tau), Some((sigma, tau))),
    };

    if let Some((sigma, tau)) = residual {
        out.push_str("\nRow permutation:\n");
        out.push_str(&pretty_permutation(sigma));
        out.push_str("\nColumn permutation:\n");
        out.push_str(&pretty_permutation(tau));
        out.push_str("\nPermuted result:\n");
        out.push_str(&pretty_matrix(&checked));
    }

    if checked == goal {
        out.push_str("\nThe result is correct!\n");
    } else {
        out.push_str("\nError: result is incorrect!\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnot_core::Gate;

    #[test]
    fn progress_line_matches_the_documented_format() {
        let line = progress_line(3, 7, 12, 400, 90);
        assert_eq!(line, "Depth 3 (2^7): (12 s) (400 elts) (90 orbits)");
    }

    #[test]
    fn pretty_matrix_renders_identity() {
        let m = Matrix::identity(2);
        assert_eq!(pretty_matrix(&m), "1 0 \n0 1 \n");
    }

    #[test]
    fn pretty_permutation_renders_image_sequence() {
        let pi = Permutation::from_slice(&[2, 0, 1]);
        assert_eq!(pretty_permutation(&pi), "[2 0 1]");
    }

    #[test]
    fn render_circuit_reports_success_on_a_correct_trace() {
        let id = Matrix::identity(3);
        let goal = id.cnot(0, 1);
        let trace = Trace(vec![Gate { i: 0, j: 1 }]);
        let rendered = render_circuit(3, id, goal, &trace, &TraceEndPerm::Single(Permutation::identity(3)));
        assert!(rendered.contains("cx q[0],q[1];"));
        assert!(rendered.contains("The result is correct!"));
    }

    #[test]
    fn render_circuit_reports_failure_on_a_wrong_trace() {
        let id = Matrix::identity(3);
        let goal = id.cnot(1, 2);
        let trace = Trace(vec![Gate { i: 0, j: 1 }]);
        let rendered = render_circuit(3, id, goal, &trace, &TraceEndPerm::Single(Permutation::identity(3)));
        assert!(rendered.contains("Error: result is incorrect!"));
    }
}
