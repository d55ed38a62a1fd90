//! Ties argument parsing, goal-file I/O, the engine, and rendering
//! together. Analogous to `cesso_uci::UciEngine::run`, but a single
//! request/response pass rather than an interactive protocol loop — the
//! original tool runs once per process and exits.

use cnot_core::Matrix;
use cnot_engine::{Config, Engine, ProgressRecord, ProgressSide};

use crate::error::RunError;
use crate::{args::Args, goalfile, render};

/// Default matrix dimension when `-n<N>` is not given, matching the
/// original's own `options.h` default (`N=6`).
const DEFAULT_N: u8 = 6;

/// Render one [`ProgressRecord`] as a `render::progress_line`, prefixed by
/// which side of a bidirectional search it belongs to (if any).
fn progress_line(record: &ProgressRecord) -> String {
    let line = render::progress_line(
        record.depth.saturating_sub(1),
        record.scale,
        record.elapsed_secs,
        record.level,
        record.orbits,
    );
    match record.side {
        None => line,
        Some(ProgressSide::Forward) => format!("Fwd {line}"),
        Some(ProgressSide::Backward) => format!("Bwd {line}"),
    }
}

fn progress_lines(records: &[ProgressRecord]) -> String {
    records.iter().map(progress_line).collect::<Vec<_>>().join("\n")
}

/// Run one full CLI invocation and return the text to print plus the
/// process exit code (0 for success, including "goal not found").
pub fn run(argv: &[String]) -> Result<(String, i32), RunError> {
    let args = Args::parse(argv)?;
    let n = args.dimension.unwrap_or(DEFAULT_N);
    let config = Config::new(n);
    let engine = Engine::new(config)?;
    let id = Matrix::identity(n);

    let Some(goal_path) = args.goal_path else {
        let result = engine.bfs(id, None, args.limit)?;
        return Ok((progress_lines(&result.progress), 0));
    };

    let goal = goalfile::read_goal(&goal_path, n)?;
    let synthesis_run = engine.synthesize(id, goal, args.limit)?;
    let progress = progress_lines(&synthesis_run.progress);

    match synthesis_run.found {
        Some(synthesis) => {
            let summary = format!(
                "Found at distance {} ({} + {})",
                synthesis.fwd_depth + synthesis.bwd_depth - 2,
                synthesis.fwd_depth - 1,
                synthesis.bwd_depth - 1,
            );
            let circuit = render::render_circuit(n, id, goal, &synthesis.trace, &synthesis.end_perm);
            Ok((format!("{progress}\n{summary}{circuit}"), 0))
        }
        None => {
            let message = format!(
                "{progress}\nGoal not found within the configured limit:\n{}",
                render::pretty_matrix(&goal)
            );
            Ok((message, 0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_enumeration_with_no_arguments() {
        let (output, code) = run(&["-n3".to_string()]).unwrap();
        assert_eq!(code, 0);
        assert!(output.starts_with("Depth "));
    }

    #[test]
    fn bad_limit_is_a_cli_error() {
        let err = run(&["-abc".to_string()]).unwrap_err();
        assert!(matches!(err, RunError::Cli(_)));
    }
}
