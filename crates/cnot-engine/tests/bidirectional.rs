//! Integration tests for bidirectional search and circuit synthesis:
//! diameter-matching scenarios and round-trip soundness of the emitted
//! trace, across both canonicalization backends.

use cnot_core::Matrix;
use cnot_engine::config::Backend;
use cnot_engine::traceback::TraceEndPerm;
use cnot_engine::{Config, Engine};

fn engine_for(n: u8, backend: Backend) -> Engine {
    let mut cfg = Config::new(n);
    cfg.backend = backend;
    Engine::new(cfg).unwrap()
}

#[test]
fn goal_equal_to_start_needs_no_expansion() {
    let engine = engine_for(4, Backend::Graph);
    let id = Matrix::identity(4);
    let synthesis = engine.synthesize(id, id, None).unwrap().found.expect("identity reaches itself");
    assert_eq!(synthesis.trace.len(), 0);
    assert_eq!(synthesis.fwd_depth, 1);
    assert_eq!(synthesis.bwd_depth, 1);
}

#[test]
fn single_cnot_goal_is_distance_one() {
    for backend in [Backend::Fingerprint, Backend::Graph] {
        let engine = engine_for(3, backend);
        let id = Matrix::identity(3);
        let goal = id.cnot(0, 1);

        let synthesis = engine.synthesize(id, goal, None).unwrap().found.expect("reachable");
        assert_eq!(synthesis.trace.len(), 1);

        let replayed = synthesis.trace.apply(id);
        let checked = match &synthesis.end_perm {
            TraceEndPerm::Single(pi) => replayed.permute(pi),
            TraceEndPerm::RowCol(sigma, tau) => replayed.permute2(sigma, tau),
        };
        assert_eq!(checked, goal);
    }
}

#[test]
fn bidirectional_and_unidirectional_distance_agree() {
    let n = 4;
    let id = Matrix::identity(n);
    let goal = id.cnot(0, 1).cnot(1, 2).cnot(2, 3);

    let bi_engine = engine_for(n, Backend::Graph);
    let synthesis = bi_engine.synthesize(id, goal, None).unwrap().found.expect("reachable");
    let bi_distance = synthesis.fwd_depth + synthesis.bwd_depth - 2;

    let uni_engine = engine_for(n, Backend::Graph);
    let result = uni_engine.bfs(id, Some(goal), None).unwrap();
    let uni_distance = result.found_at.expect("goal reachable") - 1;

    assert_eq!(bi_distance, uni_distance);
}

#[test]
fn fingerprint_and_graph_backends_agree_on_distance() {
    let n = 3;
    let id = Matrix::identity(n);
    let goal = id.cnot(0, 1).cnot(1, 2);

    let fp = engine_for(n, Backend::Fingerprint);
    let fp_result = fp.synthesize(id, goal, None).unwrap().found.expect("reachable");

    let graph = engine_for(n, Backend::Graph);
    let graph_result = graph.synthesize(id, goal, None).unwrap().found.expect("reachable");

    assert_eq!(
        fp_result.fwd_depth + fp_result.bwd_depth,
        graph_result.fwd_depth + graph_result.bwd_depth
    );
}

#[test]
fn swap_regime_reaches_goal_up_to_row_column_permutation() {
    let mut cfg = Config::new(3);
    cfg.backend = Backend::Graph;
    cfg.swap = true;
    let engine = Engine::new(cfg).unwrap();

    let id = Matrix::identity(3);
    let goal = id.cnot(0, 1);

    let synthesis = engine.synthesize(id, goal, None).unwrap().found.expect("reachable");
    let replayed = synthesis.trace.apply(id);
    let TraceEndPerm::RowCol(sigma, tau) = synthesis.end_perm else {
        panic!("expected RowCol end permutation under swap=true");
    };
    assert_eq!(replayed.permute2(&sigma, &tau), goal);
}
