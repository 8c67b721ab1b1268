#![allow(non_snake_case)]

use conicls::{algebra::*, solver::*};
use float_eq::assert_float_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[allow(clippy::type_complexity)]
fn basic_lp_data() -> (CscMatrix<f64>, Vec<f64>, Vec<f64>, Vec<SupportedConeT<f64>>) {
    // |2x_i| <= 1
    let A = CscMatrix::from(&[
        [2., 0., 0.],
        [0., 2., 0.],
        [0., 0., 2.],
        [-2., 0., 0.],
        [0., -2., 0.],
        [0., 0., -2.],
    ]);
    let b = vec![1.; 6];
    let c = vec![3., -2., 1.];
    let cones = vec![NonnegativeConeT(3), NonnegativeConeT(3)];

    (A, b, c, cones)
}

#[test]
fn test_lp_feasible() {
    init_logging();
    let (A, b, c, cones) = basic_lp_data();

    let settings = DefaultSettings::default();
    let mut solver = DefaultSolver::new(&A, &b, &c, &cones, settings).unwrap();

    solver.solve().unwrap();
    assert_eq!(solver.solution.status, SolverStatus::Solved);

    let refsol = vec![-0.5, 0.5, -0.5];
    assert!(solver.solution.x.norm_inf_diff(&refsol) <= 1e-7);

    assert_float_eq!(solver.solution.obj_val, -3., abs <= 1e-7);
    assert_float_eq!(solver.solution.obj_val_dual, -3., abs <= 1e-7);
    assert!(solver.solution.r_prim <= 1e-7);
    assert!(solver.solution.r_dual <= 1e-7);
}

#[test]
fn test_lp_without_presolve() {
    init_logging();
    let (A, b, c, cones) = basic_lp_data();

    let settings = DefaultSettingsBuilder::default()
        .qr_presolve(false)
        .build()
        .unwrap();
    let mut solver = DefaultSolver::new(&A, &b, &c, &cones, settings).unwrap();

    solver.solve().unwrap();
    assert_eq!(solver.solution.status, SolverStatus::Solved);
    assert!(solver.info.presolve_rank.is_none());

    let refsol = vec![-0.5, 0.5, -0.5];
    assert!(solver.solution.x.norm_inf_diff(&refsol) <= 1e-6);
    assert_float_eq!(solver.solution.obj_val, -3., abs <= 1e-6);
}

#[test]
fn test_lp_dual_and_slacks_in_cone() {
    init_logging();
    let (A, b, c, cones) = basic_lp_data();
    let mut solver = DefaultSolver::new(&A, &b, &c, &cones, DefaultSettings::default()).unwrap();
    solver.solve().unwrap();

    let sol = &solver.solution;
    assert!(sol.s.iter().all(|&v| v >= -1e-8));
    assert!(sol.y.iter().all(|&v| v >= -1e-8));

    // complementary slackness
    assert!(sol.s.dot(&sol.y).abs() <= 1e-7);
    assert!(sol.gap.abs() <= 1e-7);
}

#[test]
fn test_lp_with_equality() {
    init_logging();
    // min x1 + 2x2  s.t.  x1 + x2 = 1, x >= 0
    let A = CscMatrix::from(&[[1., 1.], [-1., 0.], [0., -1.]]);
    let b = vec![1., 0., 0.];
    let c = vec![1., 2.];
    let cones = vec![ZeroConeT(1), NonnegativeConeT(2)];

    let mut solver = DefaultSolver::new(&A, &b, &c, &cones, DefaultSettings::default()).unwrap();
    solver.solve().unwrap();

    assert!(solver.solution.x.norm_inf_diff(&[1., 0.]) <= 1e-7);
    assert_float_eq!(solver.solution.obj_val, 1., abs <= 1e-7);
    // the zero cone slack is exactly zero
    assert_float_eq!(solver.solution.s[0], 0., abs <= 1e-9);
}

#[test]
fn test_lp_line_search_variants() {
    init_logging();
    let (A, b, c, cones) = basic_lp_data();

    for method in [
        LineSearchMethod::Backtracking,
        LineSearchMethod::StrongWolfe,
        LineSearchMethod::LogSpaceGrid,
    ] {
        let settings = DefaultSettingsBuilder::default()
            .line_search_method(method)
            .build()
            .unwrap();
        let mut solver = DefaultSolver::new(&A, &b, &c, &cones, settings).unwrap();
        solver.solve().unwrap();
        assert_float_eq!(solver.solution.obj_val, -3., abs <= 1e-6);
    }
}

#[test]
fn test_lp_dense_newton() {
    init_logging();
    let (A, b, c, cones) = basic_lp_data();

    let settings = DefaultSettingsBuilder::default()
        .direction_method(DirectionMethod::DenseNewton)
        .build()
        .unwrap();
    let mut solver = DefaultSolver::new(&A, &b, &c, &cones, settings).unwrap();
    solver.solve().unwrap();
    assert_float_eq!(solver.solution.obj_val, -3., abs <= 1e-6);
    assert_eq!(solver.info.direction_stats.total_cg_iterations, 0);
}

#[test]
fn test_lp_repeated_solve() {
    init_logging();
    let (A, b, c, cones) = basic_lp_data();
    let mut solver = DefaultSolver::new(&A, &b, &c, &cones, DefaultSettings::default()).unwrap();

    solver.solve().unwrap();
    let x1 = solver.solution.x.clone();
    let iters = solver.info.iterations;

    solver.solve().unwrap();
    assert_eq!(solver.solution.x, x1);
    assert_eq!(solver.info.iterations, iters);
    assert_eq!(solver.info.loss_history.len(), iters + 1);
}
