#![allow(non_snake_case)]

use conicls::{algebra::*, solver::*};

#[test]
fn test_dual_infeasible_detected_in_presolve() {
    let _ = env_logger::builder().is_test(true).try_init();

    // A'y = -c has no solution: both columns equal, c1 != c2
    let A = CscMatrix::from(&[[1., 1.], [-1., -1.]]);
    let b = vec![1., 1.];
    let c = vec![1., 0.];
    let cones = [NonnegativeConeT(2)];

    let mut solver = DefaultSolver::new(&A, &b, &c, &cones, DefaultSettings::default()).unwrap();
    let result = solver.solve();

    assert_eq!(
        result,
        Err(SolverError::InfeasibilityDetected {
            stage: SolveStage::Presolve
        })
    );
    assert_eq!(solver.solution.status, SolverStatus::Infeasible);
    assert_eq!(solver.info.error_stage, Some(SolveStage::Presolve));
    assert!(solver.solution.x.iter().all(|v| f64::is_nan(*v)));
}

#[test]
fn test_primal_infeasible_is_not_solved() {
    let _ = env_logger::builder().is_test(true).try_init();

    // x >= 1 and x <= 0
    let A = CscMatrix::from(&[[-1.], [1.]]);
    let b = vec![-1., 0.];
    let c = vec![1.];
    let cones = [NonnegativeConeT(2)];

    let settings = DefaultSettingsBuilder::default()
        .outer_iteration_cap(50)
        .build()
        .unwrap();
    let mut solver = DefaultSolver::new(&A, &b, &c, &cones, settings).unwrap();
    let result = solver.solve();

    let err = result.unwrap_err();
    assert_eq!(solver.solution.status, err.status());
    assert_ne!(solver.solution.status, SolverStatus::Solved);
    assert_eq!(solver.info.error_stage, err.stage());
    assert!(solver.info.loss > 1e-8);
}

#[test]
fn test_time_limit() {
    let _ = env_logger::builder().is_test(true).try_init();

    let A = CscMatrix::from(&[[-1.], [1.]]);
    let b = vec![-1., 2.];
    let c = vec![1.];
    let cones = [NonnegativeConeT(2)];

    let settings = DefaultSettingsBuilder::default()
        .time_limit(0.)
        .build()
        .unwrap();
    let mut solver = DefaultSolver::new(&A, &b, &c, &cones, settings).unwrap();

    assert!(matches!(
        solver.solve(),
        Err(SolverError::TimeLimitReached { iteration: 0 })
    ));
    assert_eq!(solver.solution.status, SolverStatus::MaxTime);
}
