#![allow(non_snake_case)]

use conicls::{algebra::*, solver::*};
use float_eq::assert_float_eq;

#[test]
fn test_duplicated_column() {
    let _ = env_logger::builder().is_test(true).try_init();

    // min x1 + x2 + x3  s.t.  1 <= x1 + x2 <= 3,  x3 >= 1
    // The first two columns are identical, so x is not unique.
    let A = CscMatrix::from(&[[-1., -1., 0.], [1., 1., 0.], [0., 0., -1.]]);
    let b = vec![-1., 3., -1.];
    let c = vec![1., 1., 1.];
    let cones = [NonnegativeConeT(3)];

    let mut solver = DefaultSolver::new(&A, &b, &c, &cones, DefaultSettings::default()).unwrap();
    solver.solve().unwrap();

    assert_eq!(solver.info.presolve_rank, Some(2));
    assert_eq!(solver.info.presolve_nullity, Some(1));

    let x = &solver.solution.x;
    assert_float_eq!(x[0] + x[1], 1., abs <= 1e-7);
    assert_float_eq!(x[2], 1., abs <= 1e-7);
    assert_float_eq!(solver.solution.obj_val, 2., abs <= 1e-7);
    assert!(solver.solution.r_prim < 1e-7);
    assert!(solver.solution.r_dual < 1e-7);
}

#[test]
fn test_more_variables_than_constraints() {
    let _ = env_logger::builder().is_test(true).try_init();

    // min x1 + x2 + x3 + x4  s.t.  x1 + x2 >= 1, x3 + x4 >= 2, x >= 0
    let A = CscMatrix::from(&[
        [-1., -1., 0., 0.],
        [0., 0., -1., -1.],
        [-1., 0., 0., 0.],
        [0., -1., 0., 0.],
        [0., 0., -1., 0.],
        [0., 0., 0., -1.],
    ]);
    let b = vec![-1., -2., 0., 0., 0., 0.];
    let c = vec![1.; 4];
    let cones = [NonnegativeConeT(6)];

    let mut solver = DefaultSolver::new(&A, &b, &c, &cones, DefaultSettings::default()).unwrap();
    solver.solve().unwrap();

    assert_float_eq!(solver.solution.obj_val, 3., abs <= 1e-6);
    assert!(solver.solution.x.iter().all(|&v| v >= -1e-7));
}
