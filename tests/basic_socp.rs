#![allow(non_snake_case)]

use conicls::{algebra::*, solver::*};
use float_eq::assert_float_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};

// min t  s.t.  u = (1, 2),  t >= ‖a⊙u‖
fn norm_problem(a: Vec<f64>) -> (CscMatrix<f64>, Vec<f64>, Vec<f64>, Vec<SupportedConeT<f64>>) {
    let A = CscMatrix::from(&[
        [0., 1., 0.],
        [0., 0., 1.],
        [-1., 0., 0.],
        [0., -1., 0.],
        [0., 0., -1.],
    ]);
    let b = vec![1., 2., 0., 0., 0.];
    let c = vec![1., 0., 0.];
    let cones = vec![ZeroConeT(2), SecondOrderConeT(a)];
    (A, b, c, cones)
}

#[test]
fn test_socp_unscaled() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (A, b, c, cones) = norm_problem(vec![1., 1.]);

    let mut solver = DefaultSolver::new(&A, &b, &c, &cones, DefaultSettings::default()).unwrap();
    solver.solve().unwrap();

    assert_eq!(solver.solution.status, SolverStatus::Solved);
    assert!(solver.solution.x.norm_inf_diff(&[f64::sqrt(5.), 1., 2.]) <= 1e-6);
    assert_float_eq!(solver.solution.obj_val, f64::sqrt(5.), abs <= 1e-6);
}

#[test]
fn test_socp_scaled() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (A, b, c, cones) = norm_problem(vec![2., 1.]);

    let mut solver = DefaultSolver::new(&A, &b, &c, &cones, DefaultSettings::default()).unwrap();
    solver.solve().unwrap();

    // t = ‖(2*1, 1*2)‖
    assert_float_eq!(solver.solution.obj_val, f64::sqrt(8.), abs <= 1e-6);

    // the SOC slack lies in the scaled cone
    let s = &solver.solution.s[2..];
    let norm = f64::hypot(2. * s[1], s[2]);
    assert!(s[0] >= norm - 1e-6);
}

#[test]
fn test_socp_random_scales() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..4 {
        let a: Vec<f64> = (0..2).map(|_| rng.gen_range(0.3..3.0)).collect();
        let expected = f64::hypot(a[0], 2. * a[1]);

        for presolve in [true, false] {
            for method in [DirectionMethod::CgNewton, DirectionMethod::DenseNewton] {
                let (A, b, c, cones) = norm_problem(a.clone());
                let settings = DefaultSettingsBuilder::default()
                    .qr_presolve(presolve)
                    .direction_method(method)
                    .build()
                    .unwrap();

                let mut solver = DefaultSolver::new(&A, &b, &c, &cones, settings).unwrap();
                solver.solve().unwrap();

                let sol = &solver.solution;
                assert_eq!(sol.status, SolverStatus::Solved, "scale {a:?}");
                assert_float_eq!(sol.obj_val, expected, abs <= 1e-6);
                assert!(sol.x.norm_inf_diff(&[expected, 1., 2.]) <= 1e-6);
            }
        }
    }
}

#[test]
fn test_socp_mixed_with_bounds() {
    let _ = env_logger::builder().is_test(true).try_init();

    // min -x1 - x2  s.t.  ‖(x1, x2)‖ <= 1
    let A = CscMatrix::from(&[[0., 0.], [-1., 0.], [0., -1.]]);
    let b = vec![1., 0., 0.];
    let c = vec![-1., -1.];
    let cones = [SecondOrderConeT(vec![1., 1.])];

    let mut solver = DefaultSolver::new(&A, &b, &c, &cones, DefaultSettings::default()).unwrap();
    solver.solve().unwrap();

    let r = 1. / f64::sqrt(2.);
    assert!(solver.solution.x.norm_inf_diff(&[r, r]) <= 1e-6);
    assert_float_eq!(solver.solution.obj_val, -f64::sqrt(2.), abs <= 1e-6);
}
