#![allow(non_snake_case)]

use conicls::{algebra::*, solver::*};

fn api_dim_check_data() -> (CscMatrix<f64>, Vec<f64>, Vec<f64>, Vec<SupportedConeT<f64>>) {
    let A = CscMatrix::from(&[[1., 0., 0.], [0., 1., 0.], [0., 0., 1.], [1., 1., 1.]]);
    let b = vec![1.; 4];
    let c = vec![1.; 3];
    let cones = vec![ZeroConeT(1), NonnegativeConeT(3)];
    (A, b, c, cones)
}

fn is_setup_violation(e: SolverError) -> bool {
    matches!(
        e,
        SolverError::PreconditionViolation {
            stage: SolveStage::Setup,
            ..
        }
    )
}

#[test]
fn api_dim_check_working() {
    let (A, b, c, cones) = api_dim_check_data();
    assert!(DefaultSolver::new(&A, &b, &c, &cones, DefaultSettings::default()).is_ok());
}

#[test]
fn api_dim_check_bad_b() {
    let (A, _b, c, cones) = api_dim_check_data();
    let b = vec![1.; 5];
    let e = DefaultSolver::new(&A, &b, &c, &cones, DefaultSettings::default()).err();
    assert!(is_setup_violation(e.unwrap()));
}

#[test]
fn api_dim_check_bad_c() {
    let (A, b, _c, cones) = api_dim_check_data();
    let c = vec![1.; 2];
    let e = DefaultSolver::new(&A, &b, &c, &cones, DefaultSettings::default()).err();
    assert!(is_setup_violation(e.unwrap()));
}

#[test]
fn api_dim_check_bad_cones() {
    let (A, b, c, _cones) = api_dim_check_data();
    let cones = vec![ZeroConeT(1), NonnegativeConeT(4)];
    let e = DefaultSolver::new(&A, &b, &c, &cones, DefaultSettings::default()).err();
    assert!(is_setup_violation(e.unwrap()));
}

#[test]
fn api_bad_cone_scale() {
    let (A, b, c, _cones) = api_dim_check_data();
    let cones = vec![ZeroConeT(1), SecondOrderConeT(vec![1., 0.])];
    let e = DefaultSolver::new(&A, &b, &c, &cones, DefaultSettings::default()).err();
    assert_eq!(
        e,
        Some(SolverError::BadProblemData(ProblemDataError::BadConeScale))
    );
}

#[test]
fn api_non_finite_data() {
    let (A, b, mut c, cones) = api_dim_check_data();
    c[1] = f64::INFINITY;
    let e = DefaultSolver::new(&A, &b, &c, &cones, DefaultSettings::default()).err();
    assert_eq!(
        e,
        Some(SolverError::BadProblemData(ProblemDataError::NonFinite("c")))
    );
}

#[test]
fn api_bad_matrix_format() {
    let (mut A, b, c, cones) = api_dim_check_data();
    A.rowval.swap(0, 1);
    let e = DefaultSolver::new(&A, &b, &c, &cones, DefaultSettings::default()).err();
    assert!(matches!(e, Some(SolverError::BadProblemData(_))));
}

#[test]
fn api_bad_settings() {
    let (A, b, c, cones) = api_dim_check_data();
    let settings = DefaultSettings {
        linesearch_armijo: 2.0,
        ..DefaultSettings::default()
    };
    let e = DefaultSolver::new(&A, &b, &c, &cones, settings).err();
    assert!(is_setup_violation(e.unwrap()));
}
