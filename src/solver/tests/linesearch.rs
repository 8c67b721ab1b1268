use super::*;
use crate::solver::core::linesearch::{LineSearch, LineSearchMethod, LineSearcher};
use crate::solver::core::traits::MeritFunction;
use crate::solver::core::{SolveStage, SolverError};
use crate::solver::implementations::default::*;

fn settings_for(method: LineSearchMethod) -> DefaultSettings<f64> {
    DefaultSettingsBuilder::default()
        .line_search_method(method)
        .build()
        .unwrap()
}

fn run_search(method: LineSearchMethod) {
    let mut rng = rng();
    let (A, b, c, cones) = mixed_problem(&mut rng, 3);
    let model = ResidualModel::new(ConstraintOperator::Sparse(&A), &b, &c, &cones, None);
    let n = model.dim();

    let z = randvec(&mut rng, n);
    let mut g = vec![0.; n];
    let loss = model.gradient(&mut g, &z).unwrap();
    let mut d = g.clone();
    d.negate();

    let settings = settings_for(method);
    let mut ls = LineSearcher::new(&settings);
    let mut znext = vec![0.; n];
    let mut gnext = vec![0.; n];
    let step = ls
        .get_next(&model, &z, loss, &g, &d, &mut znext, &mut gnext)
        .unwrap();

    assert!(step.step > 0.);
    assert!(step.loss < loss);

    // the returned point and loss agree with the step
    let mut expected = z.clone();
    expected.axpby(step.step, &d, 1.);
    assert!(expected.norm_inf_diff(&znext) < 1e-14);
    assert!((model.loss(&znext).unwrap() - step.loss).abs() < 1e-12);

    if step.has_gradient {
        let mut gtrue = vec![0.; n];
        model.gradient(&mut gtrue, &znext).unwrap();
        assert!(gtrue.norm_inf_diff(&gnext) < 1e-12);
    }

    // sufficient decrease, except for the grid searches which only
    // pick the best candidate
    let slope = g.dot(&d);
    if matches!(
        method,
        LineSearchMethod::Backtracking | LineSearchMethod::StrongWolfe
    ) {
        assert!(step.loss <= loss + settings.linesearch_armijo * step.step * slope);
    }
    if method == LineSearchMethod::StrongWolfe {
        assert!(step.has_gradient);
        assert!(gnext.dot(&d).abs() <= settings.linesearch_curvature * slope.abs());
    }

    assert_eq!(ls.stats().calls, 1);
    assert!(ls.stats().loss_evaluations >= 1);
}

#[test]
fn backtracking_decreases_loss() {
    run_search(LineSearchMethod::Backtracking);
}

#[test]
fn linspace_grid_decreases_loss() {
    run_search(LineSearchMethod::LinSpaceGrid);
}

#[test]
fn logspace_grid_decreases_loss() {
    run_search(LineSearchMethod::LogSpaceGrid);
}

#[test]
fn strong_wolfe_conditions_hold() {
    run_search(LineSearchMethod::StrongWolfe);
}

#[test]
fn ascent_direction_is_rejected() {
    let mut rng = rng();
    let (A, b, c, cones) = mixed_problem(&mut rng, 3);
    let model = ResidualModel::new(ConstraintOperator::Sparse(&A), &b, &c, &cones, None);
    let n = model.dim();

    let z = randvec(&mut rng, n);
    let mut g = vec![0.; n];
    let loss = model.gradient(&mut g, &z).unwrap();

    let settings = settings_for(LineSearchMethod::Backtracking);
    let mut ls = LineSearcher::new(&settings);
    let mut znext = vec![0.; n];
    let mut gnext = vec![0.; n];
    let result = ls.get_next(&model, &z, loss, &g, &g, &mut znext, &mut gnext);
    assert!(matches!(
        result,
        Err(SolverError::PreconditionViolation {
            stage: SolveStage::LineSearch,
            ..
        })
    ));
}
