#![allow(non_snake_case)]
use super::*;
use crate::algebra::*;
use crate::solver::core::{
    cones::{CompositeCone, SupportedConeT},
    ProblemDataError, SolveStage, SolverError,
};

// ---------------
// Data type for default problem format
// ---------------

/// Equilibrated problem data for the standard solver implementation.
///
/// Holds scaled copies of `A`, `b` and `c` together with the scaling
/// needed to map solutions back.  Built once when the solver is created
/// and not modified by a solve.

pub struct DefaultProblemData<T> {
    pub A: CscMatrix<T>,
    pub b: Vec<T>,
    pub c: Vec<T>,
    pub n: usize,
    pub m: usize,
    pub equilibration: DefaultEquilibrationData<T>,

    // norms of the unscaled data
    pub normb: T,
    pub normc: T,
}

impl<T> DefaultProblemData<T>
where
    T: FloatT,
{
    /// Copies and equilibrates the problem.  Data is assumed to have
    /// passed [`check_problem_data`] already.
    pub fn new(
        A: &CscMatrix<T>,
        b: &[T],
        c: &[T],
        cones: &mut CompositeCone<T>,
        settings: &DefaultSettings<T>,
    ) -> Self {
        let (m, n) = A.size();
        let mut A = A.clone();
        let mut b = b.to_vec();
        let mut c = c.to_vec();
        let normb = b.norm_inf();
        let normc = c.norm_inf();

        let mut equilibration = DefaultEquilibrationData::<T>::new(n, m);
        equilibration.equilibrate(&mut A, &mut b, &mut c, cones, settings);

        Self {
            A,
            b,
            c,
            n,
            m,
            equilibration,
            normb,
            normc,
        }
    }
}

/// Checks problem data for format, dimension and value errors.
pub fn check_problem_data<T: FloatT>(
    A: &CscMatrix<T>,
    b: &[T],
    c: &[T],
    cone_specs: &[SupportedConeT<T>],
) -> Result<(), SolverError> {
    A.check_format()?;

    let bad_shape = |reason: String| SolverError::PreconditionViolation {
        stage: SolveStage::Setup,
        reason,
    };

    if b.len() != A.nrows() {
        return Err(bad_shape(format!(
            "b has length {}, A has {} rows",
            b.len(),
            A.nrows()
        )));
    }
    if c.len() != A.ncols() {
        return Err(bad_shape(format!(
            "c has length {}, A has {} columns",
            c.len(),
            A.ncols()
        )));
    }
    let conedims: usize = cone_specs.iter().map(|c| c.nvars()).sum();
    if conedims != A.nrows() {
        return Err(bad_shape(format!(
            "cone dimensions sum to {}, A has {} rows",
            conedims,
            A.nrows()
        )));
    }

    for (name, v) in [("A", &A.nzval[..]), ("b", b), ("c", c)] {
        if !v.is_finite() {
            return Err(ProblemDataError::NonFinite(name).into());
        }
    }

    for cone in cone_specs {
        if let SupportedConeT::SecondOrderConeT(scale) = cone {
            if scale.iter().any(|&a| !(a.is_finite() && a > T::zero())) {
                return Err(ProblemDataError::BadConeScale.into());
            }
        }
    }
    Ok(())
}

#[test]
fn test_check_problem_data() {
    use SupportedConeT::*;
    let A = CscMatrix::from(&[[1., 0.], [0., 1.], [1., 1.]]);
    let b = [1., 1., 1.];
    let c = [1., 1.];

    assert!(check_problem_data(&A, &b, &c, &[NonnegativeConeT(3)]).is_ok());
    assert!(check_problem_data(&A, &b, &c, &[ZeroConeT(1), SecondOrderConeT(vec![2.])]).is_ok());

    assert!(matches!(
        check_problem_data(&A, &b[..2], &c, &[NonnegativeConeT(3)]),
        Err(SolverError::PreconditionViolation { .. })
    ));
    assert!(matches!(
        check_problem_data(&A, &b, &c, &[NonnegativeConeT(2)]),
        Err(SolverError::PreconditionViolation { .. })
    ));
    assert_eq!(
        check_problem_data(&A, &[1., f64::NAN, 1.], &c, &[NonnegativeConeT(3)]),
        Err(SolverError::BadProblemData(ProblemDataError::NonFinite("b")))
    );
    assert_eq!(
        check_problem_data(&A, &b, &c, &[ZeroConeT(1), SecondOrderConeT(vec![-1.])]),
        Err(SolverError::BadProblemData(ProblemDataError::BadConeScale))
    );
}
