use super::cones::ConeError;
use super::SolverStatus;
use crate::algebra::SparseFormatError;
use thiserror::Error;

/// The phase of a solve in which an error was raised.
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolveStage {
    Setup,
    Equilibration,
    Presolve,
    ConeProjection,
    DirectionCalculation,
    LineSearch,
    OptimizationLoop,
    Refinement,
}

impl std::fmt::Display for SolveStage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Error type for malformed problem data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProblemDataError {
    /// The constraint matrix is not a valid CSC matrix
    #[error(transparent)]
    BadMatrixFormat(#[from] SparseFormatError),
    /// Data contains NaN or infinite values
    #[error("Non-finite values in {0}")]
    NonFinite(&'static str),
    /// A second order cone scale is not finite and strictly positive
    #[error("Second order cone scale entries must be finite and strictly positive")]
    BadConeScale,
}

/// Error type returned by the solver.
///
/// Errors are fatal for the solve that raised them.  Each carries the
/// stage of the solve and, where relevant, the outer iteration at which
/// it occurred.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// An iterative process hit its iteration cap
    #[error("No convergence during {stage} at iteration {iteration}")]
    NumericalNonConvergence { stage: SolveStage, iteration: usize },
    /// Non-finite values, negative curvature or a failed factorization
    #[error("Numerical error during {stage} at iteration {iteration}: {reason}")]
    NumericalError {
        stage: SolveStage,
        iteration: usize,
        reason: String,
    },
    /// The boundary multiplier of a second order cone projection was not found
    #[error("Cone projection root find failed after {iterations} iterations")]
    RootFindingFailure { iterations: usize },
    /// The problem appears primal or dual infeasible.  Certificates
    /// are not extracted.
    #[error("Infeasibility detected during {stage}")]
    InfeasibilityDetected { stage: SolveStage },
    /// Inputs to some stage do not satisfy its requirements
    #[error("Precondition violated during {stage}: {reason}")]
    PreconditionViolation { stage: SolveStage, reason: String },
    /// Malformed problem data
    #[error("Bad problem data: {0}")]
    BadProblemData(#[from] ProblemDataError),
    /// The configured time limit was exceeded
    #[error("Time limit reached at iteration {iteration}")]
    TimeLimitReached { iteration: usize },
}

impl From<ConeError> for SolverError {
    fn from(e: ConeError) -> Self {
        match e {
            ConeError::RootFindingFailure { iterations } => {
                SolverError::RootFindingFailure { iterations }
            }
        }
    }
}

impl From<SparseFormatError> for SolverError {
    fn from(e: SparseFormatError) -> Self {
        SolverError::BadProblemData(e.into())
    }
}

impl SolverError {
    /// The stage that raised the error, if known
    pub fn stage(&self) -> Option<SolveStage> {
        match self {
            SolverError::NumericalNonConvergence { stage, .. }
            | SolverError::NumericalError { stage, .. }
            | SolverError::InfeasibilityDetected { stage }
            | SolverError::PreconditionViolation { stage, .. } => Some(*stage),
            SolverError::RootFindingFailure { .. } => Some(SolveStage::ConeProjection),
            SolverError::BadProblemData(_) => Some(SolveStage::Setup),
            SolverError::TimeLimitReached { .. } => Some(SolveStage::OptimizationLoop),
        }
    }

    /// The outer iteration at which the error was raised, if recorded
    pub fn iteration(&self) -> Option<usize> {
        match self {
            SolverError::NumericalNonConvergence { iteration, .. }
            | SolverError::NumericalError { iteration, .. }
            | SolverError::TimeLimitReached { iteration } => Some(*iteration),
            _ => None,
        }
    }

    /// Solver status reported for a solve that ended with this error
    pub fn status(&self) -> SolverStatus {
        match self {
            SolverError::NumericalNonConvergence {
                stage: SolveStage::OptimizationLoop,
                ..
            } => SolverStatus::MaxIterations,
            SolverError::NumericalNonConvergence { .. } => SolverStatus::InsufficientProgress,
            SolverError::InfeasibilityDetected { .. } => SolverStatus::Infeasible,
            SolverError::TimeLimitReached { .. } => SolverStatus::MaxTime,
            _ => SolverStatus::NumericalError,
        }
    }

    // fills in the outer iteration for errors raised below the loop
    pub(crate) fn at_iteration(mut self, iter: usize) -> Self {
        match &mut self {
            SolverError::NumericalNonConvergence { iteration, .. }
            | SolverError::NumericalError { iteration, .. }
            | SolverError::TimeLimitReached { iteration } => *iteration = iter,
            _ => {}
        }
        self
    }
}

#[test]
fn test_error_status_mapping() {
    let e = SolverError::NumericalNonConvergence {
        stage: SolveStage::OptimizationLoop,
        iteration: 1000,
    };
    assert_eq!(e.status(), SolverStatus::MaxIterations);
    assert_eq!(e.iteration(), Some(1000));

    let e = SolverError::NumericalNonConvergence {
        stage: SolveStage::LineSearch,
        iteration: 0,
    }
    .at_iteration(7);
    assert_eq!(e.status(), SolverStatus::InsufficientProgress);
    assert_eq!(e.iteration(), Some(7));

    let e: SolverError = ConeError::RootFindingFailure { iterations: 200 }.into();
    assert_eq!(e.stage(), Some(SolveStage::ConeProjection));
    assert_eq!(e.status(), SolverStatus::NumericalError);

    let e: SolverError = SparseFormatError::BadColptr.into();
    assert!(matches!(e, SolverError::BadProblemData(_)));
    assert_eq!(
        SolverError::InfeasibilityDetected {
            stage: SolveStage::Refinement
        }
        .status(),
        SolverStatus::Infeasible
    );
}
