use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by sparse matrix assembly operations.
pub enum SparseFormatError {
    /// Matrix dimension fields and/or array lengths are incompatible
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    #[error("Row value exceeds the matrix row dimension or is out of order")]
    /// Row value exceeds the matrix row dimension
    BadRowval,
    #[error("Bad column pointer values")]
    /// Matrix column pointer values are defective
    BadColptr,
}

/// Error type returned by dense factorization routines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DenseFactorizationError {
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    /// The matrix is not positive definite.  Carries the failing pivot.
    #[error("Cholesky factorization failed at pivot {0}")]
    Cholesky(usize),
    /// A triangular solve met a zero diagonal entry.
    #[error("Singular triangular factor at index {0}")]
    Singular(usize),
}

/// Error type returned by the iterative linear solvers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IterativeSolverError {
    /// A product with the operator produced a non-finite curvature value
    #[error("Non-finite curvature at iteration {0}")]
    NonFiniteCurvature(usize),
    /// Operator is not positive definite along a search direction
    #[error("Non-positive curvature at iteration {0}")]
    NonPositiveCurvature(usize),
    /// Iteration limit reached before the residual tolerance was met
    #[error("Iteration limit reached after {0} iterations")]
    MaxIterations(usize),
}
