//! Traits at the seams between the solver's core loop and a concrete
//! problem format.
//!
//! The [Default solver implementation](crate::solver::implementations::default)
//! provides types implementing all of these for the problem format
//! described in the top level crate documentation.

use super::{CoreSettings, IterationSummary, SolverError, SolverStatus};
use crate::algebra::*;

/// A smooth least squares merit function minimized by the core loop.
///
/// Points are flat vectors of length [`dim`](MeritFunction::dim).  The
/// Hessian is returned as a matrix-free operator bound to the point at
/// which it was evaluated.

pub trait MeritFunction<T: FloatT> {
    type Hessian<'a>: LinearOperator<T>
    where
        Self: 'a;

    /// Number of optimization variables.
    fn dim(&self) -> usize;

    /// Number of constraint rows.  Used to normalize the gradient
    /// in the convergence test.
    fn nconstraints(&self) -> usize;

    /// Loss at the point `z`.
    fn loss(&self, z: &[T]) -> Result<T, SolverError>;

    /// Writes the gradient at `z` into `g` and returns the loss.
    fn gradient(&self, g: &mut [T], z: &[T]) -> Result<T, SolverError>;

    /// Generalized Hessian at `z`.
    fn hessian(&self, z: &[T]) -> Result<Self::Hessian<'_>, SolverError>;
}

/// Printing functions for the solver's Info

pub trait InfoPrint<T>
where
    T: FloatT,
{
    type D;
    type C;

    /// Print the solver configuration, e.g. settings etc.
    /// This function is called once at the start of the solve.
    fn print_configuration(
        &mut self,
        settings: &CoreSettings<T>,
        data: &Self::D,
        cones: &Self::C,
    ) -> std::io::Result<()>;

    /// Print a header to appear at the top of progress information.
    fn print_status_header(&mut self, settings: &CoreSettings<T>) -> std::io::Result<()>;

    /// Print solver progress information.   Called once per iteration.
    fn print_status(&mut self, settings: &CoreSettings<T>) -> std::io::Result<()>;

    /// Print solver final status and other exit information.   Called at
    /// solver termination.
    fn print_footer(&mut self, settings: &CoreSettings<T>) -> std::io::Result<()>;
}

/// Progress information recorded by the core loop.

pub trait Info<T>: InfoPrint<T>
where
    T: FloatT,
{
    /// Record the state at the end of an outer iteration
    fn save_iteration(&mut self, summary: &IterationSummary<T>);

    /// Report or update termination status
    fn get_status(&self) -> SolverStatus;
    fn set_status(&mut self, status: SolverStatus);
}
