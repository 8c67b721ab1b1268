//! Step length selection along a Newton direction.
//!
//! All line searchers share one guarantee: the loss they return is finite
//! and no larger than the loss at the current point.  A searcher that
//! cannot meet its acceptance rule raises an error rather than returning
//! a degraded point.

use super::traits::MeritFunction;
use super::{CoreSettings, SolveStage, SolverError};
use crate::algebra::*;

mod backtracking;
mod grid;
mod strongwolfe;
pub use backtracking::*;
pub use grid::*;
pub use strongwolfe::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Method used to select step lengths.
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LineSearchMethod {
    /// Armijo backtracking from a fixed initial step
    #[default]
    Backtracking,
    /// Best of evenly spaced steps in `[0, max_step]`
    LinSpaceGrid,
    /// Best of logarithmically spaced steps in `[min_step, max_step]`
    LogSpaceGrid,
    /// Bracketing and zoom to the strong Wolfe conditions
    StrongWolfe,
}

/// Counters accumulated by a line searcher over one solve.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineSearchStats {
    pub calls: usize,
    pub loss_evaluations: usize,
    pub gradient_evaluations: usize,
}

/// Outcome of a line search.
///
/// The accepted point is written to the caller's `next_point` buffer.  If
/// `has_gradient` is set, the gradient there has been written to
/// `next_gradient` as well.
#[derive(Debug, Clone, Copy)]
pub struct LineSearchStep<T> {
    pub step: T,
    pub loss: T,
    pub has_gradient: bool,
}

pub trait LineSearch<T: FloatT> {
    #[allow(clippy::too_many_arguments)]
    fn get_next<M: MeritFunction<T>>(
        &mut self,
        model: &M,
        point: &[T],
        loss: T,
        gradient: &[T],
        direction: &[T],
        next_point: &mut [T],
        next_gradient: &mut [T],
    ) -> Result<LineSearchStep<T>, SolverError>;

    fn stats(&self) -> &LineSearchStats;
}

/// The configured line search strategy.
pub enum LineSearcher<T: FloatT> {
    Backtracking(Backtracking<T>),
    Grid(GridSearch<T>),
    StrongWolfe(StrongWolfe<T>),
}

impl<T> LineSearcher<T>
where
    T: FloatT,
{
    pub fn new(settings: &CoreSettings<T>) -> Self {
        match settings.line_search_method {
            LineSearchMethod::Backtracking => {
                LineSearcher::Backtracking(Backtracking::new(settings))
            }
            LineSearchMethod::LinSpaceGrid => {
                LineSearcher::Grid(GridSearch::new_linspace(settings))
            }
            LineSearchMethod::LogSpaceGrid => {
                LineSearcher::Grid(GridSearch::new_logspace(settings))
            }
            LineSearchMethod::StrongWolfe => LineSearcher::StrongWolfe(StrongWolfe::new(settings)),
        }
    }
}

impl<T> LineSearch<T> for LineSearcher<T>
where
    T: FloatT,
{
    fn get_next<M: MeritFunction<T>>(
        &mut self,
        model: &M,
        point: &[T],
        loss: T,
        gradient: &[T],
        direction: &[T],
        next_point: &mut [T],
        next_gradient: &mut [T],
    ) -> Result<LineSearchStep<T>, SolverError> {
        match self {
            LineSearcher::Backtracking(ls) => ls.get_next(
                model,
                point,
                loss,
                gradient,
                direction,
                next_point,
                next_gradient,
            ),
            LineSearcher::Grid(ls) => ls.get_next(
                model,
                point,
                loss,
                gradient,
                direction,
                next_point,
                next_gradient,
            ),
            LineSearcher::StrongWolfe(ls) => ls.get_next(
                model,
                point,
                loss,
                gradient,
                direction,
                next_point,
                next_gradient,
            ),
        }
    }

    fn stats(&self) -> &LineSearchStats {
        match self {
            LineSearcher::Backtracking(ls) => ls.stats(),
            LineSearcher::Grid(ls) => ls.stats(),
            LineSearcher::StrongWolfe(ls) => ls.stats(),
        }
    }
}

// directional derivative gᵀd, which must be strictly negative
pub(crate) fn descent_slope<T: FloatT>(gradient: &[T], direction: &[T]) -> Result<T, SolverError> {
    let slope = gradient.dot(direction);
    if slope < T::zero() {
        Ok(slope)
    } else {
        Err(SolverError::PreconditionViolation {
            stage: SolveStage::LineSearch,
            reason: format!("not a descent direction, slope {:e}", slope),
        })
    }
}

pub(crate) fn no_convergence() -> SolverError {
    SolverError::NumericalNonConvergence {
        stage: SolveStage::LineSearch,
        iteration: 0,
    }
}
