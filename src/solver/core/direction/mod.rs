//! Newton direction strategies for the outer loop.
//!
//! A direction calculator is built from settings at the start of every
//! solve and owns whatever memory it carries between outer iterations.

use super::traits::MeritFunction;
use super::{CoreSettings, SolveStage, SolverError};
use crate::algebra::*;
use std::cell::Cell;

mod cgnewton;
mod densenewton;
pub use cgnewton::*;
pub use densenewton::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Method used to compute Newton directions.
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DirectionMethod {
    /// Regularized inexact Newton step by conjugate gradients
    #[default]
    CgNewton,
    /// Regularized Newton step by dense Cholesky factorization
    DenseNewton,
}

/// Counters accumulated by a direction calculator over one solve.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DirectionStats<T> {
    pub calls: usize,
    /// inner iterations for each call
    pub cg_iterations: Vec<usize>,
    pub total_cg_iterations: usize,
    /// Hessian regularization used at each call
    pub regularizers: Vec<T>,
    /// products with the (unregularized) Hessian operator
    pub hessian_matvecs: usize,
}

/// Computes a descent direction `d` at `point` given the gradient there.
pub trait NewtonDirection<T: FloatT> {
    fn get_direction<M: MeritFunction<T>>(
        &mut self,
        d: &mut [T],
        model: &M,
        point: &[T],
        gradient: &[T],
    ) -> Result<(), SolverError>;

    fn stats(&self) -> &DirectionStats<T>;
}

/// The configured direction strategy.
pub enum DirectionCalculator<T: FloatT> {
    CgNewton(CgNewton<T>),
    DenseNewton(DenseNewton<T>),
}

impl<T> DirectionCalculator<T>
where
    T: FloatT,
{
    pub fn new(settings: &CoreSettings<T>) -> Self {
        match settings.direction_method {
            DirectionMethod::CgNewton => DirectionCalculator::CgNewton(CgNewton::new(settings)),
            DirectionMethod::DenseNewton => {
                DirectionCalculator::DenseNewton(DenseNewton::new(settings))
            }
        }
    }
}

impl<T> NewtonDirection<T> for DirectionCalculator<T>
where
    T: FloatT,
{
    fn get_direction<M: MeritFunction<T>>(
        &mut self,
        d: &mut [T],
        model: &M,
        point: &[T],
        gradient: &[T],
    ) -> Result<(), SolverError> {
        match self {
            DirectionCalculator::CgNewton(c) => c.get_direction(d, model, point, gradient),
            DirectionCalculator::DenseNewton(c) => c.get_direction(d, model, point, gradient),
        }
    }

    fn stats(&self) -> &DirectionStats<T> {
        match self {
            DirectionCalculator::CgNewton(c) => c.stats(),
            DirectionCalculator::DenseNewton(c) => c.stats(),
        }
    }
}

// Levenberg-Marquardt style shift, λ = max(floor, min(‖g‖^½, ‖g‖))
pub(crate) fn regularization<T: FloatT>(floor: T, gradient: &[T]) -> T {
    let gnorm = gradient.norm();
    T::max(floor, T::min(gnorm.sqrt(), gnorm))
}

// the larger shift max(floor, ‖g‖^½), retried when the inner solve
// fails at the regular one
pub(crate) fn fallback_regularization<T: FloatT>(floor: T, gradient: &[T]) -> T {
    T::max(floor, gradient.norm().sqrt())
}

// a direction is unusable if it is zero or has non-finite entries
pub(crate) fn check_direction<T: FloatT>(d: &[T]) -> Result<(), SolverError> {
    let reason = if !d.is_finite() {
        "non-finite Newton direction"
    } else if d.norm_inf() == T::zero() {
        "zero Newton direction"
    } else {
        return Ok(());
    };
    Err(SolverError::NumericalError {
        stage: SolveStage::DirectionCalculation,
        iteration: 0,
        reason: reason.to_string(),
    })
}

/// The operator `H + λI`, counting products with `H`.
pub struct RegularizedHessian<'a, T, H: ?Sized> {
    hess: &'a H,
    λ: T,
    matvecs: Cell<usize>,
}

impl<'a, T, H> RegularizedHessian<'a, T, H>
where
    T: FloatT,
    H: LinearOperator<T> + ?Sized,
{
    pub fn new(hess: &'a H, λ: T) -> Self {
        Self {
            hess,
            λ,
            matvecs: Cell::new(0),
        }
    }
    pub fn matvecs(&self) -> usize {
        self.matvecs.get()
    }
}

impl<T, H> ShapedMatrix for RegularizedHessian<'_, T, H>
where
    H: ShapedMatrix + ?Sized,
{
    fn nrows(&self) -> usize {
        self.hess.nrows()
    }
    fn ncols(&self) -> usize {
        self.hess.ncols()
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::N
    }
}

impl<T, H> LinearOperator<T> for RegularizedHessian<'_, T, H>
where
    T: FloatT,
    H: LinearOperator<T> + ?Sized,
{
    fn matvec(&self, y: &mut [T], x: &[T], a: T, b: T) {
        self.matvecs.set(self.matvecs.get() + 1);
        self.hess.matvec(y, x, a, b);
        y.axpby(a * self.λ, x, T::one());
    }

    // symmetric
    fn rmatvec(&self, y: &mut [T], x: &[T], a: T, b: T) {
        self.matvec(y, x, a, b);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_regularized_hessian() {
        let H = Matrix::from(&[[2., 1.], [1., 3.]]);
        let op = RegularizedHessian::new(&H, 0.5);
        let mut y = vec![1., 1.];
        op.matvec(&mut y, &[1., -1.], 2., 1.);
        assert_eq!(y, vec![4., -4.]);
        assert_eq!(op.matvecs(), 1);
    }

    #[test]
    fn test_regularization_schedule() {
        // ‖g‖ = 5, so the square root is the smaller shift
        assert_eq!(regularization(1e-3, &[3., 4.]), 5f64.sqrt());
        assert_eq!(fallback_regularization(1e-3, &[3., 4.]), 5f64.sqrt());

        // ‖g‖ = 5e-4 < 1, the shift follows ‖g‖ itself
        let g = [3e-4, 4e-4];
        assert!(f64::abs(regularization(1e-12, &g) - 5e-4) < 1e-15);
        assert!(f64::abs(fallback_regularization(1e-12, &g) - 5e-4f64.sqrt()) < 1e-15);

        // the floor wins at a stationary point
        assert_eq!(regularization(1e-3, &[0., 0.]), 1e-3);
        assert_eq!(fallback_regularization(1e-3, &[0., 0.]), 1e-3);
    }

    #[test]
    fn test_check_direction() {
        assert!(check_direction(&[0., 0.]).is_err());
        assert!(check_direction(&[0., f64::NAN]).is_err());
        assert!(check_direction(&[0., 1e-30]).is_ok());
    }
}
