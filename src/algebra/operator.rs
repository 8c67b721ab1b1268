use crate::algebra::*;

/// Matrix-free linear operator.
///
/// The iterative solvers in this module only ever touch a matrix through
/// products with it and its adjoint, so anything implementing this trait
/// can be handed to [`cg`](crate::algebra::cg) or
/// [`lsqr`](crate::algebra::lsqr) without being assembled.

pub trait LinearOperator<T: FloatT>: ShapedMatrix {
    /// Produces `y = a*op*x + b*y`
    fn matvec(&self, y: &mut [T], x: &[T], a: T, b: T);

    /// Produces `y = a*op'*x + b*y`
    fn rmatvec(&self, y: &mut [T], x: &[T], a: T, b: T);
}

impl<T: FloatT> LinearOperator<T> for CscMatrix<T> {
    fn matvec(&self, y: &mut [T], x: &[T], a: T, b: T) {
        self.gemv(y, x, a, b);
    }
    fn rmatvec(&self, y: &mut [T], x: &[T], a: T, b: T) {
        self.t().gemv(y, x, a, b);
    }
}

impl<T: FloatT> LinearOperator<T> for Matrix<T> {
    fn matvec(&self, y: &mut [T], x: &[T], a: T, b: T) {
        self.gemv(y, x, a, b);
    }
    fn rmatvec(&self, y: &mut [T], x: &[T], a: T, b: T) {
        self.t().gemv(y, x, a, b);
    }
}

// Produces `y = a*work + b*y`, treating `b == 0` as an overwrite so that
// stale values (including NaNs) in `y` are discarded.
pub(crate) fn accumulate_product<T: FloatT>(y: &mut [T], work: &[T], a: T, b: T) {
    if b == T::zero() {
        y.scalarop_from(|w| a * w, work);
    } else {
        y.axpby(a, work, b);
    }
}
