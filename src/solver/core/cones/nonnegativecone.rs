use super::*;
use crate::algebra::*;
use core::marker::PhantomData;

// -------------------------------------
// Nonnegative Cone
// -------------------------------------

/// The nonnegative orthant.  It is self dual.
pub struct NonnegativeCone<T> {
    dim: usize,
    phantom: PhantomData<T>,
}

impl<T> NonnegativeCone<T>
where
    T: FloatT,
{
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            phantom: PhantomData,
        }
    }
}

impl<T> Cone<T> for NonnegativeCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.dim
    }

    fn rectify_equilibration(&mut self, _e: &[T]) {
        //positive scalings preserve the orthant
    }

    fn project(&self, x: &mut [T], _pd: PrimalOrDualCone) -> Result<(), ConeError> {
        x.scalarop(|v| T::max(v, T::zero()));
        Ok(())
    }

    fn projection_jacobian(
        &self,
        x: &[T],
        _pd: PrimalOrDualCone,
    ) -> Result<ProjectionJacobian<T>, ConeError> {
        let mask = x
            .iter()
            .map(|&v| if v > T::zero() { T::one() } else { T::zero() })
            .collect();
        Ok(ProjectionJacobian::Diagonal(mask))
    }
}
