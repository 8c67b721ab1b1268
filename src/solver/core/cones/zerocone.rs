use super::*;
use crate::algebra::*;
use core::marker::PhantomData;

// -------------------------------------
// Zero Cone
// -------------------------------------

/// The cone `{0}`.  Its dual is the whole space, so dual projection is
/// the identity.
pub struct ZeroCone<T: FloatT = f64> {
    dim: usize,
    phantom: PhantomData<T>,
}

impl<T> ZeroCone<T>
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

impl<T> Cone<T> for ZeroCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.dim
    }

    fn rectify_equilibration(&mut self, _e: &[T]) {
        //any scaling maps {0} to itself
    }

    fn project(&self, x: &mut [T], pd: PrimalOrDualCone) -> Result<(), ConeError> {
        if pd == PrimalOrDualCone::PrimalCone {
            x.fill(T::zero());
        }
        Ok(())
    }

    fn projection_jacobian(
        &self,
        _x: &[T],
        pd: PrimalOrDualCone,
    ) -> Result<ProjectionJacobian<T>, ConeError> {
        Ok(match pd {
            PrimalOrDualCone::PrimalCone => ProjectionJacobian::Zero(self.dim),
            PrimalOrDualCone::DualCone => ProjectionJacobian::Identity(self.dim),
        })
    }
}
