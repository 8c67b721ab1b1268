#![allow(non_snake_case)]

use crate::algebra::FloatT;
use enum_dispatch::*;
use thiserror::Error;

//primitive cone types
mod nonnegativecone;
mod socone;
mod zerocone;

//the supported cone wrapper type for primitives
//and the composite cone
mod compositecone;
mod supportedcone;

//derivatives of the projection operators
mod jacobian;

//flatten all cone implementations to appear in this module
pub use compositecone::*;
pub use jacobian::*;
pub use nonnegativecone::*;
pub use socone::*;
pub use supportedcone::*;
pub use zerocone::*;

// marker for primal / dual distinctions
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
pub enum PrimalOrDualCone {
    PrimalCone,
    DualCone,
}

/// Error type returned by cone operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConeError {
    /// The boundary multiplier of a scaled second order cone
    /// projection could not be located.
    #[error("Cone projection root find failed after {iterations} iterations")]
    RootFindingFailure { iterations: usize },
}

#[enum_dispatch]
pub trait Cone<T>
where
    T: FloatT,
{
    // number of rows the cone occupies
    fn numel(&self) -> usize;

    // absorbs a positive row scaling `e` of this cone's block, so that
    // `s ∈ K` if and only if `e ⊙ s` is in the updated cone
    fn rectify_equilibration(&mut self, e: &[T]);

    // in place Euclidean projection onto the cone or its dual
    fn project(&self, x: &mut [T], pd: PrimalOrDualCone) -> Result<(), ConeError>;

    // derivative of the projection evaluated at `x`
    fn projection_jacobian(
        &self,
        x: &[T],
        pd: PrimalOrDualCone,
    ) -> Result<ProjectionJacobian<T>, ConeError>;
}
