//! Conicls algebra module.
//!
//! __NB__: Users will not ordinarily need to interact with this module.
//!
//! This module implements the vector and matrix operations used internally by
//! the solver: slice arithmetic, compressed sparse column matrices, a small set
//! of dense factorizations and the matrix-free iterative solvers (conjugate
//! gradients and LSQR) that drive the Newton and refinement stages.
//!
//! All operations are written generically over [`FloatT`](crate::algebra::FloatT).

// first import and flatten the solver's collection
// of core numeric types and matrix / vector traits.

mod adjoint;
mod error_types;
mod floats;
mod math_traits;
mod matrix_traits;
mod matrix_types;
mod operator;
mod scalarmath;
mod vecmath;

pub use adjoint::*;
pub use error_types::*;
pub use floats::*;
pub use math_traits::*;
pub use matrix_traits::*;
pub use matrix_types::*;
pub use operator::*;
pub use scalarmath::*;
pub use vecmath::*;

// sparse and dense matrix implementations, plus the
// iterative solvers built on the operator trait
mod csc;
mod dense;
mod iterative;

pub use csc::*;
pub use dense::*;
pub use iterative::*;

