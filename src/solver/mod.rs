//! conicls solver main module.
//!
//! This module contains the main types and traits for the solver.
//!
//! The solver comes with a [default implementation](crate::solver::implementations::default)
//! for problems in the standard format described in the top level
//! [API page](crate).
//!
//! The core Newton loop only sees a [`MeritFunction`](crate::solver::core::traits::MeritFunction)
//! and an [`Info`](crate::solver::core::traits::Info) recorder, so other
//! problem formats can be supported by implementing those
//! [traits](crate::solver::core::traits).

// internal module structure
pub(crate) mod core;
pub mod implementations;

//Here we expose only part of the solver internals
//and rearrange public modules a bit to give a more
//user friendly API

//allows declaration of cone constraints
pub use crate::solver::core::cones::{SupportedConeT, SupportedConeT::*};

//status and error reporting
pub use crate::solver::core::{
    ProblemDataError, SettingsError, SolveStage, SolverError, SolverStatus,
};

//strategy selection and statistics for the inner solvers
pub use crate::solver::core::direction::{DirectionMethod, DirectionStats};
pub use crate::solver::core::linesearch::{LineSearchMethod, LineSearchStats};

//user facing traits required to define new implementations
pub use crate::solver::core::traits;
pub use crate::solver::core::CoreSettings;

//redirection of verbose output
pub use crate::io::ConfigurablePrintTarget;

//If we have implementations for multiple alternative
//problem formats, they would live here.   Since we
//only have default, it is exposed at the top level
//in the use statements directly below instead.

pub use crate::solver::implementations::default;
pub use crate::solver::implementations::default::*;

//configure tests of internals
#[cfg(test)]
mod tests;
