#![allow(non_snake_case)]

mod equilibration;
mod info;
mod info_print;
mod model;
mod presolver;
mod problemdata;
mod refinement;
mod settings;
mod solution;
mod solver;

#[cfg(feature = "serde")]
mod json;

//export flattened
pub use equilibration::*;
pub use info::*;
pub use model::*;
pub use presolver::*;
pub use problemdata::*;
pub use refinement::*;
pub use settings::*;
pub use solution::*;
pub use solver::*;

#[cfg(feature = "serde")]
pub use json::*;
