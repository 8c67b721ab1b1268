// package together all of the following and re-export
// in a partially flattened structure :
// : core component traits
// : cone traits and standard cone implementations
// : Newton direction and line search strategies
// : the outer minimization loop
// : user settings and errors

pub mod cones;
pub mod direction;
pub mod linesearch;
pub mod traits;

//partially flatten top level pieces

mod error;
mod minimize;
mod settings;
mod solver;
pub use direction::DirectionMethod;
pub use error::*;
pub use linesearch::LineSearchMethod;
pub use minimize::*;
pub use settings::*;
pub use solver::*;
