mod cg;
mod lsqr;
pub use cg::*;
pub use lsqr::*;
