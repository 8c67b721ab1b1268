mod cholesky;
mod core;
mod qr;
pub use cholesky::*;
pub use qr::*;
