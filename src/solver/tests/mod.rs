#![allow(non_snake_case)]

use crate::algebra::*;
use crate::solver::core::cones::{CompositeCone, SupportedConeT};
use rand::{rngs::StdRng, Rng, SeedableRng};

mod cones;
mod linesearch;

pub(crate) fn rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}

pub(crate) fn randvec(rng: &mut StdRng, n: usize) -> Vec<f64> {
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

// dense random m x n matrix, stored sparse
pub(crate) fn randmat(rng: &mut StdRng, m: usize, n: usize) -> CscMatrix<f64> {
    let data = randvec(rng, m * n);
    CscMatrix::from(&Matrix::new_from_slice((m, n), &data))
}

// one block of each cone type, 6 rows in total
pub(crate) fn mixed_problem(
    rng: &mut StdRng,
    n: usize,
) -> (CscMatrix<f64>, Vec<f64>, Vec<f64>, CompositeCone<f64>) {
    let specs = [
        SupportedConeT::ZeroConeT(1),
        SupportedConeT::NonnegativeConeT(2),
        SupportedConeT::SecondOrderConeT(vec![1.5, 0.5]),
    ];
    let A = randmat(rng, 6, n);
    let b = randvec(rng, 6);
    let c = randvec(rng, n);
    (A, b, c, CompositeCone::new(&specs))
}
