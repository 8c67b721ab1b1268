#![allow(non_snake_case)]

use crate::algebra::*;

/// Conjugate gradient solve of `op*x = b` for a symmetric positive
/// definite operator.
///
/// On entry `x` holds the starting point.  Iteration stops once
/// `‖b - op*x‖ ≤ rtol*‖b‖` and returns the number of iterations taken.
/// Fails if a search direction has non-positive or non-finite curvature,
/// or if `maxiter` iterations pass without meeting the tolerance.

pub fn cg<T, Op>(
    op: &Op,
    b: &[T],
    x: &mut [T],
    rtol: T,
    maxiter: usize,
) -> Result<usize, IterativeSolverError>
where
    T: FloatT,
    Op: LinearOperator<T> + ?Sized,
{
    let n = b.len();
    assert_eq!(x.len(), n);
    assert_eq!(op.size(), (n, n));

    let bnorm = b.norm();
    if bnorm == T::zero() {
        x.fill(T::zero());
        return Ok(0);
    }
    let tol = rtol * bnorm;

    // r = b - op*x
    let mut r = b.to_vec();
    op.matvec(&mut r, x, -T::one(), T::one());
    let mut p = r.clone();
    let mut Ap = vec![T::zero(); n];
    let mut rs = r.sumsq();

    if rs.sqrt() <= tol {
        return Ok(0);
    }

    for k in 0..maxiter {
        op.matvec(&mut Ap, &p, T::one(), T::zero());
        let pAp = p.dot(&Ap);
        if !pAp.is_finite() {
            return Err(IterativeSolverError::NonFiniteCurvature(k));
        }
        if pAp <= T::zero() {
            return Err(IterativeSolverError::NonPositiveCurvature(k));
        }

        let α = rs / pAp;
        x.axpby(α, &p, T::one());
        r.axpby(-α, &Ap, T::one());
        let rs_new = r.sumsq();

        if rs_new.sqrt() <= tol {
            return Ok(k + 1);
        }

        // p = r + β*p
        p.axpby(T::one(), &r, rs_new / rs);
        rs = rs_new;
    }

    Err(IterativeSolverError::MaxIterations(maxiter))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cg_spd() {
        let A = Matrix::from(&[[4., 1., 0.], [1., 3., -1.], [0., -1., 2.]]);
        let xtrue = [1., 2., -1.];
        let mut b = vec![0.; 3];
        A.matvec(&mut b, &xtrue, 1., 0.);

        let mut x = vec![0.; 3];
        let iters = cg(&A, &b, &mut x, 1e-12, 30).unwrap();
        assert!(iters <= 3 + 1);
        assert!(x.norm_inf_diff(&xtrue) < 1e-9);

        // warm start at the solution needs no work
        let iters = cg(&A, &b, &mut x, 1e-6, 30).unwrap();
        assert_eq!(iters, 0);
    }

    #[test]
    fn test_cg_indefinite() {
        let A = Matrix::from(&[[1., 0.], [0., -1.]]);
        let mut x = vec![0.; 2];
        let out = cg(&A, &[0., 1.], &mut x, 1e-10, 10);
        assert_eq!(out, Err(IterativeSolverError::NonPositiveCurvature(0)));
    }

    #[test]
    fn test_cg_maxiter() {
        let A = Matrix::from(&[[10., 0., 0.], [0., 1., 0.], [0., 0., 0.1]]);
        let mut x = vec![0.; 3];
        let out = cg(&A, &[1., 1., 1.], &mut x, 1e-14, 1);
        assert_eq!(out, Err(IterativeSolverError::MaxIterations(1)));
    }
}
