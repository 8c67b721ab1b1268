#![allow(non_snake_case)]

use crate::algebra::*;

/// Summary of an [`lsqr`](crate::algebra::lsqr) solve.
#[derive(Debug, Clone, Copy)]
pub struct LsqrInfo<T> {
    pub iterations: usize,
    /// estimate of `‖b - op*x‖`
    pub residual_norm: T,
    /// true if a stopping test was met before the iteration limit
    pub converged: bool,
}

/// Least squares solve of `op*x ≈ b` by the method of Paige and Saunders.
///
/// The operator may be rectangular, non-symmetric or rank deficient.  On
/// entry `x` holds the starting point.  Stops when
/// `‖r‖ ≤ btol*‖b‖ + atol*‖op‖*‖x‖`, when `‖op'*r‖ ≤ atol*‖op‖*‖r‖`, or
/// after `maxiter` iterations.

pub fn lsqr<T, Op>(op: &Op, b: &[T], x: &mut [T], atol: T, btol: T, maxiter: usize) -> LsqrInfo<T>
where
    T: FloatT,
    Op: LinearOperator<T> + ?Sized,
{
    let (m, n) = op.size();
    assert_eq!(b.len(), m);
    assert_eq!(x.len(), n);

    let bnorm = b.norm();

    // u = b - op*x
    let mut u = b.to_vec();
    op.matvec(&mut u, x, -T::one(), T::one());
    let mut β = u.norm();
    if β > T::zero() {
        u.scale(β.recip());
    }

    let mut v = vec![T::zero(); n];
    op.rmatvec(&mut v, &u, T::one(), T::zero());
    let mut α = v.norm();
    if α > T::zero() {
        v.scale(α.recip());
    }

    let mut info = LsqrInfo {
        iterations: 0,
        residual_norm: β,
        converged: false,
    };
    if α * β == T::zero() {
        // starting point is already a least squares solution
        info.converged = true;
        return info;
    }

    let mut w = v.clone();
    let mut ϕbar = β;
    let mut ρbar = α;
    let mut anorm2 = T::zero();

    for itn in 1..=maxiter {
        info.iterations = itn;

        // bidiagonalization step
        op.matvec(&mut u, &v, T::one(), -α);
        β = u.norm();
        if β > T::zero() {
            u.scale(β.recip());
        }
        anorm2 += α * α + β * β;

        op.rmatvec(&mut v, &u, T::one(), -β);
        let α_next = v.norm();
        if α_next > T::zero() {
            v.scale(α_next.recip());
        }

        // plane rotation eliminating the subdiagonal
        let ρ = T::hypot(ρbar, β);
        if ρ == T::zero() {
            info.converged = true;
            break;
        }
        let c = ρbar / ρ;
        let s = β / ρ;
        let θ = s * α_next;
        ρbar = -c * α_next;
        let ϕ = c * ϕbar;
        ϕbar *= s;

        x.axpby(ϕ / ρ, &w, T::one());
        // w = v - (θ/ρ)*w
        w.axpby(T::one(), &v, -θ / ρ);
        α = α_next;

        let anorm = anorm2.sqrt();
        let rnorm = ϕbar;
        let arnorm = α * c.abs() * ϕbar;
        info.residual_norm = rnorm;

        if rnorm <= btol * bnorm + atol * anorm * x.norm() || arnorm <= atol * anorm * rnorm {
            info.converged = true;
            break;
        }
    }
    info
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lsqr_square_nonsymmetric() {
        let A = Matrix::from(&[[2., 1., 0.], [-1., 3., 1.], [0., 2., 4.]]);
        let xtrue = [1., -1., 0.5];
        let mut b = vec![0.; 3];
        A.matvec(&mut b, &xtrue, 1., 0.);

        let mut x = vec![0.; 3];
        let info = lsqr(&A, &b, &mut x, 1e-14, 1e-14, 50);
        assert!(info.converged);
        assert!(x.norm_inf_diff(&xtrue) < 1e-8);
    }

    #[test]
    fn test_lsqr_overdetermined() {
        // least squares line fit through (0,1), (1,2), (2,2)
        let A = Matrix::from(&[[1., 0.], [1., 1.], [1., 2.]]);
        let b = [1., 2., 2.];
        let mut x = vec![0.; 2];
        lsqr(&A, &b, &mut x, 1e-14, 1e-14, 50);

        // normal equations give intercept 7/6 and slope 1/2
        assert!(f64::abs(x[0] - 7. / 6.) < 1e-8);
        assert!(f64::abs(x[1] - 0.5) < 1e-8);
    }

    #[test]
    fn test_lsqr_zero_rhs() {
        let A = Matrix::from(&[[1., 2.], [3., 4.]]);
        let mut x = vec![0.; 2];
        let info = lsqr(&A, &[0., 0.], &mut x, 1e-10, 1e-10, 10);
        assert_eq!(info.iterations, 0);
        assert_eq!(x, vec![0., 0.]);
    }
}
