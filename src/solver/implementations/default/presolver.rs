#![allow(non_snake_case)]
use crate::algebra::*;
use crate::solver::core::{SolveStage, SolverError};
use log::info;

// ---------------
// QR nullspace presolve
// ---------------

/// Nullspace reduction of the dual equality constraints.
///
/// With `A*P = Q*R` and `r = rank(A)`, write `Q = [Q1 N]`.  The primal
/// variable is replaced by `x̃ = R11*x[P][:r]`, so that `A*x = Q1*x̃`,
/// and every dual satisfying `A'y + c = 0` is `y = y0 + N*w` with
/// `y0 = -Q1*c̃` and `c̃ = R11⁻ᵀ*(P'c)[:r]`.  The right hand side is
/// normalized by `σ = ‖b‖`.

pub struct Presolver<T> {
    /// factorization of the equilibrated constraint matrix
    pub qr: QRFactorization<T>,
    /// right hand side normalization
    pub σ: T,
    /// orthonormal basis for the left nullspace of `A` (m x (m-r))
    pub N: Matrix<T>,
    /// base dual point
    pub y0: Vec<T>,
}

/// Problem data after the reduction
pub struct ReducedProblem<T> {
    /// orthonormal range basis `Q1` (m x r)
    pub A: Matrix<T>,
    pub b: Vec<T>,
    pub c: Vec<T>,
}

impl<T> Presolver<T>
where
    T: FloatT,
{
    /// Factors `A` and builds the reduced problem.  Fails with
    /// `InfeasibilityDetected` if `A'y = -c` has no solution.
    pub fn new(
        A: &CscMatrix<T>,
        b: &[T],
        c: &[T],
    ) -> Result<(Self, ReducedProblem<T>), SolverError> {
        let (m, n) = A.size();
        let qr = QRFactorization::new(&A.to_dense());
        let r = qr.rank;

        // P'c
        let pc: Vec<T> = qr.perm.iter().map(|&j| c[j]).collect();

        let mut cr = pc[..r].to_vec();
        qr.solve_r11_transpose(&mut cr)
            .map_err(|e| SolverError::NumericalError {
                stage: SolveStage::Presolve,
                iteration: 0,
                reason: e.to_string(),
            })?;

        // the trailing columns must also satisfy R12'c̃ = (P'c)[r:]
        let tol = T::epsilon().sqrt() * (T::one() + c.norm_inf());
        for j in r..n {
            let lhs = (0..r).fold(T::zero(), |acc, i| acc + qr.R[(i, j)] * cr[i]);
            if (lhs - pc[j]).abs() > tol {
                info!("presolve: A'y = -c is inconsistent at column {}", qr.perm[j]);
                return Err(SolverError::InfeasibilityDetected {
                    stage: SolveStage::Presolve,
                });
            }
        }

        let Q1 = qr.Q.leading_columns(r);
        let N = qr.Q.trailing_columns(r);

        let bnorm = b.norm();
        let σ = if bnorm > T::zero() { bnorm } else { T::one() };
        let mut br = b.to_vec();
        br.scale(σ.recip());

        let mut y0 = vec![T::zero(); m];
        Q1.gemv(&mut y0, &cr, -T::one(), T::zero());

        info!("presolve: rank {} of {} columns, nullspace dimension {}", r, n, m - r);

        let presolver = Self { qr, σ, N, y0 };
        let reduced = ReducedProblem {
            A: Q1,
            b: br,
            c: cr,
        };
        Ok((presolver, reduced))
    }

    pub fn rank(&self) -> usize {
        self.qr.rank
    }

    /// Dimension of the nullspace variable
    pub fn nullity(&self) -> usize {
        self.N.ncols()
    }

    /// `y = y0 + N*w`
    pub fn dual_from_nullspace(&self, y: &mut [T], w: &[T]) {
        y.copy_from(&self.y0);
        self.N.gemv(y, w, T::one(), T::one());
    }

    /// Maps a reduced solution back to the equilibrated problem.  The
    /// primal variable is `x[P] = σ*[R11⁻¹x̃; 0]` and slacks are rescaled
    /// by `σ`.
    pub fn reverse_solution(&self, xr: &[T], s: &mut [T]) -> Result<Vec<T>, SolverError> {
        let n = self.qr.perm.len();
        let mut x1 = xr.to_vec();
        self.qr
            .solve_r11(&mut x1)
            .map_err(|e| SolverError::NumericalError {
                stage: SolveStage::Presolve,
                iteration: 0,
                reason: e.to_string(),
            })?;

        let mut x = vec![T::zero(); n];
        for (j, v) in x1.iter().enumerate() {
            x[self.qr.perm[j]] = *v * self.σ;
        }
        s.scale(self.σ);
        Ok(x)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_presolve_rank_deficient() {
        // column 2 is column 0 plus column 1
        let A = CscMatrix::from(&[[1., 0., 1.], [0., 1., 1.], [1., 1., 2.], [2., -1., 1.]]);
        let b = vec![1., 2., 3., 4.];
        // c in the row space of A, so the duals exist
        let c = vec![1., 1., 2.];

        let (pre, red) = Presolver::new(&A, &b, &c).unwrap();
        assert_eq!(pre.rank(), 2);
        assert_eq!(pre.nullity(), 2);
        assert!(f64::abs(red.b.norm() - 1.) < 1e-12);

        // every y0 + N*w solves A'y + c = 0
        let mut y = vec![0.; 4];
        pre.dual_from_nullspace(&mut y, &[0.3, -1.2]);
        let mut r = c.clone();
        A.t().gemv(&mut r, &y, 1., 1.);
        assert!(r.norm_inf() < 1e-12);

        // Q1*x̃ maps back to A*x
        let xr = vec![0.5, -0.25];
        let mut s = red.b.clone();
        red.A.gemv(&mut s, &xr, -1., 1.);
        let x = pre.reverse_solution(&xr, &mut s).unwrap();
        let mut s_full = b.clone();
        A.gemv(&mut s_full, &x, -1., 1.);
        assert!(s_full.norm_inf_diff(&s) < 1e-12);
    }

    #[test]
    fn test_presolve_dual_infeasible() {
        let A = CscMatrix::from(&[[1., 1.], [2., 2.]]);
        let b = vec![1., 1.];
        // A'y = -c requires equal entries in c
        let c = vec![1., 0.];
        assert!(matches!(
            Presolver::new(&A, &b, &c),
            Err(SolverError::InfeasibilityDetected {
                stage: SolveStage::Presolve
            })
        ));
    }
}
