#![allow(non_snake_case)]

use crate::algebra::{AsFloatT, DenseFactorizationError, FloatT, Matrix, VectorMath};

/// Householder QR factorization with column pivoting.
///
/// For an m x n matrix `A` this computes `A[:,perm] = Q*R`, with `Q` a
/// complete m x m orthogonal matrix and `R` upper trapezoidal with
/// diagonal entries of non-increasing magnitude.  The numerical rank is
/// the number of diagonal entries of `R` above a relative threshold.
///
/// With `r = rank`, the leading `r` columns of `Q` span the range of `A`
/// and the trailing `m - r` columns span its left nullspace.

pub struct QRFactorization<T> {
    /// complete orthogonal factor (m x m)
    pub Q: Matrix<T>,
    /// upper trapezoidal factor (min(m,n) x n)
    pub R: Matrix<T>,
    /// column permutation, i.e. column `j` of `Q*R` is column `perm[j]` of `A`
    pub perm: Vec<usize>,
    /// numerical rank
    pub rank: usize,
}

impl<T> QRFactorization<T>
where
    T: FloatT,
{
    /// Factor `A`.  The rank threshold is `10*max(m,n)*ϵ*|R[0,0]|`.
    pub fn new(A: &Matrix<T>) -> Self {
        let (m, n) = (A.m, A.n);
        let kmax = usize::min(m, n);
        let mut W = A.clone();
        let mut perm: Vec<usize> = (0..n).collect();
        let mut reflectors: Vec<(Vec<T>, T)> = Vec::with_capacity(kmax);

        for k in 0..kmax {
            // pivot on the largest remaining column.  Norms are
            // recomputed each step rather than downdated.
            let (p, _) = (k..n).fold((k, -T::one()), |(best, bestnorm), j| {
                let nrm = W.col_slice(j)[k..].sumsq();
                if nrm > bestnorm {
                    (j, nrm)
                } else {
                    (best, bestnorm)
                }
            });
            if p != k {
                swap_columns(&mut W, k, p);
                perm.swap(k, p);
            }

            let x = &W.col_slice(k)[k..];
            let xnorm = x.norm();
            if xnorm == T::zero() {
                reflectors.push((vec![T::zero(); m - k], T::zero()));
                continue;
            }

            let α = if x[0] >= T::zero() { -xnorm } else { xnorm };
            let mut v = x.to_vec();
            v[0] -= α;
            let two: T = (2.0).as_T();
            let β = two / v.sumsq();

            for j in k..n {
                let col = &mut W.col_slice_mut(j)[k..];
                let s = v.dot(col);
                col.axpby(-β * s, &v, T::one());
            }
            // clean the subdiagonal exactly
            W[(k, k)] = α;
            W.col_slice_mut(k)[(k + 1)..].fill(T::zero());

            reflectors.push((v, β));
        }

        // Q = H_0*H_1*...*H_{k-1}, accumulated from the right end
        let mut Q = Matrix::<T>::identity(m);
        for (k, (v, β)) in reflectors.iter().enumerate().rev() {
            if *β == T::zero() {
                continue;
            }
            for j in 0..m {
                let col = &mut Q.col_slice_mut(j)[k..];
                let s = v.dot(col);
                col.axpby(-*β * s, v, T::one());
            }
        }

        // keep only the upper trapezoid
        let mut R = Matrix::<T>::zeros((kmax, n));
        for j in 0..n {
            for i in 0..usize::min(j + 1, kmax) {
                R[(i, j)] = W[(i, j)];
            }
        }

        let rank = if kmax == 0 {
            0
        } else {
            let r00 = R[(0, 0)].abs();
            let tol = T::epsilon() * r00 * (10 * usize::max(m, n)).as_T();
            (0..kmax).take_while(|&i| R[(i, i)].abs() > tol).count()
        };

        Self { Q, R, perm, rank }
    }

    /// Solves `R11*x = b` in place, with `R11` the leading rank x rank block of `R`.
    pub fn solve_r11(&self, b: &mut [T]) -> Result<(), DenseFactorizationError> {
        let r = self.rank;
        if b.len() != r {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }
        for i in (0..r).rev() {
            let mut s = b[i];
            for j in (i + 1)..r {
                s -= self.R[(i, j)] * b[j];
            }
            let d = self.R[(i, i)];
            if d == T::zero() {
                return Err(DenseFactorizationError::Singular(i));
            }
            b[i] = s / d;
        }
        Ok(())
    }

    /// Solves `R11'*x = b` in place, with `R11` the leading rank x rank block of `R`.
    pub fn solve_r11_transpose(&self, b: &mut [T]) -> Result<(), DenseFactorizationError> {
        let r = self.rank;
        if b.len() != r {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }
        for i in 0..r {
            let mut s = b[i];
            for j in 0..i {
                s -= self.R[(j, i)] * b[j];
            }
            let d = self.R[(i, i)];
            if d == T::zero() {
                return Err(DenseFactorizationError::Singular(i));
            }
            b[i] = s / d;
        }
        Ok(())
    }
}

fn swap_columns<T: FloatT>(W: &mut Matrix<T>, i: usize, j: usize) {
    let m = W.m;
    for r in 0..m {
        W.data.swap(i * m + r, j * m + r);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algebra::{MatrixVectorMultiply, ShapedMatrix};

    fn reconstruct(qr: &QRFactorization<f64>, m: usize, n: usize) -> Matrix<f64> {
        // returns Q*R with columns put back in the original order
        let mut out = Matrix::<f64>::zeros((m, n));
        let mut col = vec![0.; m];
        for j in 0..n {
            let mut rj = vec![0.; m];
            for i in 0..qr.R.nrows() {
                rj[i] = qr.R[(i, j)];
            }
            qr.Q.gemv(&mut col, &rj, 1., 0.);
            out.col_slice_mut(qr.perm[j]).copy_from(&col);
        }
        out
    }

    #[test]
    fn test_qr_tall_full_rank() {
        let A = Matrix::from(&[[1., 2.], [3., 4.], [5., 7.], [-1., 0.5]]);
        let qr = QRFactorization::new(&A);
        assert_eq!(qr.rank, 2);
        assert!(reconstruct(&qr, 4, 2).data.norm_inf_diff(&A.data) < 1e-12);

        // Q is orthogonal
        let Q = &qr.Q;
        for i in 0..4 {
            for j in 0..4 {
                let d = Q.col_slice(i).dot(Q.col_slice(j));
                let e = if i == j { 1. } else { 0. };
                assert!(f64::abs(d - e) < 1e-12);
            }
        }
    }

    #[test]
    fn test_qr_rank_deficient() {
        // third row is the sum of the first two
        let A = Matrix::from(&[
            [1., 2., 0., 1.],
            [0., 1., 1., -1.],
            [1., 3., 1., 0.],
        ]);
        let qr = QRFactorization::new(&A);
        assert_eq!(qr.rank, 2);
        assert!(reconstruct(&qr, 3, 4).data.norm_inf_diff(&A.data) < 1e-12);

        // trailing column of Q is in the left nullspace of A
        let N = qr.Q.trailing_columns(qr.rank);
        let mut out = vec![0.; 4];
        A.t().gemv(&mut out, N.col_slice(0), 1., 0.);
        assert!(out.norm_inf() < 1e-12);
    }

    #[test]
    fn test_qr_triangular_solves() {
        let A = Matrix::from(&[[2., 1.], [0., 3.], [1., 1.]]);
        let qr = QRFactorization::new(&A);
        let b = vec![1., -2.];

        let mut x = b.clone();
        qr.solve_r11(&mut x).unwrap();
        let y0 = qr.R[(0, 0)] * x[0] + qr.R[(0, 1)] * x[1];
        let y1 = qr.R[(1, 1)] * x[1];
        assert!(f64::abs(y0 - b[0]) < 1e-12 && f64::abs(y1 - b[1]) < 1e-12);

        let mut x = b.clone();
        qr.solve_r11_transpose(&mut x).unwrap();
        let y0 = qr.R[(0, 0)] * x[0];
        let y1 = qr.R[(0, 1)] * x[0] + qr.R[(1, 1)] * x[1];
        assert!(f64::abs(y0 - b[0]) < 1e-12 && f64::abs(y1 - b[1]) < 1e-12);
    }
}
