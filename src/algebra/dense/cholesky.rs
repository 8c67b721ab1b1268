#![allow(non_snake_case)]

use crate::algebra::{DenseFactorizationError, FloatT, Matrix, ShapedMatrix};

/// Dense Cholesky factorization `A = L*L'` of a symmetric positive
/// definite matrix.  Only the lower triangle of `A` is read.
pub struct CholeskyEngine<T> {
    /// lower triangular factor (stored as square dense)
    pub L: Matrix<T>,
}

impl<T> CholeskyEngine<T>
where
    T: FloatT,
{
    pub fn new(n: usize) -> Self {
        let L = Matrix::<T>::zeros((n, n));
        Self { L }
    }

    pub fn factor(&mut self, A: &Matrix<T>) -> Result<(), DenseFactorizationError> {
        if A.size() != self.L.size() {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }
        let n = A.nrows();
        let L = &mut self.L;
        L.data.fill(T::zero());

        for j in 0..n {
            let mut d = A[(j, j)];
            for k in 0..j {
                d -= L[(j, k)] * L[(j, k)];
            }
            if !(d > T::zero()) || !d.is_finite() {
                return Err(DenseFactorizationError::Cholesky(j));
            }
            let ljj = d.sqrt();
            L[(j, j)] = ljj;

            for i in (j + 1)..n {
                let mut s = A[(i, j)];
                for k in 0..j {
                    s -= L[(i, k)] * L[(j, k)];
                }
                L[(i, j)] = s / ljj;
            }
        }
        Ok(())
    }

    /// Solves `A*x = b` in place using the computed factor.
    pub fn solve(&self, b: &mut [T]) {
        let L = &self.L;
        let n = L.nrows();
        assert_eq!(b.len(), n);

        // forward solve L*z = b
        for i in 0..n {
            let mut s = b[i];
            for k in 0..i {
                s -= L[(i, k)] * b[k];
            }
            b[i] = s / L[(i, i)];
        }
        // back solve L'*x = z
        for i in (0..n).rev() {
            let mut s = b[i];
            for k in (i + 1)..n {
                s -= L[(k, i)] * b[k];
            }
            b[i] = s / L[(i, i)];
        }
    }
}

#[test]
fn test_cholesky() {
    let A = Matrix::from(&[[4., 2., 0.], [2., 5., 1.], [0., 1., 3.]]);
    let mut eng = CholeskyEngine::<f64>::new(3);
    assert!(eng.factor(&A).is_ok());

    let x = [1., -1., 2.];
    let mut b = [2., -1., 5.];
    eng.solve(&mut b);
    for i in 0..3 {
        assert!(f64::abs(b[i] - x[i]) < 1e-12);
    }

    let B = Matrix::from(&[[1., 2.], [2., 1.]]);
    let mut eng = CholeskyEngine::<f64>::new(2);
    assert_eq!(eng.factor(&B), Err(DenseFactorizationError::Cholesky(1)));
}
