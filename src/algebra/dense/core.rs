#![allow(non_snake_case)]

use crate::algebra::{
    Adjoint, FloatT, Matrix, MatrixShape, MatrixVectorMultiply, ShapedMatrix, VectorMath,
};
use std::ops::{Index, IndexMut};

impl<T> Matrix<T>
where
    T: FloatT,
{
    pub fn zeros(size: (usize, usize)) -> Self {
        let (m, n) = size;
        let data = vec![T::zero(); m * n];
        Self { m, n, data }
    }

    pub fn identity(n: usize) -> Self {
        let mut mat = Matrix::zeros((n, n));
        for i in 0..n {
            mat[(i, i)] = T::one();
        }
        mat
    }

    pub fn new_from_slice(size: (usize, usize), src: &[T]) -> Self {
        let (m, n) = size;
        assert!(m * n == src.len());
        Self {
            m,
            n,
            data: src.to_vec(),
        }
    }

    #[inline]
    pub fn index_linear(&self, idx: (usize, usize)) -> usize {
        idx.0 + self.m * idx.1
    }

    pub fn col_slice(&self, col: usize) -> &[T] {
        assert!(col < self.n);
        &self.data[(col * self.m)..(col + 1) * self.m]
    }

    pub fn col_slice_mut(&mut self, col: usize) -> &mut [T] {
        assert!(col < self.n);
        &mut self.data[(col * self.m)..(col + 1) * self.m]
    }

    /// Copy of the leading `ncols` columns
    pub fn leading_columns(&self, ncols: usize) -> Self {
        assert!(ncols <= self.n);
        Self::new_from_slice((self.m, ncols), &self.data[0..(self.m * ncols)])
    }

    /// Copy of the trailing columns, starting from column `first`
    pub fn trailing_columns(&self, first: usize) -> Self {
        assert!(first <= self.n);
        Self::new_from_slice((self.m, self.n - first), &self.data[(self.m * first)..])
    }

    /// transpose
    pub fn t(&self) -> Adjoint<'_, Self> {
        Adjoint { src: self }
    }
}

impl<T, const R: usize, const C: usize> From<&[[T; C]; R]> for Matrix<T>
where
    T: FloatT,
{
    fn from(rows: &[[T; C]; R]) -> Self {
        let mut M = Matrix::zeros((R, C));
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                M[(i, j)] = v;
            }
        }
        M
    }
}

impl<T: FloatT> Index<(usize, usize)> for Matrix<T> {
    type Output = T;
    #[inline]
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.data[self.index_linear(idx)]
    }
}

impl<T: FloatT> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        let lidx = self.index_linear(idx);
        &mut self.data[lidx]
    }
}

impl<T> ShapedMatrix for Matrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::N
    }
}

impl<T: FloatT> MatrixVectorMultiply for Matrix<T> {
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert_eq!(x.len(), self.n);
        assert_eq!(y.len(), self.m);

        if b == T::zero() {
            y.fill(T::zero());
        } else {
            y.scale(b);
        }
        for (col, &xj) in x.iter().enumerate() {
            y.axpby(a * xj, self.col_slice(col), T::one());
        }
    }
}

impl<T: FloatT> MatrixVectorMultiply for Adjoint<'_, Matrix<T>> {
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        let A = self.src;
        assert_eq!(x.len(), A.m);
        assert_eq!(y.len(), A.n);

        for (col, yj) in y.iter_mut().enumerate() {
            let prod = A.col_slice(col).dot(x);
            *yj = if b == T::zero() {
                a * prod
            } else {
                a * prod + b * (*yj)
            };
        }
    }
}

#[test]
fn test_dense_gemv() {
    let A = Matrix::from(&[[1., 2.], [3., 4.], [5., 6.]]);
    assert_eq!(A.data, vec![1., 3., 5., 2., 4., 6.]);

    let mut y = vec![0.; 3];
    A.gemv(&mut y, &[1., -1.], 1., 0.);
    assert_eq!(y, vec![-1., -1., -1.]);

    let mut z = vec![1.; 2];
    A.t().gemv(&mut z, &[1., 1., 1.], 2., 1.);
    assert_eq!(z, vec![19., 25.]);

    assert_eq!(A.trailing_columns(1).data, vec![2., 4., 6.]);
    assert_eq!(A.leading_columns(1).data, vec![1., 3., 5.]);
}
