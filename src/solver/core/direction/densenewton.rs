use super::*;
use crate::algebra::*;

/// Regularized Newton directions from a dense factorization.
///
/// The Hessian is densified column by column with `dim` products, shifted
/// by `λI` and factored by Cholesky, with the same shift schedule as
/// [`CgNewton`](super::CgNewton).  Only practical for small problems.

pub struct DenseNewton<T> {
    floor: T,
    stats: DirectionStats<T>,
}

impl<T> DenseNewton<T>
where
    T: FloatT,
{
    pub fn new(settings: &CoreSettings<T>) -> Self {
        Self {
            floor: settings.cg_regularization_floor,
            stats: DirectionStats::default(),
        }
    }
}

fn densify<T, Op>(op: &Op) -> Matrix<T>
where
    T: FloatT,
    Op: LinearOperator<T> + ?Sized,
{
    let n = op.ncols();
    let mut H = Matrix::<T>::zeros((n, n));
    let mut e = vec![T::zero(); n];
    for j in 0..n {
        e[j] = T::one();
        op.matvec(H.col_slice_mut(j), &e, T::one(), T::zero());
        e[j] = T::zero();
    }
    H
}

impl<T> NewtonDirection<T> for DenseNewton<T>
where
    T: FloatT,
{
    #[allow(non_snake_case)]
    fn get_direction<M: MeritFunction<T>>(
        &mut self,
        d: &mut [T],
        model: &M,
        point: &[T],
        gradient: &[T],
    ) -> Result<(), SolverError> {
        let n = model.dim();
        let hess = model.hessian(point)?;

        // the dense Hessian without shift, regularized on the diagonal
        let H0 = densify(&hess);
        self.stats.hessian_matvecs += n;

        let mut λ = regularization(self.floor, gradient);
        let fallback = fallback_regularization(self.floor, gradient);
        let mut chol = CholeskyEngine::<T>::new(n);
        let mut result = factor_shifted(&mut chol, &H0, λ);
        if result.is_err() && fallback > λ {
            λ = fallback;
            result = factor_shifted(&mut chol, &H0, λ);
        }

        self.stats.calls += 1;
        self.stats.regularizers.push(λ);
        self.stats.cg_iterations.push(0);

        result.map_err(|e| SolverError::NumericalError {
            stage: SolveStage::DirectionCalculation,
            iteration: 0,
            reason: e.to_string(),
        })?;

        d.scalarop_from(|g| -g, gradient);
        chol.solve(d);

        check_direction(d)
    }

    fn stats(&self) -> &DirectionStats<T> {
        &self.stats
    }
}

#[allow(non_snake_case)]
fn factor_shifted<T: FloatT>(
    chol: &mut CholeskyEngine<T>,
    H0: &Matrix<T>,
    λ: T,
) -> Result<(), DenseFactorizationError> {
    let mut H = H0.clone();
    for i in 0..H.nrows() {
        H[(i, i)] += λ;
    }
    chol.factor(&H)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_densify() {
        let A = Matrix::from(&[[2., 1.], [1., 3.]]);
        let op = RegularizedHessian::new(&A, 1.);
        let H = densify(&op);
        assert_eq!(H.data, vec![3., 1., 1., 4.]);
        assert_eq!(op.matvecs(), 2);
    }

    #[test]
    fn test_factor_shifted() {
        // singular, so only a positive shift factors
        let H0 = Matrix::from(&[[1., 1.], [1., 1.]]);
        let mut chol = CholeskyEngine::<f64>::new(2);
        assert!(factor_shifted(&mut chol, &H0, 0.).is_err());
        assert!(factor_shifted(&mut chol, &H0, 1e-3).is_ok());

        let mut x = vec![2. + 1e-3, 2. + 1e-3];
        chol.solve(&mut x);
        assert!(x.norm_inf_diff(&[1., 1.]) < 1e-9);
    }
}
