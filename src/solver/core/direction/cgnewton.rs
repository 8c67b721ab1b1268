use super::*;
use crate::algebra::*;

/// Regularized inexact Newton directions.
///
/// Solves `(H + λI)d = -g` by conjugate gradients with
/// `λ = max(floor, min(‖g‖^½, ‖g‖))` and relative tolerance
/// `min(½, ‖g‖^½)`, so that steps become exact Newton steps as the
/// gradient vanishes.  If the inner solve fails it is retried once with
/// the larger shift `max(floor, ‖g‖^½)`.
pub struct CgNewton<T> {
    floor: T,
    max_iter: usize,
    warm_start: bool,
    rhs: Vec<T>,
    previous: Option<Vec<T>>,
    stats: DirectionStats<T>,
}

impl<T> CgNewton<T>
where
    T: FloatT,
{
    pub fn new(settings: &CoreSettings<T>) -> Self {
        Self {
            floor: settings.cg_regularization_floor,
            max_iter: settings.cg_max_iter,
            warm_start: settings.cg_warm_start,
            rhs: Vec::new(),
            previous: None,
            stats: DirectionStats::default(),
        }
    }

    // one CG solve of (H + λI)d = rhs, starting from the warm start
    // if there is one
    fn solve_shifted<H>(
        &mut self,
        d: &mut [T],
        hess: &H,
        λ: T,
        rtol: T,
        maxiter: usize,
    ) -> Result<usize, IterativeSolverError>
    where
        H: LinearOperator<T> + ?Sized,
    {
        match &self.previous {
            Some(prev) if self.warm_start && prev.len() == d.len() => {
                d.copy_from(prev);
            }
            _ => d.fill(T::zero()),
        }

        let op = RegularizedHessian::new(hess, λ);
        let result = cg(&op, &self.rhs, d, rtol, maxiter);
        self.stats.hessian_matvecs += op.matvecs();
        result
    }
}

impl<T> NewtonDirection<T> for CgNewton<T>
where
    T: FloatT,
{
    fn get_direction<M: MeritFunction<T>>(
        &mut self,
        d: &mut [T],
        model: &M,
        point: &[T],
        gradient: &[T],
    ) -> Result<(), SolverError> {
        let n = model.dim();
        let mut λ = regularization(self.floor, gradient);
        let fallback = fallback_regularization(self.floor, gradient);
        let rtol = T::min((0.5).as_T(), gradient.norm().sqrt());
        let maxiter = if self.max_iter == 0 {
            10 * n
        } else {
            self.max_iter
        };

        self.rhs.resize(n, T::zero());
        self.rhs.scalarop_from(|g| -g, gradient);

        let hess = model.hessian(point)?;
        let mut result = self.solve_shifted(d, &hess, λ, rtol, maxiter);
        if result.is_err() && fallback > λ {
            λ = fallback;
            result = self.solve_shifted(d, &hess, λ, rtol, maxiter);
        }

        self.stats.calls += 1;
        self.stats.regularizers.push(λ);

        let iters = result.map_err(|e| match e {
            IterativeSolverError::MaxIterations(_) => SolverError::NumericalNonConvergence {
                stage: SolveStage::DirectionCalculation,
                iteration: 0,
            },
            _ => SolverError::NumericalError {
                stage: SolveStage::DirectionCalculation,
                iteration: 0,
                reason: e.to_string(),
            },
        })?;

        self.stats.cg_iterations.push(iters);
        self.stats.total_cg_iterations += iters;

        check_direction(d)?;

        if self.warm_start {
            self.previous = Some(d.to_vec());
        }
        Ok(())
    }

    fn stats(&self) -> &DirectionStats<T> {
        &self.stats
    }
}
