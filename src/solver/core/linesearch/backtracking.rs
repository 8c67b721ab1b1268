use super::*;

/// Armijo backtracking.
///
/// Tries `α = α₀, βα₀, β²α₀, ...` and accepts the first step with
/// `f(x + αd) ≤ f(x) + c₁αgᵀd`.

pub struct Backtracking<T> {
    initial_step: T,
    backtrack: T,
    armijo: T,
    max_backtracks: u32,
    stats: LineSearchStats,
}

impl<T> Backtracking<T>
where
    T: FloatT,
{
    pub fn new(settings: &CoreSettings<T>) -> Self {
        Self {
            initial_step: settings.linesearch_initial_step,
            backtrack: settings.linesearch_backtrack_step,
            armijo: settings.linesearch_armijo,
            max_backtracks: settings.line_search_max_backtracks,
            stats: LineSearchStats::default(),
        }
    }
}

impl<T> LineSearch<T> for Backtracking<T>
where
    T: FloatT,
{
    fn get_next<M: MeritFunction<T>>(
        &mut self,
        model: &M,
        point: &[T],
        loss: T,
        gradient: &[T],
        direction: &[T],
        next_point: &mut [T],
        _next_gradient: &mut [T],
    ) -> Result<LineSearchStep<T>, SolverError> {
        self.stats.calls += 1;
        let slope = descent_slope(gradient, direction)?;

        let mut α = self.initial_step;
        for _ in 0..=self.max_backtracks {
            next_point.waxpby(T::one(), point, α, direction);
            let trial = model.loss(next_point)?;
            self.stats.loss_evaluations += 1;

            if trial.is_finite() && trial <= loss + self.armijo * α * slope {
                return Ok(LineSearchStep {
                    step: α,
                    loss: trial,
                    has_gradient: false,
                });
            }
            α *= self.backtrack;
        }
        Err(no_convergence())
    }

    fn stats(&self) -> &LineSearchStats {
        &self.stats
    }
}
