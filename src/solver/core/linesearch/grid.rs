use super::*;

/// Exhaustive search over a fixed grid of step lengths.
///
/// The best finite loss on the grid is taken.  If no grid point improves
/// on the current loss the current point is returned with a zero step.

pub struct GridSearch<T> {
    steps: Vec<T>,
    stats: LineSearchStats,
}

impl<T> GridSearch<T>
where
    T: FloatT,
{
    /// `len` evenly spaced steps from zero to `linesearch_max_step`
    pub fn new_linspace(settings: &CoreSettings<T>) -> Self {
        let len = settings.linesearch_grid_len;
        let max = settings.linesearch_max_step;
        let steps = match len {
            1 => vec![max],
            _ => (0..len)
                .map(|k| max * k.as_T() / (len - 1).as_T())
                .collect(),
        };
        Self::new(steps)
    }

    /// `len` logarithmically spaced steps from `linesearch_min_step`
    /// to `linesearch_max_step`
    pub fn new_logspace(settings: &CoreSettings<T>) -> Self {
        let len = settings.linesearch_grid_len;
        let (lo, hi) = (
            settings.linesearch_min_step.ln(),
            settings.linesearch_max_step.ln(),
        );
        let steps = match len {
            1 => vec![settings.linesearch_max_step],
            _ => (0..len)
                .map(|k| (lo + (hi - lo) * k.as_T() / (len - 1).as_T()).exp())
                .collect(),
        };
        Self::new(steps)
    }

    fn new(steps: Vec<T>) -> Self {
        Self {
            steps,
            stats: LineSearchStats::default(),
        }
    }

    pub fn steps(&self) -> &[T] {
        &self.steps
    }
}

impl<T> LineSearch<T> for GridSearch<T>
where
    T: FloatT,
{
    fn get_next<M: MeritFunction<T>>(
        &mut self,
        model: &M,
        point: &[T],
        loss: T,
        _gradient: &[T],
        direction: &[T],
        next_point: &mut [T],
        _next_gradient: &mut [T],
    ) -> Result<LineSearchStep<T>, SolverError> {
        self.stats.calls += 1;

        // the current point is the fallback candidate
        let mut best: Option<(T, T)> = loss.is_finite().then_some((T::zero(), loss));

        for &α in self.steps.iter().filter(|&&α| α > T::zero()) {
            next_point.waxpby(T::one(), point, α, direction);
            let trial = model.loss(next_point)?;
            self.stats.loss_evaluations += 1;

            if !trial.is_finite() {
                continue;
            }
            if best.map_or(true, |(_, f)| trial < f) {
                best = Some((α, trial));
            }
        }

        let (step, best_loss) = best.ok_or_else(|| SolverError::NumericalError {
            stage: SolveStage::LineSearch,
            iteration: 0,
            reason: "no finite loss on the step grid".to_string(),
        })?;

        next_point.waxpby(T::one(), point, step, direction);
        Ok(LineSearchStep {
            step,
            loss: best_loss,
            has_gradient: false,
        })
    }

    fn stats(&self) -> &LineSearchStats {
        &self.stats
    }
}
