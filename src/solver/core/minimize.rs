use super::direction::{DirectionCalculator, DirectionStats, NewtonDirection};
use super::linesearch::{LineSearch, LineSearchStats, LineSearcher};
use super::traits::{Info, MeritFunction};
use super::{CoreSettings, SolveStage, SolverError};
use crate::algebra::*;
use crate::timers::*;
use log::{debug, info};

/// State of the outer Newton loop
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
pub enum MinimizerState {
    #[default]
    Running,
    Converged,
    Failed,
}

/// Values recorded at the top of each outer iteration.
#[derive(Debug, Clone, Copy)]
pub struct IterationSummary<T> {
    pub iteration: usize,
    pub loss: T,
    /// infinity norm of the gradient
    pub grad_norm_inf: T,
    /// step length taken to reach this point (zero at iteration 0)
    pub step: T,
    /// inner iterations spent on the direction that led here
    pub cg_iterations: usize,
}

/// Newton minimization of a merit function.
///
/// Owns a direction calculator and a line searcher, both built fresh
/// from settings, so a minimizer should not be reused across problems.

pub struct Minimizer<T: FloatT> {
    direction: DirectionCalculator<T>,
    linesearch: LineSearcher<T>,
    pub state: MinimizerState,
    pub iterations: usize,
    pub loss: T,
    pub grad_norm_inf: T,
}

impl<T> Minimizer<T>
where
    T: FloatT,
{
    pub fn new(settings: &CoreSettings<T>) -> Self {
        Self {
            direction: DirectionCalculator::new(settings),
            linesearch: LineSearcher::new(settings),
            state: MinimizerState::Running,
            iterations: 0,
            loss: T::nan(),
            grad_norm_inf: T::nan(),
        }
    }

    pub fn direction_stats(&self) -> &DirectionStats<T> {
        self.direction.stats()
    }

    pub fn linesearch_stats(&self) -> &LineSearchStats {
        self.linesearch.stats()
    }

    /// Minimizes `model` starting from `z`, which holds the final point
    /// on return.  Fails on the iteration cap, the time limit, or any
    /// error raised by the inner stages.
    pub fn run<M, I>(
        &mut self,
        model: &M,
        z: &mut [T],
        info: &mut I,
        settings: &CoreSettings<T>,
        timers: &mut Timers,
    ) -> Result<(), SolverError>
    where
        M: MeritFunction<T>,
        I: Info<T>,
    {
        let result = self.run_inner(model, z, info, settings, timers);
        self.state = match result {
            Ok(()) => MinimizerState::Converged,
            Err(_) => MinimizerState::Failed,
        };
        result
    }

    fn run_inner<M, I>(
        &mut self,
        model: &M,
        z: &mut [T],
        info: &mut I,
        settings: &CoreSettings<T>,
        timers: &mut Timers,
    ) -> Result<(), SolverError>
    where
        M: MeritFunction<T>,
        I: Info<T>,
    {
        let n = model.dim();
        assert_eq!(z.len(), n);

        let mut g = vec![T::zero(); n];
        let mut d = vec![T::zero(); n];
        let mut znext = vec![T::zero(); n];
        let mut gnext = vec![T::zero(); n];

        // gradient test is normalized by the problem size
        let normalizer: T = (n + model.nconstraints()).as_T();

        let mut loss = model.gradient(&mut g, z)?;
        let mut step = T::zero();
        let mut cg_iterations = 0;
        let mut iter = 0;

        self.state = MinimizerState::Running;

        loop {
            self.iterations = iter;
            self.loss = loss;
            self.grad_norm_inf = g.norm_inf();

            if !loss.is_finite() || !g.is_finite() {
                return Err(SolverError::NumericalError {
                    stage: SolveStage::OptimizationLoop,
                    iteration: iter,
                    reason: "non-finite loss or gradient".to_string(),
                });
            }

            info.save_iteration(&IterationSummary {
                iteration: iter,
                loss,
                grad_norm_inf: self.grad_norm_inf,
                step,
                cg_iterations,
            });
            notimeit! {timers; {
                let _ = info.print_status(settings);
            }}

            if self.grad_norm_inf / normalizer < settings.tol_gradient && loss < settings.tol_loss {
                info!("Newton loop converged in {} iterations, loss {:e}", iter, loss);
                return Ok(());
            }

            if iter >= settings.outer_iteration_cap as usize {
                return Err(SolverError::NumericalNonConvergence {
                    stage: SolveStage::OptimizationLoop,
                    iteration: iter,
                });
            }
            if timers.total_time().as_secs_f64() > settings.time_limit {
                return Err(SolverError::TimeLimitReached { iteration: iter });
            }

            // Newton direction
            timeit! {timers => "direction";
                let result = self.direction.get_direction(&mut d, model, z, &g);
            }
            result.map_err(|e| e.at_iteration(iter))?;
            cg_iterations = self.direction.stats().cg_iterations.last().copied().unwrap_or(0);

            // step length
            timeit! {timers => "line search";
                let result = self.linesearch.get_next(model, z, loss, &g, &d, &mut znext, &mut gnext);
            }

            let accepted = match result {
                Ok(ls) if ls.loss < loss => ls,
                Ok(_)
                | Err(SolverError::NumericalNonConvergence {
                    stage: SolveStage::LineSearch,
                    ..
                }) if loss < settings.tol_stall_loss => {
                    info!(
                        "Newton loop stalled at iteration {}, loss {:e}, handing over to refinement",
                        iter, loss
                    );
                    return Ok(());
                }
                Ok(_) => {
                    return Err(SolverError::NumericalNonConvergence {
                        stage: SolveStage::LineSearch,
                        iteration: iter,
                    })
                }
                Err(e) => return Err(e.at_iteration(iter)),
            };

            z.copy_from(&znext);
            step = accepted.step;
            loss = if accepted.has_gradient {
                g.copy_from(&gnext);
                accepted.loss
            } else {
                model
                    .gradient(&mut g, z)
                    .map_err(|e| e.at_iteration(iter))?
            };
            iter += 1;

            debug!(
                "iter {}: loss {:e}, |g|∞ {:e}, step {:e}, cg iterations {}",
                iter,
                loss,
                g.norm_inf(),
                step,
                cg_iterations
            );
        }
    }
}
