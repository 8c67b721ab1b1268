use crate::algebra::*;
use crate::io::PrintTarget;
use crate::solver::core::{
    direction::DirectionStats, linesearch::LineSearchStats, traits::Info, IterationSummary,
    SolveStage, SolverStatus,
};

/// Standard-form solver type implementing the [`Info`](crate::solver::core::traits::Info) and [`InfoPrint`](crate::solver::core::traits::InfoPrint) traits

#[derive(Default, Debug)]
pub struct DefaultInfo<T> {
    pub iterations: usize,
    pub loss: T,
    pub grad_norm_inf: T,
    pub step_length: T,
    pub cg_iterations: usize,

    // loss and step length at every outer iteration
    pub loss_history: Vec<T>,
    pub step_history: Vec<T>,

    // residual norms of the embedding around refinement
    pub refinement_residual_before: T,
    pub refinement_residual_after: T,
    pub refinement_rounds: usize,

    // inner solver statistics
    pub direction_stats: DirectionStats<T>,
    pub linesearch_stats: LineSearchStats,

    // presolve outcome, if it ran
    pub presolve_rank: Option<usize>,
    pub presolve_nullity: Option<usize>,

    pub solve_time: f64,
    pub status: SolverStatus,

    /// where a failed solve stopped
    pub error_stage: Option<SolveStage>,
    pub error_iteration: Option<usize>,

    // target stream for printing
    pub(crate) stream: PrintTarget,
}

impl<T> DefaultInfo<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        Self {
            loss: T::nan(),
            grad_norm_inf: T::nan(),
            step_length: T::zero(),
            refinement_residual_before: T::nan(),
            refinement_residual_after: T::nan(),
            ..Self::default()
        }
    }

    // clears everything recorded by a previous solve, keeping the stream
    pub(crate) fn reset(&mut self) {
        let stream = std::mem::take(&mut self.stream);
        *self = Self {
            stream,
            ..Self::new()
        };
    }
}

impl<T> Info<T> for DefaultInfo<T>
where
    T: FloatT,
{
    fn save_iteration(&mut self, summary: &IterationSummary<T>) {
        self.iterations = summary.iteration;
        self.loss = summary.loss;
        self.grad_norm_inf = summary.grad_norm_inf;
        self.step_length = summary.step;
        self.cg_iterations = summary.cg_iterations;

        self.loss_history.push(summary.loss);
        self.step_history.push(summary.step);
    }

    fn get_status(&self) -> SolverStatus {
        self.status
    }

    fn set_status(&mut self, status: SolverStatus) {
        self.status = status;
    }
}

#[test]
fn test_info_save_and_reset() {
    let mut info = DefaultInfo::<f64>::new();
    assert!(info.loss.is_nan());

    for (k, loss) in [1.0, 0.25, 0.01].iter().enumerate() {
        info.save_iteration(&IterationSummary {
            iteration: k,
            loss: *loss,
            grad_norm_inf: 0.1 * loss,
            step: if k == 0 { 0. } else { 1. },
            cg_iterations: 2,
        });
    }
    assert_eq!(info.iterations, 2);
    assert_eq!(info.loss_history, vec![1.0, 0.25, 0.01]);
    assert_eq!(info.step_history, vec![0., 1., 1.]);

    info.set_status(SolverStatus::Solved);
    info.reset();
    assert_eq!(info.get_status(), SolverStatus::Unsolved);
    assert!(info.loss_history.is_empty());
}
