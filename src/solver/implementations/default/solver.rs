use super::*;
use crate::solver::core::{
    cones::{CompositeCone, SupportedConeT},
    traits::{Info, InfoPrint, MeritFunction},
    Minimizer, SolveStage, SolverError, SolverStatus,
};

use crate::algebra::*;
use crate::io::ConfigurablePrintTarget;
use crate::timers::*;
use log::{debug, info, warn};

// the problem exactly as the user passed it, kept for reporting
// residuals and for writing problems back out
pub(crate) struct UserProblemData<T> {
    pub(crate) A: CscMatrix<T>,
    pub(crate) b: Vec<T>,
    pub(crate) c: Vec<T>,
    pub(crate) cones: Vec<SupportedConeT<T>>,
}

/// Solver for problems in standard conic program form

pub struct DefaultSolver<T: FloatT = f64> {
    /// equilibrated problem data
    pub data: DefaultProblemData<T>,
    /// product cone, with scales absorbing the equilibration
    pub cones: CompositeCone<T>,
    pub settings: DefaultSettings<T>,
    pub info: DefaultInfo<T>,
    pub solution: DefaultSolution<T>,
    /// phase timers.  `None` only while a solve is running.
    pub timers: Option<Timers>,
    pub(crate) user: UserProblemData<T>,
}

impl<T> DefaultSolver<T>
where
    T: FloatT,
{
    /// Validates settings and data, then copies and equilibrates the
    /// problem.  No factorization or iteration happens until
    /// [`solve`](DefaultSolver::solve).
    pub fn new(
        A: &CscMatrix<T>,
        b: &[T],
        c: &[T],
        cone_specs: &[SupportedConeT<T>],
        settings: DefaultSettings<T>,
    ) -> Result<Self, SolverError> {
        settings
            .validate()
            .map_err(|e| SolverError::PreconditionViolation {
                stage: SolveStage::Setup,
                reason: e.to_string(),
            })?;
        check_problem_data(A, b, c, cone_specs)?;

        let mut timers = Timers::default();
        let mut output;

        timeit! {timers => "setup"; {

        let info = DefaultInfo::<T>::new();
        let mut cones = CompositeCone::<T>::new(cone_specs);

        // equilibrate once on setup, so that repeated
        // calls to solve see the same scaled data
        let data;
        timeit!{timers => "equilibration"; {
            data = DefaultProblemData::<T>::new(A, b, c, &mut cones, &settings);
        }}

        let solution = DefaultSolution::<T>::new(data.n, data.m);
        let user = UserProblemData {
            A: A.clone(),
            b: b.to_vec(),
            c: c.to_vec(),
            cones: cone_specs.to_vec(),
        };

        output = Self{data, cones, settings, info, solution, timers: None, user};

        }} //end "setup" timer.

        debug!(
            "setup: {} variables, {} constraints, {} cones",
            output.data.n,
            output.data.m,
            output.cones.len()
        );

        output.timers.replace(timers);

        Ok(output)
    }

    /// Solves the problem.  On success the status is `Solved` and
    /// [`solution`](DefaultSolver::solution) holds the result.  On
    /// failure the error is returned, the status reflects it and the
    /// stage and iteration are recorded in [`info`](DefaultSolver::info).
    pub fn solve(&mut self) -> Result<(), SolverError> {
        let mut timers = self.timers.take().unwrap_or_default();

        self.info.reset();
        self.solution = DefaultSolution::new(self.data.n, self.data.m);
        timers.reset_timer("solve");

        notimeit! {timers; {
            let _ = self.info.print_configuration(&self.settings, &self.data, &self.cones);
        }}

        timeit! {timers => "solve";
            let result = self.solve_inner(&mut timers);
        }

        match &result {
            Ok(()) => {
                self.info.set_status(SolverStatus::Solved);
                info!(
                    "solved in {} iterations, |Ax+s-b| = {:e}, |A'y+c| = {:e}, gap = {:e}",
                    self.info.iterations,
                    self.solution.r_prim,
                    self.solution.r_dual,
                    self.solution.gap
                );
            }
            Err(e) => {
                warn!("solve failed: {}", e);
                self.info.set_status(e.status());
                self.info.error_stage = e.stage();
                self.info.error_iteration = e.iteration();
                self.solution.invalidate(e.status());
            }
        }

        self.info.solve_time = timers.total_time().as_secs_f64();
        self.solution.status = self.info.get_status();
        self.solution.solve_time = self.info.solve_time;
        self.solution.iterations = self.info.iterations;

        let _ = self.info.print_footer(&self.settings);

        self.timers.replace(timers);

        result
    }

    fn solve_inner(&mut self, timers: &mut Timers) -> Result<(), SolverError> {
        // nullspace reduction of the dual equality constraints
        let presolved = if self.settings.qr_presolve {
            timeit! {timers => "presolve";
                let result = Presolver::new(&self.data.A, &self.data.b, &self.data.c);
            }
            let (presolver, reduced) = result?;
            self.info.presolve_rank = Some(presolver.rank());
            self.info.presolve_nullity = Some(presolver.nullity());
            Some((presolver, reduced))
        } else {
            None
        };

        notimeit! {timers; {
            let _ = self.info.print_status_header(&self.settings);
        }}

        let (A, b, c, nullspace) = match &presolved {
            Some((presolver, reduced)) => (
                ConstraintOperator::Dense(&reduced.A),
                &reduced.b[..],
                &reduced.c[..],
                Some(DualNullspace {
                    N: &presolver.N,
                    y0: &presolver.y0,
                }),
            ),
            None => (
                ConstraintOperator::Sparse(&self.data.A),
                &self.data.b[..],
                &self.data.c[..],
                None,
            ),
        };

        let model = ResidualModel::new(A, b, c, &self.cones, nullspace);
        let mut z = vec![T::zero(); model.dim()];

        let mut minimizer = Minimizer::new(&self.settings);
        timeit! {timers => "minimize";
            let result = minimizer.run(&model, &mut z, &mut self.info, &self.settings, timers);
        }
        self.info.direction_stats = minimizer.direction_stats().clone();
        self.info.linesearch_stats = *minimizer.linesearch_stats();
        result?;

        let (x, w) = z.split_at(model.nx());
        let mut y = vec![T::zero(); self.data.m];
        model.dual(&mut y, w);

        timeit! {timers => "refinement";
            let result = refine(A, b, c, &self.cones, x, &y, &self.settings);
        }
        let refined = result?;
        self.info.refinement_residual_before = refined.residual_before;
        self.info.refinement_residual_after = refined.residual_after;
        self.info.refinement_rounds = refined.rounds;

        let RefinementResult {
            x, mut y, mut s, ..
        } = refined;

        let mut x = match &presolved {
            Some((presolver, _)) => presolver.reverse_solution(&x, &mut s)?,
            None => x,
        };
        self.data.equilibration.unscale(&mut x, &mut y, &mut s);

        self.solution.x = x;
        self.solution.y = y;
        self.solution.s = s;
        self.solution
            .finalize(&self.user.A, &self.user.b, &self.user.c);

        Ok(())
    }
}

impl<T> ConfigurablePrintTarget for DefaultSolver<T>
where
    T: FloatT,
{
    fn print_to_stdout(&mut self) {
        self.info.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.info.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn std::io::Write + Send + Sync>) {
        self.info.print_to_stream(stream)
    }
    fn print_to_buffer(&mut self) {
        self.info.print_to_buffer()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.info.get_print_buffer()
    }
}
