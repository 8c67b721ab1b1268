use crate::{algebra::*, solver::core::SolverStatus};

/// Primal-dual solution of a problem in standard form.
///
/// `x`, `y` and `s` are in the units of the data passed to the solver,
/// with equilibration and presolve scaling removed.
#[derive(Debug, Clone)]
pub struct DefaultSolution<T> {
    /// primal solution
    pub x: Vec<T>,
    /// dual solution (in dual cone)
    pub y: Vec<T>,
    /// vector of slacks (in primal cone)
    pub s: Vec<T>,
    /// final solver status
    pub status: SolverStatus,
    /// primal objective value `c'x`
    pub obj_val: T,
    /// dual objective value `-b'y`
    pub obj_val_dual: T,
    /// solve time in seconds
    pub solve_time: f64,
    /// number of outer iterations
    pub iterations: usize,
    /// primal residual `‖Ax + s - b‖∞`
    pub r_prim: T,
    /// dual residual `‖A'y + c‖∞`
    pub r_dual: T,
    /// duality gap `c'x + b'y`
    pub gap: T,
}

impl<T> DefaultSolution<T>
where
    T: FloatT,
{
    /// Create a new `DefaultSolution` object
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            x: vec![T::zero(); n],
            y: vec![T::zero(); m],
            s: vec![T::zero(); m],
            status: SolverStatus::Unsolved,
            obj_val: T::nan(),
            obj_val_dual: T::nan(),
            solve_time: 0f64,
            iterations: 0,
            r_prim: T::nan(),
            r_dual: T::nan(),
            gap: T::nan(),
        }
    }

    // fills in objective values and residuals against the user's data
    pub(crate) fn finalize(&mut self, A: &CscMatrix<T>, b: &[T], c: &[T]) {
        self.obj_val = c.dot(&self.x);
        self.obj_val_dual = -b.dot(&self.y);
        self.gap = self.obj_val - self.obj_val_dual;

        let mut rp = self.s.clone();
        A.gemv(&mut rp, &self.x, T::one(), T::one());
        rp.axpby(-T::one(), b, T::one());
        self.r_prim = rp.norm_inf();

        let mut rd = c.to_vec();
        A.t().gemv(&mut rd, &self.y, T::one(), T::one());
        self.r_dual = rd.norm_inf();
    }

    // result of a solve that ended in an error
    pub(crate) fn invalidate(&mut self, status: SolverStatus) {
        self.status = status;
        for v in [&mut self.x, &mut self.y, &mut self.s] {
            v.fill(T::nan());
        }
        self.obj_val = T::nan();
        self.obj_val_dual = T::nan();
        self.gap = T::nan();
        self.r_prim = T::nan();
        self.r_dual = T::nan();
    }
}

#[test]
#[allow(non_snake_case)]
fn test_solution_finalize() {
    // x >= 1 with c = 1, at the optimum
    let A = CscMatrix::from(&[[-1.]]);
    let mut sol = DefaultSolution::<f64>::new(1, 1);
    sol.x = vec![1.];
    sol.y = vec![1.];
    sol.s = vec![0.];
    sol.finalize(&A, &[-1.], &[1.]);

    assert_eq!(sol.obj_val, 1.);
    assert_eq!(sol.obj_val_dual, 1.);
    assert_eq!(sol.gap, 0.);
    assert_eq!(sol.r_prim, 0.);
    assert_eq!(sol.r_dual, 0.);

    sol.invalidate(SolverStatus::Infeasible);
    assert!(sol.x[0].is_nan() && sol.obj_val.is_nan());
}
