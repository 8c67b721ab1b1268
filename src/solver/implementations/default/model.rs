#![allow(non_snake_case)]
use crate::algebra::*;
use crate::solver::core::{
    cones::{CompositeCone, CompositeJacobian, PrimalOrDualCone},
    traits::MeritFunction,
    SolverError,
};
use std::cell::RefCell;

/// Constraint matrix seen by the model and refinement: the equilibrated
/// sparse matrix, or the dense range basis left by the QR presolve.
#[derive(Clone, Copy)]
pub enum ConstraintOperator<'a, T> {
    Sparse(&'a CscMatrix<T>),
    Dense(&'a Matrix<T>),
}

impl<T> ShapedMatrix for ConstraintOperator<'_, T> {
    fn nrows(&self) -> usize {
        match self {
            ConstraintOperator::Sparse(A) => A.m,
            ConstraintOperator::Dense(A) => A.m,
        }
    }
    fn ncols(&self) -> usize {
        match self {
            ConstraintOperator::Sparse(A) => A.n,
            ConstraintOperator::Dense(A) => A.n,
        }
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::N
    }
}

impl<T: FloatT> LinearOperator<T> for ConstraintOperator<'_, T> {
    fn matvec(&self, y: &mut [T], x: &[T], a: T, b: T) {
        match self {
            ConstraintOperator::Sparse(A) => A.matvec(y, x, a, b),
            ConstraintOperator::Dense(A) => A.matvec(y, x, a, b),
        }
    }
    fn rmatvec(&self, y: &mut [T], x: &[T], a: T, b: T) {
        match self {
            ConstraintOperator::Sparse(A) => A.rmatvec(y, x, a, b),
            ConstraintOperator::Dense(A) => A.rmatvec(y, x, a, b),
        }
    }
}

/// Nullspace parametrization `y = y0 + N*w` of the dual
#[derive(Clone, Copy)]
pub struct DualNullspace<'a, T> {
    pub N: &'a Matrix<T>,
    pub y0: &'a [T],
}

// per-point quantities shared by the loss and gradient
struct ModelWork<T> {
    y: Vec<T>,
    s: Vec<T>,
    es: Vec<T>,
    ey: Vec<T>,
    rdual: Vec<T>,
}

/// Least squares merit function for the primal-dual optimality
/// conditions.
///
/// With `s = b - A*x`, `e_s = s - Π_K(s)` and `e_y = y - Π_K*(y)`, the
/// loss is `½(‖e_s‖² + ‖e_y‖² + (c'x + b'y)²)`.  In full mode the point is
/// `(x,y)` and the loss also carries `½‖A'y + c‖²`.  In reduced mode the
/// point is `(x,w)` with the dual parametrized over the nullspace of `A'`,
/// so that the dual residual vanishes identically.

pub struct ResidualModel<'a, T: FloatT> {
    A: ConstraintOperator<'a, T>,
    b: &'a [T],
    c: &'a [T],
    cones: &'a CompositeCone<T>,
    nullspace: Option<DualNullspace<'a, T>>,
    // N'b, reduced mode only
    Ntb: Vec<T>,
    work: RefCell<ModelWork<T>>,
}

impl<'a, T> ResidualModel<'a, T>
where
    T: FloatT,
{
    pub fn new(
        A: ConstraintOperator<'a, T>,
        b: &'a [T],
        c: &'a [T],
        cones: &'a CompositeCone<T>,
        nullspace: Option<DualNullspace<'a, T>>,
    ) -> Self {
        let (m, n) = A.size();
        assert_eq!(b.len(), m);
        assert_eq!(c.len(), n);
        assert_eq!(cones.numel(), m);

        let Ntb = match nullspace {
            Some(ns) => {
                let mut v = vec![T::zero(); ns.N.ncols()];
                ns.N.rmatvec(&mut v, b, T::one(), T::zero());
                v
            }
            None => vec![],
        };

        let work = ModelWork {
            y: vec![T::zero(); m],
            s: vec![T::zero(); m],
            es: vec![T::zero(); m],
            ey: vec![T::zero(); m],
            rdual: vec![T::zero(); n],
        };

        Self {
            A,
            b,
            c,
            cones,
            nullspace,
            Ntb,
            work: RefCell::new(work),
        }
    }

    /// number of primal variables
    pub fn nx(&self) -> usize {
        self.c.len()
    }

    /// number of dual (or nullspace) variables
    pub fn nw(&self) -> usize {
        match self.nullspace {
            Some(ns) => ns.N.ncols(),
            None => self.b.len(),
        }
    }

    pub fn is_reduced(&self) -> bool {
        self.nullspace.is_some()
    }

    /// Writes the dual `y` implied by the second block of a point
    pub fn dual(&self, y: &mut [T], w: &[T]) {
        match self.nullspace {
            Some(ns) => {
                y.copy_from(ns.y0);
                ns.N.matvec(y, w, T::one(), T::one());
            }
            None => {
                y.copy_from(w);
            }
        }
    }

    // fills the work vectors at z and returns (loss, gap)
    fn evaluate(&self, work: &mut ModelWork<T>, z: &[T]) -> Result<(T, T), SolverError> {
        let (x, w) = z.split_at(self.nx());
        let half: T = (0.5).as_T();

        self.dual(&mut work.y, w);

        work.s.copy_from(self.b);
        self.A.matvec(&mut work.s, x, -T::one(), T::one());

        self.cones
            .distance(&mut work.es, &work.s, PrimalOrDualCone::PrimalCone)?;
        self.cones
            .distance(&mut work.ey, &work.y, PrimalOrDualCone::DualCone)?;

        let gap = self.c.dot(x) + self.b.dot(&work.y);
        let mut loss = work.es.sumsq() + work.ey.sumsq() + gap * gap;

        if !self.is_reduced() {
            work.rdual.copy_from(self.c);
            self.A.rmatvec(&mut work.rdual, &work.y, T::one(), T::one());
            loss += work.rdual.sumsq();
        }

        Ok((half * loss, gap))
    }
}

impl<T> MeritFunction<T> for ResidualModel<'_, T>
where
    T: FloatT,
{
    type Hessian<'b> = MeritHessian<'b, T> where Self: 'b;

    fn dim(&self) -> usize {
        self.nx() + self.nw()
    }

    fn nconstraints(&self) -> usize {
        self.b.len()
    }

    fn loss(&self, z: &[T]) -> Result<T, SolverError> {
        let mut work = self.work.borrow_mut();
        self.evaluate(&mut work, z).map(|(loss, _)| loss)
    }

    fn gradient(&self, g: &mut [T], z: &[T]) -> Result<T, SolverError> {
        let mut guard = self.work.borrow_mut();
        let work = &mut *guard;
        let (loss, gap) = self.evaluate(work, z)?;
        let (gx, gw) = g.split_at_mut(self.nx());

        // ∇ₓ = -A'e_s + gap*c
        self.A.rmatvec(gx, &work.es, -T::one(), T::zero());
        gx.axpby(gap, self.c, T::one());

        match self.nullspace {
            Some(ns) => {
                // ∇_w = N'(e_y + gap*b)
                work.ey.axpby(gap, self.b, T::one());
                ns.N.rmatvec(gw, &work.ey, T::one(), T::zero());
            }
            None => {
                // ∇_y = e_y + gap*b + A(A'y + c)
                gw.copy_from(&work.ey);
                gw.axpby(gap, self.b, T::one());
                self.A.matvec(gw, &work.rdual, T::one(), T::one());
            }
        }
        Ok(loss)
    }

    fn hessian(&self, z: &[T]) -> Result<MeritHessian<'_, T>, SolverError> {
        let m = self.b.len();
        let (x, w) = z.split_at(self.nx());
        let mut y = vec![T::zero(); m];
        let mut s = self.b.to_vec();
        self.dual(&mut y, w);
        self.A.matvec(&mut s, x, -T::one(), T::one());

        let Js = self.cones.jacobian(&s, PrimalOrDualCone::PrimalCone)?;
        let Jy = self.cones.jacobian(&y, PrimalOrDualCone::DualCone)?;

        Ok(MeritHessian {
            model: self,
            Js,
            Jy,
            work: RefCell::new(HessianWork {
                t1: vec![T::zero(); m],
                t2: vec![T::zero(); m],
                r: vec![T::zero(); self.nx()],
                hv: vec![T::zero(); self.dim()],
            }),
        })
    }
}

/// Generalized Hessian of the merit function at a fixed point.
///
/// Applies `J'MJ`, where `J` is the derivative of the affine maps to
/// `(s, y, gap)` (and `A'y + c` in full mode) and `M` is block diagonal
/// with the complements `I - DΠ` of the projection derivatives.  The
/// active set is frozen when the operator is built.

pub struct MeritHessian<'a, T: FloatT> {
    model: &'a ResidualModel<'a, T>,
    Js: CompositeJacobian<T>,
    Jy: CompositeJacobian<T>,
    work: RefCell<HessianWork<T>>,
}

struct HessianWork<T> {
    t1: Vec<T>,
    t2: Vec<T>,
    r: Vec<T>,
    hv: Vec<T>,
}

impl<T: FloatT> ShapedMatrix for MeritHessian<'_, T> {
    fn nrows(&self) -> usize {
        self.model.dim()
    }
    fn ncols(&self) -> usize {
        self.model.dim()
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::N
    }
}

impl<T: FloatT> MeritHessian<'_, T> {
    // out = H*v
    fn apply(&self, out: &mut [T], v: &[T], work: &mut HessianWork<T>) {
        let model = self.model;
        let (A, b, c) = (&model.A, model.b, model.c);
        let (vx, vw) = v.split_at(model.nx());
        let (hx, hw) = out.split_at_mut(model.nx());
        let (t1, t2) = (&mut work.t1, &mut work.t2);

        // slack block: A'(I - DΠ_K)A*vx
        A.matvec(t1, vx, T::one(), T::zero());
        self.Js.apply_complement(t2, t1);
        A.rmatvec(hx, t2, T::one(), T::zero());

        // dual direction dy, in t1
        match model.nullspace {
            Some(ns) => ns.N.matvec(t1, vw, T::one(), T::zero()),
            None => {
                t1.copy_from(vw);
            }
        }
        let dgap = c.dot(vx) + b.dot(t1);
        self.Jy.apply_complement(t2, t1);

        match model.nullspace {
            Some(ns) => {
                ns.N.rmatvec(hw, t2, T::one(), T::zero());
                hw.axpby(dgap, &model.Ntb, T::one());
            }
            None => {
                hw.copy_from(t2);
                hw.axpby(dgap, b, T::one());
                // dual residual block A*A'*dy
                A.rmatvec(&mut work.r, t1, T::one(), T::zero());
                A.matvec(hw, &work.r, T::one(), T::one());
            }
        }
        hx.axpby(dgap, c, T::one());
    }
}

impl<T: FloatT> LinearOperator<T> for MeritHessian<'_, T> {
    fn matvec(&self, y: &mut [T], x: &[T], a: T, b: T) {
        let mut guard = self.work.borrow_mut();
        let work = &mut *guard;
        let mut hv = std::mem::take(&mut work.hv);
        self.apply(&mut hv, x, work);
        accumulate_product(y, &hv, a, b);
        work.hv = hv;
    }

    // symmetric
    fn rmatvec(&self, y: &mut [T], x: &[T], a: T, b: T) {
        self.matvec(y, x, a, b);
    }
}
