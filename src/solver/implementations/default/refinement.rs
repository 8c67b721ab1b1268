#![allow(non_snake_case)]
use super::{ConstraintOperator, DefaultSettings};
use crate::algebra::*;
use crate::solver::core::{
    cones::{CompositeCone, CompositeJacobian, PrimalOrDualCone},
    SolveStage, SolverError,
};
use log::{debug, warn};
use std::cell::RefCell;

/// Refined solution of the (scaled) working problem.
#[derive(Debug, Clone)]
pub struct RefinementResult<T> {
    pub x: Vec<T>,
    pub y: Vec<T>,
    pub s: Vec<T>,
    /// embedding residual norm before the first round
    pub residual_before: T,
    /// embedding residual norm after the last accepted round
    pub residual_after: T,
    /// number of accepted rounds
    pub rounds: usize,
}

// ---------------
// homogeneous self-dual embedding
// ---------------

/// Skew-symmetric embedding matrix
/// ```text
/// Q = [ 0   A'  c]
///     [-A   0   b]
///     [-c' -b'  0]
/// ```
/// acting on `u = (x, y, τ)`.
struct Embedding<'a, T: FloatT> {
    A: ConstraintOperator<'a, T>,
    b: &'a [T],
    c: &'a [T],
    cones: &'a CompositeCone<T>,
}

impl<'a, T> Embedding<'a, T>
where
    T: FloatT,
{
    fn n(&self) -> usize {
        self.c.len()
    }
    fn m(&self) -> usize {
        self.b.len()
    }
    fn dim(&self) -> usize {
        self.n() + self.m() + 1
    }

    // out = Q*u
    fn apply_q(&self, out: &mut [T], u: &[T]) {
        let (n, m) = (self.n(), self.m());
        let (x, y, τ) = (&u[..n], &u[n..n + m], u[n + m]);
        let (ox, rest) = out.split_at_mut(n);
        let (oy, oτ) = rest.split_at_mut(m);

        ox.copy_from(self.c).scale(τ);
        self.A.rmatvec(ox, y, T::one(), T::one());

        oy.copy_from(self.b).scale(τ);
        self.A.matvec(oy, x, -T::one(), T::one());

        oτ[0] = -self.c.dot(x) - self.b.dot(y);
    }

    // Π onto Rⁿ × K* × R₊, in place
    fn project(&self, z: &mut [T]) -> Result<(), SolverError> {
        let (n, m) = (self.n(), self.m());
        self.cones
            .project(&mut z[n..n + m], PrimalOrDualCone::DualCone)?;
        z[n + m] = T::max(z[n + m], T::zero());
        Ok(())
    }

    // r = Q*Π(z) - (Π(z) - z)
    fn residual(&self, r: &mut [T], z: &[T], u: &mut [T]) -> Result<(), SolverError> {
        u.copy_from(z);
        self.project(u)?;
        self.apply_q(r, u);
        r.axpby(-T::one(), u, T::one());
        r.axpby(T::one(), z, T::one());
        Ok(())
    }
}

/// Derivative of the embedding residual, `(Q - I)*DΠ(z) + I`.
struct ResidualDerivative<'a, T: FloatT> {
    embedding: &'a Embedding<'a, T>,
    Jy: CompositeJacobian<T>,
    τ_active: bool,
    work: RefCell<(Vec<T>, Vec<T>)>,
}

impl<'a, T> ResidualDerivative<'a, T>
where
    T: FloatT,
{
    fn new(embedding: &'a Embedding<'a, T>, z: &[T]) -> Result<Self, SolverError> {
        let (n, m) = (embedding.n(), embedding.m());
        let Jy = embedding
            .cones
            .jacobian(&z[n..n + m], PrimalOrDualCone::DualCone)?;
        let dim = embedding.dim();
        Ok(Self {
            embedding,
            Jy,
            τ_active: z[n + m] > T::zero(),
            work: RefCell::new((vec![T::zero(); dim], vec![T::zero(); dim])),
        })
    }

    // out = DΠ*v or DΠ'*v
    fn apply_dpi(&self, out: &mut [T], v: &[T], transpose: bool) {
        let (n, m) = (self.embedding.n(), self.embedding.m());
        out[..n].copy_from(&v[..n]);
        if transpose {
            self.Jy.apply_transpose(&mut out[n..n + m], &v[n..n + m]);
        } else {
            self.Jy.apply(&mut out[n..n + m], &v[n..n + m]);
        }
        out[n + m] = if self.τ_active { v[n + m] } else { T::zero() };
    }
}

impl<T: FloatT> ShapedMatrix for ResidualDerivative<'_, T> {
    fn nrows(&self) -> usize {
        self.embedding.dim()
    }
    fn ncols(&self) -> usize {
        self.embedding.dim()
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::N
    }
}

impl<T: FloatT> LinearOperator<T> for ResidualDerivative<'_, T> {
    fn matvec(&self, y: &mut [T], x: &[T], a: T, b: T) {
        let mut guard = self.work.borrow_mut();
        let (t, q) = &mut *guard;
        self.apply_dpi(t, x, false);
        self.embedding.apply_q(q, t);
        // q = Q*t - t + x
        q.axpby(-T::one(), t, T::one());
        q.axpby(T::one(), x, T::one());
        accumulate_product(y, q, a, b);
    }

    // uses Q' = -Q
    fn rmatvec(&self, y: &mut [T], x: &[T], a: T, b: T) {
        let mut guard = self.work.borrow_mut();
        let (t, q) = &mut *guard;
        self.embedding.apply_q(t, x);
        t.axpby(-T::one(), x, -T::one());
        self.apply_dpi(q, t, true);
        q.axpby(T::one(), x, T::one());
        accumulate_product(y, q, a, b);
    }
}

/// Polishes a primal-dual point by Newton steps on the embedding
/// residual `Q*Π(z) - (Π(z) - z)`, each solved inexactly by LSQR.
///
/// A round is kept only if it lowers the residual norm.  Fails if the
/// homogenizing variable `τ` collapses, and reports infeasibility if
/// `κ > τ`.
pub fn refine<T: FloatT>(
    A: ConstraintOperator<'_, T>,
    b: &[T],
    c: &[T],
    cones: &CompositeCone<T>,
    x: &[T],
    y: &[T],
    settings: &DefaultSettings<T>,
) -> Result<RefinementResult<T>, SolverError> {
    let embedding = Embedding { A, b, c, cones };
    let (n, m, dim) = (embedding.n(), embedding.m(), embedding.dim());

    // z = u - v with u = (x,y,1) and v = (0,s,0)
    let mut z = vec![T::zero(); dim];
    z[..n].copy_from(x);
    {
        let zy = &mut z[n..n + m];
        zy.copy_from(y);
        A.matvec(zy, x, T::one(), T::one());
        zy.axpby(-T::one(), b, T::one());
    }
    z[n + m] = T::one();

    let mut u = vec![T::zero(); dim];
    let mut r = vec![T::zero(); dim];
    embedding.residual(&mut r, &z, &mut u)?;
    let residual_before = r.norm();
    let mut rnorm = residual_before;

    let maxiter = match settings.refinement_lsqr_max_iter {
        0 => dim,
        k => k,
    };

    let mut rounds = 0;
    let mut znew = vec![T::zero(); dim];
    let mut rnew = vec![T::zero(); dim];
    let mut Δ = vec![T::zero(); dim];

    for round in 0..settings.refinement_rounds {
        if rnorm == T::zero() {
            break;
        }
        let DR = ResidualDerivative::new(&embedding, &z)?;
        Δ.fill(T::zero());
        let lsqr_info = lsqr(&DR, &r, &mut Δ, T::zero(), T::zero(), maxiter);

        znew.waxpby(T::one(), &z, -T::one(), &Δ);
        embedding.residual(&mut rnew, &znew, &mut u)?;
        let rnorm_new = rnew.norm();

        debug!(
            "refinement round {}: lsqr iterations {}, residual {:e} -> {:e}",
            round, lsqr_info.iterations, rnorm, rnorm_new
        );

        if rnorm_new < rnorm {
            std::mem::swap(&mut z, &mut znew);
            std::mem::swap(&mut r, &mut rnew);
            rnorm = rnorm_new;
            rounds += 1;
        } else {
            warn!(
                "refinement stalled at round {}, residual {:e}",
                round, rnorm
            );
            break;
        }
    }

    // u = Π(z), v = u - z
    u.copy_from(&z);
    embedding.project(&mut u)?;
    let τ = u[n + m];
    let κ = u[n + m] - z[n + m];

    if !(τ >= settings.refinement_min_tau) {
        return Err(SolverError::NumericalError {
            stage: SolveStage::Refinement,
            iteration: 0,
            reason: format!("refinement failed, τ = {:e}", τ),
        });
    }
    if κ > τ {
        return Err(SolverError::InfeasibilityDetected {
            stage: SolveStage::Refinement,
        });
    }

    let mut xr = u[..n].to_vec();
    let mut yr = u[n..n + m].to_vec();
    let mut sr = u[n..n + m].to_vec();
    sr.axpby(-T::one(), &z[n..n + m], T::one());
    for v in [&mut xr, &mut yr, &mut sr] {
        v.scale(τ.recip());
    }

    Ok(RefinementResult {
        x: xr,
        y: yr,
        s: sr,
        residual_before,
        residual_after: rnorm,
        rounds,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::solver::core::cones::SupportedConeT;

    // min x1 + x2  s.t.  x >= 1, so x* = (1,1), y* = (1,1), s* = 0
    fn data() -> (CscMatrix<f64>, Vec<f64>, Vec<f64>, CompositeCone<f64>) {
        let A = CscMatrix::from(&[[-1., 0.], [0., -1.]]);
        let b = vec![-1., -1.];
        let c = vec![1., 1.];
        let cones = CompositeCone::new(&[SupportedConeT::NonnegativeConeT(2)]);
        (A, b, c, cones)
    }

    #[test]
    fn test_embedding_is_skew() {
        let (A, b, c, cones) = data();
        let emb = Embedding {
            A: ConstraintOperator::Sparse(&A),
            b: &b,
            c: &c,
            cones: &cones,
        };
        let u = [0.3, -1.2, 0.5, 2.0, 0.7];
        let mut qu = vec![0.; 5];
        emb.apply_q(&mut qu, &u);
        assert!(u.dot(&qu).abs() < 1e-14);
    }

    #[test]
    fn test_refine_perturbed_point() {
        let (A, b, c, cones) = data();
        let settings = DefaultSettings::<f64>::default();
        let x = [1. + 1e-5, 1. - 2e-5];
        let y = [1. - 3e-5, 1. + 1e-5];
        let result = refine(
            ConstraintOperator::Sparse(&A),
            &b,
            &c,
            &cones,
            &x,
            &y,
            &settings,
        )
        .unwrap();

        assert!(result.residual_after < result.residual_before);
        assert!(result.residual_after < 1e-10);
        assert!(result.x.norm_inf_diff(&[1., 1.]) < 1e-8);
        assert!(result.y.norm_inf_diff(&[1., 1.]) < 1e-8);
        assert!(result.s.norm_inf() < 1e-8);
    }
}
