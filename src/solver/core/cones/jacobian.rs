use crate::algebra::*;
use itertools::izip;
use std::ops::Range;

/// Derivative of a cone projection at a point.
///
/// Projections onto the cones handled here are piecewise smooth, and at
/// a kink one element of the Clarke generalized Jacobian is returned.
/// All variants act on vectors of the cone's dimension.

#[derive(Debug, Clone)]
pub enum ProjectionJacobian<T> {
    /// zero map of the given dimension
    Zero(usize),
    /// identity of the given dimension
    Identity(usize),
    /// diagonal map, with 0/1 entries for polyhedral cones
    Diagonal(Vec<T>),
    /// projection onto the boundary of a scaled second order cone
    ScaledSocBoundary(SocBoundaryJacobian<T>),
}

/// Jacobian of the map `(t,y) ↦ (s,z)` taking a point to its projection
/// on the boundary of `{(t,y) : t ≥ ‖a⊙y‖}`.
///
/// The projection is `z = y/q` and `s = ‖a⊙z‖` with `q = 1 + λa²`, where
/// `λ` solves `(1-λ)‖a⊙z‖ = t`.  Differentiating that condition
/// implicitly gives `dλ = rᵀ(dt,dy)`, and the full Jacobian has the
/// form `B + v*rᵀ` with `B` holding the partial derivatives at fixed `λ`.

#[derive(Debug, Clone)]
pub struct SocBoundaryJacobian<T> {
    // 1/q
    qinv: Vec<T>,
    // ∂‖a⊙z‖/∂y at fixed λ
    Ny: Vec<T>,
    // ∂z/∂λ
    zλ: Vec<T>,
    // ∂‖a⊙z‖/∂λ
    Nλ: T,
    // dλ = r0*dt + ry'*dy
    r0: T,
    ry: Vec<T>,
}

impl<T> SocBoundaryJacobian<T>
where
    T: FloatT,
{
    /// Builds the Jacobian from the cone scale `a`, the input vector part
    /// `y` and the root `λ` of the boundary condition.
    pub(crate) fn new(a: &[T], y: &[T], λ: T) -> Self {
        let k = y.len();
        let mut qinv = vec![T::zero(); k];
        let mut z = vec![T::zero(); k];
        for (qi, zi, &ai, &yi) in izip!(&mut qinv, &mut z, a, y) {
            *qi = T::recip(T::one() + λ * ai * ai);
            *zi = yi * *qi;
        }
        let N = a.norm_scaled(&z);

        let mut Ny = vec![T::zero(); k];
        let mut zλ = vec![T::zero(); k];
        let mut Nλ = T::zero();
        for (nyi, zλi, &qi, &ai, &zi) in izip!(&mut Ny, &mut zλ, &qinv, a, &z) {
            let a2 = ai * ai;
            *nyi = a2 * zi * qi / N;
            *zλi = -a2 * zi * qi;
            Nλ -= a2 * a2 * zi * zi * qi / N;
        }

        // g(λ) = (1-λ)N - t is strictly decreasing, so gλ < 0
        let gλ = -N + (T::one() - λ) * Nλ;
        let r0 = T::recip(gλ);
        let mut ry = Ny.clone();
        ry.scale(-(T::one() - λ) / gλ);

        Self {
            qinv,
            Ny,
            zλ,
            Nλ,
            r0,
            ry,
        }
    }

    fn dim(&self) -> usize {
        self.qinv.len() + 1
    }

    // out = J*x
    fn apply(&self, out: &mut [T], x: &[T]) {
        let (dt, dy) = (x[0], &x[1..]);
        let dλ = self.r0 * dt + self.ry.dot(dy);

        out[0] = self.Nλ * dλ + self.Ny.dot(dy);
        for (oi, &dyi, &qi, &zλi) in izip!(&mut out[1..], dy, &self.qinv, &self.zλ) {
            *oi = dyi * qi + zλi * dλ;
        }
    }

    // out = J'*x
    fn apply_transpose(&self, out: &mut [T], x: &[T]) {
        let (w0, wy) = (x[0], &x[1..]);
        let vw = self.Nλ * w0 + self.zλ.dot(wy);

        out[0] = self.r0 * vw;
        for (oi, &wi, &qi, &nyi, &ryi) in izip!(&mut out[1..], wy, &self.qinv, &self.Ny, &self.ry)
        {
            *oi = nyi * w0 + wi * qi + ryi * vw;
        }
    }
}

impl<T> ProjectionJacobian<T>
where
    T: FloatT,
{
    pub fn dim(&self) -> usize {
        match self {
            ProjectionJacobian::Zero(n) | ProjectionJacobian::Identity(n) => *n,
            ProjectionJacobian::Diagonal(d) => d.len(),
            ProjectionJacobian::ScaledSocBoundary(J) => J.dim(),
        }
    }

    /// `out = J*x`
    pub fn apply(&self, out: &mut [T], x: &[T]) {
        assert_eq!(out.len(), x.len());
        match self {
            ProjectionJacobian::Zero(_) => {
                out.fill(T::zero());
            }
            ProjectionJacobian::Identity(_) => {
                out.copy_from(x);
            }
            ProjectionJacobian::Diagonal(d) => {
                out.copy_from(x).hadamard(d);
            }
            ProjectionJacobian::ScaledSocBoundary(J) => J.apply(out, x),
        }
    }

    /// `out = J'*x`
    pub fn apply_transpose(&self, out: &mut [T], x: &[T]) {
        assert_eq!(out.len(), x.len());
        match self {
            ProjectionJacobian::ScaledSocBoundary(J) => J.apply_transpose(out, x),
            // everything else is symmetric
            _ => self.apply(out, x),
        }
    }

    /// `out = (I - J)*x`
    pub fn apply_complement(&self, out: &mut [T], x: &[T]) {
        self.apply(out, x);
        out.axpby(T::one(), x, -T::one());
    }
}

/// Block diagonal projection Jacobian over a product of cones.
#[derive(Debug, Clone)]
pub struct CompositeJacobian<T> {
    pub(crate) blocks: Vec<ProjectionJacobian<T>>,
    pub(crate) rngs: Vec<Range<usize>>,
}

impl<T> CompositeJacobian<T>
where
    T: FloatT,
{
    pub fn dim(&self) -> usize {
        self.rngs.last().map_or(0, |r| r.end)
    }

    pub fn apply(&self, out: &mut [T], x: &[T]) {
        for (J, rng) in self.blocks.iter().zip(&self.rngs) {
            J.apply(&mut out[rng.clone()], &x[rng.clone()]);
        }
    }

    pub fn apply_transpose(&self, out: &mut [T], x: &[T]) {
        for (J, rng) in self.blocks.iter().zip(&self.rngs) {
            J.apply_transpose(&mut out[rng.clone()], &x[rng.clone()]);
        }
    }

    pub fn apply_complement(&self, out: &mut [T], x: &[T]) {
        for (J, rng) in self.blocks.iter().zip(&self.rngs) {
            J.apply_complement(&mut out[rng.clone()], &x[rng.clone()]);
        }
    }

    // out = (I - J')*x
    pub fn apply_complement_transpose(&self, out: &mut [T], x: &[T]) {
        self.apply_transpose(out, x);
        out.axpby(T::one(), x, -T::one());
    }
}
