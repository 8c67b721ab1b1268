use super::*;
use crate::algebra::*;
use itertools::izip;

// -------------------------------------
// Scaled Second order Cone
// -------------------------------------

// iteration limit for the boundary multiplier search
const MAX_ROOT_ITERATIONS: usize = 200;

/// The elementwise scaled second order cone
/// `K_a = {(t,y) : t ≥ ‖a⊙y‖}` with `a > 0`.
///
/// Its dual is `K_{1/a}`.  Scaling the rows of a block by a positive
/// vector maps `K_a` onto another cone of the same family, so row
/// equilibration is absorbed into the scale.

pub struct SecondOrderCone<T: FloatT = f64> {
    dim: usize,
    // a, and its elementwise inverse for the dual cone
    scale: Vec<T>,
    inv_scale: Vec<T>,
}

// where a point sits relative to the cone
#[derive(Debug, Clone, Copy, PartialEq)]
enum SocRegion<T> {
    // already in the cone
    Inside,
    // in the polar cone, projects to zero
    Polar,
    // projects onto the boundary with multiplier λ
    Boundary(T),
}

impl<T> SecondOrderCone<T>
where
    T: FloatT,
{
    pub fn new(scale: &[T]) -> Self {
        assert!(!scale.is_empty());
        let scale = scale.to_vec();
        let mut inv_scale = scale.clone();
        inv_scale.recip();
        Self {
            dim: scale.len() + 1,
            scale,
            inv_scale,
        }
    }

    /// The current scale vector `a`
    pub fn scale(&self) -> &[T] {
        &self.scale
    }

    fn scale_for(&self, pd: PrimalOrDualCone) -> &[T] {
        match pd {
            PrimalOrDualCone::PrimalCone => &self.scale,
            PrimalOrDualCone::DualCone => &self.inv_scale,
        }
    }
}

impl<T> Cone<T> for SecondOrderCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.dim
    }

    fn rectify_equilibration(&mut self, e: &[T]) {
        assert_eq!(e.len(), self.dim);
        let e0 = e[0];
        for (ai, bi, &ei) in izip!(&mut self.scale, &mut self.inv_scale, &e[1..]) {
            *ai = e0 * (*ai) / ei;
            *bi = T::recip(*ai);
        }
    }

    fn project(&self, x: &mut [T], pd: PrimalOrDualCone) -> Result<(), ConeError> {
        let a = self.scale_for(pd);
        match _soc_region(x[0], &x[1..], a)? {
            SocRegion::Inside => {}
            SocRegion::Polar => x.fill(T::zero()),
            SocRegion::Boundary(λ) => {
                let y = &mut x[1..];
                for (yi, &ai) in y.iter_mut().zip(a) {
                    *yi /= T::one() + λ * ai * ai;
                }
                x[0] = a.norm_scaled(&x[1..]);
            }
        }
        Ok(())
    }

    fn projection_jacobian(
        &self,
        x: &[T],
        pd: PrimalOrDualCone,
    ) -> Result<ProjectionJacobian<T>, ConeError> {
        let a = self.scale_for(pd);
        Ok(match _soc_region(x[0], &x[1..], a)? {
            SocRegion::Inside => ProjectionJacobian::Identity(self.dim),
            SocRegion::Polar => ProjectionJacobian::Zero(self.dim),
            SocRegion::Boundary(λ) => {
                ProjectionJacobian::ScaledSocBoundary(SocBoundaryJacobian::new(a, &x[1..], λ))
            }
        })
    }
}

fn _soc_region<T: FloatT>(t: T, y: &[T], a: &[T]) -> Result<SocRegion<T>, ConeError> {
    if t >= a.norm_scaled(y) {
        return Ok(SocRegion::Inside);
    }
    if -t >= y.norm_unscaled(a) {
        return Ok(SocRegion::Polar);
    }
    _soc_boundary_multiplier(t, y, a).map(SocRegion::Boundary)
}

// g(λ) = (1-λ)‖a⊙y/(1+λa²)‖ - t and its derivative.
fn _soc_boundary_residual<T: FloatT>(λ: T, t: T, y: &[T], a: &[T]) -> (T, T) {
    let mut N2 = T::zero();
    let mut dN2 = T::zero();
    for (&yi, &ai) in y.iter().zip(a) {
        let a2 = ai * ai;
        let q = T::one() + λ * a2;
        let azi = ai * yi / q;
        N2 += azi * azi;
        dN2 += a2 * azi * azi / q;
    }
    let N = N2.sqrt();
    let Nλ = -dN2 / N;
    let g = (T::one() - λ) * N - t;
    let dg = -N + (T::one() - λ) * Nλ;
    (g, dg)
}

// Finds the root of g on (0,∞).  Requires g(0) > 0 and a negative limit
// at infinity, which hold whenever the point is neither in the cone nor
// in its polar.  g is strictly decreasing, so the root is unique.
fn _soc_boundary_multiplier<T: FloatT>(t: T, y: &[T], a: &[T]) -> Result<T, ConeError> {
    let failure = ConeError::RootFindingFailure {
        iterations: MAX_ROOT_ITERATIONS,
    };
    let two: T = (2.0).as_T();
    let half: T = (0.5).as_T();
    let mut iterations = 0;

    // grow the bracket until g(hi) ≤ 0
    let (mut lo, mut hi) = (T::zero(), T::one());
    loop {
        let (g, _) = _soc_boundary_residual(hi, t, y, a);
        if !g.is_finite() {
            return Err(failure);
        }
        if g <= T::zero() {
            break;
        }
        lo = hi;
        hi *= two;
        iterations += 1;
        if iterations >= MAX_ROOT_ITERATIONS {
            return Err(failure);
        }
    }

    // safeguarded Newton on [lo,hi]
    let tol = T::epsilon() * (4.0).as_T();
    let mut λ = half * (lo + hi);
    while iterations < MAX_ROOT_ITERATIONS {
        iterations += 1;
        let (g, dg) = _soc_boundary_residual(λ, t, y, a);
        if g == T::zero() {
            return Ok(λ);
        }
        if g > T::zero() {
            lo = λ;
        } else {
            hi = λ;
        }

        let gscale = T::max(t.abs(), ((T::one() - λ) * (g + t)).abs());
        if g.abs() <= tol * gscale || hi - lo <= tol * hi {
            return Ok(λ);
        }

        let λnewton = λ - g / dg;
        λ = if λnewton > lo && λnewton < hi {
            λnewton
        } else {
            half * (lo + hi)
        };
    }
    Err(failure)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_soc_regions() {
        let K = SecondOrderCone::new(&[1., 2.]);

        // inside: unchanged
        let mut x = vec![3., 1., 1.];
        K.project(&mut x, PrimalOrDualCone::PrimalCone).unwrap();
        assert_eq!(x, vec![3., 1., 1.]);

        // polar: ‖y/a‖ = ‖(1,0.5)‖ ≤ 2
        let mut x = vec![-2., 1., 1.];
        K.project(&mut x, PrimalOrDualCone::PrimalCone).unwrap();
        assert_eq!(x, vec![0., 0., 0.]);

        // the same point is not in the polar of the dual cone
        let mut x = vec![-2., 1., 1.];
        K.project(&mut x, PrimalOrDualCone::DualCone).unwrap();
        assert!(x[0] > 0.);
    }

    #[test]
    fn test_soc_unscaled_matches_closed_form() {
        // for a = 1 the projection of (t,y) with |t| < ‖y‖ is
        // ((t+‖y‖)/2)*(1, y/‖y‖)
        let K = SecondOrderCone::new(&[1., 1., 1.]);
        let mut x = vec![0.5, 3., -4., 0.];
        K.project(&mut x, PrimalOrDualCone::PrimalCone).unwrap();
        let c = (0.5 + 5.) / 2.;
        let expected = [c, c * 3. / 5., -c * 4. / 5., 0.];
        assert!(x.norm_inf_diff(&expected) < 1e-12);
    }

    #[test]
    fn test_soc_rectify_equilibration() {
        let mut K = SecondOrderCone::new(&[1., 2.]);
        K.rectify_equilibration(&[2., 4., 0.5]);
        assert_eq!(K.scale(), &[0.5, 8.]);
    }
}
