#![allow(non_snake_case)]
use crate::algebra::*;
use crate::solver::core::cones::CompositeCone;

use super::DefaultSettings;

// ---------------
// equilibration data
// ---------------

/// Data from the Ruiz equilibration procedure.
///
/// The equilibrated problem has data `E*A*D`, `σ*E*b` and `ρ*D*c`, where
/// `E = diag(e)` and `D = diag(d)`.
pub struct DefaultEquilibrationData<T> {
    /// Vector of variable scaling terms
    pub d: Vec<T>,
    /// Vector of constraint scaling terms
    pub e: Vec<T>,
    /// overall scaling for the cost vector
    pub ρ: T,
    /// overall scaling for the right hand side
    pub σ: T,
}

impl<T> DefaultEquilibrationData<T>
where
    T: FloatT,
{
    /// creates an identity scaling
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            d: vec![T::one(); n],
            e: vec![T::one(); m],
            ρ: T::one(),
            σ: T::one(),
        }
    }

    /// Scales `A`, `b` and `c` in place, and passes the final row scaling
    /// to the cones so that cone membership is preserved.
    pub fn equilibrate(
        &mut self,
        A: &mut CscMatrix<T>,
        b: &mut [T],
        c: &mut [T],
        cones: &mut CompositeCone<T>,
        settings: &DefaultSettings<T>,
    ) {
        if settings.equilibrate_enable {
            let (n, m) = (c.len(), b.len());
            let scale_min = settings.equilibrate_min_scaling;
            let scale_max = settings.equilibrate_max_scaling;
            let mut dwork = vec![T::zero(); n];
            let mut ework = vec![T::zero(); m];

            // perform scaling operations for a fixed number of steps
            for _ in 0..settings.max_equilibration_iters {
                A.col_norms(&mut dwork);
                A.row_norms(&mut ework);

                dwork.scalarop(|x| limit_scaling(x, scale_min, scale_max));
                ework.scalarop(|x| limit_scaling(x, scale_min, scale_max));

                dwork.rsqrt();
                ework.rsqrt();

                A.lrscale(&ework, &dwork);
                self.d.hadamard(&dwork);
                self.e.hadamard(&ework);
            }

            b.hadamard(&self.e);
            c.hadamard(&self.d);

            // overall scalings put the largest entries of b and c near one
            self.σ = limit_scaling(b.norm_inf(), scale_min, scale_max).recip();
            self.ρ = limit_scaling(c.norm_inf(), scale_min, scale_max).recip();
            b.scale(self.σ);
            c.scale(self.ρ);
        }

        cones.rectify_equilibration(&self.e);
    }

    /// Maps a solution of the equilibrated problem back to the original
    /// problem, i.e. `x = d⊙x/σ`, `y = e⊙y/ρ` and `s = s/(σe)`.
    pub fn unscale(&self, x: &mut [T], y: &mut [T], s: &mut [T]) {
        x.hadamard(&self.d).scale(self.σ.recip());
        y.hadamard(&self.e).scale(self.ρ.recip());
        s.hadamard_div(&self.e).scale(self.σ.recip());
    }
}

// scalings below the minimum are treated as an empty row or column
fn limit_scaling<T>(s: T, minval: T, maxval: T) -> T
where
    T: FloatT + ScalarMath<T = T>,
{
    s.clip(minval, maxval, T::one(), maxval)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::solver::core::cones::SupportedConeT;

    #[test]
    fn test_equilibrate_and_unscale() {
        let A0 = CscMatrix::from(&[[100., 0.], [1., 0.01], [0., 3.]]);
        let b0 = vec![50., 1., -2.];
        let c0 = vec![1e3, 2.];
        let mut cones = CompositeCone::new(&[SupportedConeT::NonnegativeConeT(3)]);

        let (mut A, mut b, mut c) = (A0.clone(), b0.clone(), c0.clone());
        let settings = DefaultSettings::<f64>::default();
        let mut equil = DefaultEquilibrationData::new(2, 3);
        equil.equilibrate(&mut A, &mut b, &mut c, &mut cones, &settings);

        // scaled rows are much closer to unit norm
        let mut rn = vec![0.; 3];
        A.row_norms(&mut rn);
        assert!(rn.iter().all(|&r| r > 0.1 && r < 10.));
        assert!((b.norm_inf() - 1.).abs() < 1e-12);
        assert!((c.norm_inf() - 1.).abs() < 1e-12);

        // A*x + s = b in scaled terms maps back to the original
        let xs = [0.3, -0.7];
        let mut s = b.clone();
        A.gemv(&mut s, &xs, -1., 1.);
        let mut x = xs.to_vec();
        let mut y = vec![1.; 3];
        equil.unscale(&mut x, &mut y, &mut s);

        let mut r = b0.clone();
        A0.gemv(&mut r, &x, -1., 1.);
        assert!(r.norm_inf_diff(&s) < 1e-10);
    }

    #[test]
    fn test_equilibrate_disabled() {
        let mut A = CscMatrix::from(&[[100., 0.], [1., 0.01]]);
        let (mut b, mut c) = (vec![1., 2.], vec![3., 4.]);
        let mut cones = CompositeCone::new(&[SupportedConeT::ZeroConeT(2)]);
        let settings = DefaultSettings::<f64> {
            equilibrate_enable: false,
            ..DefaultSettings::default()
        };
        let mut equil = DefaultEquilibrationData::new(2, 2);
        equil.equilibrate(&mut A, &mut b, &mut c, &mut cones, &settings);
        assert_eq!(A.nzval, vec![100., 1., 0.01]);
        assert_eq!((equil.σ, equil.ρ), (1., 1.));
        assert_eq!(b, vec![1., 2.]);
    }
}
