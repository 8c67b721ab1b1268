use super::*;

/// Line search to the strong Wolfe conditions.
///
/// Bracketing followed by zoom, after Nocedal and Wright, *Numerical
/// Optimization* (2006), algorithms 3.5 and 3.6.  Trial steps in the zoom
/// phase come from cubic interpolation of the two bracket ends and fall
/// back to bisection.  The gradient at the accepted point is returned.

pub struct StrongWolfe<T> {
    armijo: T,
    curvature: T,
    max_iter: u32,
    prev_loss: Option<T>,
    stats: LineSearchStats,
}

// a trial step with its loss and directional derivative
#[derive(Debug, Clone, Copy)]
struct Trial<T> {
    α: T,
    f: T,
    df: T,
}

impl<T> StrongWolfe<T>
where
    T: FloatT,
{
    pub fn new(settings: &CoreSettings<T>) -> Self {
        Self {
            armijo: settings.linesearch_armijo,
            curvature: settings.linesearch_curvature,
            max_iter: settings.linesearch_wolfe_max_iter,
            prev_loss: None,
            stats: LineSearchStats::default(),
        }
    }

    // initial step from the loss decrease at the previous iterate,
    // α₀ = min(1, 1.01*2(f - f_prev)/gᵀd)
    fn initial_step(&self, loss: T, slope: T) -> T {
        let one = T::one();
        self.prev_loss
            .map(|fprev| (loss - fprev) * (2.02).as_T() / slope)
            .filter(|α| α.is_finite() && *α > T::zero())
            .map_or(one, |α| T::min(one, α))
    }

    #[allow(clippy::too_many_arguments)]
    fn evaluate<M: MeritFunction<T>>(
        &mut self,
        model: &M,
        α: T,
        point: &[T],
        direction: &[T],
        next_point: &mut [T],
        next_gradient: &mut [T],
    ) -> Result<Trial<T>, SolverError> {
        next_point.waxpby(T::one(), point, α, direction);
        let f = model.gradient(next_gradient, next_point)?;
        self.stats.loss_evaluations += 1;
        self.stats.gradient_evaluations += 1;
        let df = next_gradient.dot(direction);
        Ok(Trial { α, f, df })
    }

    fn sufficient_decrease(&self, t: &Trial<T>, f0: T, slope: T) -> bool {
        t.f.is_finite() && t.f <= f0 + self.armijo * t.α * slope
    }

    fn flat_enough(&self, t: &Trial<T>, slope: T) -> bool {
        t.df.is_finite() && t.df.abs() <= -self.curvature * slope
    }

    #[allow(clippy::too_many_arguments)]
    fn zoom<M: MeritFunction<T>>(
        &mut self,
        model: &M,
        mut lo: Trial<T>,
        mut hi: Trial<T>,
        f0: T,
        slope: T,
        point: &[T],
        direction: &[T],
        next_point: &mut [T],
        next_gradient: &mut [T],
    ) -> Result<Trial<T>, SolverError> {
        for _ in 0..self.max_iter {
            let α = interpolate(&lo, &hi);
            let t = self.evaluate(model, α, point, direction, next_point, next_gradient)?;

            if !self.sufficient_decrease(&t, f0, slope) || t.f >= lo.f {
                hi = t;
            } else {
                if self.flat_enough(&t, slope) {
                    return Ok(t);
                }
                if t.df * (hi.α - lo.α) >= T::zero() {
                    hi = lo;
                }
                lo = t;
            }
        }
        Err(no_convergence())
    }
}

// minimizer of the cubic through both bracket ends, kept at least a
// tenth of the bracket width from either end.  Bisects otherwise.
fn interpolate<T: FloatT>(lo: &Trial<T>, hi: &Trial<T>) -> T {
    let (a, b) = (T::min(lo.α, hi.α), T::max(lo.α, hi.α));
    let mid = (a + b) * (0.5).as_T();
    let margin = (b - a) * (0.1).as_T();

    let d1 = lo.df + hi.df - (lo.f - hi.f) * (3.0).as_T() / (lo.α - hi.α);
    let disc = d1 * d1 - lo.df * hi.df;
    if !(disc >= T::zero()) {
        return mid;
    }
    let d2 = (hi.α - lo.α).signum() * disc.sqrt();
    let α = hi.α - (hi.α - lo.α) * (hi.df + d2 - d1) / (hi.df - lo.df + d2 * (2.0).as_T());

    if α.is_finite() && α >= a + margin && α <= b - margin {
        α
    } else {
        mid
    }
}

impl<T> LineSearch<T> for StrongWolfe<T>
where
    T: FloatT,
{
    fn get_next<M: MeritFunction<T>>(
        &mut self,
        model: &M,
        point: &[T],
        loss: T,
        gradient: &[T],
        direction: &[T],
        next_point: &mut [T],
        next_gradient: &mut [T],
    ) -> Result<LineSearchStep<T>, SolverError> {
        self.stats.calls += 1;
        let slope = descent_slope(gradient, direction)?;

        let start = Trial {
            α: T::zero(),
            f: loss,
            df: slope,
        };
        let mut prev = start;
        let mut α = self.initial_step(loss, slope);
        let mut accepted = None;

        for i in 0..self.max_iter {
            let t = self.evaluate(model, α, point, direction, next_point, next_gradient)?;

            if !self.sufficient_decrease(&t, loss, slope) || (i > 0 && t.f >= prev.f) {
                let (p, d) = (point, direction);
                accepted =
                    Some(self.zoom(model, prev, t, loss, slope, p, d, next_point, next_gradient)?);
                break;
            }
            if self.flat_enough(&t, slope) {
                accepted = Some(t);
                break;
            }
            if t.df >= T::zero() {
                let (p, d) = (point, direction);
                accepted =
                    Some(self.zoom(model, t, prev, loss, slope, p, d, next_point, next_gradient)?);
                break;
            }
            prev = t;
            α = α * (2.0).as_T();
        }

        let t = accepted.ok_or_else(no_convergence)?;
        self.prev_loss = Some(loss);

        Ok(LineSearchStep {
            step: t.α,
            loss: t.f,
            has_gradient: true,
        })
    }

    fn stats(&self) -> &LineSearchStats {
        &self.stats
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cubic_interpolation() {
        // f(α) = (α - 0.3)^2 has its minimizer at 0.3, and the cubic
        // through a quadratic is exact
        let f = |α: f64| (α - 0.3) * (α - 0.3);
        let df = |α: f64| 2. * (α - 0.3);
        let lo = Trial {
            α: 0.,
            f: f(0.),
            df: df(0.),
        };
        let hi = Trial {
            α: 1.,
            f: f(1.),
            df: df(1.),
        };
        assert!((interpolate(&lo, &hi) - 0.3).abs() < 1e-12);
        assert!((interpolate(&hi, &lo) - 0.3).abs() < 1e-12);

        // non-finite end falls back to bisection
        let hi = Trial {
            α: 1.,
            f: f64::INFINITY,
            df: f64::NAN,
        };
        assert_eq!(interpolate(&lo, &hi), 0.5);
    }
}
