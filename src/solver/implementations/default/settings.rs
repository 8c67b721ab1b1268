use crate::solver::core::{DirectionMethod, LineSearchMethod};
use crate::{algebra::*, solver::core::SettingsError};
use derive_builder::Builder;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Standard-form solver settings.
///
/// Construct with [`DefaultSettingsBuilder`], which validates values on
/// `build()`, or start from `DefaultSettings::default()` and overwrite
/// fields directly.  Settings are checked again when a solver is created.

#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(private, name = "build_unvalidated"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DefaultSettings<T: FloatT> {
    ///maximum number of outer Newton iterations
    #[builder(default = "1000")]
    pub outer_iteration_cap: u32,

    ///maximum run time (seconds)
    #[builder(default = "f64::INFINITY")]
    pub time_limit: f64,

    ///verbose printing
    #[builder(default = "false")]
    pub verbose: bool,

    ///gradient tolerance, applied to the infinity norm of the gradient
    ///divided by the number of variables plus constraints
    #[builder(default = "T::epsilon()")]
    pub tol_gradient: T,

    ///loss tolerance
    #[builder(default = "(1e-24).as_T()")]
    pub tol_loss: T,

    ///a line search that makes no progress at a loss below this value
    ///hands the point over to refinement rather than failing
    #[builder(default = "T::epsilon()")]
    pub tol_stall_loss: T,

    // Newton direction settings

    ///method for computing Newton directions
    #[builder(default = "DirectionMethod::CgNewton")]
    pub direction_method: DirectionMethod,

    ///lower bound on the Hessian regularization
    #[builder(default = "T::epsilon()")]
    pub cg_regularization_floor: T,

    ///maximum CG iterations per direction.  0 means ten times the dimension
    #[builder(default = "0")]
    pub cg_max_iter: usize,

    ///start each CG solve from the previous direction
    #[builder(default = "false")]
    pub cg_warm_start: bool,

    // line search settings

    ///line search method
    #[builder(default = "LineSearchMethod::Backtracking")]
    pub line_search_method: LineSearchMethod,

    ///maximum number of step reductions in backtracking
    #[builder(default = "1000")]
    pub line_search_max_backtracks: u32,

    ///first step tried by backtracking
    #[builder(default = "T::one()")]
    pub linesearch_initial_step: T,

    ///step reduction factor in backtracking
    #[builder(default = "(0.9).as_T()")]
    pub linesearch_backtrack_step: T,

    ///sufficient decrease (Armijo) constant
    #[builder(default = "(1e-4).as_T()")]
    pub linesearch_armijo: T,

    ///curvature constant for the strong Wolfe conditions
    #[builder(default = "(0.9).as_T()")]
    pub linesearch_curvature: T,

    ///number of trial steps for grid searches
    #[builder(default = "100")]
    pub linesearch_grid_len: usize,

    ///largest trial step for grid searches
    #[builder(default = "(1.5).as_T()")]
    pub linesearch_max_step: T,

    ///smallest trial step for logarithmic grid search
    #[builder(default = "(1e-8).as_T()")]
    pub linesearch_min_step: T,

    ///maximum bracketing and zoom iterations for the strong Wolfe search
    #[builder(default = "10")]
    pub linesearch_wolfe_max_iter: u32,

    // problem transformation settings

    ///enable data equilibration pre-scaling
    #[builder(default = "true")]
    pub equilibrate_enable: bool,

    ///maximum equilibration scaling iterations
    #[builder(default = "25")]
    pub max_equilibration_iters: u32,

    ///minimum equilibration scaling allowed
    #[builder(default = "(1e-4).as_T()")]
    pub equilibrate_min_scaling: T,

    ///maximum equilibration scaling allowed
    #[builder(default = "(1e+4).as_T()")]
    pub equilibrate_max_scaling: T,

    ///eliminate the dual equality constraints by a QR nullspace basis
    #[builder(default = "true")]
    pub qr_presolve: bool,

    // refinement settings

    ///number of refinement rounds
    #[builder(default = "3")]
    pub refinement_rounds: u32,

    ///maximum LSQR iterations per refinement round.  0 means the dimension
    #[builder(default = "0")]
    pub refinement_lsqr_max_iter: usize,

    ///smallest homogenizing variable accepted after refinement
    #[builder(default = "(1e-8).as_T()")]
    pub refinement_min_tau: T,
}

impl<T> Default for DefaultSettings<T>
where
    T: FloatT,
{
    fn default() -> DefaultSettings<T> {
        DefaultSettingsBuilder::<T>::default().build().unwrap()
    }
}

impl<T> DefaultSettings<T>
where
    T: FloatT,
{
    /// Checks that numerical values are in range and mutually consistent.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let bad = |field| Err(SettingsError::BadField(field));
        let (zero, one) = (T::zero(), T::one());

        if self.linesearch_grid_len == 0 {
            return bad("linesearch_grid_len");
        }
        if !(self.linesearch_backtrack_step > zero && self.linesearch_backtrack_step < one) {
            return bad("linesearch_backtrack_step");
        }
        if !(self.linesearch_armijo > zero && self.linesearch_armijo < one) {
            return bad("linesearch_armijo");
        }
        if !(self.linesearch_curvature > self.linesearch_armijo && self.linesearch_curvature < one)
        {
            return bad("linesearch_curvature");
        }
        if !(self.linesearch_initial_step > zero) {
            return bad("linesearch_initial_step");
        }
        if !(self.linesearch_min_step > zero && self.linesearch_min_step < self.linesearch_max_step)
        {
            return bad("linesearch_min_step");
        }
        if !(self.linesearch_max_step.is_finite()) {
            return bad("linesearch_max_step");
        }
        for (field, tol) in [
            ("tol_gradient", self.tol_gradient),
            ("tol_loss", self.tol_loss),
            ("tol_stall_loss", self.tol_stall_loss),
            ("cg_regularization_floor", self.cg_regularization_floor),
            ("refinement_min_tau", self.refinement_min_tau),
        ] {
            if !(tol >= zero) {
                return bad(field);
            }
        }
        if !(self.equilibrate_min_scaling > zero
            && self.equilibrate_min_scaling <= self.equilibrate_max_scaling)
        {
            return bad("equilibrate_min_scaling");
        }
        if self.time_limit.is_nan() || self.time_limit < 0.0 {
            return bad("time_limit");
        }
        Ok(())
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for DefaultSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        DefaultSettingsBuilderError::ValidationError(e.to_string())
    }
}

impl<T> DefaultSettingsBuilder<T>
where
    T: FloatT,
{
    /// Builds a new `DefaultSettings`, checking values with
    /// [`DefaultSettings::validate`].
    pub fn build(&self) -> Result<DefaultSettings<T>, DefaultSettingsBuilderError> {
        let settings = self.build_unvalidated()?;
        settings.validate()?;
        Ok(settings)
    }
}

#[test]
fn test_settings_validate() {
    // all standard settings
    let settings = DefaultSettingsBuilder::<f64>::default().build().unwrap();
    assert_eq!(settings.outer_iteration_cap, 1000);
    assert_eq!(settings.tol_gradient, f64::EPSILON);
    assert_eq!(settings.direction_method, DirectionMethod::CgNewton);
    assert_eq!(settings.line_search_method, LineSearchMethod::Backtracking);

    // curvature constant must exceed the Armijo constant
    assert!(DefaultSettingsBuilder::<f64>::default()
        .linesearch_armijo(0.5)
        .linesearch_curvature(0.4)
        .build()
        .is_err());

    assert!(DefaultSettingsBuilder::<f64>::default()
        .linesearch_backtrack_step(1.0)
        .build()
        .is_err());

    assert!(DefaultSettingsBuilder::<f64>::default()
        .linesearch_grid_len(0)
        .build()
        .is_err());

    assert!(DefaultSettingsBuilder::<f64>::default()
        .linesearch_min_step(2.0)
        .build()
        .is_err());

    // directly construct a bad DefaultSettings and manually check
    let settings = DefaultSettings::<f64> {
        tol_loss: -1.0,
        ..DefaultSettings::default()
    };
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadField("tol_loss"))
    );

    let settings = DefaultSettings::<f64> {
        equilibrate_min_scaling: 10.,
        equilibrate_max_scaling: 1.,
        ..DefaultSettings::default()
    };
    assert!(settings.validate().is_err());
}
