use conicls::solver::*;

#[test]
fn test_settings_defaults() {
    let settings = DefaultSettings::<f64>::default();
    assert_eq!(settings.outer_iteration_cap, 1000);
    assert!(settings.time_limit.is_infinite());
    assert!(!settings.verbose);
    assert!(settings.qr_presolve);
    assert!(settings.equilibrate_enable);
    assert_eq!(settings.refinement_rounds, 3);
    assert_eq!(settings.direction_method, DirectionMethod::CgNewton);
    assert_eq!(settings.line_search_method, LineSearchMethod::Backtracking);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_settings_builder_validates() {
    assert!(DefaultSettingsBuilder::<f64>::default()
        .tol_gradient(-1.)
        .build()
        .is_err());
    assert!(DefaultSettingsBuilder::<f64>::default()
        .equilibrate_min_scaling(10.)
        .equilibrate_max_scaling(1.)
        .build()
        .is_err());
    assert!(DefaultSettingsBuilder::<f64>::default()
        .time_limit(f64::NAN)
        .build()
        .is_err());
}

#[test]
fn test_settings_validate_reports_field() {
    let settings = DefaultSettings::<f64> {
        linesearch_curvature: 1e-6,
        ..DefaultSettings::default()
    };
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadField("linesearch_curvature"))
    );
}
