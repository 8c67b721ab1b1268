use super::*;
use crate::solver::core::cones::*;

fn soc_cone() -> CompositeCone<f64> {
    CompositeCone::new(&[SupportedConeT::SecondOrderConeT(vec![2.0, 0.5, 1.0])])
}

#[test]
fn numel_and_counts() {
    let cones = CompositeCone::<f64>::new(&[
        SupportedConeT::ZeroConeT(3),
        SupportedConeT::NonnegativeConeT(2),
        SupportedConeT::SecondOrderConeT(vec![1.0, 1.0]),
        SupportedConeT::NonnegativeConeT(1),
    ]);
    assert_eq!(cones.numel(), 3 + 2 + 3 + 1);
    assert_eq!(cones.len(), 4);
    assert_eq!(cones.get_type_count(SupportedConeTag::NonnegativeCone), 2);
    assert_eq!(cones.get_type_count(SupportedConeTag::SecondOrderCone), 1);
}

#[test]
fn zero_cone_primal_and_dual() {
    let cones = CompositeCone::<f64>::new(&[SupportedConeT::ZeroConeT(3)]);
    let mut x = vec![1., -2., 3.];
    cones.project(&mut x, PrimalOrDualCone::PrimalCone).unwrap();
    assert_eq!(x, vec![0.; 3]);

    let mut x = vec![1., -2., 3.];
    cones.project(&mut x, PrimalOrDualCone::DualCone).unwrap();
    assert_eq!(x, vec![1., -2., 3.]);
}

#[test]
fn projection_is_idempotent() {
    let mut rng = rng();
    let cones = soc_cone();
    for pd in [PrimalOrDualCone::PrimalCone, PrimalOrDualCone::DualCone] {
        for _ in 0..20 {
            let mut x = randvec(&mut rng, 4);
            cones.project(&mut x, pd).unwrap();
            let mut xx = x.clone();
            cones.project(&mut xx, pd).unwrap();
            assert!(x.norm_inf_diff(&xx) < 1e-12);
        }
    }
}

// x = Π_K(x) - Π_K*(-x), with the two parts orthogonal
#[test]
fn moreau_decomposition() {
    let mut rng = rng();
    let cones = soc_cone();
    for _ in 0..50 {
        let x = randvec(&mut rng, 4);

        let mut p = x.clone();
        cones.project(&mut p, PrimalOrDualCone::PrimalCone).unwrap();
        let mut d = x.clone();
        d.negate();
        cones.project(&mut d, PrimalOrDualCone::DualCone).unwrap();

        let mut sum = p.clone();
        sum.axpby(-1., &d, 1.);
        assert!(sum.norm_inf_diff(&x) < 1e-9);
        assert!(p.dot(&d).abs() < 1e-9);
    }
}

#[test]
fn distance_is_residual_of_projection() {
    let cones = CompositeCone::<f64>::new(&[SupportedConeT::NonnegativeConeT(3)]);
    let x = vec![-1., 2., -3.];
    let mut e = vec![0.; 3];
    cones
        .distance(&mut e, &x, PrimalOrDualCone::PrimalCone)
        .unwrap();
    assert_eq!(e, vec![-1., 0., -3.]);
}

// compares J*v against central differences of the projection
fn check_jacobian(cones: &CompositeCone<f64>, x: &[f64], pd: PrimalOrDualCone) {
    let n = x.len();
    let J = cones.jacobian(x, pd).unwrap();
    let h = 1e-6;

    for i in 0..n {
        let mut ei = vec![0.; n];
        ei[i] = 1.;
        let mut Jei = vec![0.; n];
        J.apply(&mut Jei, &ei);

        let mut xp = x.to_vec();
        xp[i] += h;
        cones.project(&mut xp, pd).unwrap();
        let mut xm = x.to_vec();
        xm[i] -= h;
        cones.project(&mut xm, pd).unwrap();

        let mut fd = xp;
        fd.axpby(-1. / (2. * h), &xm, 1. / (2. * h));
        assert!(fd.norm_inf_diff(&Jei) < 1e-6, "column {i}: {fd:?} vs {Jei:?}");
    }

    // transpose agrees with the forward map
    let mut rng = super::rng();
    let u = randvec(&mut rng, n);
    let v = randvec(&mut rng, n);
    let mut Jv = vec![0.; n];
    let mut Jtu = vec![0.; n];
    J.apply(&mut Jv, &v);
    J.apply_transpose(&mut Jtu, &u);
    assert!((u.dot(&Jv) - v.dot(&Jtu)).abs() < 1e-12);
}

#[test]
fn soc_jacobian_matches_finite_differences() {
    let cones = soc_cone();
    // points strictly between the cone and its polar
    let x = [0.1, 0.8, -0.4, 0.3];
    check_jacobian(&cones, &x, PrimalOrDualCone::PrimalCone);
    check_jacobian(&cones, &x, PrimalOrDualCone::DualCone);

    let x = [-0.2, 0.5, 1.2, -0.7];
    check_jacobian(&cones, &x, PrimalOrDualCone::PrimalCone);
}

#[test]
fn mixed_jacobian_matches_finite_differences() {
    let cones = CompositeCone::<f64>::new(&[
        SupportedConeT::ZeroConeT(1),
        SupportedConeT::NonnegativeConeT(2),
        SupportedConeT::SecondOrderConeT(vec![1.5, 0.5]),
    ]);
    let x = [0.3, -0.7, 0.4, 0.2, -0.9, 0.6];
    check_jacobian(&cones, &x, PrimalOrDualCone::PrimalCone);
    check_jacobian(&cones, &x, PrimalOrDualCone::DualCone);
}

#[test]
fn rectified_cone_tracks_row_scaling() {
    // s in K_a if and only if e⊙s lies in the rectified cone
    let mut cones = soc_cone();
    let e = [2.0, 0.5, 4.0, 1.0];
    let s = [3.0, 1.0, 2.0, 0.5];

    let mut p = s.to_vec();
    cones.project(&mut p, PrimalOrDualCone::PrimalCone).unwrap();
    let inside = p.norm_inf_diff(&s) < 1e-14;

    cones.rectify_equilibration(&e);
    let mut es = s.to_vec();
    es.hadamard(&e);
    let mut p = es.clone();
    cones.project(&mut p, PrimalOrDualCone::PrimalCone).unwrap();
    assert_eq!(p.norm_inf_diff(&es) < 1e-14, inside);
}
