use curvature::core::cas::Expr;
use curvature::core::geometry::{Curvature, Metric, Options, Preset, DIM};

fn compute(preset: Preset) -> Curvature {
    Curvature::compute(Metric::preset(preset), Options::default()).expect("presets are regular")
}

#[test]
fn every_preset_satisfies_the_basic_identities() {
    for preset in Preset::all() {
        let c = compute(preset);
        assert!(c.inverse.is_inverse_of(&c.metric), "{}", preset);
        assert!(c.christoffel.is_symmetric(), "{}", preset);
        assert!(c.ricci.is_symmetric(), "{}", preset);
    }
}

#[test]
fn flat_space_is_vacuum() {
    let c = compute(Preset::Minkowski);
    assert!(c.is_vacuum());
    assert!(c.einstein.is_zero());
}

#[test]
fn static_universe() {
    let c = compute(Preset::StaticUniverse);
    let k = Expr::symbol("k");
    assert!(c.ricci.get(0, 0).is_zero());
    for i in 1..DIM {
        let expected = Expr::integer(2) * &k * c.metric.get(i, i);
        assert!(c.ricci.get(i, i).equivalent(&expected));
    }
    assert!(c.scalar.equivalent(&(Expr::integer(6) * &k)));
    // G_tt = 3k, G_ij = -k g_ij on the spatial slice
    assert!(c.einstein.get(0, 0).equivalent(&(Expr::integer(3) * &k)));
    for i in 1..DIM {
        assert!(c.einstein.get(i, i).equivalent(&(-(&k * c.metric.get(i, i)))));
    }
}

#[test]
fn reissner_nordstrom_field_is_traceless() {
    let c = compute(Preset::ReissnerNordstrom);
    assert!(!c.is_vacuum());
    assert!(!c.ricci.get(0, 0).is_zero());
    assert!(c.scalar.is_zero());
    // without charge it is Schwarzschild again
    let uncharged = c.ricci.get(0, 0).subs("Q", &Expr::zero());
    assert!(uncharged.is_zero());
}
