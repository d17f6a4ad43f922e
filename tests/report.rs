use curvature::core::geometry::report::{banner, label};
use curvature::core::geometry::{Curvature, Metric, Options};

#[test]
fn banner_snapshot() {
    insta::assert_snapshot!(banner(false), @r###"
    Einstein field equations:
      G_{mu nu} = R_{mu nu} - 1/2 R g_{mu nu} = 8 pi G/c^4 T_{mu nu}
    "###);
}

#[test]
fn schwarzschild_christoffel_labels_snapshot() {
    let c = Curvature::compute(Metric::schwarzschild(), Options::default()).unwrap();
    let labels: Vec<String> = c
        .christoffel
        .nonzero()
        .filter(|(_, i, j, _)| i <= j)
        .map(|(k, i, j, _)| label("Gamma", &[k], &[i, j], c.metric.coords(), false))
        .collect();
    insta::assert_snapshot!(labels.join("\n"), @r###"
    Gamma^{t}_{t r}
    Gamma^{r}_{t t}
    Gamma^{r}_{r r}
    Gamma^{r}_{theta theta}
    Gamma^{r}_{phi phi}
    Gamma^{theta}_{r theta}
    Gamma^{theta}_{phi phi}
    Gamma^{phi}_{r phi}
    Gamma^{phi}_{theta phi}
    "###);
}

#[test]
fn pretty_labels_use_greek_letters() {
    let coords = Metric::schwarzschild().coords().clone();
    assert_eq!(label("Gamma", &[3], &[2, 3], &coords, true), "Γ^φ_θφ");
    assert_eq!(label("g", &[2, 2], &[], &coords, true), "g^θθ");
}
