//! Text report of a curvature pass.

use super::{upper_pairs, Coordinates, Curvature, Matrix4, DIM};
use crate::core::cas::render::{display_name, labeled};

pub fn banner(pretty: bool) -> String {
    if pretty {
        "Einstein field equations:\n  G_μν = R_μν − ½·R·g_μν = (8πG/c⁴)·T_μν".to_string()
    } else {
        "Einstein field equations:\n  G_{mu nu} = R_{mu nu} - 1/2 R g_{mu nu} = 8 pi G/c^4 T_{mu nu}".to_string()
    }
}

/// Index label such as `g_{t t}`, `Gamma^{r}_{t t}` or, pretty, `Γ^r_tt`.
pub fn label(base: &str, upper: &[usize], lower: &[usize], coords: &Coordinates, pretty: bool) -> String {
    let names = |idx: &[usize]| -> Vec<String> { idx.iter().map(|&i| display_name(coords.name(i), pretty)).collect() };
    let mut out = if pretty && base == "Gamma" { "Γ".to_string() } else { base.to_string() };
    for (mark, idx) in [('^', upper), ('_', lower)] {
        if idx.is_empty() {
            continue;
        }
        out.push(mark);
        if pretty {
            out.push_str(&names(idx).concat());
        } else {
            out.push_str(&format!("{{{}}}", names(idx).join(" ")));
        }
    }
    out
}

pub fn render(c: &Curvature, pretty: bool) -> String {
    let coords = c.metric.coords();
    let mut sections = vec![banner(pretty), format!("Coordinates: {}", coords)];

    sections.push(matrix_section("Metric", "g", false, c.metric.components(), coords, pretty));
    sections.push(matrix_section("Inverse metric", "g", true, c.inverse.components(), coords, pretty));

    let mut lines = vec!["Christoffel symbols (nonzero, symmetric in the lower indices):".to_string()];
    for (k, i, j, e) in c.christoffel.nonzero().filter(|(_, i, j, _)| i <= j) {
        lines.push(indent(&labeled(&label("Gamma", &[k], &[i, j], coords, pretty), e, pretty)));
    }
    if lines.len() == 1 {
        lines.push("  (all zero)".to_string());
    }
    sections.push(lines.join("\n"));

    let mut lines = vec!["Ricci tensor:".to_string()];
    for (i, j) in upper_pairs() {
        lines.push(indent(&labeled(&label("R", &[], &[i, j], coords, pretty), c.ricci.get(i, j), pretty)));
    }
    if c.ricci.is_vacuum() {
        lines.push("  Ricci tensor vanishes identically (vacuum solution)".to_string());
    }
    sections.push(lines.join("\n"));

    sections.push(format!("Ricci scalar:\n{}", indent(&labeled("R", &c.scalar, pretty))));
    sections.push(matrix_section("Einstein tensor", "G", false, c.einstein.components(), coords, pretty));
    sections.join("\n\n")
}

fn matrix_section(title: &str, base: &str, upper: bool, m: &Matrix4, coords: &Coordinates, pretty: bool) -> String {
    let mut lines = vec![format!("{}:", title)];
    for (i, j) in upper_pairs() {
        if m[i][j].is_zero() {
            continue;
        }
        let name = if upper {
            label(base, &[i, j], &[], coords, pretty)
        } else {
            label(base, &[], &[i, j], coords, pretty)
        };
        lines.push(indent(&labeled(&name, &m[i][j], pretty)));
    }
    if lines.len() == 1 {
        lines.push(format!("  (all {} components zero)", DIM * DIM));
    }
    lines.join("\n")
}

fn indent(text: &str) -> String {
    text.lines().map(|line| format!("  {}", line)).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Metric, Options};

    #[test]
    fn labels() {
        let c = Coordinates::spherical();
        assert_eq!(label("g", &[], &[0, 0], &c, false), "g_{t t}");
        assert_eq!(label("g", &[2, 2], &[], &c, false), "g^{theta theta}");
        assert_eq!(label("Gamma", &[1], &[0, 0], &c, false), "Gamma^{r}_{t t}");
        assert_eq!(label("Gamma", &[2], &[3, 3], &c, true), "Γ^θ_φφ");
        assert_eq!(label("R", &[], &[1, 2], &c, true), "R_rθ");
    }

    #[test]
    fn schwarzschild_report() {
        let c = Curvature::compute(Metric::schwarzschild(), Options::default()).unwrap();
        let text = render(&c, false);
        assert!(text.starts_with("Einstein field equations:"));
        assert!(text.contains("  g_{t t} = -(c^2*r - 2*G*M)/(c^2*r)"));
        assert!(text.contains("  Gamma^{theta}_{phi phi} = -sin(theta)*cos(theta)"));
        assert!(text.contains("  Gamma^{phi}_{r phi} = 1/r"));
        assert!(!text.contains("Gamma^{phi}_{phi r}"));
        assert!(text.contains("  R_{t t} = 0"));
        assert!(text.contains("vacuum solution"));
        assert!(text.contains("Ricci scalar:\n  R = 0"));
        assert!(text.contains("Einstein tensor:\n  (all 16 components zero)"));
    }
}
