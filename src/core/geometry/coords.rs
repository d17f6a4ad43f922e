use std::fmt;

use super::{TensorError, DIM};

/// Ordered coordinate names of a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    names: [String; DIM],
}

impl Coordinates {
    pub fn new(names: [&str; DIM]) -> Self {
        Self { names: names.map(str::to_string) }
    }

    /// `(t, r, theta, phi)`
    pub fn spherical() -> Self {
        Self::new(["t", "r", "theta", "phi"])
    }

    pub fn from_vec(names: Vec<String>) -> Result<Self, TensorError> {
        let count = names.len();
        let names: [String; DIM] = names.try_into().map_err(|_| TensorError::CoordinateCount(count))?;
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(TensorError::DuplicateCoordinate(name.clone()));
            }
        }
        Ok(Self { names })
    }

    pub fn name(&self, i: usize) -> &str {
        &self.names[i]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::spherical()
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spherical_chart() {
        let c = Coordinates::spherical();
        assert_eq!(c.name(2), "theta");
        assert_eq!(c.index_of("phi"), Some(3));
        assert_eq!(c.to_string(), "(t, r, theta, phi)");
    }

    #[test]
    fn from_vec_checks_count_and_duplicates() {
        let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(Coordinates::from_vec(names(&["t", "x", "y"])), Err(TensorError::CoordinateCount(3)));
        assert_eq!(
            Coordinates::from_vec(names(&["t", "x", "x", "z"])),
            Err(TensorError::DuplicateCoordinate("x".into()))
        );
        let c = Coordinates::from_vec(names(&["t", "x", "y", "z"])).unwrap();
        assert!(c.contains("z"));
    }
}
