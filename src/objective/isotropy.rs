//! Problem-level switches parsed from benchmark configuration strings.
//!
//! - [`Isotropy`]: which TV variant the problem uses.
//! - [`DataFit`]: which data-fidelity term the problem uses.
//!
//! Both parse case-insensitively via `FromStr` and print the canonical
//! lower-case name via `Display`, so they round-trip through parameter grids.
use std::str::FromStr;

use crate::objective::errors::{ObjectiveError, ObjectiveResult};

/// TV variant.
///
/// Variants:
/// - `Anisotropic`: `sum |Lh u| + |Lv u|`; separable per direction.
/// - `Isotropic`: `sum sqrt((Lh u)^2 + (Lv u)^2)`; couples both directions
///   per pixel.
///
/// Parsing accepts `"anisotropic"` / `"isotropic"` in any case. Unknown
/// names return [`ObjectiveError::UnknownIsotropy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Isotropy {
    Anisotropic,
    Isotropic,
}

impl Isotropy {
    pub const ALL: [Isotropy; 2] = [Isotropy::Anisotropic, Isotropy::Isotropic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Isotropy::Anisotropic => "anisotropic",
            Isotropy::Isotropic => "isotropic",
        }
    }
}

impl FromStr for Isotropy {
    type Err = ObjectiveError;

    fn from_str(s: &str) -> ObjectiveResult<Self> {
        match s.to_lowercase().as_str() {
            "anisotropic" => Ok(Isotropy::Anisotropic),
            "isotropic" => Ok(Isotropy::Isotropic),
            _ => Err(ObjectiveError::UnknownIsotropy {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'anisotropic' or 'isotropic'.",
            }),
        }
    }
}

impl std::fmt::Display for Isotropy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data-fidelity term. Only least squares (`"lsq"`) is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataFit {
    #[default]
    Lsq,
}

impl DataFit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataFit::Lsq => "lsq",
        }
    }
}

impl FromStr for DataFit {
    type Err = ObjectiveError;

    fn from_str(s: &str) -> ObjectiveResult<Self> {
        match s.to_lowercase().as_str() {
            "lsq" => Ok(DataFit::Lsq),
            _ => Err(ObjectiveError::UnknownDataFit {
                name: s.to_string(),
                reason: "The only supported data fit is 'lsq'.",
            }),
        }
    }
}

impl std::fmt::Display for DataFit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isotropy_parses_case_insensitively_and_round_trips() {
        assert_eq!("ISOTROPIC".parse::<Isotropy>(), Ok(Isotropy::Isotropic));
        assert_eq!("Anisotropic".parse::<Isotropy>(), Ok(Isotropy::Anisotropic));
        for iso in Isotropy::ALL {
            assert_eq!(iso.to_string().parse::<Isotropy>(), Ok(iso));
        }
        assert!(matches!("l1".parse::<Isotropy>(), Err(ObjectiveError::UnknownIsotropy { .. })));
    }

    #[test]
    fn data_fit_accepts_only_lsq() {
        assert_eq!("LSQ".parse::<DataFit>(), Ok(DataFit::Lsq));
        assert_eq!(DataFit::default().to_string(), "lsq");
        assert!(matches!("huber".parse::<DataFit>(), Err(ObjectiveError::UnknownDataFit { .. })));
    }
}
