//! Plasma composition by mass fraction.

use crate::element::Element;
use crate::error::{PlasmaError, PlasmaResult};
use std::fmt;
use tfdh_core::numeric::{Tolerances, nearly_equal};

/// Mass fractions must sum to one within this tolerance.
const MASS_FRACTION_SUM_TOL: Tolerances = Tolerances::new(1e-12, 0.0);

/// One species of a composition: an element and its mass fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Abundance {
    mass_fraction: f64,
    element: Element,
}

impl Abundance {
    /// Validates `0 < mass_fraction <= 1`.
    pub fn new(mass_fraction: f64, element: Element) -> PlasmaResult<Self> {
        if !mass_fraction.is_finite() || mass_fraction <= 0.0 || mass_fraction > 1.0 {
            return Err(PlasmaError::InvalidMassFraction {
                value: mass_fraction,
            });
        }
        Ok(Self {
            mass_fraction,
            element,
        })
    }

    pub fn mass_fraction(&self) -> f64 {
        self.mass_fraction
    }

    pub fn element(&self) -> &Element {
        &self.element
    }
}

/// Fully ionized mixture, mass fractions summing to one.
///
/// Caches the mean molecular weight per electron
/// μ_e = 1 / Σ (X_i Z_i / A_i).
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    abundances: Vec<Abundance>,
    mu_e: f64,
}

impl Composition {
    /// Build from validated abundances. The order is preserved; per-species
    /// quantities elsewhere are indexed the same way.
    pub fn new(abundances: Vec<Abundance>) -> PlasmaResult<Self> {
        if abundances.is_empty() {
            return Err(PlasmaError::InvalidComposition {
                what: "empty composition",
            });
        }

        let sum: f64 = abundances.iter().map(|a| a.mass_fraction).sum();
        if !nearly_equal(sum, 1.0, MASS_FRACTION_SUM_TOL) {
            return Err(PlasmaError::MassFractionSum { sum });
        }

        let inv_mu_e: f64 = abundances
            .iter()
            .map(|a| a.mass_fraction * a.element.charge() / a.element.mass_number())
            .sum();

        Ok(Self {
            abundances,
            mu_e: 1.0 / inv_mu_e,
        })
    }

    /// Convenience over [`Composition::new`] from `(element, mass fraction)` pairs.
    pub fn from_mass_fractions(fractions: Vec<(Element, f64)>) -> PlasmaResult<Self> {
        let abundances = fractions
            .into_iter()
            .map(|(e, x)| Abundance::new(x, e))
            .collect::<PlasmaResult<Vec<_>>>()?;
        Self::new(abundances)
    }

    /// Single-species composition; μ_e = A/Z.
    pub fn pure(element: Element) -> Self {
        let mu_e = element.mass_number() / element.charge();
        Self {
            abundances: vec![Abundance {
                mass_fraction: 1.0,
                element,
            }],
            mu_e,
        }
    }

    /// Mean molecular weight per electron.
    pub fn mu_e(&self) -> f64 {
        self.mu_e
    }

    pub fn abundances(&self) -> &[Abundance] {
        &self.abundances
    }

    pub fn len(&self) -> usize {
        self.abundances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abundances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Abundance> + '_ {
        self.abundances.iter()
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, a) in self.abundances.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", a.mass_fraction, a.element.name())?;
        }
        Ok(())
    }
}

/// Parses `"He:0.5,H:0.5"` (element key, colon, mass fraction; comma separated).
impl std::str::FromStr for Composition {
    type Err = PlasmaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fractions = Vec::new();
        for item in s.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            let (key, fraction) = item.split_once(':').ok_or(PlasmaError::InvalidComposition {
                what: "expected <element>:<mass fraction>",
            })?;
            let element: Element = key.parse()?;
            let fraction: f64 = fraction.trim().parse().map_err(|_| {
                PlasmaError::InvalidComposition {
                    what: "mass fraction is not a number",
                }
            })?;
            fractions.push((element, fraction));
        }
        Self::from_mass_fractions(fractions)
    }
}
