//! Chemical elements (fully ionized nuclei).

use crate::error::{PlasmaError, PlasmaResult};
use std::borrow::Cow;
use std::fmt;

/// Heaviest atomic number accepted.
pub const MAX_Z: u32 = 118;
/// Heaviest mass number accepted.
pub const MAX_A: u32 = 300;

/// Nucleus identified by mass number A and atomic number Z.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element {
    a: u32,
    z: u32,
    name: Cow<'static, str>,
}

impl Element {
    pub const HYDROGEN: Element = Element::known(1, 1, "Hydrogen");
    pub const HELIUM: Element = Element::known(4, 2, "Helium");
    pub const CARBON: Element = Element::known(12, 6, "Carbon");
    pub const NITROGEN: Element = Element::known(14, 7, "Nitrogen");
    pub const OXYGEN: Element = Element::known(16, 8, "Oxygen");
    pub const NEON: Element = Element::known(20, 10, "Neon");
    pub const MAGNESIUM: Element = Element::known(24, 12, "Magnesium");
    pub const SILICON: Element = Element::known(28, 14, "Silicon");
    pub const SULFUR: Element = Element::known(32, 16, "Sulfur");
    pub const CALCIUM: Element = Element::known(40, 20, "Calcium");
    pub const IRON_56: Element = Element::known(56, 26, "Iron-56");

    pub const CATALOG: [Element; 11] = [
        Element::HYDROGEN,
        Element::HELIUM,
        Element::CARBON,
        Element::NITROGEN,
        Element::OXYGEN,
        Element::NEON,
        Element::MAGNESIUM,
        Element::SILICON,
        Element::SULFUR,
        Element::CALCIUM,
        Element::IRON_56,
    ];

    const fn known(a: u32, z: u32, name: &'static str) -> Self {
        Self {
            a,
            z,
            name: Cow::Borrowed(name),
        }
    }

    /// Create an element, checking 1 ≤ Z ≤ A and both within periodic-table range.
    pub fn new(a: u32, z: u32, name: impl Into<Cow<'static, str>>) -> PlasmaResult<Self> {
        let name = name.into();
        let invalid = |what| PlasmaError::InvalidElement {
            what,
            name: name.to_string(),
            a,
            z,
        };
        if z == 0 || z > MAX_Z {
            return Err(invalid("atomic number out of range"));
        }
        if a > MAX_A {
            return Err(invalid("mass number out of range"));
        }
        if a < z {
            return Err(invalid("fewer nucleons than protons"));
        }
        Ok(Self { a, z, name })
    }

    /// Mass number A.
    pub fn a(&self) -> u32 {
        self.a
    }

    /// Atomic number Z.
    pub fn z(&self) -> u32 {
        self.z
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Z as a float, for use in physics expressions.
    pub fn charge(&self) -> f64 {
        f64::from(self.z)
    }

    /// A as a float, for use in physics expressions.
    pub fn mass_number(&self) -> f64 {
        f64::from(self.a)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (A={}, Z={})", self.name, self.a, self.z)
    }
}

impl std::str::FromStr for Element {
    type Err = PlasmaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "H" | "H1" | "HYDROGEN" => Ok(Element::HYDROGEN),
            "HE" | "HE4" | "HELIUM" => Ok(Element::HELIUM),
            "C" | "C12" | "CARBON" => Ok(Element::CARBON),
            "N" | "N14" | "NITROGEN" => Ok(Element::NITROGEN),
            "O" | "O16" | "OXYGEN" => Ok(Element::OXYGEN),
            "NE" | "NE20" | "NEON" => Ok(Element::NEON),
            "MG" | "MG24" | "MAGNESIUM" => Ok(Element::MAGNESIUM),
            "SI" | "SI28" | "SILICON" => Ok(Element::SILICON),
            "S" | "S32" | "SULFUR" | "SULPHUR" => Ok(Element::SULFUR),
            "CA" | "CA40" | "CALCIUM" => Ok(Element::CALCIUM),
            "FE" | "FE56" | "IRON" | "IRON-56" => Ok(Element::IRON_56),
            _ => Err(PlasmaError::UnknownElement { key: s.to_string() }),
        }
    }
}
