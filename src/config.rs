use std::{fmt, str::FromStr};

use crate::error::UnsupportedSourceError;

/// Elements measured by APOGEE, reported by default.
pub const DEFAULT_ELEMENTS: [&str; 16] = [
    "C", "N", "O", "Na", "Mg", "Al", "Si", "S", "K", "Ca", "Ti", "V", "Cr", "Mn", "Co", "Ni",
];

/// Reference for solar abundances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolarSource {
    /// Lodders (2003) photospheric abundances.
    #[default]
    Lodders,
}

impl SolarSource {
    pub fn id(&self) -> &'static str {
        match self {
            SolarSource::Lodders => "lodders",
        }
    }
}

impl FromStr for SolarSource {
    type Err = UnsupportedSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lodders" => Ok(SolarSource::Lodders),
            _ => Err(UnsupportedSourceError {
                source_id: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for SolarSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// What to do with abundances that are not finite, e.g. an element with no
/// mass in the gas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegeneratePolicy {
    /// Keep NaN and infinite values in the result.
    #[default]
    Propagate,
    /// Fail on the first non-finite value.
    Fail,
}

/// Overrides for an abundance calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbundanceConfig {
    pub solar: SolarSource,
    /// Elements kept by the selection, in output order.
    pub elements: Vec<String>,
    pub degenerate: DegeneratePolicy,
}

impl Default for AbundanceConfig {
    fn default() -> Self {
        Self {
            solar: SolarSource::default(),
            elements: DEFAULT_ELEMENTS.iter().map(|&e| e.to_owned()).collect(),
            degenerate: DegeneratePolicy::default(),
        }
    }
}

impl AbundanceConfig {
    pub fn with_solar(mut self, solar: SolarSource) -> Self {
        self.solar = solar;
        self
    }

    /// Set the solar source from its identifier, e.g. `"lodders"`.
    pub fn with_solar_source(self, id: &str) -> Result<Self, UnsupportedSourceError> {
        Ok(self.with_solar(id.parse()?))
    }

    pub fn with_elements<S: AsRef<str>>(mut self, elements: &[S]) -> Self {
        self.elements = elements.iter().map(|e| e.as_ref().to_owned()).collect();
        self
    }

    pub fn with_degenerate(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate = policy;
        self
    }
}
