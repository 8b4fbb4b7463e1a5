use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TaxError;

/// The statutory scheme used to compute tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// The traditional scheme with age-dependent slabs.
    Old,
    /// The scheme introduced in budget 2020.
    New,
    /// The scheme introduced in budget 2023.
    Newer,
}

impl Regime {
    pub const ALL: [Regime; 3] = [Regime::Old, Regime::New, Regime::Newer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
            Self::Newer => "newer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "old" => Some(Self::Old),
            "new" => Some(Self::New),
            "newer" => Some(Self::Newer),
            _ => None,
        }
    }
}

impl FromStr for Regime {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TaxError::InvalidRegime(s.to_string()))
    }
}

impl fmt::Display for Regime {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
