use serde::{Deserialize, Serialize};

use crate::error::TaxError;

/// Age group that selects the slab table under the old regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    /// Below 60 years.
    Under60,
    /// From 60 up to (but excluding) 80 years.
    Senior,
    /// 80 years and above.
    SuperSenior,
}

impl AgeBand {
    pub const SENIOR_AGE: i32 = 60;
    pub const SUPER_SENIOR_AGE: i32 = 80;

    /// Maps a raw age to its band.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::InvalidAge`] for a negative age.
    pub fn from_age(age: i32) -> Result<Self, TaxError> {
        match age {
            a if a < 0 => Err(TaxError::InvalidAge(a)),
            a if a < Self::SENIOR_AGE => Ok(Self::Under60),
            a if a < Self::SUPER_SENIOR_AGE => Ok(Self::Senior),
            _ => Ok(Self::SuperSenior),
        }
    }
}
