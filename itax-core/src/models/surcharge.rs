use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RulesError;
use crate::models::slab::{Slab, validate_contiguous};

/// Progressive surcharge rates over taxable income.
///
/// Bands are contiguous from the surcharge threshold (the first band's floor)
/// upwards, and each band's rate is strictly higher than the one below it.
/// An empty table means no surcharge is ever levied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurchargeTable {
    bands: Vec<Slab>,
}

impl SurchargeTable {
    pub fn new(bands: Vec<Slab>) -> Self {
        Self { bands }
    }

    pub fn bands(&self) -> &[Slab] {
        &self.bands
    }

    /// Taxable income above which surcharge applies.
    pub fn threshold(&self) -> Option<Decimal> {
        self.bands.first().map(|band| band.floor)
    }

    /// Index of the band whose `(floor, ceiling]` contains `taxable_income`,
    /// or `None` when the income does not exceed the threshold.
    pub fn band_index_for(
        &self,
        taxable_income: Decimal,
    ) -> Option<usize> {
        self.bands
            .iter()
            .position(|band| band.contains(taxable_income))
    }

    /// Rate that applied just below the floor of band `index`: the previous
    /// band's rate, or zero below the threshold.
    pub fn rate_below(
        &self,
        index: usize,
    ) -> Decimal {
        index
            .checked_sub(1)
            .and_then(|previous| self.bands.get(previous))
            .map_or(Decimal::ZERO, |band| band.rate)
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        let Some(threshold) = self.threshold() else {
            return Ok(());
        };
        if threshold < Decimal::ZERO {
            return Err(RulesError::UnexpectedStart {
                expected: Decimal::ZERO,
                floor: threshold,
            });
        }
        validate_contiguous(&self.bands, threshold)?;

        for (index, band) in self.bands.iter().enumerate() {
            if band.rate <= self.rate_below(index) {
                return Err(RulesError::NonIncreasingSurcharge {
                    floor: band.floor,
                    rate: band.rate,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn test_table() -> SurchargeTable {
        SurchargeTable::new(vec![
            Slab::bounded(dec!(5000000), dec!(10000000), dec!(0.10)),
            Slab::bounded(dec!(10000000), dec!(20000000), dec!(0.15)),
            Slab::unbounded(dec!(20000000), dec!(0.25)),
        ])
    }

    #[test]
    fn threshold_is_first_floor() {
        assert_eq!(test_table().threshold(), Some(dec!(5000000)));
        assert_eq!(SurchargeTable::new(vec![]).threshold(), None);
    }

    #[test]
    fn band_index_for_income_at_threshold_is_none() {
        assert_eq!(test_table().band_index_for(dec!(5000000)), None);
    }

    #[test]
    fn band_index_for_uses_inclusive_ceiling() {
        let table = test_table();

        assert_eq!(table.band_index_for(dec!(5000001)), Some(0));
        assert_eq!(table.band_index_for(dec!(10000000)), Some(0));
        assert_eq!(table.band_index_for(dec!(10000001)), Some(1));
        assert_eq!(table.band_index_for(dec!(900000000)), Some(2));
    }

    #[test]
    fn rate_below_is_previous_band_rate() {
        let table = test_table();

        assert_eq!(table.rate_below(0), dec!(0));
        assert_eq!(table.rate_below(1), dec!(0.10));
        assert_eq!(table.rate_below(2), dec!(0.15));
    }

    #[test]
    fn validate_accepts_well_formed_table() {
        assert_eq!(test_table().validate(), Ok(()));
    }

    #[test]
    fn validate_accepts_empty_table() {
        assert_eq!(SurchargeTable::new(vec![]).validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_non_increasing_rates() {
        let table = SurchargeTable::new(vec![
            Slab::bounded(dec!(5000000), dec!(10000000), dec!(0.15)),
            Slab::unbounded(dec!(10000000), dec!(0.10)),
        ]);

        assert_eq!(
            table.validate(),
            Err(RulesError::NonIncreasingSurcharge {
                floor: dec!(10000000),
                rate: dec!(0.10),
            })
        );
    }

    #[test]
    fn validate_rejects_gap_between_bands() {
        let table = SurchargeTable::new(vec![
            Slab::bounded(dec!(5000000), dec!(10000000), dec!(0.10)),
            Slab::unbounded(dec!(12000000), dec!(0.15)),
        ]);

        assert_eq!(
            table.validate(),
            Err(RulesError::Discontinuous {
                expected: dec!(10000000),
                floor: dec!(12000000),
            })
        );
    }
}
