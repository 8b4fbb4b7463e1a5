use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RulesError;

/// A contiguous income band taxed at a single marginal rate.
///
/// The band covers `(floor, ceiling]`; a missing ceiling means the band is
/// unbounded above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slab {
    pub floor: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<Decimal>,
    pub rate: Decimal,
}

impl Slab {
    pub fn bounded(
        floor: Decimal,
        ceiling: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            floor,
            ceiling: Some(ceiling),
            rate,
        }
    }

    pub fn unbounded(
        floor: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            floor,
            ceiling: None,
            rate,
        }
    }

    /// Whether `income` falls in `(floor, ceiling]`.
    pub fn contains(
        &self,
        income: Decimal,
    ) -> bool {
        income > self.floor && self.ceiling.is_none_or(|ceiling| income <= ceiling)
    }
}

/// The tax one slab contributes for a given taxable income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlabContribution {
    pub floor: Decimal,
    pub ceiling: Option<Decimal>,
    pub rate: Decimal,
    /// Portion of the taxable income falling inside this slab.
    pub taxed_amount: Decimal,
    pub tax: Decimal,
}

/// An ordered progressive rate table partitioning `[0, ∞)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlabTable {
    slabs: Vec<Slab>,
}

impl SlabTable {
    /// Wraps the given slabs. Call [`SlabTable::validate`] before use
    /// unless the slabs are known to be well formed.
    pub fn new(slabs: Vec<Slab>) -> Self {
        Self { slabs }
    }

    pub fn slabs(&self) -> &[Slab] {
        &self.slabs
    }

    /// Checks that the slabs start at zero, are contiguous, end unbounded
    /// and carry rates in `[0, 1)`.
    pub fn validate(&self) -> Result<(), RulesError> {
        validate_contiguous(&self.slabs, Decimal::ZERO)
    }

    /// Progressive tax on `taxable_income`. Negative income is taxed as zero.
    pub fn tax_on(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        self.contributions(taxable_income)
            .iter()
            .map(|c| c.tax)
            .sum()
    }

    /// Walks the table and records what each slab contributes, stopping at
    /// the first slab whose ceiling reaches `taxable_income`. A ceiling is
    /// inclusive, so income exactly on a boundary stays in the lower slab.
    pub fn contributions(
        &self,
        taxable_income: Decimal,
    ) -> Vec<SlabContribution> {
        let income = taxable_income.max(Decimal::ZERO);
        let mut contributions = Vec::with_capacity(self.slabs.len());

        for slab in &self.slabs {
            let top = match slab.ceiling {
                Some(ceiling) if income > ceiling => ceiling,
                _ => income,
            };
            let taxed_amount = top - slab.floor;
            contributions.push(SlabContribution {
                floor: slab.floor,
                ceiling: slab.ceiling,
                rate: slab.rate,
                taxed_amount,
                tax: taxed_amount * slab.rate,
            });
            if top == income {
                break;
            }
        }

        contributions
    }

    /// Ceiling of the leading run of zero-rate slabs, i.e. the largest
    /// taxable income that attracts no tax. `None` if no slab carries a
    /// positive rate.
    pub fn zero_rate_ceiling(&self) -> Option<Decimal> {
        let mut ceiling = Decimal::ZERO;
        for slab in &self.slabs {
            if !slab.rate.is_zero() {
                return Some(ceiling);
            }
            ceiling = slab.ceiling?;
        }
        Some(ceiling)
    }
}

/// Shared shape check for slab and surcharge tables.
pub(crate) fn validate_contiguous(
    slabs: &[Slab],
    start: Decimal,
) -> Result<(), RulesError> {
    let first = slabs.first().ok_or(RulesError::EmptyTable)?;
    if first.floor != start {
        return Err(RulesError::UnexpectedStart {
            expected: start,
            floor: first.floor,
        });
    }

    let mut expected = start;
    for (index, slab) in slabs.iter().enumerate() {
        if slab.floor != expected {
            return Err(RulesError::Discontinuous {
                expected,
                floor: slab.floor,
            });
        }
        if slab.rate < Decimal::ZERO || slab.rate >= Decimal::ONE {
            return Err(RulesError::InvalidRate(slab.rate));
        }
        let is_last = index + 1 == slabs.len();
        match slab.ceiling {
            Some(ceiling) if ceiling <= slab.floor => {
                return Err(RulesError::EmptySlab {
                    floor: slab.floor,
                    ceiling,
                });
            }
            Some(ceiling) if is_last => return Err(RulesError::BoundedTop(ceiling)),
            Some(ceiling) => expected = ceiling,
            None if !is_last => return Err(RulesError::UnboundedBeforeEnd(slab.floor)),
            None => {}
        }
    }

    Ok(())
}
