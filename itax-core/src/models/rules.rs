//! Statutory parameters for each tax regime.
//!
//! [`TaxRules::default`] carries the built-in slab, surcharge, deduction and
//! cess parameters. Alternative parameters can be supplied as TOML through
//! [`TaxRules::from_toml_str`]; the document mirrors the serde layout of
//! these types:
//!
//! ```toml
//! cess_rate = "0.04"
//!
//! [new]
//! standard_deduction = "0"
//!
//! [new.slabs]
//! kind = "uniform"
//!
//! [[new.slabs.table]]
//! floor = "0"
//! ceiling = "250000"
//! rate = "0"
//!
//! [[new.surcharge]]
//! floor = "5000000"
//! rate = "0.10"
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{RulesError, TaxError};
use crate::models::{AgeBand, Regime, Slab, SlabTable, SurchargeTable};

/// The slab tables a regime applies, optionally varying by age band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlabSchedule {
    /// One table for every taxpayer; age is ignored.
    Uniform { table: SlabTable },
    /// A table per [`AgeBand`].
    AgeBanded {
        under_60: SlabTable,
        senior: SlabTable,
        super_senior: SlabTable,
    },
}

impl SlabSchedule {
    /// Selects the table for a taxpayer of `age`.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::InvalidAge`] when the schedule is age banded and
    /// `age` is negative.
    pub fn table_for_age(
        &self,
        age: i32,
    ) -> Result<&SlabTable, TaxError> {
        match self {
            Self::Uniform { table } => Ok(table),
            Self::AgeBanded {
                under_60,
                senior,
                super_senior,
            } => Ok(match AgeBand::from_age(age)? {
                AgeBand::Under60 => under_60,
                AgeBand::Senior => senior,
                AgeBand::SuperSenior => super_senior,
            }),
        }
    }

    /// The table applied to taxpayers under 60.
    pub fn primary_table(&self) -> &SlabTable {
        match self {
            Self::Uniform { table } => table,
            Self::AgeBanded { under_60, .. } => under_60,
        }
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        match self {
            Self::Uniform { table } => table.validate(),
            Self::AgeBanded {
                under_60,
                senior,
                super_senior,
            } => {
                under_60.validate()?;
                senior.validate()?;
                super_senior.validate()
            }
        }
    }
}

/// Everything needed to compute tax under one regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeRules {
    /// Subtracted from gross income before slabs apply.
    pub standard_deduction: Decimal,

    /// Taxable income at or below this amount owes no base tax at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rebate_limit: Option<Decimal>,

    pub slabs: SlabSchedule,

    #[serde(default = "empty_surcharge")]
    pub surcharge: SurchargeTable,
}

fn empty_surcharge() -> SurchargeTable {
    SurchargeTable::new(Vec::new())
}

impl RegimeRules {
    /// The traditional regime: ₹50,000 standard deduction and slabs that
    /// widen the zero-rate band at ages 60 and 80.
    pub fn old_regime() -> Self {
        Self {
            standard_deduction: dec!(50000),
            rebate_limit: None,
            slabs: SlabSchedule::AgeBanded {
                under_60: SlabTable::new(vec![
                    Slab::bounded(dec!(0), dec!(250000), dec!(0)),
                    Slab::bounded(dec!(250000), dec!(500000), dec!(0.05)),
                    Slab::bounded(dec!(500000), dec!(1000000), dec!(0.20)),
                    Slab::unbounded(dec!(1000000), dec!(0.30)),
                ]),
                senior: SlabTable::new(vec![
                    Slab::bounded(dec!(0), dec!(300000), dec!(0)),
                    Slab::bounded(dec!(300000), dec!(500000), dec!(0.05)),
                    Slab::bounded(dec!(500000), dec!(1000000), dec!(0.20)),
                    Slab::unbounded(dec!(1000000), dec!(0.30)),
                ]),
                super_senior: SlabTable::new(vec![
                    Slab::bounded(dec!(0), dec!(500000), dec!(0)),
                    Slab::bounded(dec!(500000), dec!(1000000), dec!(0.20)),
                    Slab::unbounded(dec!(1000000), dec!(0.30)),
                ]),
            },
            surcharge: four_band_surcharge(),
        }
    }

    /// The regime introduced in budget 2020: no standard deduction and seven
    /// slabs in ₹2.5 lakh steps.
    pub fn new_regime() -> Self {
        Self {
            standard_deduction: dec!(0),
            rebate_limit: None,
            slabs: SlabSchedule::Uniform {
                table: SlabTable::new(vec![
                    Slab::bounded(dec!(0), dec!(250000), dec!(0)),
                    Slab::bounded(dec!(250000), dec!(500000), dec!(0.05)),
                    Slab::bounded(dec!(500000), dec!(750000), dec!(0.10)),
                    Slab::bounded(dec!(750000), dec!(1000000), dec!(0.15)),
                    Slab::bounded(dec!(1000000), dec!(1250000), dec!(0.20)),
                    Slab::bounded(dec!(1250000), dec!(1500000), dec!(0.25)),
                    Slab::unbounded(dec!(1500000), dec!(0.30)),
                ]),
            },
            surcharge: four_band_surcharge(),
        }
    }

    /// The regime introduced in budget 2023: ₹50,000 standard deduction, a
    /// full rebate up to ₹7 lakh of taxable income and surcharge capped at
    /// 25%.
    pub fn newer_regime() -> Self {
        Self {
            standard_deduction: dec!(50000),
            rebate_limit: Some(dec!(700000)),
            slabs: SlabSchedule::Uniform {
                table: SlabTable::new(vec![
                    Slab::bounded(dec!(0), dec!(300000), dec!(0)),
                    Slab::bounded(dec!(300000), dec!(600000), dec!(0.05)),
                    Slab::bounded(dec!(600000), dec!(900000), dec!(0.10)),
                    Slab::bounded(dec!(900000), dec!(1200000), dec!(0.15)),
                    Slab::bounded(dec!(1200000), dec!(1500000), dec!(0.20)),
                    Slab::unbounded(dec!(1500000), dec!(0.30)),
                ]),
            },
            surcharge: SurchargeTable::new(vec![
                Slab::bounded(dec!(5000000), dec!(10000000), dec!(0.10)),
                Slab::bounded(dec!(10000000), dec!(20000000), dec!(0.15)),
                Slab::unbounded(dec!(20000000), dec!(0.25)),
            ]),
        }
    }

    /// Gross income less the standard deduction. May be negative.
    pub fn taxable_income(
        &self,
        income: Decimal,
    ) -> Decimal {
        income - self.standard_deduction
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.standard_deduction < Decimal::ZERO {
            return Err(RulesError::NegativeDeduction(self.standard_deduction));
        }
        if let Some(limit) = self.rebate_limit.filter(|limit| *limit < Decimal::ZERO) {
            return Err(RulesError::NegativeRebateLimit(limit));
        }
        self.slabs.validate()?;
        self.surcharge.validate()
    }
}

fn four_band_surcharge() -> SurchargeTable {
    SurchargeTable::new(vec![
        Slab::bounded(dec!(5000000), dec!(10000000), dec!(0.10)),
        Slab::bounded(dec!(10000000), dec!(20000000), dec!(0.15)),
        Slab::bounded(dec!(20000000), dec!(50000000), dec!(0.25)),
        Slab::unbounded(dec!(50000000), dec!(0.37)),
    ])
}

/// Parameters for all three regimes plus the cess shared by them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRules {
    /// Health and education cess levied on tax plus surcharge.
    pub cess_rate: Decimal,
    pub old: RegimeRules,
    pub new: RegimeRules,
    pub newer: RegimeRules,
}

impl Default for TaxRules {
    fn default() -> Self {
        Self {
            cess_rate: dec!(0.04),
            old: RegimeRules::old_regime(),
            new: RegimeRules::new_regime(),
            newer: RegimeRules::newer_regime(),
        }
    }
}

impl TaxRules {
    /// Parses and validates rules from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::Parse`] for malformed TOML, or the first
    /// validation failure.
    pub fn from_toml_str(document: &str) -> Result<Self, RulesError> {
        let rules: TaxRules = toml::from_str(document)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn regime(
        &self,
        regime: Regime,
    ) -> &RegimeRules {
        match regime {
            Regime::Old => &self.old,
            Regime::New => &self.new,
            Regime::Newer => &self.newer,
        }
    }

    /// Factor applied to tax plus surcharge, e.g. `1.04` for a 4% cess.
    pub fn cess_multiplier(&self) -> Decimal {
        Decimal::ONE + self.cess_rate
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.cess_rate < Decimal::ZERO || self.cess_rate >= Decimal::ONE {
            return Err(RulesError::InvalidCessRate(self.cess_rate));
        }
        for regime in Regime::ALL {
            self.regime(regime).validate()?;
        }
        Ok(())
    }
}
