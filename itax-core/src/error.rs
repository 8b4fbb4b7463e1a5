use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while computing tax or resolving income from tax.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxError {
    /// The regime tag is not one of `old`, `new` or `newer`.
    #[error("unrecognized regime '{0}'; expected one of: old, new, newer")]
    InvalidRegime(String),

    /// The age cannot be mapped to an age band.
    #[error("age must be non-negative, got {0}")]
    InvalidAge(i32),

    /// The inverse was asked to resolve a negative or unrepresentably large
    /// tax amount.
    #[error("tax {0} is outside the domain of the inverse")]
    OutOfDomain(Decimal),

    /// No income produces the given tax amount.
    #[error("no income maps to tax {0}")]
    NotInvertible(Decimal),

    /// The configured tax rules failed validation.
    #[error("invalid tax rules: {0}")]
    InvalidRules(#[from] RulesError),
}

/// Errors describing malformed tax rule configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("slab table is empty")]
    EmptyTable,

    #[error("first slab must start at {expected}, got {floor}")]
    UnexpectedStart { expected: Decimal, floor: Decimal },

    #[error("slab starting at {floor} does not continue from previous ceiling {expected}")]
    Discontinuous { expected: Decimal, floor: Decimal },

    #[error("slab ceiling {ceiling} must exceed its floor {floor}")]
    EmptySlab { floor: Decimal, ceiling: Decimal },

    #[error("only the last slab may be unbounded; unbounded slab found at {0}")]
    UnboundedBeforeEnd(Decimal),

    #[error("last slab must be unbounded, but ends at {0}")]
    BoundedTop(Decimal),

    #[error("rate must be between 0 (inclusive) and 1 (exclusive), got {0}")]
    InvalidRate(Decimal),

    #[error("surcharge rate {rate} at {floor} must exceed the rate of the band below")]
    NonIncreasingSurcharge { floor: Decimal, rate: Decimal },

    #[error("standard deduction must be non-negative, got {0}")]
    NegativeDeduction(Decimal),

    #[error("rebate limit must be non-negative, got {0}")]
    NegativeRebateLimit(Decimal),

    #[error("cess rate must be between 0 (inclusive) and 1 (exclusive), got {0}")]
    InvalidCessRate(Decimal),

    #[error("the old regime cannot be inverted while it carries a rebate")]
    RebateNotInvertible,

    #[error("the old regime has no positive-rate slab to invert")]
    NoTaxableSlab,

    #[error("failed to parse tax rules: {0}")]
    Parse(String),
}

impl From<toml::de::Error> for RulesError {
    fn from(err: toml::de::Error) -> Self {
        RulesError::Parse(err.to_string())
    }
}
