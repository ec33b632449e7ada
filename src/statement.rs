//! The extracted financial-statement data model.
//!
//! The extraction reply is contractually fixed only for the fields the
//! validator inspects — balance-sheet totals and the retained-earnings
//! roll-forward. Those are typed fields with `#[serde(default)]` so a
//! partially extracted statement still deserialises. Everything else the
//! model emits (income statement, cash flow, per-segment breakdowns, …)
//! rides along untouched in `#[serde(flatten)]` passthrough maps, tolerating
//! schema drift without losing data on the round trip back to JSON.
//!
//! Invariant: by the time a [`FinancialStatement`] exists, all numeric
//! values are multiplier-corrected — expressed in base units, never
//! "in millions". The extraction prompt enforces this, not this module.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The numeric reporting unit of a source document.
///
/// Closed set: financial statements disclose their scale as one of these
/// four. Anything else a classifier returns is treated as unparseable and
/// degrades to [`UnitMultiplier::Units`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitMultiplier {
    /// Values are already in base units (multiplier 1). The fail-open default.
    #[default]
    Units,
    /// "In thousands" — multiplier 1 000.
    Thousands,
    /// "In millions" — multiplier 1 000 000.
    Millions,
    /// "In billions" — multiplier 1 000 000 000.
    Billions,
}

impl UnitMultiplier {
    /// The factor raw document values must be scaled by to reach base units.
    pub fn factor(self) -> u64 {
        match self {
            UnitMultiplier::Units => 1,
            UnitMultiplier::Thousands => 1_000,
            UnitMultiplier::Millions => 1_000_000,
            UnitMultiplier::Billions => 1_000_000_000,
        }
    }

    /// Map a factor back to the closed set. Returns `None` for anything
    /// outside {1, 1 000, 1 000 000, 1 000 000 000}.
    pub fn from_factor(factor: u64) -> Option<Self> {
        match factor {
            1 => Some(UnitMultiplier::Units),
            1_000 => Some(UnitMultiplier::Thousands),
            1_000_000 => Some(UnitMultiplier::Millions),
            1_000_000_000 => Some(UnitMultiplier::Billions),
            _ => None,
        }
    }
}

impl fmt::Display for UnitMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.factor())
    }
}

/// A complete extracted financial statement.
///
/// Returned by [`crate::extract`]. Serialises to the same JSON shape the
/// extraction model produced, plus `extraction_warnings` when the validator
/// found inconsistencies. Warnings are advisory: the extracted values are
/// never mutated, only annotated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialStatement {
    #[serde(default)]
    pub balance_sheet: BalanceSheet,

    #[serde(default)]
    pub retained_earnings: RetainedEarnings,

    /// Advisory warnings from the consistency validator, in check order.
    /// Absent when validation found no issues. Never removed or reordered
    /// once attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_warnings: Option<Vec<String>>,

    /// Everything else the extraction model emitted, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Balance-sheet section: assets, liabilities, owners' equity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceSheet {
    #[serde(default)]
    pub assets: Assets,
    #[serde(default)]
    pub liabilities: Liabilities,
    #[serde(default)]
    pub owners_equity: OwnersEquity,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Assets {
    #[serde(default)]
    pub total_assets: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Liabilities {
    #[serde(default)]
    pub total_liabilities: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnersEquity {
    #[serde(default)]
    pub total_shareholders_equity: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Retained-earnings roll-forward: opening + net income − dividends = closing.
///
/// `dividends` is stored exactly as extracted; models emit it with either
/// sign depending on the source table's convention. The validator normalises
/// it to its absolute value, so both conventions reconcile identically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetainedEarnings {
    #[serde(default)]
    pub opening_balance: f64,
    #[serde(default)]
    pub net_income: f64,
    #[serde(default)]
    pub dividends: f64,
    #[serde(default)]
    pub closing_balance: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
