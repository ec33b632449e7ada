//! Consistency validation: deterministic accounting identities over the
//! extracted statement.
//!
//! A pure, total function — it never fails and never mutates the statement,
//! only produces advisory warnings. Two checks run, in a fixed order:
//!
//! 1. **Balance-sheet identity** — Assets = Liabilities + Equity.
//! 2. **Retained-earnings roll-forward** — Opening + Net income − Dividends
//!    = Closing.
//!
//! Both use an absolute tolerance of 1 unit to absorb rounding noise from
//! multiplier arithmetic: after scaling by 10⁶ or 10⁹, totals that were
//! rounded independently in the source can disagree by fractions of a unit.
//!
//! Fields that are zero or absent are treated as "not applicable" rather
//! than inconsistent: a partially extracted statement (no equity section,
//! say) should not drown the caller in false positives. Only a populated
//! statement that genuinely fails an identity produces a warning.

use crate::statement::FinancialStatement;
use tracing::debug;

/// Absolute tolerance, in base units, for both identity checks.
const TOLERANCE: f64 = 1.0;

/// Run all consistency checks and return warnings in check order.
///
/// Returns an empty vector when no issues are found. Idempotent over the
/// financial fields: re-running on a warning-augmented statement reproduces
/// the same warnings, since `extraction_warnings` is never inspected.
pub fn validate(stmt: &FinancialStatement) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(w) = check_balance_sheet(stmt) {
        warnings.push(w);
    }
    if let Some(w) = check_retained_earnings(stmt) {
        warnings.push(w);
    }

    debug!("Validation produced {} warning(s)", warnings.len());
    warnings
}

/// Balance-sheet identity: Assets = Liabilities + Equity, within tolerance.
///
/// Skipped when `total_assets` is zero — a zero or missing assets total
/// means the balance sheet was not extracted, not that it is inconsistent.
fn check_balance_sheet(stmt: &FinancialStatement) -> Option<String> {
    let assets = stmt.balance_sheet.assets.total_assets;
    let liabilities = stmt.balance_sheet.liabilities.total_liabilities;
    let equity = stmt.balance_sheet.owners_equity.total_shareholders_equity;

    if assets == 0.0 {
        return None;
    }

    let claimed = liabilities + equity;
    if (assets - claimed).abs() > TOLERANCE {
        return Some(format!(
            "Balance Sheet Mismatch: Assets ({assets}) != Liabilities + Equity ({claimed})"
        ));
    }
    None
}

/// Retained-earnings roll-forward: Opening + Net income − |Dividends| =
/// Closing, within tolerance.
///
/// Dividends are normalised to their absolute value because extraction may
/// emit either sign depending on the source table's convention; both mean
/// the same outflow. Skipped unless both opening and closing balances are
/// present and nonzero.
fn check_retained_earnings(stmt: &FinancialStatement) -> Option<String> {
    let re = &stmt.retained_earnings;

    if re.opening_balance == 0.0 || re.closing_balance == 0.0 {
        return None;
    }

    let residual =
        re.opening_balance + re.net_income - re.dividends.abs() - re.closing_balance;
    if residual.abs() > TOLERANCE {
        return Some(
            "Retained earnings reconciliation check failed. Please verify repurchases or \
             other equity adjustments."
                .to_string(),
        );
    }
    None
}
