//! Form-level checks applied by the shells before they call into the store.
//!
//! The store itself accepts any well-typed record; these helpers are what a UI runs
//! on user input ("name must be non-empty", "amount must be a number >= 0").

use crate::errors::{LedgerError, Result};

pub fn require_name(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Empty or whitespace-only descriptions are stored as absent.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

pub fn parse_amount(raw: &str) -> Result<f64> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| LedgerError::InvalidInput(format!("`{raw}` is not a valid amount")))?;
    check_amount(amount)
}

pub fn check_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(LedgerError::InvalidInput(format!(
            "amount must be a non-negative number, got {amount}"
        )));
    }
    Ok(amount)
}
