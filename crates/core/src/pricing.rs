//! Pricing
//!
//! Amounts travel as minor units; formatting to a display string happens only
//! at the edges.

use std::num::TryFromIntError;

use rusty_money::{Money, iso};
use thiserror::Error;

/// Errors that can occur while formatting an amount.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The currency code is not a known ISO-4217 currency.
    #[error("unknown currency code `{0}`")]
    UnknownCurrency(String),

    /// The amount does not fit the money representation.
    #[error("amount out of range")]
    AmountOutOfRange(#[from] TryFromIntError),
}

/// Format `amount` minor units in the currency named by `currency_code`.
///
/// # Errors
///
/// Returns [`PricingError::UnknownCurrency`] for an unrecognised code, or
/// [`PricingError::AmountOutOfRange`] if the amount exceeds `i64::MAX`.
pub fn format_minor(amount: u64, currency_code: &str) -> Result<String, PricingError> {
    let currency = iso::find(&currency_code.to_ascii_uppercase())
        .ok_or_else(|| PricingError::UnknownCurrency(currency_code.to_string()))?;

    let minor = i64::try_from(amount)?;

    Ok(Money::from_minor(minor, currency).to_string())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn formats_usd() -> TestResult {
        assert_eq!(format_minor(999, "USD")?, "$9.99");
        assert_eq!(format_minor(1_000, "usd")?, "$10.00");

        Ok(())
    }

    #[test]
    fn formats_zero() -> TestResult {
        assert_eq!(format_minor(0, "GBP")?, "£0.00");

        Ok(())
    }

    #[test]
    fn rejects_unknown_currency() {
        assert!(matches!(
            format_minor(100, "XYZ"),
            Err(PricingError::UnknownCurrency(code)) if code == "XYZ"
        ));
    }

    #[test]
    fn rejects_amounts_beyond_i64() {
        assert!(matches!(
            format_minor(u64::MAX, "USD"),
            Err(PricingError::AmountOutOfRange(_))
        ));
    }
}
