//! Decimal arithmetic for converted amounts.
//!
//! Amounts and rates arrive as `f64`. They are turned into decimals through
//! their shortest round-trip text form, so `1.005` is the decimal `1.005`
//! and not the nearest binary fraction below it. The product is then rounded
//! to two fractional digits, half away from zero.

use crate::core::error::{Error, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Number of fractional digits shown for converted amounts.
pub const DISPLAY_SCALE: u32 = 2;

fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string()).ok()
}

/// Rounds to two fractional digits, ties away from zero (`0.005 -> 0.01`).
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DISPLAY_SCALE);
    rounded
}

/// Checks that an amount is finite, not negative and representable as a
/// `Decimal`, i.e. at most `Decimal::MAX` (about 7.9e28).
pub fn validate_amount(amount: f64) -> Result<()> {
    checked_amount(amount).map(|_| ())
}

fn checked_amount(amount: f64) -> Result<Decimal> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidRequest(format!(
            "amount must be a finite number >= 0, got {amount}"
        )));
    }
    // abs() folds -0.0 into 0.0
    to_decimal(amount.abs()).ok_or_else(|| {
        Error::InvalidRequest(format!(
            "amount must be at most {}, got {amount}",
            Decimal::MAX
        ))
    })
}

/// Computes `round2(amount * rate)`.
pub fn convert_amount(amount: f64, rate: f64) -> Result<Decimal> {
    let amount = checked_amount(amount)?;
    let rate = to_decimal(rate)
        .ok_or_else(|| Error::InvalidResponse(format!("unusable rate: {rate}")))?;

    let product = amount
        .checked_mul(rate)
        .ok_or_else(|| Error::InvalidResponse("converted amount out of range".to_string()))?;
    Ok(round2(product))
}

/// Formats an amount the way history entries store it, e.g. `92.00`.
pub fn format_amount(amount: Decimal) -> String {
    round2(amount).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converted(amount: f64, rate: f64) -> String {
        format_amount(convert_amount(amount, rate).unwrap())
    }

    #[test]
    fn test_basic_conversion() {
        assert_eq!(converted(100.0, 0.92), "92.00");
        assert_eq!(converted(10.0, 0.9), "9.00");
        assert_eq!(converted(5.0, 0.8), "4.00");
        assert_eq!(converted(1234.5678, 1.0), "1234.57");
    }

    #[test]
    fn test_zero_amount_formats_with_two_digits() {
        assert_eq!(converted(0.0, 1.2345), "0.00");
        assert_eq!(converted(-0.0, 1.2345), "0.00");
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        // exact .005 fractions
        assert_eq!(converted(1.0, 1.005), "1.01");
        assert_eq!(converted(1.0, 1.015), "1.02");
        assert_eq!(converted(0.5, 0.01), "0.01");
        assert_eq!(converted(2.0, 0.0025), "0.01");
    }

    #[test]
    fn test_below_midpoint_rounds_down() {
        assert_eq!(converted(1.0, 2.004), "2.00");
        assert_eq!(converted(1.0, 0.0049), "0.00");
    }

    #[test]
    fn test_round2_on_negative_midpoint() {
        let value = Decimal::from_str("-1.005").unwrap();
        assert_eq!(round2(value).to_string(), "-1.01");
    }

    #[test]
    fn test_invalid_amounts_are_rejected() {
        for amount in [-1.0, f64::NAN, f64::INFINITY] {
            let err = convert_amount(amount, 1.0).unwrap_err();
            assert!(matches!(err, Error::InvalidRequest(_)), "{amount}: {err}");
        }
    }

    #[test]
    fn test_amount_beyond_decimal_range_is_rejected() {
        assert!(validate_amount(1e28).is_ok());
        for amount in [1e29, 1e30, f64::MAX] {
            let err = validate_amount(amount).unwrap_err();
            assert!(matches!(err, Error::InvalidRequest(_)), "{amount}: {err}");
            assert!(err.to_string().contains("amount must be at most"));

            let err = convert_amount(amount, 1.0).unwrap_err();
            assert!(matches!(err, Error::InvalidRequest(_)), "{amount}: {err}");
        }
    }

    #[test]
    fn test_unusable_rate_is_invalid_response() {
        let err = convert_amount(1.0, f64::INFINITY).unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn test_overflow_is_invalid_response() {
        let err = convert_amount(1e20, 1e20).unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }
}
