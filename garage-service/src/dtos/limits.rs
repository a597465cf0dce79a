//! Input bounds matching the storage schema.
//!
//! Money columns are `NUMERIC(12, 2)` and tax rates `NUMERIC(5, 2)`. Unit
//! prices and quantities are capped so a single line can never exceed the
//! money column.

use rust_decimal::Decimal;
use service_core::error::AppError;
use validator::ValidationError;

use crate::models::{Totals, MAX_AMOUNT};

/// Highest price accepted for one unit of a part or one labour charge.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);

/// Highest quantity on one invoice line. `MAX_UNIT_PRICE * MAX_LINE_QUANTITY`
/// stays below `MAX_AMOUNT`.
pub const MAX_LINE_QUANTITY: i32 = 10_000;

const MAX_TAX_RATE: Decimal = Decimal::ONE_HUNDRED;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Rejects empty and whitespace-only strings.
pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "must not be blank"));
    }
    Ok(())
}

pub fn unit_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(error("negative", "must not be negative"));
    }
    if *value > MAX_UNIT_PRICE {
        return Err(error("too_large", "must not exceed 999999.99"));
    }
    Ok(())
}

pub fn tax_rate(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(error("negative", "must not be negative"));
    }
    if *value > MAX_TAX_RATE {
        return Err(error("too_large", "must be a percentage between 0 and 100"));
    }
    Ok(())
}

pub fn money(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(error("negative", "must not be negative"));
    }
    if *value > MAX_AMOUNT {
        return Err(error("too_large", "must not exceed 9999999999.99"));
    }
    Ok(())
}

/// Computed document totals must fit the money columns.
pub fn ensure_storable(totals: &Totals) -> Result<(), AppError> {
    if totals.fits_storage() {
        Ok(())
    } else {
        Err(AppError::BadRequest(anyhow::anyhow!(
            "Document total exceeds the maximum amount of {}",
            MAX_AMOUNT
        )))
    }
}

/// A single amount must fit a money column.
pub fn ensure_amount(label: &str, amount: Decimal) -> Result<(), AppError> {
    if amount <= MAX_AMOUNT {
        Ok(())
    } else {
        Err(AppError::BadRequest(anyhow::anyhow!(
            "{} exceeds the maximum amount of {}",
            label,
            MAX_AMOUNT
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn unit_price_cap() {
        assert_eq!(MAX_UNIT_PRICE, dec!(999999.99));
        assert!(unit_price(&dec!(999999.99)).is_ok());
        assert!(unit_price(&dec!(1000000)).is_err());
        assert!(unit_price(&dec!(-0.01)).is_err());
        assert!(unit_price(&Decimal::ZERO).is_ok());
    }

    #[test]
    fn line_cap_fits_money_column() {
        assert!(MAX_UNIT_PRICE * Decimal::from(MAX_LINE_QUANTITY) <= MAX_AMOUNT);
    }

    #[test]
    fn tax_rate_is_a_percentage() {
        assert!(tax_rate(&dec!(28)).is_ok());
        assert!(tax_rate(&dec!(100)).is_ok());
        assert!(tax_rate(&dec!(1000)).is_err());
        assert!(tax_rate(&dec!(-9)).is_err());
    }

    #[test]
    fn blank_strings_are_rejected() {
        assert!(non_blank("   ").is_err());
        assert!(non_blank("").is_err());
        assert!(non_blank(" Ravi ").is_ok());
    }

    #[test]
    fn oversized_totals_are_a_bad_request() {
        let totals = Totals {
            subtotal: dec!(10000000000),
            ..Totals::default()
        };

        let err = ensure_storable(&totals).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(ensure_storable(&Totals::default()).is_ok());
    }

    #[test]
    fn money_rejects_negative_and_overflowing_amounts() {
        assert!(money(&dec!(-1)).is_err());
        assert!(money(&dec!(99999999999)).is_err());
        assert!(money(&dec!(9999999999.99)).is_ok());
        assert!(ensure_amount("Total due", dec!(10000000000)).is_err());
    }
}
