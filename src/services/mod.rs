// Trip lifecycle, charges and payments
pub mod trips;

// Master data
pub mod expenses;
pub mod fleet;

// Financial roll-ups
pub mod invoicing;
pub mod reports;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use validator::ValidationError;

/// Largest magnitude accepted for any single money field. Sums over many
/// trips stay far below `Decimal::MAX`, so ledger arithmetic cannot overflow.
pub const MAX_MONEY: Decimal = dec!(1000000000000);

/// Money entered by a user may be zero but never negative.
pub(crate) fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("must not be negative".into());
        return Err(err);
    }
    validate_signed_money(value)
}

/// Account entries may be negative to record a reversal.
pub(crate) fn validate_signed_money(value: &Decimal) -> Result<(), ValidationError> {
    if value.abs() > MAX_MONEY {
        let mut err = ValidationError::new("money_range");
        err.message = Some(format!("must not exceed {} in magnitude", MAX_MONEY).into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod money_tests {
    use super::*;
    use test_case::test_case;

    #[test_case(dec!(0) ; "zero")]
    #[test_case(dec!(25000.50) ; "ordinary freight")]
    #[test_case(MAX_MONEY ; "upper bound")]
    fn accepted(value: Decimal) {
        assert!(validate_money(&value).is_ok());
    }

    #[test_case(dec!(-1) ; "negative")]
    #[test_case(MAX_MONEY + dec!(0.01) ; "just above bound")]
    #[test_case(Decimal::MAX ; "decimal max")]
    fn rejected(value: Decimal) {
        assert!(validate_money(&value).is_err());
    }

    #[test]
    fn signed_money_allows_reversals_within_bound() {
        assert!(validate_signed_money(&dec!(-2500)).is_ok());
        assert!(validate_signed_money(&-MAX_MONEY).is_ok());
        assert!(validate_signed_money(&Decimal::MIN).is_err());
    }
}
