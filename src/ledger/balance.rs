use super::accounts::{account_balance, AccountEntry};
use super::charges::{aggregate_charges, ChargeEntry, ChargeTotals};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The outstanding balance of a trip together with the figures it came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TripBalance {
    pub amount: Decimal,
    pub charge_to_bill: Decimal,
    pub charge_not_to_bill: Decimal,
    pub account_balance: Decimal,
    /// Positive when the party still owes money, negative on overpayment.
    pub balance: Decimal,
}

/// `(amount + charge_to_bill) - (account_balance + charge_not_to_bill)`.
///
/// The grouping is fixed and the result is never clamped.
pub fn balance_of(amount: Decimal, charges: ChargeTotals, account_balance: Decimal) -> Decimal {
    (amount + charges.charge_to_bill) - (account_balance + charges.charge_not_to_bill)
}

impl TripBalance {
    pub fn from_totals(amount: Option<Decimal>, charges: ChargeTotals, account_balance: Decimal) -> Self {
        let amount = amount.unwrap_or_default();
        Self {
            amount,
            charge_to_bill: charges.charge_to_bill,
            charge_not_to_bill: charges.charge_not_to_bill,
            account_balance,
            balance: balance_of(amount, charges, account_balance),
        }
    }

    pub fn charges(&self) -> ChargeTotals {
        ChargeTotals {
            charge_to_bill: self.charge_to_bill,
            charge_not_to_bill: self.charge_not_to_bill,
        }
    }
}

/// Computes a trip's balance from its freight amount, charges and account entries.
pub fn trip_balance<C, A>(amount: Option<Decimal>, charges: &[C], accounts: &[A]) -> TripBalance
where
    C: ChargeEntry,
    A: AccountEntry,
{
    TripBalance::from_totals(amount, aggregate_charges(charges), account_balance(accounts))
}
