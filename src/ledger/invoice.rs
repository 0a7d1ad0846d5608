use super::balance::TripBalance;
use super::LedgerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A trip selected for invoicing, with its balance already computed.
#[derive(Debug, Clone)]
pub struct InvoiceTrip {
    pub id: Uuid,
    pub trip_id: String,
    pub party_id: Uuid,
    pub route: String,
    pub balance: TripBalance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InvoiceLine {
    pub id: Uuid,
    pub trip_id: String,
    pub route: String,
    pub amount: Decimal,
    pub charge_to_bill: Decimal,
    pub charge_not_to_bill: Decimal,
    pub received: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InvoiceSummary {
    pub party_id: Uuid,
    pub lines: Vec<InvoiceLine>,
    pub total_freight: Decimal,
    pub total_charges: Decimal,
    pub total_deductions: Decimal,
    pub total_received: Decimal,
    /// Amount still due across every line.
    pub total_balance: Decimal,
}

/// Rolls trip balances up into a single party invoice.
pub fn build_invoice(trips: Vec<InvoiceTrip>) -> Result<InvoiceSummary, LedgerError> {
    let party_id = trips.first().map(|t| t.party_id).ok_or(LedgerError::EmptyInvoice)?;
    if trips.iter().any(|t| t.party_id != party_id) {
        return Err(LedgerError::MixedParties);
    }

    let mut summary = InvoiceSummary {
        party_id,
        lines: Vec::with_capacity(trips.len()),
        total_freight: Decimal::ZERO,
        total_charges: Decimal::ZERO,
        total_deductions: Decimal::ZERO,
        total_received: Decimal::ZERO,
        total_balance: Decimal::ZERO,
    };

    for trip in trips {
        let b = trip.balance;
        summary.total_freight += b.amount;
        summary.total_charges += b.charge_to_bill;
        summary.total_deductions += b.charge_not_to_bill;
        summary.total_received += b.account_balance;
        summary.total_balance += b.balance;
        summary.lines.push(InvoiceLine {
            id: trip.id,
            trip_id: trip.trip_id,
            route: trip.route,
            amount: b.amount,
            charge_to_bill: b.charge_to_bill,
            charge_not_to_bill: b.charge_not_to_bill,
            received: b.account_balance,
            balance: b.balance,
        });
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::charges::ChargeTotals;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn invoice_trip(party_id: Uuid, amount: Decimal, to_bill: Decimal, received: Decimal) -> InvoiceTrip {
        let charges = ChargeTotals {
            charge_to_bill: to_bill,
            charge_not_to_bill: Decimal::ZERO,
        };
        InvoiceTrip {
            id: Uuid::new_v4(),
            trip_id: format!("TRIP-{amount}"),
            party_id,
            route: "Delhi - Jaipur".into(),
            balance: TripBalance::from_totals(Some(amount), charges, received),
        }
    }

    #[test]
    fn totals_follow_trip_balances() {
        let party = Uuid::new_v4();
        let summary = build_invoice(vec![
            invoice_trip(party, dec!(10000), dec!(500), dec!(3000)),
            invoice_trip(party, dec!(6000), dec!(0), dec!(0)),
        ])
        .unwrap();

        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.total_freight, dec!(16000));
        assert_eq!(summary.total_charges, dec!(500));
        assert_eq!(summary.total_received, dec!(3000));
        assert_eq!(summary.total_balance, dec!(13500));
    }

    #[test]
    fn rejects_mixed_parties() {
        let result = build_invoice(vec![
            invoice_trip(Uuid::new_v4(), dec!(1), dec!(0), dec!(0)),
            invoice_trip(Uuid::new_v4(), dec!(1), dec!(0), dec!(0)),
        ]);
        assert_matches!(result, Err(LedgerError::MixedParties));
    }

    #[test]
    fn rejects_empty_selection() {
        assert_matches!(build_invoice(Vec::new()), Err(LedgerError::EmptyInvoice));
    }
}
