use super::charges::ChargeTotals;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Who owns the truck a trip ran on.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize, ToSchema,
)]
#[strum(ascii_case_insensitive)]
pub enum OwnershipClass {
    /// Company-owned.
    #[default]
    #[strum(serialize = "Self")]
    #[serde(rename = "Self")]
    Owned,
    /// Hired from a supplier for the trip.
    Market,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TripProfit {
    pub ownership: OwnershipClass,
    pub amount: Decimal,
    pub charge_to_bill: Decimal,
    pub charge_not_to_bill: Decimal,
    pub truck_operating_expense: Decimal,
    pub truck_hire_cost: Decimal,
    pub profit: Decimal,
}

/// `amount + charge_to_bill - charge_not_to_bill - truck_operating_expense - truck_hire_cost`.
///
/// Hire cost only applies to market trucks; it is ignored for owned ones.
pub fn trip_profit(
    amount: Option<Decimal>,
    charges: ChargeTotals,
    ownership: OwnershipClass,
    truck_operating_expense: Decimal,
    truck_hire_cost: Option<Decimal>,
) -> TripProfit {
    let amount = amount.unwrap_or_default();
    let truck_hire_cost = match ownership {
        OwnershipClass::Owned => Decimal::ZERO,
        OwnershipClass::Market => truck_hire_cost.unwrap_or_default(),
    };

    TripProfit {
        ownership,
        amount,
        charge_to_bill: charges.charge_to_bill,
        charge_not_to_bill: charges.charge_not_to_bill,
        truck_operating_expense,
        truck_hire_cost,
        profit: amount + charges.charge_to_bill
            - charges.charge_not_to_bill
            - truck_operating_expense
            - truck_hire_cost,
    }
}
