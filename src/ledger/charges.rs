use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::Add;
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// A trip charge or deduction as seen by the aggregator.
pub trait ChargeEntry {
    fn amount(&self) -> Option<Decimal>;

    /// `Some(true)` bills the charge to the party. Anything else is absorbed
    /// by the carrier and deducted from the trip.
    fn party_bill(&self) -> Option<bool>;
}

/// Partitioned charge sums for one trip, or for several trips added together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChargeTotals {
    pub charge_to_bill: Decimal,
    pub charge_not_to_bill: Decimal,
}

impl ChargeTotals {
    pub fn total(&self) -> Decimal {
        self.charge_to_bill + self.charge_not_to_bill
    }

    fn record<C: ChargeEntry + ?Sized>(mut self, charge: &C) -> Self {
        let amount = charge.amount().unwrap_or_default();
        if charge.party_bill() == Some(true) {
            self.charge_to_bill += amount;
        } else {
            self.charge_not_to_bill += amount;
        }
        self
    }
}

impl Add for ChargeTotals {
    type Output = ChargeTotals;

    fn add(self, rhs: ChargeTotals) -> ChargeTotals {
        ChargeTotals {
            charge_to_bill: self.charge_to_bill + rhs.charge_to_bill,
            charge_not_to_bill: self.charge_not_to_bill + rhs.charge_not_to_bill,
        }
    }
}

impl Sum for ChargeTotals {
    fn sum<I: Iterator<Item = ChargeTotals>>(iter: I) -> Self {
        iter.fold(ChargeTotals::default(), Add::add)
    }
}

/// Splits charges into billable and non-billable sums in a single pass.
///
/// Missing amounts count as zero and a missing `party_bill` flag counts as
/// non-billable. Every record is counted once, even when several share an
/// expense type.
pub fn aggregate_charges<'a, I, C>(charges: I) -> ChargeTotals
where
    I: IntoIterator<Item = &'a C>,
    C: ChargeEntry + 'a,
{
    charges
        .into_iter()
        .fold(ChargeTotals::default(), |totals, charge| totals.record(charge))
}

/// Categories a trip charge may be recorded under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize, ToSchema,
)]
#[strum(ascii_case_insensitive)]
pub enum ChargeType {
    #[strum(serialize = "Detention Charges")]
    #[serde(rename = "Detention Charges")]
    DetentionCharges,
    #[strum(serialize = "Loading Charges")]
    #[serde(rename = "Loading Charges")]
    LoadingCharges,
    #[strum(serialize = "Unloading Charges")]
    #[serde(rename = "Unloading Charges")]
    UnloadingCharges,
    #[strum(serialize = "Weight Charges")]
    #[serde(rename = "Weight Charges")]
    WeightCharges,
    #[strum(serialize = "Union Charges")]
    #[serde(rename = "Union Charges")]
    UnionCharges,
    #[strum(serialize = "Other Charges")]
    #[serde(rename = "Other Charges")]
    OtherCharges,
    #[strum(serialize = "Commission")]
    #[serde(rename = "Commission")]
    Commission,
    #[strum(serialize = "Damage Charges")]
    #[serde(rename = "Damage Charges")]
    DamageCharges,
    #[strum(serialize = "Late Delivery Charges")]
    #[serde(rename = "Late Delivery Charges")]
    LateDeliveryCharges,
    #[strum(serialize = "TDS")]
    #[serde(rename = "TDS")]
    Tds,
    #[strum(serialize = "Mamul Charges")]
    #[serde(rename = "Mamul Charges")]
    MamulCharges,
    #[strum(serialize = "Brokerage")]
    #[serde(rename = "Brokerage")]
    Brokerage,
    #[strum(serialize = "Shortage Charges")]
    #[serde(rename = "Shortage Charges")]
    ShortageCharges,
    #[strum(serialize = "Other Deductions")]
    #[serde(rename = "Other Deductions")]
    OtherDeductions,
}

impl ChargeType {
    /// Parses a user supplied category, ignoring case and surrounding spaces.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

/// A bare charge line, handy when the caller has no entity at hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeLine {
    pub amount: Option<Decimal>,
    pub party_bill: Option<bool>,
}

impl ChargeLine {
    pub fn new(amount: Decimal, party_bill: bool) -> Self {
        Self {
            amount: Some(amount),
            party_bill: Some(party_bill),
        }
    }
}

impl ChargeEntry for ChargeLine {
    fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    fn party_bill(&self) -> Option<bool> {
        self.party_bill
    }
}
