use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    /// Human facing trip number, unique per user.
    pub trip_id: String,
    pub truck_id: Uuid,
    pub driver_id: Uuid,
    pub party_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub route_from: String,
    pub route_to: String,
    pub billing_type: String,
    pub amount: Decimal,
    pub truck_hire_cost: Decimal,
    pub status: i16,
    pub start_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub pod_received_date: Option<DateTime<Utc>>,
    pub pod_submitted_date: Option<DateTime<Utc>>,
    pub settlement_date: Option<DateTime<Utc>>,
    pub lr_number: Option<String>,
    pub material: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn trip_status(&self) -> Option<TripStatus> {
        TripStatus::from_code(self.status)
    }

    pub fn is_settled(&self) -> bool {
        self.trip_status() == Some(TripStatus::Settled)
    }

    pub fn route(&self) -> String {
        format!("{} - {}", self.route_from, self.route_to)
    }
}

/// Trip progress. Codes are stored as-is in `trips.status`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize, ToSchema,
)]
pub enum TripStatus {
    Started,
    Completed,
    #[strum(serialize = "POD Received")]
    PodReceived,
    #[strum(serialize = "POD Submitted")]
    PodSubmitted,
    Settled,
}

impl TripStatus {
    pub fn code(self) -> i16 {
        match self {
            TripStatus::Started => 0,
            TripStatus::Completed => 1,
            TripStatus::PodReceived => 2,
            TripStatus::PodSubmitted => 3,
            TripStatus::Settled => 4,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(TripStatus::Started),
            1 => Some(TripStatus::Completed),
            2 => Some(TripStatus::PodReceived),
            3 => Some(TripStatus::PodSubmitted),
            4 => Some(TripStatus::Settled),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_code(self.code() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.code().checked_sub(1).and_then(Self::from_code)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::truck::Entity",
        from = "Column::TruckId",
        to = "super::truck::Column::Id"
    )]
    Truck,
    #[sea_orm(
        belongs_to = "super::driver::Entity",
        from = "Column::DriverId",
        to = "super::driver::Column::Id"
    )]
    Driver,
    #[sea_orm(
        belongs_to = "super::party::Entity",
        from = "Column::PartyId",
        to = "super::party::Column::Id"
    )]
    Party,
    #[sea_orm(has_many = "super::trip_expense::Entity")]
    Charges,
    #[sea_orm(has_many = "super::payment_book::Entity")]
    Accounts,
}

impl Related<super::truck::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Truck.def()
    }
}

impl Related<super::driver::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Driver.def()
    }
}

impl Related<super::party::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Party.def()
    }
}

impl Related<super::trip_expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Charges.def()
    }
}

impl Related<super::payment_book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_steps_forward_and_back() {
        assert_eq!(TripStatus::Started.next(), Some(TripStatus::Completed));
        assert_eq!(TripStatus::Settled.next(), None);
        assert_eq!(TripStatus::PodSubmitted.previous(), Some(TripStatus::PodReceived));
        assert_eq!(TripStatus::Started.previous(), None);
    }

    #[test]
    fn status_codes_round_trip() {
        for code in 0..=4 {
            assert_eq!(TripStatus::from_code(code).map(TripStatus::code), Some(code));
        }
        assert_eq!(TripStatus::from_code(5), None);
        assert_eq!(TripStatus::PodReceived.to_string(), "POD Received");
    }
}
