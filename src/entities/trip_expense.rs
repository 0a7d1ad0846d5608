use crate::ledger::ChargeEntry;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ad-hoc charge or deduction recorded on a trip.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trip_expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// References `trips.id`.
    pub trip_id: Uuid,
    pub user_id: Uuid,
    pub amount: Option<Decimal>,
    pub party_bill: Option<bool>,
    pub expense_type: String,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl ChargeEntry for Model {
    fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    fn party_bill(&self) -> Option<bool> {
        self.party_bill
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trip::Entity",
        from = "Column::TripId",
        to = "super::trip::Column::Id",
        on_delete = "Cascade"
    )]
    Trip,
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
