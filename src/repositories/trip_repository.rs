use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::trip::{Column, Entity as Trip, Model as TripModel, TripStatus};
use crate::entities::{payment_book, trip_expense};
use crate::errors::AppError;
use crate::ledger::{trip_balance, TripBalance};
use crate::repositories::Repository;

use super::BaseRepository;

/// A trip together with the rows its balance is derived from.
#[derive(Debug, Clone)]
pub struct TripLedger {
    pub trip: TripModel,
    pub charges: Vec<trip_expense::Model>,
    pub accounts: Vec<payment_book::Model>,
}

impl TripLedger {
    pub fn balance(&self) -> TripBalance {
        trip_balance(Some(self.trip.amount), &self.charges, &self.accounts)
    }
}

/// Repository for trip reads, always scoped to the owning user
#[derive(Debug, Clone)]
pub struct TripRepository {
    base: BaseRepository,
}

impl TripRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find a trip by primary key, only if it belongs to `user_id`
    pub async fn find_owned(&self, user_id: Uuid, id: Uuid) -> Result<Option<TripModel>, AppError> {
        Trip::find_by_id(id)
            .filter(Column::UserId.eq(user_id))
            .one(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Whether `trip_id` is already used by another of the user's trips
    pub async fn trip_id_taken(
        &self,
        user_id: Uuid,
        trip_id: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let mut query = Trip::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::TripId.eq(trip_id));
        if let Some(id) = exclude {
            query = query.filter(Column::Id.ne(id));
        }
        let count = query
            .count(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;
        Ok(count > 0)
    }

    /// Trips for a user, newest first, optionally filtered by status
    pub async fn list(
        &self,
        user_id: Uuid,
        status: Option<TripStatus>,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<TripModel>, u64), AppError> {
        let mut query = Trip::find().filter(Column::UserId.eq(user_id));
        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status.code()));
        }

        let paginator = query
            .order_by_desc(Column::StartDate)
            .paginate(self.base.get_db(), page_size);

        let total = paginator
            .num_items()
            .await
            .map_err(AppError::DatabaseError)?;

        let trips = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(AppError::DatabaseError)?;

        Ok((trips, total))
    }

    /// Trips whose start date falls in `[start, end)`
    pub async fn started_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TripModel>, AppError> {
        Trip::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::StartDate.gte(start))
            .filter(Column::StartDate.lt(end))
            .order_by_asc(Column::StartDate)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Every trip billed to a party
    pub async fn for_party(&self, user_id: Uuid, party_id: Uuid) -> Result<Vec<TripModel>, AppError> {
        Trip::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::PartyId.eq(party_id))
            .order_by_asc(Column::StartDate)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// The user's trips among `ids`; unknown ids are silently absent
    pub async fn find_many(&self, user_id: Uuid, ids: &[Uuid]) -> Result<Vec<TripModel>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Trip::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(Column::StartDate)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    pub async fn charges_for(
        &self,
        trip_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<trip_expense::Model>>, AppError> {
        if trip_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = trip_expense::Entity::find()
            .filter(trip_expense::Column::TripId.is_in(trip_ids.iter().copied()))
            .order_by_asc(trip_expense::Column::Date)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;

        let mut grouped: HashMap<Uuid, Vec<trip_expense::Model>> = HashMap::new();
        for row in rows {
            grouped.entry(row.trip_id).or_default().push(row);
        }
        Ok(grouped)
    }

    pub async fn accounts_for(
        &self,
        trip_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<payment_book::Model>>, AppError> {
        if trip_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = payment_book::Entity::find()
            .filter(payment_book::Column::TripId.is_in(trip_ids.iter().copied()))
            .order_by_asc(payment_book::Column::PaymentDate)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;

        let mut grouped: HashMap<Uuid, Vec<payment_book::Model>> = HashMap::new();
        for row in rows {
            grouped.entry(row.trip_id).or_default().push(row);
        }
        Ok(grouped)
    }

    /// Loads each trip's charges and account entries in two queries
    pub async fn with_ledgers(&self, trips: Vec<TripModel>) -> Result<Vec<TripLedger>, AppError> {
        let ids: Vec<Uuid> = trips.iter().map(|t| t.id).collect();
        let mut charges = self.charges_for(&ids).await?;
        let mut accounts = self.accounts_for(&ids).await?;

        Ok(trips
            .into_iter()
            .map(|trip| TripLedger {
                charges: charges.remove(&trip.id).unwrap_or_default(),
                accounts: accounts.remove(&trip.id).unwrap_or_default(),
                trip,
            })
            .collect())
    }

    /// A single trip with its ledger rows
    pub async fn find_ledger(&self, user_id: Uuid, id: Uuid) -> Result<Option<TripLedger>, AppError> {
        match self.find_owned(user_id, id).await? {
            Some(trip) => Ok(self.with_ledgers(vec![trip]).await?.pop()),
            None => Ok(None),
        }
    }
}
