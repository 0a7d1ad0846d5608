use crate::{
    db::DbPool,
    entities::driver::{self, DriverStatus},
    entities::party,
    entities::payment_book::{self, ActiveModel as AccountActiveModel, Model as AccountModel},
    entities::supplier,
    entities::trip::{self, ActiveModel as TripActiveModel, Model as TripModel, TripStatus},
    entities::trip_expense::{self, ActiveModel as ChargeActiveModel, Model as ChargeModel},
    entities::truck,
    errors::ServiceError,
    ledger::{
        account_breakdown, trip_profit, AccountBreakdown, AccountType, ChargeType, OwnershipClass,
        PaymentType, TripBalance, TripProfit,
    },
    repositories::{TripLedger, TripRepository, TruckExpenseLedger},
    services::{validate_money, validate_signed_money},
};
use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use slog::Logger;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

fn default_billing_type() -> String {
    "Fixed".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTripRequest {
    #[validate(length(min = 1, max = 64, message = "Trip ID is required"))]
    pub trip_id: String,
    pub truck_id: Uuid,
    pub driver_id: Uuid,
    pub party_id: Uuid,
    /// Falls back to the truck's own supplier for market trucks.
    pub supplier_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Origin is required"))]
    pub route_from: String,
    #[validate(length(min = 1, message = "Destination is required"))]
    pub route_to: String,
    #[serde(default = "default_billing_type")]
    pub billing_type: String,
    #[validate(custom = "validate_money")]
    pub amount: Decimal,
    #[validate(custom = "validate_money")]
    pub truck_hire_cost: Option<Decimal>,
    pub start_date: Option<DateTime<Utc>>,
    pub lr_number: Option<String>,
    pub material: Option<String>,
    pub notes: Option<String>,
}

/// Partial update of a trip's route and financial fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTripRequest {
    #[validate(length(min = 1, max = 64))]
    pub trip_id: Option<String>,
    #[validate(length(min = 1))]
    pub route_from: Option<String>,
    #[validate(length(min = 1))]
    pub route_to: Option<String>,
    pub billing_type: Option<String>,
    #[validate(custom = "validate_money")]
    pub amount: Option<Decimal>,
    #[validate(custom = "validate_money")]
    pub truck_hire_cost: Option<Decimal>,
    pub start_date: Option<DateTime<Utc>>,
    pub lr_number: Option<String>,
    pub material: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChargeRequest {
    /// One of the charge categories, matched case-insensitively.
    #[validate(length(min = 1, message = "Expense type is required"))]
    pub expense_type: String,
    #[validate(custom = "validate_money")]
    pub amount: Option<Decimal>,
    /// `true` bills the charge to the party; anything else is a deduction.
    pub party_bill: Option<bool>,
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateChargeRequest {
    pub expense_type: Option<String>,
    #[validate(custom = "validate_money")]
    pub amount: Option<Decimal>,
    pub party_bill: Option<bool>,
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AccountRequest {
    #[validate(custom = "validate_signed_money")]
    pub amount: Decimal,
    pub account_type: AccountType,
    pub payment_type: PaymentType,
    #[serde(default)]
    pub received_by_driver: bool,
    pub payment_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChargeResponse {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub amount: Option<Decimal>,
    pub party_bill: Option<bool>,
    pub expense_type: String,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl From<ChargeModel> for ChargeResponse {
    fn from(m: ChargeModel) -> Self {
        Self {
            id: m.id,
            trip_id: m.trip_id,
            amount: m.amount,
            party_bill: m.party_bill,
            expense_type: m.expense_type,
            date: m.date,
            notes: m.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub amount: Option<Decimal>,
    pub account_type: String,
    pub payment_type: String,
    pub received_by_driver: bool,
    pub payment_date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl From<AccountModel> for AccountResponse {
    fn from(m: AccountModel) -> Self {
        Self {
            id: m.id,
            trip_id: m.trip_id,
            amount: m.amount,
            account_type: m.account_type,
            payment_type: m.payment_type,
            received_by_driver: m.received_by_driver,
            payment_date: m.payment_date,
            notes: m.notes,
        }
    }
}

/// A trip with its balance derived from the current charge and account rows.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TripResponse {
    pub id: Uuid,
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
    pub status_name: Option<TripStatus>,
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
    pub balance: TripBalance,
}

impl From<&TripLedger> for TripResponse {
    fn from(ledger: &TripLedger) -> Self {
        let t = &ledger.trip;
        Self {
            id: t.id,
            trip_id: t.trip_id.clone(),
            truck_id: t.truck_id,
            driver_id: t.driver_id,
            party_id: t.party_id,
            supplier_id: t.supplier_id,
            route_from: t.route_from.clone(),
            route_to: t.route_to.clone(),
            billing_type: t.billing_type.clone(),
            amount: t.amount,
            truck_hire_cost: t.truck_hire_cost,
            status: t.status,
            status_name: t.trip_status(),
            start_date: t.start_date,
            completed_date: t.completed_date,
            pod_received_date: t.pod_received_date,
            pod_submitted_date: t.pod_submitted_date,
            settlement_date: t.settlement_date,
            lr_number: t.lr_number.clone(),
            material: t.material.clone(),
            notes: t.notes.clone(),
            created_at: t.created_at,
            updated_at: t.updated_at,
            balance: ledger.balance(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TripDetail {
    #[serde(flatten)]
    pub trip: TripResponse,
    pub charges: Vec<ChargeResponse>,
    pub accounts: Vec<AccountResponse>,
    pub account_breakdown: AccountBreakdown,
}

impl From<TripLedger> for TripDetail {
    fn from(ledger: TripLedger) -> Self {
        let trip = TripResponse::from(&ledger);
        let account_breakdown = account_breakdown(&ledger.accounts);
        Self {
            trip,
            charges: ledger.charges.into_iter().map(Into::into).collect(),
            accounts: ledger.accounts.into_iter().map(Into::into).collect(),
            account_breakdown,
        }
    }
}

/// Trip lifecycle, charges and payments
#[derive(Clone)]
pub struct TripService {
    db_pool: Arc<DbPool>,
    trips: TripRepository,
    expense_ledger: Arc<dyn TruckExpenseLedger>,
    logger: Logger,
}

impl TripService {
    pub fn new(
        db_pool: Arc<DbPool>,
        expense_ledger: Arc<dyn TruckExpenseLedger>,
        logger: Logger,
    ) -> Self {
        Self {
            trips: TripRepository::new(db_pool.clone()),
            db_pool,
            expense_ledger,
            logger,
        }
    }

    /// Creates a trip and puts its driver on the road
    #[instrument(skip(self, request), fields(user_id = %user_id, trip_id = %request.trip_id))]
    pub async fn create_trip(
        &self,
        user_id: Uuid,
        request: CreateTripRequest,
    ) -> Result<TripResponse, ServiceError> {
        request.validate()?;
        let db = &*self.db_pool;

        let truck = truck::Entity::find_by_id(request.truck_id)
            .filter(truck::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::ValidationError(format!("Truck {} not found", request.truck_id)))?;
        driver::Entity::find_by_id(request.driver_id)
            .filter(driver::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::ValidationError(format!("Driver {} not found", request.driver_id)))?;
        party::Entity::find_by_id(request.party_id)
            .filter(party::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::ValidationError(format!("Party {} not found", request.party_id)))?;

        let (truck_hire_cost, supplier_id) = match truck.ownership_class() {
            OwnershipClass::Owned => (Decimal::ZERO, None),
            OwnershipClass::Market => {
                let hire = request.truck_hire_cost.ok_or_else(|| {
                    ServiceError::ValidationError("Truck hire cost is required for market trucks".into())
                })?;
                let supplier = request.supplier_id.or(truck.supplier_id).ok_or_else(|| {
                    ServiceError::ValidationError("A supplier is required for market trucks".into())
                })?;
                (hire, Some(supplier))
            }
        };
        if let Some(supplier_id) = supplier_id {
            supplier::Entity::find_by_id(supplier_id)
                .filter(supplier::Column::UserId.eq(user_id))
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::ValidationError(format!("Supplier {} not found", supplier_id)))?;
        }

        if self.trips.trip_id_taken(user_id, &request.trip_id, None).await? {
            return Err(ServiceError::Conflict(format!(
                "Trip ID {} already exists",
                request.trip_id
            )));
        }

        let now = Utc::now();
        let model = TripActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            trip_id: Set(request.trip_id.clone()),
            truck_id: Set(truck.id),
            driver_id: Set(request.driver_id),
            party_id: Set(request.party_id),
            supplier_id: Set(supplier_id),
            route_from: Set(request.route_from),
            route_to: Set(request.route_to),
            billing_type: Set(request.billing_type),
            amount: Set(request.amount),
            truck_hire_cost: Set(truck_hire_cost),
            status: Set(TripStatus::Started.code()),
            start_date: Set(request.start_date.unwrap_or(now)),
            completed_date: Set(None),
            pod_received_date: Set(None),
            pod_submitted_date: Set(None),
            settlement_date: Set(None),
            lr_number: Set(request.lr_number),
            material: Set(request.material),
            notes: Set(request.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let txn = db.begin().await?;
        let trip = model.insert(&txn).await.map_err(|e| {
            error!(error = %e, "Failed to insert trip");
            ServiceError::DatabaseError(e)
        })?;
        set_driver_status(&txn, trip.driver_id, DriverStatus::OnTrip).await?;
        txn.commit().await?;

        counter!("fleetbook.trips.created", 1, "ownership" => truck.ownership_class().to_string());
        info!(id = %trip.id, "Trip created");
        slog::info!(self.logger, "trip created"; "trip_id" => &trip.trip_id, "user_id" => %user_id);

        Ok(TripResponse::from(&TripLedger {
            trip,
            charges: Vec::new(),
            accounts: Vec::new(),
        }))
    }

    #[instrument(skip(self))]
    pub async fn get_trip(&self, user_id: Uuid, id: Uuid) -> Result<TripDetail, ServiceError> {
        Ok(self.require_ledger(user_id, id).await?.into())
    }

    /// Newest trips first, each with its balance
    #[instrument(skip(self))]
    pub async fn list_trips(
        &self,
        user_id: Uuid,
        status: Option<TripStatus>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<TripResponse>, u64), ServiceError> {
        let (trips, total) = self.trips.list(user_id, status, page, limit).await?;
        let ledgers = self.trips.with_ledgers(trips).await?;
        Ok((ledgers.iter().map(TripResponse::from).collect(), total))
    }

    #[instrument(skip(self, request))]
    pub async fn update_trip(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: UpdateTripRequest,
    ) -> Result<TripResponse, ServiceError> {
        request.validate()?;
        let trip = self.require_trip(user_id, id).await?;
        ensure_open(&trip)?;
        let db = &*self.db_pool;

        let mut active: TripActiveModel = trip.clone().into();
        if let Some(trip_id) = request.trip_id {
            if trip_id != trip.trip_id && self.trips.trip_id_taken(user_id, &trip_id, Some(id)).await? {
                return Err(ServiceError::Conflict(format!("Trip ID {} already exists", trip_id)));
            }
            active.trip_id = Set(trip_id);
        }
        if let Some(route_from) = request.route_from {
            active.route_from = Set(route_from);
        }
        if let Some(route_to) = request.route_to {
            active.route_to = Set(route_to);
        }
        if let Some(billing_type) = request.billing_type {
            active.billing_type = Set(billing_type);
        }
        if let Some(amount) = request.amount {
            active.amount = Set(amount);
        }
        if let Some(hire) = request.truck_hire_cost {
            let ownership = truck::Entity::find_by_id(trip.truck_id)
                .one(db)
                .await?
                .map(|t| t.ownership_class())
                .unwrap_or_default();
            match ownership {
                OwnershipClass::Market => active.truck_hire_cost = Set(hire),
                OwnershipClass::Owned if !hire.is_zero() => {
                    return Err(ServiceError::ValidationError(
                        "Company-owned trucks carry no hire cost".into(),
                    ))
                }
                OwnershipClass::Owned => {}
            }
        }
        if let Some(start_date) = request.start_date {
            active.start_date = Set(start_date);
        }
        if request.lr_number.is_some() {
            active.lr_number = Set(request.lr_number);
        }
        if request.material.is_some() {
            active.material = Set(request.material);
        }
        if request.notes.is_some() {
            active.notes = Set(request.notes);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await?;
        info!(id = %id, "Trip updated");
        self.respond(updated).await
    }

    /// Removes a trip together with its charges and account entries
    #[instrument(skip(self))]
    pub async fn delete_trip(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let trip = self.require_trip(user_id, id).await?;

        let txn = self.db_pool.begin().await?;
        trip_expense::Entity::delete_many()
            .filter(trip_expense::Column::TripId.eq(trip.id))
            .exec(&txn)
            .await?;
        payment_book::Entity::delete_many()
            .filter(payment_book::Column::TripId.eq(trip.id))
            .exec(&txn)
            .await?;
        trip::Entity::delete_by_id(trip.id).exec(&txn).await?;
        release_driver(&txn, trip.driver_id).await?;
        txn.commit().await?;

        counter!("fleetbook.trips.deleted", 1);
        slog::info!(self.logger, "trip deleted"; "trip_id" => &trip.trip_id, "user_id" => %user_id);
        Ok(())
    }

    /// Moves the trip one step forward, stamping the new status's date
    #[instrument(skip(self))]
    pub async fn advance_status(&self, user_id: Uuid, id: Uuid) -> Result<TripResponse, ServiceError> {
        let trip = self.require_trip(user_id, id).await?;
        let current = known_status(&trip)?;
        let next = current.next().ok_or_else(|| {
            ServiceError::InvalidStatus(format!("Trip {} is already {}", trip.trip_id, current))
        })?;

        let driver_id = trip.driver_id;
        let mut active: TripActiveModel = trip.into();
        active.status = Set(next.code());
        stamp_status_date(&mut active, next, Some(Utc::now()));
        active.updated_at = Set(Utc::now());

        let txn = self.db_pool.begin().await?;
        let updated = active.update(&txn).await?;
        if next == TripStatus::Completed {
            release_driver(&txn, driver_id).await?;
        }
        txn.commit().await?;

        counter!("fleetbook.trips.status_changes", 1, "direction" => "advance", "status" => next.to_string());
        slog::info!(self.logger, "trip advanced"; "trip_id" => &updated.trip_id, "status" => %next);
        self.respond(updated).await
    }

    /// Moves the trip one step back, clearing the date of the status it leaves
    #[instrument(skip(self))]
    pub async fn undo_status(&self, user_id: Uuid, id: Uuid) -> Result<TripResponse, ServiceError> {
        let trip = self.require_trip(user_id, id).await?;
        let current = known_status(&trip)?;
        let previous = current.previous().ok_or_else(|| {
            ServiceError::InvalidStatus(format!("Trip {} has not moved past {}", trip.trip_id, current))
        })?;

        let driver_id = trip.driver_id;
        let mut active: TripActiveModel = trip.into();
        active.status = Set(previous.code());
        stamp_status_date(&mut active, current, None);
        active.updated_at = Set(Utc::now());

        let txn = self.db_pool.begin().await?;
        let updated = active.update(&txn).await?;
        if previous == TripStatus::Started {
            set_driver_status(&txn, driver_id, DriverStatus::OnTrip).await?;
        }
        txn.commit().await?;

        counter!("fleetbook.trips.status_changes", 1, "direction" => "undo", "status" => previous.to_string());
        slog::info!(self.logger, "trip status undone"; "trip_id" => &updated.trip_id, "status" => %previous);
        self.respond(updated).await
    }

    #[instrument(skip(self))]
    pub async fn trip_balance(&self, user_id: Uuid, id: Uuid) -> Result<TripBalance, ServiceError> {
        Ok(self.require_ledger(user_id, id).await?.balance())
    }

    /// Profit over the truck's running cost from start to settlement, or to now
    #[instrument(skip(self))]
    pub async fn trip_profit(&self, user_id: Uuid, id: Uuid) -> Result<TripProfit, ServiceError> {
        let ledger = self.require_ledger(user_id, id).await?;
        let trip = &ledger.trip;

        let ownership = match truck::Entity::find_by_id(trip.truck_id).one(&*self.db_pool).await? {
            Some(truck) => truck.ownership_class(),
            None => {
                warn!(truck_id = %trip.truck_id, trip_id = %trip.trip_id, "Truck missing, treating trip as company-owned");
                OwnershipClass::Owned
            }
        };

        let until = trip.settlement_date.unwrap_or_else(Utc::now);
        let operating_expense = self
            .expense_ledger
            .operating_expense(user_id, trip.truck_id, trip.start_date, until)
            .await?;

        Ok(trip_profit(
            Some(trip.amount),
            ledger.balance().charges(),
            ownership,
            operating_expense,
            Some(trip.truck_hire_cost),
        ))
    }

    #[instrument(skip(self, request))]
    pub async fn add_charge(
        &self,
        user_id: Uuid,
        trip_id: Uuid,
        request: ChargeRequest,
    ) -> Result<ChargeResponse, ServiceError> {
        request.validate()?;
        let trip = self.require_trip(user_id, trip_id).await?;
        ensure_open(&trip)?;
        let expense_type = parse_charge_type(&request.expense_type)?;

        let charge = ChargeActiveModel {
            id: Set(Uuid::new_v4()),
            trip_id: Set(trip.id),
            user_id: Set(user_id),
            amount: Set(request.amount),
            party_bill: Set(request.party_bill),
            expense_type: Set(expense_type.to_string()),
            date: Set(request.date.unwrap_or_else(Utc::now)),
            notes: Set(request.notes),
        }
        .insert(&*self.db_pool)
        .await?;

        counter!("fleetbook.trips.charges_recorded", 1, "billable" => (charge.party_bill == Some(true)).to_string());
        info!(charge_id = %charge.id, expense_type = %charge.expense_type, "Charge recorded");
        Ok(charge.into())
    }

    #[instrument(skip(self, request))]
    pub async fn update_charge(
        &self,
        user_id: Uuid,
        trip_id: Uuid,
        charge_id: Uuid,
        request: UpdateChargeRequest,
    ) -> Result<ChargeResponse, ServiceError> {
        request.validate()?;
        let trip = self.require_trip(user_id, trip_id).await?;
        ensure_open(&trip)?;
        let charge = self.require_charge(user_id, trip.id, charge_id).await?;

        let mut active: ChargeActiveModel = charge.into();
        if let Some(raw) = request.expense_type {
            active.expense_type = Set(parse_charge_type(&raw)?.to_string());
        }
        if request.amount.is_some() {
            active.amount = Set(request.amount);
        }
        if request.party_bill.is_some() {
            active.party_bill = Set(request.party_bill);
        }
        if let Some(date) = request.date {
            active.date = Set(date);
        }
        if request.notes.is_some() {
            active.notes = Set(request.notes);
        }

        Ok(active.update(&*self.db_pool).await?.into())
    }

    #[instrument(skip(self))]
    pub async fn delete_charge(
        &self,
        user_id: Uuid,
        trip_id: Uuid,
        charge_id: Uuid,
    ) -> Result<(), ServiceError> {
        let trip = self.require_trip(user_id, trip_id).await?;
        ensure_open(&trip)?;
        let charge = self.require_charge(user_id, trip.id, charge_id).await?;
        trip_expense::Entity::delete_by_id(charge.id)
            .exec(&*self.db_pool)
            .await?;
        info!(charge_id = %charge_id, "Charge deleted");
        Ok(())
    }

    pub async fn list_charges(&self, user_id: Uuid, trip_id: Uuid) -> Result<Vec<ChargeResponse>, ServiceError> {
        let ledger = self.require_ledger(user_id, trip_id).await?;
        Ok(ledger.charges.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, request))]
    pub async fn add_account(
        &self,
        user_id: Uuid,
        trip_id: Uuid,
        request: AccountRequest,
    ) -> Result<AccountResponse, ServiceError> {
        request.validate()?;
        let trip = self.require_trip(user_id, trip_id).await?;
        ensure_open(&trip)?;

        let entry = AccountActiveModel {
            id: Set(Uuid::new_v4()),
            trip_id: Set(trip.id),
            user_id: Set(user_id),
            amount: Set(Some(request.amount)),
            account_type: Set(request.account_type.to_string()),
            payment_type: Set(request.payment_type.to_string()),
            received_by_driver: Set(request.received_by_driver),
            payment_date: Set(request.payment_date.unwrap_or_else(Utc::now)),
            notes: Set(request.notes),
        }
        .insert(&*self.db_pool)
        .await?;

        counter!("fleetbook.trips.accounts_recorded", 1, "account_type" => entry.account_type.clone());
        info!(entry_id = %entry.id, account_type = %entry.account_type, "Account entry recorded");
        Ok(entry.into())
    }

    #[instrument(skip(self))]
    pub async fn delete_account(
        &self,
        user_id: Uuid,
        trip_id: Uuid,
        entry_id: Uuid,
    ) -> Result<(), ServiceError> {
        let trip = self.require_trip(user_id, trip_id).await?;
        ensure_open(&trip)?;
        let result = payment_book::Entity::delete_many()
            .filter(payment_book::Column::Id.eq(entry_id))
            .filter(payment_book::Column::TripId.eq(trip.id))
            .filter(payment_book::Column::UserId.eq(user_id))
            .exec(&*self.db_pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Account entry {} not found", entry_id)));
        }
        info!(entry_id = %entry_id, "Account entry deleted");
        Ok(())
    }

    pub async fn list_accounts(&self, user_id: Uuid, trip_id: Uuid) -> Result<Vec<AccountResponse>, ServiceError> {
        let ledger = self.require_ledger(user_id, trip_id).await?;
        Ok(ledger.accounts.into_iter().map(Into::into).collect())
    }

    async fn require_trip(&self, user_id: Uuid, id: Uuid) -> Result<TripModel, ServiceError> {
        self.trips
            .find_owned(user_id, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Trip {} not found", id)))
    }

    async fn require_ledger(&self, user_id: Uuid, id: Uuid) -> Result<TripLedger, ServiceError> {
        self.trips
            .find_ledger(user_id, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Trip {} not found", id)))
    }

    async fn require_charge(
        &self,
        user_id: Uuid,
        trip_id: Uuid,
        charge_id: Uuid,
    ) -> Result<ChargeModel, ServiceError> {
        trip_expense::Entity::find_by_id(charge_id)
            .filter(trip_expense::Column::TripId.eq(trip_id))
            .filter(trip_expense::Column::UserId.eq(user_id))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Charge {} not found", charge_id)))
    }

    async fn respond(&self, trip: TripModel) -> Result<TripResponse, ServiceError> {
        let ledgers = self.trips.with_ledgers(vec![trip]).await?;
        ledgers
            .first()
            .map(TripResponse::from)
            .ok_or_else(|| ServiceError::InternalError("Trip vanished while loading its ledger".into()))
    }
}

fn known_status(trip: &TripModel) -> Result<TripStatus, ServiceError> {
    trip.trip_status().ok_or_else(|| {
        ServiceError::InvalidStatus(format!("Trip {} has unknown status code {}", trip.trip_id, trip.status))
    })
}

/// Settled trips are frozen until their settlement is undone.
fn ensure_open(trip: &TripModel) -> Result<(), ServiceError> {
    if trip.is_settled() {
        return Err(ServiceError::InvalidOperation(format!(
            "Trip {} is settled and can no longer be changed",
            trip.trip_id
        )));
    }
    Ok(())
}

fn parse_charge_type(raw: &str) -> Result<ChargeType, ServiceError> {
    ChargeType::parse(raw).ok_or_else(|| ServiceError::ValidationError(format!("Unknown charge type: {}", raw)))
}

fn stamp_status_date(active: &mut TripActiveModel, status: TripStatus, at: Option<DateTime<Utc>>) {
    match status {
        TripStatus::Started => {}
        TripStatus::Completed => active.completed_date = Set(at),
        TripStatus::PodReceived => active.pod_received_date = Set(at),
        TripStatus::PodSubmitted => active.pod_submitted_date = Set(at),
        TripStatus::Settled => active.settlement_date = Set(at),
    }
}

async fn set_driver_status<C: ConnectionTrait>(
    conn: &C,
    driver_id: Uuid,
    status: DriverStatus,
) -> Result<(), ServiceError> {
    driver::Entity::update_many()
        .col_expr(driver::Column::Status, Expr::value(status.to_string()))
        .filter(driver::Column::Id.eq(driver_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Marks the driver available once none of their trips is still on the road.
async fn release_driver<C: ConnectionTrait>(conn: &C, driver_id: Uuid) -> Result<(), ServiceError> {
    let open_trips = trip::Entity::find()
        .filter(trip::Column::DriverId.eq(driver_id))
        .filter(trip::Column::Status.eq(TripStatus::Started.code()))
        .count(conn)
        .await?;
    if open_trips == 0 {
        set_driver_status(conn, driver_id, DriverStatus::Available).await?;
    }
    Ok(())
}
