use crate::{
    db::DbPool,
    entities::driver::{self, DriverStatus},
    entities::party,
    entities::supplier,
    entities::trip,
    entities::truck,
    errors::ServiceError,
    ledger::OwnershipClass,
    repositories::TripRepository,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use slog::Logger;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTruckRequest {
    #[validate(length(min = 1, max = 32, message = "Truck number is required"))]
    pub truck_no: String,
    pub ownership: OwnershipClass,
    /// Required for market trucks, ignored for company-owned ones.
    pub supplier_id: Option<Uuid>,
    pub model: Option<String>,
    pub capacity: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateDriverRequest {
    #[validate(length(min = 1, max = 128, message = "Driver name is required"))]
    pub name: String,
    #[validate(length(max = 20))]
    pub contact_number: Option<String>,
    pub license_no: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePartyRequest {
    #[validate(length(min = 1, max = 128, message = "Party name is required"))]
    pub name: String,
    pub contact_person: Option<String>,
    #[validate(length(max = 20))]
    pub contact_number: Option<String>,
    pub address: Option<String>,
    #[validate(length(equal = 15, message = "GST number must be 15 characters"))]
    pub gst_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 128, message = "Supplier name is required"))]
    pub name: String,
    #[validate(length(max = 20))]
    pub contact_number: Option<String>,
}

/// What a party owes across all of its trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PartyBalance {
    pub party_id: Uuid,
    pub trip_count: u64,
    pub total_balance: Decimal,
}

/// Trucks, drivers, parties and suppliers
#[derive(Clone)]
pub struct FleetService {
    db_pool: Arc<DbPool>,
    trips: TripRepository,
    logger: Logger,
}

impl FleetService {
    pub fn new(db_pool: Arc<DbPool>, logger: Logger) -> Self {
        Self {
            trips: TripRepository::new(db_pool.clone()),
            db_pool,
            logger,
        }
    }

    #[instrument(skip(self, request), fields(truck_no = %request.truck_no))]
    pub async fn create_truck(
        &self,
        user_id: Uuid,
        request: CreateTruckRequest,
    ) -> Result<truck::Model, ServiceError> {
        request.validate()?;
        let db = &*self.db_pool;

        let taken = truck::Entity::find()
            .filter(truck::Column::UserId.eq(user_id))
            .filter(truck::Column::TruckNo.eq(request.truck_no.as_str()))
            .count(db)
            .await?;
        if taken > 0 {
            return Err(ServiceError::Conflict(format!(
                "Truck {} already exists",
                request.truck_no
            )));
        }

        let supplier_id = match request.ownership {
            OwnershipClass::Owned => None,
            OwnershipClass::Market => {
                let supplier_id = request.supplier_id.ok_or_else(|| {
                    ServiceError::ValidationError("Market trucks need a supplier".into())
                })?;
                self.get_supplier(user_id, supplier_id).await.map_err(|_| {
                    ServiceError::ValidationError(format!("Supplier {} not found", supplier_id))
                })?;
                Some(supplier_id)
            }
        };

        let truck = truck::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            truck_no: Set(request.truck_no),
            ownership: Set(request.ownership.to_string()),
            supplier_id: Set(supplier_id),
            model: Set(request.model),
            capacity: Set(request.capacity),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;

        info!(id = %truck.id, ownership = %truck.ownership, "Truck registered");
        slog::info!(self.logger, "truck registered"; "truck_no" => &truck.truck_no, "user_id" => %user_id);
        Ok(truck)
    }

    pub async fn get_truck(&self, user_id: Uuid, id: Uuid) -> Result<truck::Model, ServiceError> {
        truck::Entity::find_by_id(id)
            .filter(truck::Column::UserId.eq(user_id))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Truck {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_trucks(
        &self,
        user_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<truck::Model>, u64), ServiceError> {
        let paginator = truck::Entity::find()
            .filter(truck::Column::UserId.eq(user_id))
            .order_by_asc(truck::Column::TruckNo)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Fails with `Conflict` while any trip still runs on the truck
    #[instrument(skip(self))]
    pub async fn delete_truck(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let truck = self.get_truck(user_id, id).await?;
        self.ensure_unreferenced(trip::Column::TruckId, truck.id, "Truck").await?;
        truck::Entity::delete_by_id(truck.id).exec(&*self.db_pool).await?;
        slog::info!(self.logger, "truck removed"; "truck_no" => &truck.truck_no);
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub async fn create_driver(
        &self,
        user_id: Uuid,
        request: CreateDriverRequest,
    ) -> Result<driver::Model, ServiceError> {
        request.validate()?;
        let driver = driver::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(request.name),
            contact_number: Set(request.contact_number),
            license_no: Set(request.license_no),
            status: Set(DriverStatus::Available.to_string()),
            balance: Set(Decimal::ZERO),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db_pool)
        .await?;

        info!(id = %driver.id, "Driver added");
        Ok(driver)
    }

    pub async fn get_driver(&self, user_id: Uuid, id: Uuid) -> Result<driver::Model, ServiceError> {
        driver::Entity::find_by_id(id)
            .filter(driver::Column::UserId.eq(user_id))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Driver {} not found", id)))
    }

    pub async fn list_drivers(
        &self,
        user_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<driver::Model>, u64), ServiceError> {
        let paginator = driver::Entity::find()
            .filter(driver::Column::UserId.eq(user_id))
            .order_by_asc(driver::Column::Name)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self))]
    pub async fn delete_driver(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let driver = self.get_driver(user_id, id).await?;
        self.ensure_unreferenced(trip::Column::DriverId, driver.id, "Driver").await?;
        driver::Entity::delete_by_id(driver.id).exec(&*self.db_pool).await?;
        slog::info!(self.logger, "driver removed"; "driver_id" => %driver.id);
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub async fn create_party(
        &self,
        user_id: Uuid,
        request: CreatePartyRequest,
    ) -> Result<party::Model, ServiceError> {
        request.validate()?;
        let party = party::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(request.name),
            contact_person: Set(request.contact_person),
            contact_number: Set(request.contact_number),
            address: Set(request.address),
            gst_number: Set(request.gst_number.map(|g| g.to_uppercase())),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db_pool)
        .await?;

        info!(id = %party.id, "Party added");
        Ok(party)
    }

    pub async fn get_party(&self, user_id: Uuid, id: Uuid) -> Result<party::Model, ServiceError> {
        party::Entity::find_by_id(id)
            .filter(party::Column::UserId.eq(user_id))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Party {} not found", id)))
    }

    pub async fn list_parties(
        &self,
        user_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<party::Model>, u64), ServiceError> {
        let paginator = party::Entity::find()
            .filter(party::Column::UserId.eq(user_id))
            .order_by_asc(party::Column::Name)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self))]
    pub async fn delete_party(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let party = self.get_party(user_id, id).await?;
        self.ensure_unreferenced(trip::Column::PartyId, party.id, "Party").await?;
        party::Entity::delete_by_id(party.id).exec(&*self.db_pool).await?;
        slog::info!(self.logger, "party removed"; "party" => &party.name);
        Ok(())
    }

    /// Sum of the balances of every trip billed to the party
    #[instrument(skip(self))]
    pub async fn party_balance(&self, user_id: Uuid, id: Uuid) -> Result<PartyBalance, ServiceError> {
        let party = self.get_party(user_id, id).await?;
        let trips = self.trips.for_party(user_id, party.id).await?;
        let ledgers = self.trips.with_ledgers(trips).await?;

        Ok(PartyBalance {
            party_id: party.id,
            trip_count: ledgers.len() as u64,
            total_balance: ledgers.iter().map(|l| l.balance().balance).sum(),
        })
    }

    #[instrument(skip(self, request))]
    pub async fn create_supplier(
        &self,
        user_id: Uuid,
        request: CreateSupplierRequest,
    ) -> Result<supplier::Model, ServiceError> {
        request.validate()?;
        let supplier = supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(request.name),
            contact_number: Set(request.contact_number),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db_pool)
        .await?;

        info!(id = %supplier.id, "Supplier added");
        Ok(supplier)
    }

    pub async fn get_supplier(&self, user_id: Uuid, id: Uuid) -> Result<supplier::Model, ServiceError> {
        supplier::Entity::find_by_id(id)
            .filter(supplier::Column::UserId.eq(user_id))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", id)))
    }

    pub async fn list_suppliers(
        &self,
        user_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<supplier::Model>, u64), ServiceError> {
        let paginator = supplier::Entity::find()
            .filter(supplier::Column::UserId.eq(user_id))
            .order_by_asc(supplier::Column::Name)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Trucks and trips pointing at the supplier keep running without one.
    #[instrument(skip(self))]
    pub async fn delete_supplier(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let supplier = self.get_supplier(user_id, id).await?;
        supplier::Entity::delete_by_id(supplier.id).exec(&*self.db_pool).await?;
        slog::info!(self.logger, "supplier removed"; "supplier" => &supplier.name);
        Ok(())
    }

    async fn ensure_unreferenced(
        &self,
        column: trip::Column,
        id: Uuid,
        what: &str,
    ) -> Result<(), ServiceError> {
        let trips = trip::Entity::find()
            .filter(column.eq(id))
            .count(&*self.db_pool)
            .await?;
        if trips > 0 {
            return Err(ServiceError::Conflict(format!(
                "{} is used by {} trip(s)",
                what, trips
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    async fn service() -> (FleetService, fixtures::Fleet) {
        let db = Arc::new(fixtures::memory_pool().await);
        let fleet = fixtures::seed_fleet(&db).await;
        (FleetService::new(db, slog::Logger::root(slog::Discard, slog::o!())), fleet)
    }

    fn truck_request(truck_no: &str, ownership: OwnershipClass, supplier_id: Option<Uuid>) -> CreateTruckRequest {
        CreateTruckRequest {
            truck_no: truck_no.into(),
            ownership,
            supplier_id,
            model: Some("Tata 1613".into()),
            capacity: None,
        }
    }

    #[tokio::test]
    async fn truck_numbers_are_unique_per_user() {
        let (service, fleet) = service().await;
        service
            .create_truck(fleet.user, truck_request("KA01AB1234", OwnershipClass::Owned, None))
            .await
            .unwrap();

        assert_matches!(
            service
                .create_truck(fleet.user, truck_request("KA01AB1234", OwnershipClass::Owned, None))
                .await,
            Err(ServiceError::Conflict(_))
        );
        service
            .create_truck(Uuid::new_v4(), truck_request("KA01AB1234", OwnershipClass::Owned, None))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn market_truck_needs_known_supplier() {
        let (service, fleet) = service().await;
        assert_matches!(
            service
                .create_truck(fleet.user, truck_request("TN09X1", OwnershipClass::Market, None))
                .await,
            Err(ServiceError::ValidationError(_))
        );

        let truck = service
            .create_truck(fleet.user, truck_request("TN09X1", OwnershipClass::Market, Some(fleet.supplier)))
            .await
            .unwrap();
        assert_eq!(truck.ownership_class(), OwnershipClass::Market);
    }

    #[tokio::test]
    async fn own_truck_ignores_supplier() {
        let (service, fleet) = service().await;
        let truck = service
            .create_truck(fleet.user, truck_request("TN09X2", OwnershipClass::Owned, Some(fleet.supplier)))
            .await
            .unwrap();
        assert_eq!(truck.ownership, "Self");
        assert_eq!(truck.supplier_id, None);
    }

    #[tokio::test]
    async fn referenced_party_cannot_be_deleted() {
        let (service, fleet) = service().await;
        fixtures::trip(&service.db_pool, &fleet, "T-1", dec!(1000)).await;

        assert_matches!(service.delete_party(fleet.user, fleet.party).await, Err(ServiceError::Conflict(_)));
        assert_matches!(service.delete_driver(fleet.user, fleet.driver).await, Err(ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn party_balance_sums_trip_balances() {
        let (service, fleet) = service().await;
        fixtures::trip(&service.db_pool, &fleet, "T-1", dec!(1000)).await;
        fixtures::trip(&service.db_pool, &fleet, "T-2", dec!(2500)).await;

        let balance = service.party_balance(fleet.user, fleet.party).await.unwrap();
        assert_eq!(balance.trip_count, 2);
        assert_eq!(balance.total_balance, dec!(3500));
    }

    #[tokio::test]
    async fn new_drivers_are_available() {
        let (service, fleet) = service().await;
        let driver = service
            .create_driver(
                fleet.user,
                CreateDriverRequest {
                    name: "Ravi".into(),
                    contact_number: None,
                    license_no: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(driver.status, "Available");

        let (drivers, total) = service.list_drivers(fleet.user, 1, 10).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(drivers.len(), 2);
    }
}
