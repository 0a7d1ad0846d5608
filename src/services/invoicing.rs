use crate::{
    db::DbPool,
    errors::ServiceError,
    ledger::{build_invoice, InvoiceSummary, InvoiceTrip},
    repositories::TripRepository,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct InvoiceRequest {
    #[validate(length(min = 1, message = "At least one trip is required"))]
    pub trip_ids: Vec<Uuid>,
}

/// Rolls selected trips up into a party invoice
#[derive(Clone)]
pub struct InvoicingService {
    trips: TripRepository,
}

impl InvoicingService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            trips: TripRepository::new(db_pool),
        }
    }

    #[instrument(skip(self, request), fields(trips = request.trip_ids.len()))]
    pub async fn build_invoice(
        &self,
        user_id: Uuid,
        request: InvoiceRequest,
    ) -> Result<InvoiceSummary, ServiceError> {
        request.validate()?;
        let wanted: HashSet<Uuid> = request.trip_ids.iter().copied().collect();
        let ids: Vec<Uuid> = wanted.iter().copied().collect();

        let trips = self.trips.find_many(user_id, &ids).await?;
        if trips.len() != wanted.len() {
            let found: HashSet<Uuid> = trips.iter().map(|t| t.id).collect();
            let missing: Vec<String> = wanted.difference(&found).map(Uuid::to_string).collect();
            return Err(ServiceError::NotFound(format!("Trips not found: {}", missing.join(", "))));
        }

        let lines = self
            .trips
            .with_ledgers(trips)
            .await?
            .into_iter()
            .map(|ledger| InvoiceTrip {
                balance: ledger.balance(),
                id: ledger.trip.id,
                route: ledger.trip.route(),
                trip_id: ledger.trip.trip_id,
                party_id: ledger.trip.party_id,
            })
            .collect();

        let invoice = build_invoice(lines)?;
        info!(party_id = %invoice.party_id, total_balance = %invoice.total_balance, "Invoice built");
        Ok(invoice)
    }
}
