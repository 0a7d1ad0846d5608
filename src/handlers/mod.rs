pub mod common;
pub mod expenses;
pub mod fleet;
pub mod reports;
pub mod scope;
pub mod trips;

use crate::db::DbPool;
use crate::logging::component_logger;
use crate::repositories::{ExpenseRepository, TruckExpenseLedger};
use crate::services::{
    expenses::ExpenseService, fleet::FleetService, invoicing::InvoicingService,
    reports::ReportService, trips::TripService,
};
use slog::Logger;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub trips: Arc<TripService>,
    pub fleet: Arc<FleetService>,
    pub expenses: Arc<ExpenseService>,
    pub reports: Arc<ReportService>,
    pub invoicing: Arc<InvoicingService>,
}

impl AppServices {
    /// Wires every service to the pool, each with its own component logger.
    pub fn new(db_pool: Arc<DbPool>, base_logger: &Logger) -> Self {
        let expense_ledger: Arc<dyn TruckExpenseLedger> =
            Arc::new(ExpenseRepository::new(db_pool.clone()));

        Self {
            trips: Arc::new(TripService::new(
                db_pool.clone(),
                expense_ledger,
                component_logger(base_logger, "trip_service"),
            )),
            fleet: Arc::new(FleetService::new(
                db_pool.clone(),
                component_logger(base_logger, "fleet_service"),
            )),
            expenses: Arc::new(ExpenseService::new(
                db_pool.clone(),
                component_logger(base_logger, "expense_service"),
            )),
            reports: Arc::new(ReportService::new(
                db_pool.clone(),
                component_logger(base_logger, "report_service"),
            )),
            invoicing: Arc::new(InvoicingService::new(db_pool)),
        }
    }
}
