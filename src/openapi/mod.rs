use axum::{routing::get, Json, Router};
use once_cell::sync::Lazy;
use utoipa::OpenApi;

use crate::AppState;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fleetbook API",
        version = "1.0.0",
        description = r#"
# Fleetbook Trucking Back Office API

Trips, their charges and account entries, fleet master data, expenses and
the monthly profit report for a small trucking business.

## Scoping

Every record belongs to one user. Send the owning user's id in the
`X-User-Id` header; requests without it are rejected with 401.

## Money

Amounts are decimals serialized as strings. Balances and profit are derived
on read and never stored.

## Errors

```json
{
  "error": "Bad Request",
  "message": "Invalid month name: Jantober",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

## Pagination

List endpoints accept `page` (default 1) and `limit` (default and maximum
come from configuration).
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Trips", description = "Trip lifecycle, charges, accounts and invoices"),
        (name = "Fleet", description = "Trucks, drivers, parties and the suppliers market trucks are hired from"),
        (name = "Expenses", description = "Truck, trip and office expenses"),
        (name = "Reports", description = "Monthly profit report")
    ),
    paths(
        // Trips
        crate::handlers::trips::list_trips,
        crate::handlers::trips::create_trip,
        crate::handlers::trips::get_trip,
        crate::handlers::trips::update_trip,
        crate::handlers::trips::delete_trip,
        crate::handlers::trips::advance_trip,
        crate::handlers::trips::undo_trip,
        crate::handlers::trips::trip_balance,
        crate::handlers::trips::trip_profit,
        crate::handlers::trips::list_charges,
        crate::handlers::trips::add_charge,
        crate::handlers::trips::update_charge,
        crate::handlers::trips::delete_charge,
        crate::handlers::trips::list_accounts,
        crate::handlers::trips::add_account,
        crate::handlers::trips::delete_account,
        crate::handlers::trips::build_invoice,

        // Fleet
        crate::handlers::fleet::list_trucks,
        crate::handlers::fleet::create_truck,
        crate::handlers::fleet::get_truck,
        crate::handlers::fleet::delete_truck,
        crate::handlers::fleet::list_drivers,
        crate::handlers::fleet::create_driver,
        crate::handlers::fleet::get_driver,
        crate::handlers::fleet::delete_driver,
        crate::handlers::fleet::list_parties,
        crate::handlers::fleet::create_party,
        crate::handlers::fleet::get_party,
        crate::handlers::fleet::delete_party,
        crate::handlers::fleet::party_balance,
        crate::handlers::fleet::list_suppliers,
        crate::handlers::fleet::create_supplier,
        crate::handlers::fleet::get_supplier,
        crate::handlers::fleet::delete_supplier,

        // Expenses
        crate::handlers::expenses::list_expenses,
        crate::handlers::expenses::create_expense,
        crate::handlers::expenses::delete_expense,

        // Reports
        crate::handlers::reports::monthly_report,
        crate::handlers::reports::monthly_report_html,
    ),
    components(
        schemas(
            crate::ListQuery,

            // Trip types
            crate::services::trips::CreateTripRequest,
            crate::services::trips::UpdateTripRequest,
            crate::services::trips::ChargeRequest,
            crate::services::trips::UpdateChargeRequest,
            crate::services::trips::AccountRequest,
            crate::services::trips::ChargeResponse,
            crate::services::trips::AccountResponse,
            crate::services::trips::TripResponse,
            crate::services::trips::TripDetail,
            crate::services::invoicing::InvoiceRequest,
            crate::entities::trip::TripStatus,

            // Ledger types
            crate::ledger::TripBalance,
            crate::ledger::TripProfit,
            crate::ledger::ChargeTotals,
            crate::ledger::ChargeType,
            crate::ledger::AccountBreakdown,
            crate::ledger::AccountType,
            crate::ledger::PaymentType,
            crate::ledger::OwnershipClass,
            crate::ledger::InvoiceLine,
            crate::ledger::InvoiceSummary,
            crate::ledger::MonthlyReport,
            crate::ledger::SegmentSummary,
            crate::ledger::ReportTrip,
            crate::ledger::ExpenseTotals,

            // Fleet types
            crate::services::fleet::CreateTruckRequest,
            crate::services::fleet::CreateDriverRequest,
            crate::services::fleet::CreatePartyRequest,
            crate::services::fleet::CreateSupplierRequest,
            crate::services::fleet::PartyBalance,
            crate::entities::driver::DriverStatus,

            // Expense types
            crate::services::expenses::CreateExpenseRequest,
            crate::entities::expense::ExpenseCategory,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

static OPENAPI_DOC: Lazy<utoipa::openapi::OpenApi> = Lazy::new(ApiDocV1::openapi);

/// Serves the generated document as JSON, built once on first request.
pub fn openapi_routes() -> Router<AppState> {
    Router::new().route(
        OPENAPI_JSON_PATH,
        get(|| async { Json(OPENAPI_DOC.clone()) }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Fleetbook API"));
        assert!(json.contains("/api/v1/trips"));
        assert!(json.contains("/api/v1/trips/{id}/charges"));
        assert!(json.contains("/api/v1/parties/{id}/balance"));
        assert!(json.contains("/api/v1/reports/monthly"));
        assert!(json.contains("MonthlyReport"));
    }
}
