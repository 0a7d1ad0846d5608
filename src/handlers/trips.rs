use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use super::common::{created_response, no_content_response, paginated, success_response};
use super::scope::UserScope;
use crate::entities::trip::TripStatus;
use crate::errors::ServiceError;
use crate::ledger::{InvoiceSummary, TripBalance, TripProfit};
use crate::services::invoicing::InvoiceRequest;
use crate::services::trips::{
    AccountRequest, AccountResponse, ChargeRequest, ChargeResponse, CreateTripRequest, TripDetail,
    TripResponse, UpdateChargeRequest, UpdateTripRequest,
};
use crate::{ApiResponse, ApiResult, AppState, PaginatedResponse};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TripListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    pub limit: Option<u64>,
    /// Status code, 0 (Started) to 4 (Settled)
    pub status: Option<i16>,
}

fn default_page() -> u64 {
    1
}

pub fn trips_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips).post(create_trip))
        .route("/invoice", post(build_invoice))
        .route("/:id", get(get_trip).put(update_trip).delete(delete_trip))
        .route("/:id/advance", post(advance_trip))
        .route("/:id/undo", post(undo_trip))
        .route("/:id/balance", get(trip_balance))
        .route("/:id/profit", get(trip_profit))
        .route("/:id/charges", get(list_charges).post(add_charge))
        .route("/:id/charges/:charge_id", put(update_charge).delete(delete_charge))
        .route("/:id/accounts", get(list_accounts).post(add_account))
        .route("/:id/accounts/:entry_id", delete(delete_account))
}

#[utoipa::path(
    get,
    path = "/api/v1/trips",
    summary = "List trips",
    description = "Newest trips first, each with its outstanding balance",
    params(TripListQuery),
    responses(
        (status = 200, description = "Trips retrieved", body = ApiResponse<PaginatedResponse<TripResponse>>),
        (status = 400, description = "Unknown status code", body = crate::errors::ErrorResponse),
        (status = 401, description = "Missing user scope", body = crate::errors::ErrorResponse),
    ),
    tag = "Trips"
)]
pub async fn list_trips(
    State(state): State<AppState>,
    scope: UserScope,
    Query(query): Query<TripListQuery>,
) -> ApiResult<PaginatedResponse<TripResponse>> {
    let status = query
        .status
        .map(|code| {
            TripStatus::from_code(code)
                .ok_or_else(|| ServiceError::InvalidInput(format!("Unknown trip status code {}", code)))
        })
        .transpose()?;
    let page = query.page.max(1);
    let limit = state.config.page_size(query.limit);

    let (items, total) = state
        .services
        .trips
        .list_trips(scope.user_id(), status, page, limit)
        .await?;
    Ok(success_response(paginated(items, total, page, limit)))
}

#[utoipa::path(
    post,
    path = "/api/v1/trips",
    summary = "Create trip",
    request_body = CreateTripRequest,
    responses(
        (status = 201, description = "Trip created", body = ApiResponse<TripResponse>),
        (status = 400, description = "Invalid trip", body = crate::errors::ErrorResponse),
        (status = 409, description = "Trip ID already used", body = crate::errors::ErrorResponse),
    ),
    tag = "Trips"
)]
pub async fn create_trip(
    State(state): State<AppState>,
    scope: UserScope,
    Json(request): Json<CreateTripRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TripResponse>>), ServiceError> {
    let trip = state.services.trips.create_trip(scope.user_id(), request).await?;
    Ok(created_response(trip))
}

#[utoipa::path(
    get,
    path = "/api/v1/trips/{id}",
    summary = "Get trip",
    description = "Trip with its charges, account entries and balance",
    params(("id" = Uuid, Path, description = "Trip ID")),
    responses(
        (status = 200, description = "Trip retrieved", body = ApiResponse<TripDetail>),
        (status = 404, description = "Trip not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Trips"
)]
pub async fn get_trip(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
) -> ApiResult<TripDetail> {
    let trip = state.services.trips.get_trip(scope.user_id(), id).await?;
    Ok(success_response(trip))
}

#[utoipa::path(
    put,
    path = "/api/v1/trips/{id}",
    summary = "Update trip",
    params(("id" = Uuid, Path, description = "Trip ID")),
    request_body = UpdateTripRequest,
    responses(
        (status = 200, description = "Trip updated", body = ApiResponse<TripResponse>),
        (status = 400, description = "Trip is settled or input invalid", body = crate::errors::ErrorResponse),
        (status = 404, description = "Trip not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Trips"
)]
pub async fn update_trip(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTripRequest>,
) -> ApiResult<TripResponse> {
    let trip = state.services.trips.update_trip(scope.user_id(), id, request).await?;
    Ok(success_response(trip))
}

#[utoipa::path(
    delete,
    path = "/api/v1/trips/{id}",
    summary = "Delete trip",
    params(("id" = Uuid, Path, description = "Trip ID")),
    responses(
        (status = 204, description = "Trip and its ledger rows deleted"),
        (status = 404, description = "Trip not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Trips"
)]
pub async fn delete_trip(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.trips.delete_trip(scope.user_id(), id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/trips/{id}/advance",
    summary = "Advance trip status",
    params(("id" = Uuid, Path, description = "Trip ID")),
    responses(
        (status = 200, description = "Status advanced", body = ApiResponse<TripResponse>),
        (status = 400, description = "Trip already settled", body = crate::errors::ErrorResponse),
    ),
    tag = "Trips"
)]
pub async fn advance_trip(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
) -> ApiResult<TripResponse> {
    let trip = state.services.trips.advance_status(scope.user_id(), id).await?;
    Ok(success_response(trip))
}

#[utoipa::path(
    post,
    path = "/api/v1/trips/{id}/undo",
    summary = "Undo trip status",
    params(("id" = Uuid, Path, description = "Trip ID")),
    responses(
        (status = 200, description = "Status moved back", body = ApiResponse<TripResponse>),
        (status = 400, description = "Trip has not started moving", body = crate::errors::ErrorResponse),
    ),
    tag = "Trips"
)]
pub async fn undo_trip(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
) -> ApiResult<TripResponse> {
    let trip = state.services.trips.undo_status(scope.user_id(), id).await?;
    Ok(success_response(trip))
}

#[utoipa::path(
    get,
    path = "/api/v1/trips/{id}/balance",
    summary = "Trip balance",
    params(("id" = Uuid, Path, description = "Trip ID")),
    responses(
        (status = 200, description = "Balance computed", body = ApiResponse<TripBalance>),
        (status = 404, description = "Trip not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Trips"
)]
pub async fn trip_balance(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
) -> ApiResult<TripBalance> {
    let balance = state.services.trips.trip_balance(scope.user_id(), id).await?;
    Ok(success_response(balance))
}

#[utoipa::path(
    get,
    path = "/api/v1/trips/{id}/profit",
    summary = "Trip profit",
    params(("id" = Uuid, Path, description = "Trip ID")),
    responses(
        (status = 200, description = "Profit computed", body = ApiResponse<TripProfit>),
        (status = 404, description = "Trip not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Trips"
)]
pub async fn trip_profit(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
) -> ApiResult<TripProfit> {
    let profit = state.services.trips.trip_profit(scope.user_id(), id).await?;
    Ok(success_response(profit))
}

#[utoipa::path(
    get,
    path = "/api/v1/trips/{id}/charges",
    summary = "List trip charges",
    params(("id" = Uuid, Path, description = "Trip ID")),
    responses((status = 200, description = "Charges", body = ApiResponse<Vec<ChargeResponse>>)),
    tag = "Trips"
)]
pub async fn list_charges(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<ChargeResponse>> {
    let charges = state.services.trips.list_charges(scope.user_id(), id).await?;
    Ok(success_response(charges))
}

#[utoipa::path(
    post,
    path = "/api/v1/trips/{id}/charges",
    summary = "Record a charge or deduction",
    params(("id" = Uuid, Path, description = "Trip ID")),
    request_body = ChargeRequest,
    responses(
        (status = 201, description = "Charge recorded", body = ApiResponse<ChargeResponse>),
        (status = 400, description = "Unknown charge type or settled trip", body = crate::errors::ErrorResponse),
    ),
    tag = "Trips"
)]
pub async fn add_charge(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
    Json(request): Json<ChargeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ChargeResponse>>), ServiceError> {
    let charge = state.services.trips.add_charge(scope.user_id(), id, request).await?;
    Ok(created_response(charge))
}

#[utoipa::path(
    put,
    path = "/api/v1/trips/{id}/charges/{charge_id}",
    summary = "Update a charge",
    params(
        ("id" = Uuid, Path, description = "Trip ID"),
        ("charge_id" = Uuid, Path, description = "Charge ID"),
    ),
    request_body = UpdateChargeRequest,
    responses(
        (status = 200, description = "Charge updated", body = ApiResponse<ChargeResponse>),
        (status = 404, description = "Charge not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Trips"
)]
pub async fn update_charge(
    State(state): State<AppState>,
    scope: UserScope,
    Path((id, charge_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateChargeRequest>,
) -> ApiResult<ChargeResponse> {
    let charge = state
        .services
        .trips
        .update_charge(scope.user_id(), id, charge_id, request)
        .await?;
    Ok(success_response(charge))
}

#[utoipa::path(
    delete,
    path = "/api/v1/trips/{id}/charges/{charge_id}",
    summary = "Delete a charge",
    params(
        ("id" = Uuid, Path, description = "Trip ID"),
        ("charge_id" = Uuid, Path, description = "Charge ID"),
    ),
    responses(
        (status = 204, description = "Charge deleted"),
        (status = 404, description = "Charge not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Trips"
)]
pub async fn delete_charge(
    State(state): State<AppState>,
    scope: UserScope,
    Path((id, charge_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServiceError> {
    state
        .services
        .trips
        .delete_charge(scope.user_id(), id, charge_id)
        .await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/trips/{id}/accounts",
    summary = "List advances and payments",
    params(("id" = Uuid, Path, description = "Trip ID")),
    responses((status = 200, description = "Account entries", body = ApiResponse<Vec<AccountResponse>>)),
    tag = "Trips"
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<AccountResponse>> {
    let entries = state.services.trips.list_accounts(scope.user_id(), id).await?;
    Ok(success_response(entries))
}

#[utoipa::path(
    post,
    path = "/api/v1/trips/{id}/accounts",
    summary = "Record an advance or payment",
    params(("id" = Uuid, Path, description = "Trip ID")),
    request_body = AccountRequest,
    responses(
        (status = 201, description = "Entry recorded", body = ApiResponse<AccountResponse>),
        (status = 400, description = "Settled trip", body = crate::errors::ErrorResponse),
    ),
    tag = "Trips"
)]
pub async fn add_account(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
    Json(request): Json<AccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponse>>), ServiceError> {
    let entry = state.services.trips.add_account(scope.user_id(), id, request).await?;
    Ok(created_response(entry))
}

#[utoipa::path(
    delete,
    path = "/api/v1/trips/{id}/accounts/{entry_id}",
    summary = "Delete an account entry",
    params(
        ("id" = Uuid, Path, description = "Trip ID"),
        ("entry_id" = Uuid, Path, description = "Account entry ID"),
    ),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 404, description = "Entry not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Trips"
)]
pub async fn delete_account(
    State(state): State<AppState>,
    scope: UserScope,
    Path((id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServiceError> {
    state
        .services
        .trips
        .delete_account(scope.user_id(), id, entry_id)
        .await?;
    Ok(no_content_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/trips/invoice",
    summary = "Build a party invoice",
    description = "Rolls the balances of the selected trips into one invoice; all trips must share a party",
    request_body = InvoiceRequest,
    responses(
        (status = 200, description = "Invoice built", body = ApiResponse<InvoiceSummary>),
        (status = 400, description = "Trips belong to different parties", body = crate::errors::ErrorResponse),
        (status = 404, description = "A trip was not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Trips"
)]
pub async fn build_invoice(
    State(state): State<AppState>,
    scope: UserScope,
    Json(request): Json<InvoiceRequest>,
) -> ApiResult<InvoiceSummary> {
    let invoice = state
        .services
        .invoicing
        .build_invoice(scope.user_id(), request)
        .await?;
    Ok(success_response(invoice))
}
