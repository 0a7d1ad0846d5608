use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use super::common::{created_response, no_content_response, paginated, success_response};
use super::scope::UserScope;
use crate::entities::{driver, party, supplier, truck};
use crate::errors::ServiceError;
use crate::services::fleet::{
    CreateDriverRequest, CreatePartyRequest, CreateSupplierRequest, CreateTruckRequest,
    PartyBalance,
};
use crate::{ApiResponse, ApiResult, AppState, ListQuery, PaginatedResponse};

pub fn trucks_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trucks).post(create_truck))
        .route("/:id", get(get_truck).delete(delete_truck))
}

pub fn drivers_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers).post(create_driver))
        .route("/:id", get(get_driver).delete(delete_driver))
}

pub fn parties_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_parties).post(create_party))
        .route("/:id", get(get_party).delete(delete_party))
        .route("/:id/balance", get(party_balance))
}

pub fn suppliers_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route("/:id", get(get_supplier).delete(delete_supplier))
}

#[utoipa::path(
    get,
    path = "/api/v1/trucks",
    summary = "List trucks",
    params(ListQuery),
    responses((status = 200, description = "Trucks", body = ApiResponse<PaginatedResponse<truck::Model>>)),
    tag = "Fleet"
)]
pub async fn list_trucks(
    State(state): State<AppState>,
    scope: UserScope,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<truck::Model>> {
    let (page, limit) = query.resolve(&state.config);
    let (items, total) = state.services.fleet.list_trucks(scope.user_id(), page, limit).await?;
    Ok(success_response(paginated(items, total, page, limit)))
}

#[utoipa::path(
    post,
    path = "/api/v1/trucks",
    summary = "Register truck",
    request_body = CreateTruckRequest,
    responses(
        (status = 201, description = "Truck registered", body = ApiResponse<truck::Model>),
        (status = 400, description = "Invalid truck", body = crate::errors::ErrorResponse),
        (status = 409, description = "Truck number already registered", body = crate::errors::ErrorResponse),
    ),
    tag = "Fleet"
)]
pub async fn create_truck(
    State(state): State<AppState>,
    scope: UserScope,
    Json(request): Json<CreateTruckRequest>,
) -> Result<(StatusCode, Json<ApiResponse<truck::Model>>), ServiceError> {
    let truck = state.services.fleet.create_truck(scope.user_id(), request).await?;
    Ok(created_response(truck))
}

#[utoipa::path(
    get,
    path = "/api/v1/trucks/{id}",
    summary = "Get truck",
    params(("id" = Uuid, Path, description = "Truck ID")),
    responses(
        (status = 200, description = "Truck", body = ApiResponse<truck::Model>),
        (status = 404, description = "Truck not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Fleet"
)]
pub async fn get_truck(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
) -> ApiResult<truck::Model> {
    Ok(success_response(state.services.fleet.get_truck(scope.user_id(), id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/trucks/{id}",
    summary = "Delete truck",
    params(("id" = Uuid, Path, description = "Truck ID")),
    responses(
        (status = 204, description = "Truck deleted"),
        (status = 409, description = "Truck has trips", body = crate::errors::ErrorResponse),
    ),
    tag = "Fleet"
)]
pub async fn delete_truck(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.fleet.delete_truck(scope.user_id(), id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/drivers",
    summary = "List drivers",
    params(ListQuery),
    responses((status = 200, description = "Drivers", body = ApiResponse<PaginatedResponse<driver::Model>>)),
    tag = "Fleet"
)]
pub async fn list_drivers(
    State(state): State<AppState>,
    scope: UserScope,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<driver::Model>> {
    let (page, limit) = query.resolve(&state.config);
    let (items, total) = state.services.fleet.list_drivers(scope.user_id(), page, limit).await?;
    Ok(success_response(paginated(items, total, page, limit)))
}

#[utoipa::path(
    post,
    path = "/api/v1/drivers",
    summary = "Add driver",
    request_body = CreateDriverRequest,
    responses(
        (status = 201, description = "Driver added", body = ApiResponse<driver::Model>),
        (status = 400, description = "Invalid driver", body = crate::errors::ErrorResponse),
    ),
    tag = "Fleet"
)]
pub async fn create_driver(
    State(state): State<AppState>,
    scope: UserScope,
    Json(request): Json<CreateDriverRequest>,
) -> Result<(StatusCode, Json<ApiResponse<driver::Model>>), ServiceError> {
    let driver = state.services.fleet.create_driver(scope.user_id(), request).await?;
    Ok(created_response(driver))
}

#[utoipa::path(
    get,
    path = "/api/v1/drivers/{id}",
    summary = "Get driver",
    params(("id" = Uuid, Path, description = "Driver ID")),
    responses(
        (status = 200, description = "Driver", body = ApiResponse<driver::Model>),
        (status = 404, description = "Driver not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Fleet"
)]
pub async fn get_driver(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
) -> ApiResult<driver::Model> {
    Ok(success_response(state.services.fleet.get_driver(scope.user_id(), id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/drivers/{id}",
    summary = "Delete driver",
    params(("id" = Uuid, Path, description = "Driver ID")),
    responses(
        (status = 204, description = "Driver deleted"),
        (status = 409, description = "Driver has trips", body = crate::errors::ErrorResponse),
    ),
    tag = "Fleet"
)]
pub async fn delete_driver(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.fleet.delete_driver(scope.user_id(), id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/parties",
    summary = "List parties",
    params(ListQuery),
    responses((status = 200, description = "Parties", body = ApiResponse<PaginatedResponse<party::Model>>)),
    tag = "Fleet"
)]
pub async fn list_parties(
    State(state): State<AppState>,
    scope: UserScope,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<party::Model>> {
    let (page, limit) = query.resolve(&state.config);
    let (items, total) = state.services.fleet.list_parties(scope.user_id(), page, limit).await?;
    Ok(success_response(paginated(items, total, page, limit)))
}

#[utoipa::path(
    post,
    path = "/api/v1/parties",
    summary = "Add party",
    request_body = CreatePartyRequest,
    responses(
        (status = 201, description = "Party added", body = ApiResponse<party::Model>),
        (status = 400, description = "Invalid party", body = crate::errors::ErrorResponse),
    ),
    tag = "Fleet"
)]
pub async fn create_party(
    State(state): State<AppState>,
    scope: UserScope,
    Json(request): Json<CreatePartyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<party::Model>>), ServiceError> {
    let party = state.services.fleet.create_party(scope.user_id(), request).await?;
    Ok(created_response(party))
}

#[utoipa::path(
    get,
    path = "/api/v1/parties/{id}",
    summary = "Get party",
    params(("id" = Uuid, Path, description = "Party ID")),
    responses(
        (status = 200, description = "Party", body = ApiResponse<party::Model>),
        (status = 404, description = "Party not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Fleet"
)]
pub async fn get_party(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
) -> ApiResult<party::Model> {
    Ok(success_response(state.services.fleet.get_party(scope.user_id(), id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/parties/{id}",
    summary = "Delete party",
    params(("id" = Uuid, Path, description = "Party ID")),
    responses(
        (status = 204, description = "Party deleted"),
        (status = 409, description = "Party has trips", body = crate::errors::ErrorResponse),
    ),
    tag = "Fleet"
)]
pub async fn delete_party(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.fleet.delete_party(scope.user_id(), id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/parties/{id}/balance",
    summary = "Party statement",
    description = "Sum of the outstanding balances of every trip billed to the party",
    params(("id" = Uuid, Path, description = "Party ID")),
    responses(
        (status = 200, description = "Party balance", body = ApiResponse<PartyBalance>),
        (status = 404, description = "Party not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Fleet"
)]
pub async fn party_balance(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
) -> ApiResult<PartyBalance> {
    Ok(success_response(state.services.fleet.party_balance(scope.user_id(), id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/suppliers",
    summary = "List suppliers",
    params(ListQuery),
    responses((status = 200, description = "Suppliers", body = ApiResponse<PaginatedResponse<supplier::Model>>)),
    tag = "Fleet"
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
    scope: UserScope,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<supplier::Model>> {
    let (page, limit) = query.resolve(&state.config);
    let (items, total) = state.services.fleet.list_suppliers(scope.user_id(), page, limit).await?;
    Ok(success_response(paginated(items, total, page, limit)))
}

#[utoipa::path(
    post,
    path = "/api/v1/suppliers",
    summary = "Add supplier",
    request_body = CreateSupplierRequest,
    responses(
        (status = 201, description = "Supplier added", body = ApiResponse<supplier::Model>),
        (status = 400, description = "Invalid supplier", body = crate::errors::ErrorResponse),
    ),
    tag = "Fleet"
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    scope: UserScope,
    Json(request): Json<CreateSupplierRequest>,
) -> Result<(StatusCode, Json<ApiResponse<supplier::Model>>), ServiceError> {
    let supplier = state.services.fleet.create_supplier(scope.user_id(), request).await?;
    Ok(created_response(supplier))
}

#[utoipa::path(
    get,
    path = "/api/v1/suppliers/{id}",
    summary = "Get supplier",
    params(("id" = Uuid, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Supplier", body = ApiResponse<supplier::Model>),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Fleet"
)]
pub async fn get_supplier(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
) -> ApiResult<supplier::Model> {
    Ok(success_response(state.services.fleet.get_supplier(scope.user_id(), id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/suppliers/{id}",
    summary = "Delete supplier",
    params(("id" = Uuid, Path, description = "Supplier ID")),
    responses(
        (status = 204, description = "Supplier deleted"),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Fleet"
)]
pub async fn delete_supplier(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.fleet.delete_supplier(scope.user_id(), id).await?;
    Ok(no_content_response())
}
