use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use super::common::{created_response, no_content_response, success_response};
use super::scope::UserScope;
use crate::entities::expense::{self, ExpenseCategory};
use crate::errors::ServiceError;
use crate::ledger::MonthPeriod;
use crate::services::expenses::CreateExpenseRequest;
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExpenseListQuery {
    /// Month name, e.g. `January`
    pub month: String,
    pub year: i32,
    /// `Truck`, `Trip` or `Office`
    pub category: Option<String>,
}

pub fn expenses_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route("/:id", delete(delete_expense))
}

#[utoipa::path(
    get,
    path = "/api/v1/expenses",
    summary = "List expenses for a month",
    params(ExpenseListQuery),
    responses(
        (status = 200, description = "Expenses", body = ApiResponse<Vec<expense::Model>>),
        (status = 400, description = "Unknown month or category", body = crate::errors::ErrorResponse),
    ),
    tag = "Expenses"
)]
pub async fn list_expenses(
    State(state): State<AppState>,
    scope: UserScope,
    Query(query): Query<ExpenseListQuery>,
) -> ApiResult<Vec<expense::Model>> {
    let period = MonthPeriod::from_name(&query.month, query.year)?;
    let category = query
        .category
        .as_deref()
        .map(|raw| {
            raw.trim()
                .parse::<ExpenseCategory>()
                .map_err(|_| ServiceError::InvalidInput(format!("Unknown expense category: {}", raw)))
        })
        .transpose()?;

    let expenses = state
        .services
        .expenses
        .list_expenses(scope.user_id(), &period, category)
        .await?;
    Ok(success_response(expenses))
}

#[utoipa::path(
    post,
    path = "/api/v1/expenses",
    summary = "Record expense",
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense recorded", body = ApiResponse<expense::Model>),
        (status = 400, description = "Invalid expense", body = crate::errors::ErrorResponse),
    ),
    tag = "Expenses"
)]
pub async fn create_expense(
    State(state): State<AppState>,
    scope: UserScope,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<expense::Model>>), ServiceError> {
    let expense = state.services.expenses.create_expense(scope.user_id(), request).await?;
    Ok(created_response(expense))
}

#[utoipa::path(
    delete,
    path = "/api/v1/expenses/{id}",
    summary = "Delete expense",
    params(("id" = Uuid, Path, description = "Expense ID")),
    responses(
        (status = 204, description = "Expense deleted"),
        (status = 404, description = "Expense not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Expenses"
)]
pub async fn delete_expense(
    State(state): State<AppState>,
    scope: UserScope,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.expenses.delete_expense(scope.user_id(), id).await?;
    Ok(no_content_response())
}
