use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use super::common::success_response;
use super::scope::UserScope;
use crate::errors::ServiceError;
use crate::ledger::MonthlyReport;
use crate::reports::{render_monthly_html, ReportBranding};
use crate::{ApiResponse, ApiResult, AppState};

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthlyReportQuery {
    /// Month name, case-insensitive, e.g. `January`
    pub month: String,
    pub year: i32,
}

pub fn reports_routes() -> Router<AppState> {
    Router::new()
        .route("/monthly", get(monthly_report))
        .route("/monthly.html", get(monthly_report_html))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/monthly",
    summary = "Monthly profit report",
    description = "Trips started in the month grouped by truck ownership, with period expenses and segment profit",
    params(MonthlyReportQuery),
    responses(
        (status = 200, description = "Report built", body = ApiResponse<MonthlyReport>),
        (status = 400, description = "Unknown month name or year out of range", body = crate::errors::ErrorResponse),
    ),
    tag = "Reports"
)]
pub async fn monthly_report(
    State(state): State<AppState>,
    scope: UserScope,
    Query(query): Query<MonthlyReportQuery>,
) -> ApiResult<MonthlyReport> {
    let report = state
        .services
        .reports
        .monthly_report(scope.user_id(), &query.month, query.year)
        .await?;
    Ok(success_response(report))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/monthly.html",
    summary = "Monthly profit report as HTML",
    params(MonthlyReportQuery),
    responses(
        (status = 200, description = "Rendered report", body = String, content_type = "text/html"),
        (status = 400, description = "Unknown month name or year out of range", body = crate::errors::ErrorResponse),
    ),
    tag = "Reports"
)]
pub async fn monthly_report_html(
    State(state): State<AppState>,
    scope: UserScope,
    Query(query): Query<MonthlyReportQuery>,
) -> Result<Response, ServiceError> {
    let report = state
        .services
        .reports
        .monthly_report(scope.user_id(), &query.month, query.year)
        .await?;

    let branding = ReportBranding::new(
        state.config.company_name.clone(),
        state.config.currency_symbol.clone(),
    );
    let html = render_monthly_html(&report, &branding);
    info!(month = %report.month, year = report.year, bytes = html.len(), "Rendered monthly report");

    Ok((
        [(header::CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE))],
        html,
    )
        .into_response())
}
