use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{AppointmentField, DashboardView, DistributionPoint};
use crate::state::AppState;

static DASHBOARD_HTML: &str = include_str!("../web/dashboard.html");

pub async fn dashboard_page() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

// GET /api/dashboard
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(state.dashboard.view())
}

// POST /api/dashboard/refresh
pub async fn refresh(State(state): State<Arc<AppState>>) -> Result<Json<DashboardView>, AppError> {
    let result = state.dashboard.load().await?;
    Ok(Json(DashboardView::from(&result)))
}

// GET /api/dashboard/distribution?field=Status
#[derive(Deserialize)]
pub struct DistributionQuery {
    pub field: String,
}

#[derive(Serialize)]
pub struct DistributionResponse {
    field: String,
    points: Vec<DistributionPoint>,
}

pub async fn get_distribution(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DistributionQuery>,
) -> Result<Json<DistributionResponse>, AppError> {
    let field = AppointmentField::from_str(query.field.trim());
    let points = state.dashboard.distribution(&field)?;

    Ok(Json(DistributionResponse {
        field: field.as_str().to_string(),
        points,
    }))
}
