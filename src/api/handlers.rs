use super::AppState;
use super::error::ApiResult;
use crate::core::{RateQuery, RateReport};
use crate::exchange;
use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use tracing::debug;

/// `/api/exchanges/{code}/{segment}/`: a date or a number of quotations.
pub async fn currency_rates(
    State(state): State<AppState>,
    Path((code, segment)): Path<(String, String)>,
) -> ApiResult<Json<RateReport>> {
    let query = RateQuery::from_segment(&code, &segment);
    debug!(?query, "Handling rates query");
    let report = exchange::answer(state.source.as_ref(), &query).await?;
    Ok(Json(report))
}

/// `/api/exchanges/difference/{code}/{number}/`
pub async fn difference_rates(
    State(state): State<AppState>,
    Path((code, number)): Path<(String, String)>,
) -> ApiResult<Json<RateReport>> {
    let query = RateQuery::spread_from_segment(&code, &number)?;
    debug!(?query, "Handling difference query");
    let report = exchange::answer(state.source.as_ref(), &query).await?;
    Ok(Json(report))
}

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}
