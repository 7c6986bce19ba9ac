use crate::core::RatesError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
}

impl RatesError {
    pub fn status(&self) -> StatusCode {
        match self {
            RatesError::NotFound { .. } => StatusCode::NOT_FOUND,
            RatesError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for RatesError {
    fn into_response(self) -> Response {
        let status = self.status();
        debug!(%status, detail = %self.detail(), "Rates request rejected");
        let body = Json(ErrorBody {
            detail: self.detail(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, RatesError>;
