use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;
use scout_domain::{CodeSuggestion, SearchCriteria};
use scout_service::{Error, FindAgenciesResponse};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/agencies/search", post(search_agencies))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search_agencies(
	State(state): State<AppState>,
	payload: Result<Json<SearchCriteria>, JsonRejection>,
) -> Result<Json<FindAgenciesResponse>, ApiError> {
	let Json(criteria) = payload.map_err(|err| {
		json_error(StatusCode::BAD_REQUEST, "invalid_request", err.body_text(), None)
	})?;
	let response = state.service.find_agencies(criteria).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	suggestions: Option<Vec<CodeSuggestion>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	suggestions: Option<Vec<CodeSuggestion>>,
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let message = err.to_string();

		match err {
			Error::InvalidIndustryCode { suggestions, .. } => json_error(
				StatusCode::UNPROCESSABLE_ENTITY,
				"invalid_industry_code",
				message,
				Some(suggestions),
			),
			Error::InvalidRequest { .. } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message, None),
			Error::SearchFailed { .. } => {
				tracing::error!(error = %message, "Agency search failed.");

				json_error(StatusCode::BAD_GATEWAY, "search_failed", message, None)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			error_code: self.error_code,
			message: self.message,
			suggestions: self.suggestions,
		};

		(self.status, Json(body)).into_response()
	}
}

fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	suggestions: Option<Vec<CodeSuggestion>>,
) -> ApiError {
	ApiError { status, error_code: code.to_string(), message: message.into(), suggestions }
}
