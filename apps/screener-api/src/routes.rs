use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use screener_domain::{PipelineState, Sector, Theme};
use screener_service::Error;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
	pub query: String,
}

#[derive(Debug, Serialize)]
pub struct TaxonomyResponse {
	pub sectors: Vec<&'static str>,
	pub themes: Vec<ThemeEntry>,
}

#[derive(Debug, Serialize)]
pub struct ThemeEntry {
	pub name: &'static str,
	pub parent: &'static str,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let message = err.to_string();

		match err {
			Error::InvalidRequest { .. } => {
				ApiError::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message)
			},
			Error::BackendConnection { .. } => {
				ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "BACKEND_UNAVAILABLE", message)
			},
			Error::Extraction { .. } => {
				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "EXTRACTION_FAILED", message)
			},
			Error::Embedding { .. } => {
				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "EMBEDDING_FAILED", message)
			},
			Error::NoConcepts => {
				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "NO_CONCEPTS", message)
			},
			Error::Configuration { .. } => {
				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR", message)
			},
			Error::Pipeline { .. } => {
				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = serde_json::json!({ "error_code": self.error_code, "message": self.message });

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/taxonomy", get(taxonomy))
		.route("/query", post(query))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn taxonomy() -> Json<TaxonomyResponse> {
	let themes = Theme::ALL
		.iter()
		.map(|theme| ThemeEntry { name: theme.as_str(), parent: theme.parent().as_str() })
		.collect();

	Json(TaxonomyResponse { sectors: Sector::labels(), themes })
}

async fn query(
	State(state): State<AppState>,
	Json(payload): Json<QueryRequest>,
) -> Result<Json<PipelineState>, ApiError> {
	let response = state.service.resolve_and_retrieve(&payload.query).await?;

	Ok(Json(response))
}
