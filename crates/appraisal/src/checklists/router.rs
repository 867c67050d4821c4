use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::Instrument;
use super::factory::{self, NewChecklist};
use super::reconcile::{compare_json, ReconcileError, ReconcileRequest};
use super::schema::InstrumentSchema;
use super::scoring::score_json;

/// Router builder exposing the stateless checklist endpoints.
pub fn checklist_router() -> Router {
    Router::new()
        .route("/api/v1/checklists", post(create_handler))
        .route("/api/v1/checklists/score", post(score_handler))
        .route("/api/v1/checklists/compare", post(compare_handler))
        .route("/api/v1/checklists/reconcile", post(reconcile_handler))
        .route(
            "/api/v1/instruments/:instrument/schema",
            get(schema_handler),
        )
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompareRequest {
    pub(crate) reviewer1: Value,
    pub(crate) reviewer2: Value,
}

pub(crate) async fn create_handler(Json(request): Json<NewChecklist>) -> Response {
    match factory::create(request) {
        Ok(checklist) => (StatusCode::CREATED, Json(checklist)).into_response(),
        Err(error) => unprocessable(error.to_string()),
    }
}

/// Scoring never fails: documents that are not checklists come back as the
/// `ERROR` report with a 200.
pub(crate) async fn score_handler(Json(document): Json<Value>) -> Response {
    (StatusCode::OK, Json(score_json(&document))).into_response()
}

pub(crate) async fn compare_handler(Json(request): Json<CompareRequest>) -> Response {
    match compare_json(&request.reviewer1, &request.reviewer2) {
        Ok(comparison) => (StatusCode::OK, Json(comparison)).into_response(),
        Err(error) => reconcile_failure(error),
    }
}

pub(crate) async fn reconcile_handler(Json(request): Json<ReconcileRequest>) -> Response {
    match request.reconcile() {
        Ok(reconciled) => (StatusCode::CREATED, Json(reconciled)).into_response(),
        Err(error) => reconcile_failure(error),
    }
}

pub(crate) async fn schema_handler(Path(instrument): Path<String>) -> Response {
    match instrument.parse::<Instrument>() {
        Ok(instrument) => {
            (StatusCode::OK, Json(InstrumentSchema::for_instrument(instrument))).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}

fn reconcile_failure(error: ReconcileError) -> Response {
    tracing::debug!(%error, "reconciliation request rejected");
    unprocessable(error.to_string())
}

fn unprocessable(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
}
