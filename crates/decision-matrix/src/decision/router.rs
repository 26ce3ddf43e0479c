use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::model::DecisionModel;
use super::service::{DecisionService, EncodedModel, EvaluationView, ModelEdit};
use crate::error::AppError;

/// `?data=` query carried by every shareable link.
#[derive(Debug, Default, Deserialize)]
pub struct DataQuery {
    #[serde(default)]
    pub data: Option<String>,
}

/// Edits applied on top of an encoded model.
#[derive(Debug, Deserialize)]
pub struct EditRequest {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub edits: Vec<ModelEdit>,
}

/// Router builder exposing evaluation, encoding, and export endpoints.
pub fn decision_router(service: Arc<DecisionService>) -> Router {
    Router::new()
        .route(
            "/api/v1/decision/results",
            get(results_from_query).post(results_from_model),
        )
        .route("/api/v1/decision/model", get(model_from_query))
        .route("/api/v1/decision/encode", post(encode_model))
        .route("/api/v1/decision/edit", post(edit_model))
        .route("/api/v1/decision/table.csv", get(table_csv))
        .with_state(service)
}

pub(crate) async fn results_from_query(
    State(service): State<Arc<DecisionService>>,
    Query(query): Query<DataQuery>,
) -> Json<EvaluationView> {
    Json(service.evaluate_encoded(query.data.as_deref()))
}

pub(crate) async fn results_from_model(
    State(service): State<Arc<DecisionService>>,
    payload: Result<Json<DecisionModel>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(mut model)) => {
            model.resync_ids();
            Json(service.evaluate(&model)).into_response()
        }
        Err(rejection) => rejection_response(rejection),
    }
}

pub(crate) async fn model_from_query(
    State(service): State<Arc<DecisionService>>,
    Query(query): Query<DataQuery>,
) -> Json<DecisionModel> {
    Json(service.decode(query.data.as_deref()))
}

pub(crate) async fn encode_model(
    State(service): State<Arc<DecisionService>>,
    payload: Result<Json<DecisionModel>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(model)) => {
            let encoded: EncodedModel = service.encode(&model);
            Json(encoded).into_response()
        }
        Err(rejection) => rejection_response(rejection),
    }
}

pub(crate) async fn edit_model(
    State(service): State<Arc<DecisionService>>,
    payload: Result<Json<EditRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return Ok(rejection_response(rejection)),
    };

    let mut model = service.decode(request.data.as_deref());
    service.apply_edits(&mut model, request.edits)?;
    Ok(Json(service.evaluate(&model)).into_response())
}

pub(crate) async fn table_csv(
    State(service): State<Arc<DecisionService>>,
    Query(query): Query<DataQuery>,
) -> Result<Response, AppError> {
    let model = service.decode(query.data.as_deref());
    let csv = model.evaluate().table.to_csv()?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.as_ref())],
        csv,
    )
        .into_response())
}

fn rejection_response(rejection: JsonRejection) -> Response {
    let payload = json!({
        "error": rejection.body_text(),
    });
    (rejection.status(), Json(payload)).into_response()
}
