use axum::{
    extract::{Path, Query, State},
    Json,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use crate::server::AppState;
use crate::contract::is_known_column;
use crate::{Error, FieldMap, RiceAddress, RiceItem, Selection};
use std::sync::Arc;

#[derive(Deserialize, Default)]
pub struct ListParams {
    /// Column to order by
    pub sort: Option<String>,
    pub desc: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(e: Error) -> ApiError {
    let status = match &e {
        Error::InvalidAddress(_) | Error::Validation { .. } | Error::UnknownColumn(_) => {
            StatusCode::BAD_REQUEST
        }
        Error::UnsupportedOperation { .. } => StatusCode::METHOD_NOT_ALLOWED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse { error: e.to_string() }))
}

/// Item address for a path id, checked by the same parser as string addresses
fn item_address(id: i64) -> Result<RiceAddress, ApiError> {
    RiceAddress::parse(&format!("rices/{}", id)).map_err(error_response)
}

pub async fn list_rices(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<RiceItem>>, ApiError> {
    let sort = match params.sort.as_deref() {
        Some(column) if is_known_column(column) => {
            let direction = if params.desc.unwrap_or(false) { "DESC" } else { "ASC" };
            format!("{} {}", column, direction)
        }
        Some(column) => return Err(error_response(Error::UnknownColumn(column.to_string()))),
        None => "_id ASC".to_string(),
    };

    let items = state
        .store
        .query(&RiceAddress::Collection, None, &Selection::all(), Some(&sort))
        .and_then(|cursor| cursor.to_items())
        .map_err(error_response)?;

    Ok(Json(items))
}

pub async fn get_rice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<RiceItem>, ApiError> {
    let address = item_address(id)?;
    let item = state
        .store
        .query(&address, None, &Selection::all(), None)
        .and_then(|cursor| cursor.first_item())
        .map_err(error_response)?;

    item.map(Json).ok_or_else(|| {
        (StatusCode::NOT_FOUND, Json(ErrorResponse { error: format!("No rice at {}", address) }))
    })
}

pub async fn insert_rice(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<FieldMap>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let id = state
        .store
        .insert(&RiceAddress::Collection, &fields)
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": id, "address": RiceAddress::item(id) })),
    ))
}

pub async fn update_rice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(fields): Json<FieldMap>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let updated = state
        .store
        .update(&item_address(id)?, &fields, &Selection::all())
        .map_err(error_response)?;

    Ok(Json(serde_json::json!({ "updated": updated })))
}

pub async fn delete_rice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state
        .store
        .delete(&item_address(id)?, &Selection::all())
        .map_err(error_response)?;

    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

pub async fn delete_rices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state
        .store
        .delete(&RiceAddress::Collection, &Selection::all())
        .map_err(error_response)?;

    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let stats = state.store.stats().map_err(error_response)?;

    Ok(Json(serde_json::to_value(&stats).map_err(|e| {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: e.to_string() }))
    })?))
}
