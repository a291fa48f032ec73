//! Establishment endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use estore_core::{Establishment, EstablishmentDetail, EstablishmentSummary, Profile, Store};

use super::{CreatedResponse, MessageResponse};
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, ValidId};
use crate::http::server::AppState;
use crate::http::validation::Validate;

/// GET /establishments - every establishment with its store count
async fn list_establishments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EstablishmentSummary>>, ApiError> {
    let summaries = state.establishments.list_summaries(&state.ctx()).await?;
    Ok(Json(summaries))
}

/// POST /establishments
async fn create_establishment(
    State(state): State<Arc<AppState>>,
    JsonBody(profile): JsonBody<Profile>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    profile.validate()?;
    let id = state.establishments.create(&state.ctx(), &profile).await?;
    tracing::info!(establishment_id = id, "Establishment created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Establishment created successfully",
            id,
        }),
    ))
}

/// GET /establishments/{id} - establishment with its stores
async fn get_establishment(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<EstablishmentDetail>, ApiError> {
    let detail = state.establishments.get_detail(&state.ctx(), id).await?;
    Ok(Json(detail))
}

/// PUT /establishments/{id} - full-record update
async fn update_establishment(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    JsonBody(profile): JsonBody<Profile>,
) -> Result<Json<MessageResponse>, ApiError> {
    profile.validate()?;
    let establishment = Establishment { id, profile };
    state.establishments.update(&state.ctx(), &establishment).await?;
    tracing::info!(establishment_id = id, "Establishment updated");

    Ok(Json(MessageResponse {
        message: "Establishment updated successfully",
    }))
}

/// DELETE /establishments/{id} - refused with 409 while stores remain
async fn delete_establishment(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<MessageResponse>, ApiError> {
    state.establishments.delete(&state.ctx(), id).await?;
    tracing::info!(establishment_id = id, "Establishment deleted");

    Ok(Json(MessageResponse {
        message: "Establishment deleted successfully",
    }))
}

/// GET /establishments/{id}/stores
async fn list_establishment_stores(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Vec<Store>>, ApiError> {
    let stores = state.stores.find_by_establishment(&state.ctx(), id).await?;
    Ok(Json(stores))
}

/// Establishment routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/establishments",
            get(list_establishments).post(create_establishment),
        )
        .route(
            "/establishments/{id}",
            get(get_establishment)
                .put(update_establishment)
                .delete(delete_establishment),
        )
        .route("/establishments/{id}/stores", get(list_establishment_stores))
}
