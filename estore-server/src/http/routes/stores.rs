//! Store endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use estore_core::{Store, StoreData};

use super::MessageResponse;
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, QueryParams, ValidId};
use crate::http::server::AppState;
use crate::http::validation::{Validate, ValidationErrors};

/// Optional scoping for GET /stores
///
/// The id is taken raw so that a bad value is reported like any other
/// validation failure.
#[derive(Debug, Default, Deserialize)]
pub struct StoreFilter {
    pub establishment_id: Option<String>,
}

impl StoreFilter {
    /// Owning establishment to scope by, if one was given.
    pub fn establishment_id(&self) -> Result<Option<i64>, ValidationErrors> {
        match self.establishment_id.as_deref().map(str::trim) {
            None => Ok(None),
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) if id > 0 => Ok(Some(id)),
                _ => Err(ValidationErrors::single("establishment_id", "positive integer")),
            },
        }
    }
}

/// GET /stores[?establishment_id=N]
async fn list_stores(
    State(state): State<Arc<AppState>>,
    QueryParams(filter): QueryParams<StoreFilter>,
) -> Result<Json<Vec<Store>>, ApiError> {
    let ctx = state.ctx();
    let stores = match filter.establishment_id()? {
        Some(id) => state.stores.find_by_establishment(&ctx, id).await?,
        None => state.stores.find_all(&ctx).await?,
    };
    Ok(Json(stores))
}

/// POST /stores - responds with the stored record
async fn create_store(
    State(state): State<Arc<AppState>>,
    JsonBody(data): JsonBody<StoreData>,
) -> Result<(StatusCode, Json<Store>), ApiError> {
    data.validate()?;
    let id = state.stores.create(&state.ctx(), &data).await?;
    tracing::info!(store_id = id, establishment_id = data.establishment_id, "Store created");

    Ok((StatusCode::CREATED, Json(Store { id, data })))
}

/// GET /stores/{id}
async fn get_store(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Store>, ApiError> {
    let store = state
        .stores
        .find_by_id(&state.ctx(), id)
        .await?
        .ok_or(ApiError::NotFound {
            resource: "store",
            id,
        })?;
    Ok(Json(store))
}

/// PUT /stores/{id} - full-record update, may move the store
async fn update_store(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    JsonBody(data): JsonBody<StoreData>,
) -> Result<Json<MessageResponse>, ApiError> {
    data.validate()?;
    state.stores.update(&state.ctx(), &Store { id, data }).await?;
    tracing::info!(store_id = id, "Store updated");

    Ok(Json(MessageResponse {
        message: "Store updated successfully",
    }))
}

/// DELETE /stores/{id}
async fn delete_store(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<MessageResponse>, ApiError> {
    state.stores.delete(&state.ctx(), id).await?;
    tracing::info!(store_id = id, "Store deleted");

    Ok(Json(MessageResponse {
        message: "Store deleted successfully",
    }))
}

/// Store routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stores", get(list_stores).post(create_store))
        .route(
            "/stores/{id}",
            get(get_store).put(update_store).delete(delete_store),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use super::StoreFilter;
    use crate::http::routes::test_support::{
        app, create_establishment, create_store, send, store_body,
    };

    #[tokio::test]
    async fn create_returns_full_record() {
        let app = app();
        let owner = create_establishment(&app, "Dona").await;

        let (status, body) =
            send(&app, Method::POST, "/stores", Some(store_body(owner, "Quiosque"))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].as_i64().unwrap() > 0);
        assert_eq!(body["establishment_id"], owner);
        assert_eq!(body["name"], "Quiosque");
    }

    #[tokio::test]
    async fn unknown_establishment_is_constraint_error() {
        let app = app();

        let (status, body) = send(&app, Method::POST, "/stores", Some(store_body(42, "Orfa"))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "constraint_violation");
    }

    #[tokio::test]
    async fn missing_establishment_id_fails_validation() {
        let app = app();
        let mut payload = store_body(1, "Sem dono");
        payload.as_object_mut().unwrap().remove("establishment_id");

        let (status, body) = send(&app, Method::POST, "/stores", Some(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"]["establishment_id"], "required");
    }

    #[tokio::test]
    async fn get_missing_store_is_404() {
        let app = app();
        let (status, _) = send(&app, Method::GET, "/stores/12", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_can_be_scoped_by_establishment() {
        let app = app();
        let a = create_establishment(&app, "A").await;
        let b = create_establishment(&app, "B").await;
        create_store(&app, a, "a1").await;
        create_store(&app, b, "b1").await;

        let (_, all) = send(&app, Method::GET, "/stores", None).await;
        assert_eq!(all.as_array().unwrap().len(), 2);

        let (status, scoped) =
            send(&app, Method::GET, &format!("/stores?establishment_id={b}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(scoped, json!([{
            "id": scoped[0]["id"],
            "establishment_id": b,
            "number": "001",
            "name": "b1",
            "corporate_name": "b1 Ltda",
            "address": "Rua do Sol",
            "address_number": "45",
            "city": "Recife",
            "state": "PE",
            "zip_code": "50000-100"
        }]));
    }

    #[tokio::test]
    async fn bad_establishment_filter_is_json_validation_error() {
        let app = app();

        for query in ["abc", "", "0", "-3"] {
            let uri = format!("/stores?establishment_id={query}");
            let (status, body) = send(&app, Method::GET, &uri, None).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "query {query:?}");
            assert_eq!(body["error"], "validation_error");
            assert_eq!(body["fields"]["establishment_id"], "positive integer");
        }
    }

    #[test]
    fn filter_parses_positive_ids_only() {
        let filter = |raw: Option<&str>| StoreFilter {
            establishment_id: raw.map(String::from),
        };

        assert_eq!(filter(None).establishment_id().unwrap(), None);
        assert_eq!(filter(Some("7")).establishment_id().unwrap(), Some(7));
        assert!(filter(Some("7x")).establishment_id().is_err());
        assert!(filter(Some("")).establishment_id().is_err());
    }

    #[tokio::test]
    async fn update_and_delete_round_trip() {
        let app = app();
        let owner = create_establishment(&app, "Dona").await;
        let id = create_store(&app, owner, "Antes").await;
        let uri = format!("/stores/{id}");

        let (status, _) = send(&app, Method::PUT, &uri, Some(store_body(owner, "Depois"))).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(body["name"], "Depois");

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        // deleting again is still fine
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
