//! Property routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use immoloc_core::document::DocumentService;
use immoloc_core::property::{Property, PropertyInput, PropertyOrder, PropertyService};
use immoloc_db::{DocumentRepository, PropertyRepository};
use immoloc_shared::types::PropertyId;
use serde::Deserialize;
use tracing::info;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Creates the property routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/properties", get(list_properties).post(create_property))
        .route(
            "/properties/{property_id}",
            get(get_property)
                .put(update_property)
                .delete(delete_property),
        )
}

/// Query for the property list.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// `newest` (default) or `name`.
    #[serde(default)]
    pub order: PropertyOrder,
}

fn service(state: &AppState) -> PropertyService<PropertyRepository> {
    PropertyService::new(Arc::new(PropertyRepository::new((*state.db).clone())))
}

/// GET /properties?order=name|newest
async fn list_properties(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Property>>> {
    Ok(Json(service(&state).list(&auth.session(), query.order).await?))
}

/// GET /properties/{property_id}
async fn get_property(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(property_id): Path<PropertyId>,
) -> ApiResult<Json<Property>> {
    Ok(Json(service(&state).get(&auth.session(), property_id).await?))
}

/// POST /properties
async fn create_property(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<PropertyInput>,
) -> ApiResult<impl IntoResponse> {
    let property = service(&state).create(&auth.session(), input).await?;
    Ok((StatusCode::CREATED, Json(property)))
}

/// PUT /properties/{property_id}
async fn update_property(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(property_id): Path<PropertyId>,
    Json(input): Json<PropertyInput>,
) -> ApiResult<Json<Property>> {
    Ok(Json(
        service(&state)
            .update(&auth.session(), property_id, input)
            .await?,
    ))
}

/// DELETE /properties/{property_id}
///
/// Refused while entries reference the property. Document rows go with the
/// property; their stored files are removed afterwards.
async fn delete_property(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(property_id): Path<PropertyId>,
) -> ApiResult<StatusCode> {
    let session = auth.session();
    let documents = match &state.storage {
        Some(storage) => {
            let documents = DocumentService::new(
                storage.clone(),
                Arc::new(DocumentRepository::new((*state.db).clone())),
            );
            let files: Vec<_> = documents
                .list(&session, property_id)
                .await?
                .into_values()
                .flatten()
                .collect();
            Some((documents, files))
        }
        None => None,
    };

    service(&state).delete(&session, property_id).await?;

    if let Some((documents, files)) = documents {
        documents.remove_objects(&files).await;
    }
    info!(user_id = %session.user_id, property_id = %property_id, "Property deleted");
    Ok(StatusCode::NO_CONTENT)
}
