use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use stockroom_inventory::{ItemDraft, ItemId, ItemPatch};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(upsert_item))
        .route("/:id", axum::routing::put(update_item).delete(delete_item))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    let direction = query.direction.unwrap_or(services.policy().default_sort);

    let items = match services.list_items(direction).await {
        Ok(items) => items,
        Err(e) => return errors::store_error_to_response(e),
    };

    Json(dto::apply_filters(items, &query)).into_response()
}

pub async fn upsert_item(
    Extension(services): Extension<Arc<AppServices>>,
    Json(draft): Json<ItemDraft>,
) -> axum::response::Response {
    if let Err(e) = draft.validate() {
        return errors::domain_error_to_response(e);
    }

    let outcome = match services.upsert_item(&draft).await {
        Ok(outcome) => outcome,
        Err(e) => return errors::store_error_to_response(e),
    };

    (
        StatusCode::CREATED,
        Json(dto::UpsertResponse {
            id: outcome.id.to_string(),
            merged: outcome.merged,
        }),
    )
        .into_response()
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(patch): Json<ItemPatch>,
) -> axum::response::Response {
    let id: ItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"),
    };

    if let Err(e) = patch.validate() {
        return errors::domain_error_to_response(e);
    }

    if let Err(e) = services.update_item(id, &patch).await {
        return errors::store_error_to_response(e);
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({ "id": id.to_string() })),
    )
        .into_response()
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"),
    };

    if let Err(e) = services.delete_item(id).await {
        return errors::store_error_to_response(e);
    }

    StatusCode::NO_CONTENT.into_response()
}
