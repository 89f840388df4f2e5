//! Catalog handlers: sync, browsing, refresh, deletion.

use super::ListEntriesQuery;
use crate::api::AppState;
use crate::error::Error;
use crate::types::{CatalogEntry, Category, EntryId, RefreshOutcome, SyncReport};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// POST /sync - Reconcile every category root with the catalog
#[utoipa::path(
    post,
    path = "/api/v1/sync",
    tag = "catalog",
    responses(
        (status = 200, description = "Entries added and removed", body = SyncReport),
        (status = 500, description = "Storage or filesystem failure; the failing pass was rolled back", body = crate::error::ApiError)
    )
)]
pub async fn sync_catalog(State(state): State<AppState>) -> Result<Json<SyncReport>, Error> {
    let report = state.library.full_sync().await?;
    Ok(Json(report))
}

/// GET /categories/:category/entries - List entries under a parent
#[utoipa::path(
    get,
    path = "/api/v1/categories/{category}/entries",
    tag = "catalog",
    params(
        ("category" = String, Path, description = "music, photo or podcast"),
        ("parent_id" = Option<i64>, Query, description = "Parent directory entry; omit for top-level entries")
    ),
    responses(
        (status = 200, description = "Entries in insertion order", body = Vec<CatalogEntry>),
        (status = 400, description = "Unknown category", body = crate::error::ApiError),
        (status = 404, description = "Parent not found or not a directory", body = crate::error::ApiError)
    )
)]
pub async fn list_entries(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(query): Query<ListEntriesQuery>,
) -> Result<Json<Vec<CatalogEntry>>, Error> {
    let category: Category = category.parse()?;
    let entries = state
        .library
        .list_children(category, query.parent_id.map(EntryId))
        .await?;
    Ok(Json(entries))
}

/// GET /entries/:id - Get a single entry
#[utoipa::path(
    get,
    path = "/api/v1/entries/{id}",
    tag = "catalog",
    params(
        ("id" = i64, Path, description = "Entry ID")
    ),
    responses(
        (status = 200, description = "Entry", body = CatalogEntry),
        (status = 404, description = "Entry not found", body = crate::error::ApiError)
    )
)]
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CatalogEntry>, Error> {
    let entry = state.library.get_entry(EntryId(id)).await?;
    Ok(Json(entry))
}

/// POST /entries/:id/refresh - Refresh one directory
#[utoipa::path(
    post,
    path = "/api/v1/entries/{id}/refresh",
    tag = "catalog",
    params(
        ("id" = i64, Path, description = "Directory entry ID")
    ),
    responses(
        (status = 200, description = "Refresh outcome", body = RefreshOutcome),
        (status = 400, description = "Directory category cannot be refreshed", body = crate::error::ApiError),
        (status = 404, description = "Directory not found in the catalog or on disk", body = crate::error::ApiError),
        (status = 502, description = "Feed could not be fetched", body = crate::error::ApiError)
    )
)]
pub async fn refresh_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RefreshOutcome>, Error> {
    let outcome = state.library.refresh_directory(EntryId(id)).await?;
    Ok(Json(outcome))
}

/// DELETE /entries/:id - Delete an entry, its descendants and their files
#[utoipa::path(
    delete,
    path = "/api/v1/entries/{id}",
    tag = "catalog",
    params(
        ("id" = i64, Path, description = "Entry ID")
    ),
    responses(
        (status = 200, description = "Entry deleted", body = DeleteOutcome),
        (status = 404, description = "Entry not found", body = crate::error::ApiError),
        (status = 500, description = "Deletion failed; removed_paths lists what is already gone", body = DeleteOutcome)
    )
)]
pub async fn delete_entry(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let id = EntryId(id);
    if let Err(e) = state.library.get_entry(id).await {
        return e.into_response();
    }

    let outcome = state.library.delete_entry(id).await;
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(outcome)).into_response()
}
