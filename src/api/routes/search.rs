//! Podcast search handlers.

use super::SearchRequest;
use crate::api::AppState;
use crate::error::Error;
use crate::search::SearchResult;
use axum::{Json, extract::State};

/// GET /search/tools - Registered search backends
#[utoipa::path(
    get,
    path = "/api/v1/search/tools",
    tag = "search",
    responses(
        (status = 200, description = "Backend names in registration order", body = Vec<String>)
    )
)]
pub async fn list_search_tools(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.library.search_tools())
}

/// POST /search - Search shows with one backend
#[utoipa::path(
    post,
    path = "/api/v1/search",
    tag = "search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching shows", body = Vec<SearchResult>),
        (status = 400, description = "Empty keyword", body = crate::error::ApiError),
        (status = 404, description = "Unknown search tool", body = crate::error::ApiError),
        (status = 502, description = "Search backend unreachable", body = crate::error::ApiError)
    )
)]
pub async fn search_podcasts(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<SearchResult>>, Error> {
    let results = state
        .library
        .search_podcasts(&request.tool, &request.keyword)
        .await?;
    Ok(Json(results))
}
