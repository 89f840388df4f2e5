//! Podcast handlers: feed listing and episode downloads.

use super::{DownloadEpisodesRequest, FeedQuery, TaskAccepted};
use crate::api::AppState;
use crate::error::Error;
use crate::types::FeedListing;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

/// GET /podcasts/episodes - Show metadata and episodes of a feed
#[utoipa::path(
    get,
    path = "/api/v1/podcasts/episodes",
    tag = "podcasts",
    params(
        ("url" = String, Query, description = "Feed URL")
    ),
    responses(
        (status = 200, description = "Feed listing with titles already downloaded", body = FeedListing),
        (status = 400, description = "Malformed feed URL", body = crate::error::ApiError),
        (status = 502, description = "Feed could not be fetched or parsed", body = crate::error::ApiError)
    )
)]
pub async fn list_episodes(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedListing>, Error> {
    let listing = state.library.list_feed_episodes(&query.url).await?;
    Ok(Json(listing))
}

/// POST /podcasts/download - Download selected episodes in the background
#[utoipa::path(
    post,
    path = "/api/v1/podcasts/download",
    tag = "podcasts",
    request_body = DownloadEpisodesRequest,
    responses(
        (status = 202, description = "Download task started", body = TaskAccepted),
        (status = 400, description = "Malformed feed URL", body = crate::error::ApiError)
    )
)]
pub async fn download_episodes(
    State(state): State<AppState>,
    Json(request): Json<DownloadEpisodesRequest>,
) -> Result<(StatusCode, Json<TaskAccepted>), Error> {
    let task_id = state
        .library
        .submit_podcast_download(&request.feed_url, request.selected)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(TaskAccepted { task_id })))
}
