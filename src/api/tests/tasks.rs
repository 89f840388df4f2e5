use super::*;
use crate::search::{SearchRegistry, SearchResult, SearchTool};
use async_trait::async_trait;
use serde_json::json;

#[tokio::test]
async fn test_unknown_task_progress_is_zero() {
    let (app, _library, _temp_dir) = create_default_test_app().await;

    let (status, body) = send(&app, get("/tasks/does-not-exist/progress")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["progress"], 0);
}

#[tokio::test]
async fn test_unknown_task_status_is_not_found() {
    let (app, _library, _temp_dir) = create_default_test_app().await;

    let (status, body) = send(&app, get("/tasks/does-not-exist")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

struct EchoSearch;

#[async_trait]
impl SearchTool for EchoSearch {
    fn name(&self) -> &str {
        "Echo"
    }

    async fn search(&self, keyword: &str) -> crate::Result<Vec<SearchResult>> {
        Ok(vec![SearchResult {
            title: Some(keyword.to_string()),
            ..Default::default()
        }])
    }
}

#[tokio::test]
async fn test_search_routes() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut search = SearchRegistry::new();
    search.register("Echo", || Box::new(EchoSearch));
    let library = MediaLibrary::with_collaborators(
        crate::library::test_helpers::test_config(temp_dir.path()),
        crate::library::Collaborators {
            extractor: Arc::new(MockExtractor::default()),
            feeds: Arc::new(MockFeed::new("Show", Vec::new())),
            search,
        },
    )
    .await
    .unwrap();
    let library = Arc::new(library);
    let app = create_router(library.clone(), Arc::new(library.config().clone()));

    let (status, tools) = send(&app, get("/search/tools")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tools, json!(["Echo"]));

    let (status, results) = send(
        &app,
        json_request("POST", "/search", json!({"tool": "Echo", "keyword": "jazz"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results[0]["title"], "jazz");

    let (status, body) = send(
        &app,
        json_request("POST", "/search", json!({"tool": "Nope", "keyword": "jazz"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (status, body) = send(
        &app,
        json_request("POST", "/search", json!({"tool": "Echo", "keyword": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_input");
}
