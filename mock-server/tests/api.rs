use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, AppState, RealtimeData};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

async fn seeded() -> AppState {
    let state = AppState::default();
    state.set_active_users("ga:1", Some(42)).await;
    state.set_active_users("ga:quiet", None).await;
    state
}

// --- success ---

#[tokio::test]
async fn known_view_returns_active_users() {
    let resp = app_with(seeded().await)
        .oneshot(get("/analytics/v3/data/realtime?ids=ga%3A1&metrics=rt%3AactiveUsers"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let data: serde_json::Value = body_json(resp).await;
    assert_eq!(data["totalsForAllResults"]["rt:activeUsers"], "42");
}

#[tokio::test]
async fn view_without_data_returns_empty_object() {
    let resp = app_with(seeded().await)
        .oneshot(get("/analytics/v3/data/realtime?ids=ga%3Aquiet&metrics=rt%3AactiveUsers"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let data: RealtimeData = body_json(resp).await;
    assert!(data.totals_for_all_results.is_none());
}

// --- failures ---

#[tokio::test]
async fn unknown_view_returns_404_with_empty_body() {
    let resp = app()
        .oneshot(get("/analytics/v3/data/realtime?ids=ga%3A404&metrics=rt%3AactiveUsers"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn unknown_metric_returns_400_with_error_body() {
    let resp = app_with(seeded().await)
        .oneshot(get("/analytics/v3/data/realtime?ids=ga%3A1&metrics=rt%3Apageviews"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"]["code"], 400);
    assert_eq!(body["error"]["message"], "Unknown metric(s): rt:pageviews");
}

#[tokio::test]
async fn missing_query_returns_400() {
    let resp = app().oneshot(get("/analytics/v3/data/realtime")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn other_paths_return_404() {
    let resp = app().oneshot(get("/analytics/v3/data/ga")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- auth ---

#[tokio::test]
async fn missing_bearer_token_returns_401() {
    let state = seeded().await.with_bearer_token("t0ken");
    let resp = app_with(state)
        .oneshot(get("/analytics/v3/data/realtime?ids=ga%3A1&metrics=rt%3AactiveUsers"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"]["message"], "Login Required");
}

#[tokio::test]
async fn matching_bearer_token_is_accepted() {
    let state = seeded().await.with_bearer_token("t0ken");
    let resp = app_with(state)
        .oneshot(
            Request::builder()
                .uri("/analytics/v3/data/realtime?ids=ga%3A1&metrics=rt%3AactiveUsers")
                .header(header::AUTHORIZATION, "Bearer t0ken")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// --- shared state ---

#[tokio::test]
async fn counts_update_between_requests() {
    use tower::Service;

    let state = seeded().await;
    let mut app = app_with(state.clone()).into_service();
    let uri = "/analytics/v3/data/realtime?ids=ga%3A1&metrics=rt%3AactiveUsers";

    let resp = ServiceExt::ready(&mut app).await.unwrap().call(get(uri)).await.unwrap();
    let data: serde_json::Value = body_json(resp).await;
    assert_eq!(data["totalsForAllResults"]["rt:activeUsers"], "42");

    state.set_active_users("ga:1", Some(7)).await;

    let resp = ServiceExt::ready(&mut app).await.unwrap().call(get(uri)).await.unwrap();
    let data: serde_json::Value = body_json(resp).await;
    assert_eq!(data["totalsForAllResults"]["rt:activeUsers"], "7");
}
