//! HTTP request handlers for the config service.

use super::AppState;
use crate::endpoint::{Endpoint, EndpointPayload};
use crate::store::UpsertOutcome;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

/// `GET /endpoints`: all configured endpoints as a JSON array.
pub async fn list_endpoints(State(state): State<AppState>) -> impl IntoResponse {
    let payloads: Vec<EndpointPayload> = state
        .store
        .list()
        .await
        .iter()
        .map(Endpoint::to_payload)
        .collect();
    Json(payloads)
}

/// `GET /endpoints/{id}`: one endpoint, or 404.
pub async fn get_endpoint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.get(&id).await {
        Some(endpoint) => Json(endpoint.to_payload()).into_response(),
        None => {
            tracing::debug!("no such endpoint \"{id}\"");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// `POST /endpoints/{id}`: create (201) or update (204) an endpoint.
///
/// The body must validate and its identifier must match the path.
pub async fn upsert_endpoint(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<EndpointPayload>,
) -> impl IntoResponse {
    let endpoint = match Endpoint::from_payload(&payload) {
        Ok(endpoint) => endpoint,
        Err(e) => {
            tracing::debug!("reject payload for \"{id}\": {e}");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };
    if endpoint.identifier() != id {
        let reason = format!(
            "identifier mismatch (path: \"{id}\", body: \"{}\")",
            endpoint.identifier()
        );
        tracing::debug!("{reason}");
        return (StatusCode::BAD_REQUEST, reason).into_response();
    }

    match state.store.upsert(endpoint).await {
        Ok(UpsertOutcome::Created) => StatusCode::CREATED.into_response(),
        Ok(UpsertOutcome::Updated) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("upsert \"{id}\": {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::store::ConfigStore;
    use crate::web::Server;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn payload(identifier: &str) -> serde_json::Value {
        serde_json::json!({
            "identifier": identifier,
            "url": "https://example.test/health",
            "method": "GET",
            "status_online": 200,
            "frequency": "5m0s",
            "fail_after": 3,
        })
    }

    fn router(dir: &tempfile::TempDir) -> Router {
        let store = ConfigStore::load(dir.path().join("config.csv")).unwrap();
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        Server::new(Arc::new(store), addr).routes()
    }

    fn post(id: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/endpoints/{id}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn lists_endpoints_as_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(&dir);

        let response = app
            .clone()
            .oneshot(post("api", payload("api")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app.oneshot(get("/endpoints")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let listed: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["identifier"], "api");
        assert_eq!(listed[0]["frequency"], "5m0s");
    }

    #[tokio::test]
    async fn get_unknown_endpoint_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(&dir);

        let response = app.oneshot(get("/endpoints/ghost")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_then_update_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(&dir);

        let response = app
            .clone()
            .oneshot(post("api", payload("api")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(post("api", payload("api")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.oneshot(get("/endpoints/api")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn identifier_mismatch_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(&dir);

        let response = app.oneshot(post("api", payload("web"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_payload_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(&dir);

        let mut bad = payload("api");
        bad["status_online"] = serde_json::json!(1000);
        let response = app.oneshot(post("api", bad)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
