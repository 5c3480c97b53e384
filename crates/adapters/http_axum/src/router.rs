//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use winctl_app::ports::EntityStore;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api`.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<S>(state: AppState<S>) -> Router
where
    S: EntityStore + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tokio_stream::StreamExt;
    use tower::ServiceExt;
    use winctl_adapter_memory::MemoryEntityStore;
    use winctl_domain::device::Device;
    use winctl_domain::entity::{EntityDefinition, StateValue};
    use winctl_domain::path::EntityPath;

    const BUTTON: &str = "0_userdata.0.Control-PC.PC-John.shutdown";
    const SEND_KEY: &str = "0_userdata.0.Control-PC.PC-John.sendKey";

    async fn test_state() -> (AppState<MemoryEntityStore>, Arc<MemoryEntityStore>) {
        let store = Arc::new(MemoryEntityStore::default());
        store
            .create(&EntityPath::from(BUTTON), EntityDefinition::button("Command: shutdown"))
            .await
            .unwrap();
        store
            .create(&EntityPath::from(SEND_KEY), EntityDefinition::text("Send Key"))
            .await
            .unwrap();
        let state = AppState::new(
            Arc::clone(&store),
            vec![Device::new("PC-John", "192.168.0.101")],
            EntityPath::from("0_userdata.0.Control-PC"),
        );
        (state, store)
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn put_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let (state, _) = test_state().await;

        let response = build(state).oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_list_entities() {
        let (state, _) = test_state().await;

        let response = build(state).oneshot(get("/api/entities")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let paths: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|entity| entity["path"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(paths, vec![SEND_KEY.to_string(), BUTTON.to_string()]);
    }

    #[tokio::test]
    async fn should_get_entity_by_dotted_path() {
        let (state, _) = test_state().await;

        let response = build(state)
            .oneshot(get(&format!("/api/entities/{BUTTON}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["definition"]["role"], "button");
        assert_eq!(body["definition"]["type"], "boolean");
    }

    #[tokio::test]
    async fn should_return_404_for_unknown_entity() {
        let (state, _) = test_state().await;

        let response = build(state)
            .oneshot(get("/api/entities/0_userdata.0.nothing"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Entity not found: 0_userdata.0.nothing");
    }

    #[tokio::test]
    async fn should_write_value_as_unacknowledged_command() {
        let (state, store) = test_state().await;
        let mut rx = store.subscribe();

        let response = build(state)
            .oneshot(put_json(
                &format!("/api/entities/{BUTTON}"),
                &serde_json::json!({"value": true}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["path"], BUTTON);
        assert_eq!(body["value"], true);
        assert_eq!(body["ack"], false);

        let change = rx.recv().await.unwrap();
        assert_eq!(change.path.as_str(), BUTTON);
        assert_eq!(change.value, StateValue::Bool(true));
        assert!(!change.ack);
    }

    #[tokio::test]
    async fn should_reject_value_of_wrong_type() {
        let (state, _) = test_state().await;

        let response = build(state)
            .oneshot(put_json(
                &format!("/api/entities/{BUTTON}"),
                &serde_json::json!({"value": "yes"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_404_when_writing_unknown_entity() {
        let (state, _) = test_state().await;

        let response = build(state)
            .oneshot(put_json(
                "/api/entities/0_userdata.0.nothing",
                &serde_json::json!({"value": true}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_list_devices_with_entity_path() {
        let (state, _) = test_state().await;

        let response = build(state).oneshot(get("/api/devices")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            serde_json::json!([{
                "name": "PC-John",
                "address": "192.168.0.101",
                "path": "0_userdata.0.Control-PC.PC-John",
            }])
        );
    }

    #[tokio::test]
    async fn should_stream_state_changes_as_sse() {
        let (state, store) = test_state().await;

        let response = build(state)
            .oneshot(get("/api/events/stream"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );

        let mut frames = response.into_body().into_data_stream();
        store
            .set_value(&EntityPath::from(SEND_KEY), StateValue::from("VK_ESCAPE"), false)
            .await
            .unwrap();

        let frame = frames.next().await.unwrap().unwrap();
        let text = String::from_utf8(frame.to_vec()).unwrap();
        assert!(text.starts_with("data: "));
        assert!(text.contains(r#""value":"VK_ESCAPE""#));
    }
}
