use super::*;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::{collections::HashMap, net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct ServerState {
    requests: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

async fn division_admins(
    State(state): State<ServerState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let division = query.get("division_id").cloned().unwrap_or_default();
    let requested_with = headers
        .get("x-requested-with")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state
        .requests
        .lock()
        .await
        .push((division.clone(), requested_with));

    match division.as_str() {
        "1" => Json(json!({
            "admins": [
                {"id": 7, "name": "Ann Lee (ann)"},
                {"id": 9, "name": "bob"},
            ]
        }))
        .into_response(),
        "2" => Json(LookupPayload::records(Vec::new())).into_response(),
        "3" => (
            StatusCode::FORBIDDEN,
            Json(LookupPayload::rejected("Unauthorized")),
        )
            .into_response(),
        "4" => (StatusCode::OK, "<html>login</html>").into_response(),
        "5" => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "admins": [] }))).into_response(),
        _ => Json(json!({ "status": "unknown" })).into_response(),
    }
}

async fn spawn_server() -> (SocketAddr, ServerState) {
    let state = ServerState::default();
    let app = Router::new()
        .route(DEFAULT_LOOKUP_PATH, get(division_admins))
        .with_state(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, state)
}

fn client_for(addr: SocketAddr) -> HttpLookupClient {
    HttpLookupClient::new(&LookupEndpoint::new(format!("http://{addr}"))).expect("client")
}

#[test]
fn endpoint_url_joins_server_and_path() {
    let endpoint = LookupEndpoint::new("http://admin.local:8080/");
    assert_eq!(
        endpoint.url().expect("url").as_str(),
        "http://admin.local:8080/ajax/get-division-admins/"
    );
}

#[test]
fn endpoint_rejects_garbage_server_url() {
    assert!(LookupEndpoint::new("not a url").url().is_err());
}

#[tokio::test]
async fn decodes_records_in_server_order() {
    let (addr, state) = spawn_server().await;
    let client = client_for(addr);

    let records = client
        .lookup(&SelectionValue::from("1"))
        .await
        .expect("records");

    assert_eq!(
        records,
        vec![
            OptionRecord::new("7", "Ann Lee (ann)"),
            OptionRecord::new("9", "bob"),
        ]
    );
    let requests = state.requests.lock().await;
    assert_eq!(
        requests.as_slice(),
        &[("1".to_string(), Some("XMLHttpRequest".to_string()))]
    );
}

#[tokio::test]
async fn empty_admin_list_is_not_an_error() {
    let (addr, _) = spawn_server().await;
    let records = client_for(addr)
        .lookup(&SelectionValue::from("2"))
        .await
        .expect("records");
    assert!(records.is_empty());
}

#[tokio::test]
async fn error_payload_is_rejected_even_with_error_status() {
    let (addr, _) = spawn_server().await;
    let err = client_for(addr)
        .lookup(&SelectionValue::from("3"))
        .await
        .expect_err("should be rejected");
    assert_eq!(err, LookupError::rejected("Unauthorized"));
}

#[tokio::test]
async fn non_json_body_is_a_failure() {
    let (addr, _) = spawn_server().await;
    let err = client_for(addr)
        .lookup(&SelectionValue::from("4"))
        .await
        .expect_err("should fail");
    assert!(!err.is_rejected());
    assert!(err.to_string().contains("malformed"), "{err}");
}

#[tokio::test]
async fn error_status_without_error_field_is_a_failure() {
    let (addr, _) = spawn_server().await;
    let err = client_for(addr)
        .lookup(&SelectionValue::from("5"))
        .await
        .expect_err("should fail");
    assert!(matches!(err, LookupError::Failed(_)));
    assert!(err.to_string().contains("500"), "{err}");
}

#[tokio::test]
async fn payload_without_admins_is_a_failure() {
    let (addr, _) = spawn_server().await;
    let err = client_for(addr)
        .lookup(&SelectionValue::from("99"))
        .await
        .expect_err("should fail");
    assert!(matches!(err, LookupError::Failed(_)));
}

#[tokio::test]
async fn connection_refused_is_a_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = HttpLookupClient::with_timeout(
        &LookupEndpoint::new(format!("http://{addr}")),
        Duration::from_secs(2),
    )
    .expect("client");
    let err = client
        .lookup(&SelectionValue::from("1"))
        .await
        .expect_err("should fail");
    assert!(matches!(err, LookupError::Failed(_)));
}

#[tokio::test]
async fn missing_lookup_always_fails() {
    let err = MissingLookup
        .lookup(&SelectionValue::from("1"))
        .await
        .expect_err("should fail");
    assert!(err.to_string().contains("unavailable"));
}
