use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::http::Method;
use infrastructure::{InMemoryTable, TableCall, TableError, TodoRepository};
use std::collections::HashMap;
use std::sync::Arc;
use todo_handler::route;

const CREATE_BODY: &str = r#"{"id":"t1","userID":"u1","title":"Buy milk","description":"2%","deadline":"2024-01-01T00:00:00Z","completed":false}"#;

fn setup() -> (Arc<InMemoryTable>, TodoRepository) {
    let table = Arc::new(InMemoryTable::new("Todos"));
    let repo = TodoRepository::new(table.clone(), "userID-index");
    (table, repo)
}

// API Gateway リクエストをモックするヘルパー関数
fn create_test_request(
    method: Method,
    path_params: &[(&str, &str)],
    body: Option<&str>,
) -> ApiGatewayProxyRequest {
    ApiGatewayProxyRequest {
        http_method: method,
        path_parameters: path_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
        body: body.map(str::to_string),
        ..Default::default()
    }
}

// レスポンスボディをStringに変換するヘルパー関数
fn response_body_to_string(response: &ApiGatewayProxyResponse) -> String {
    match &response.body {
        None | Some(Body::Empty) => String::new(),
        Some(Body::Text(text)) => text.clone(),
        Some(Body::Binary(binary)) => String::from_utf8_lossy(binary).to_string(),
    }
}

fn response_json(response: &ApiGatewayProxyResponse) -> serde_json::Value {
    serde_json::from_str(&response_body_to_string(response)).unwrap()
}

async fn send(repo: &TodoRepository, request: ApiGatewayProxyRequest) -> ApiGatewayProxyResponse {
    route(&request, repo, "test-request-id").await
}

#[tokio::test]
async fn test_create_echoes_todo_with_201() {
    let (table, repo) = setup();

    let response = send(&repo, create_test_request(Method::POST, &[], Some(CREATE_BODY))).await;

    assert_eq!(response.status_code, 201);
    let expected: serde_json::Value = serde_json::from_str(CREATE_BODY).unwrap();
    assert_eq!(response_json(&response), expected);
    assert_eq!(table.calls(), vec![TableCall::Put]);
}

#[tokio::test]
async fn test_create_then_list_round_trip() {
    let (_table, repo) = setup();
    send(&repo, create_test_request(Method::POST, &[], Some(CREATE_BODY))).await;

    let response = send(
        &repo,
        create_test_request(Method::GET, &[("userID", "u1")], None),
    )
    .await;

    assert_eq!(response.status_code, 200);
    let expected: serde_json::Value = serde_json::from_str(CREATE_BODY).unwrap();
    assert_eq!(response_json(&response), serde_json::json!([expected]));
}

#[tokio::test]
async fn test_list_unknown_user_returns_empty_array() {
    let (table, repo) = setup();

    let response = send(
        &repo,
        create_test_request(Method::GET, &[("userID", "nobody")], None),
    )
    .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response_body_to_string(&response), "[]");
    assert_eq!(table.calls(), vec![TableCall::Query]);
}

#[tokio::test]
async fn test_unknown_method_is_405_without_store_calls() {
    let (table, repo) = setup();

    let response = send(
        &repo,
        create_test_request(Method::PATCH, &[("id", "t1")], Some(CREATE_BODY)),
    )
    .await;

    assert_eq!(response.status_code, 405);
    let json = response_json(&response);
    assert_eq!(json["code"], "METHOD_NOT_ALLOWED");
    assert_eq!(json["message"], "Unsupported HTTP method: PATCH");
    assert!(table.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_400_without_store_calls() {
    let (table, repo) = setup();

    let create = send(
        &repo,
        create_test_request(Method::POST, &[], Some("{not json")),
    )
    .await;
    let update = send(
        &repo,
        create_test_request(Method::PUT, &[("id", "t1"), ("userID", "u1")], Some("[1,2")),
    )
    .await;

    assert_eq!(create.status_code, 400);
    assert_eq!(update.status_code, 400);
    assert_eq!(response_json(&create)["code"], "BAD_REQUEST");
    assert!(table.calls().is_empty());
}

#[tokio::test]
async fn test_update_changes_only_mutable_fields() {
    let (_table, repo) = setup();
    send(&repo, create_test_request(Method::POST, &[], Some(CREATE_BODY))).await;

    let update_body = r#"{"id":"t1","userID":"someone-else","title":"Buy oat milk","description":"1L","deadline":"2031-05-05T00:00:00Z","completed":true}"#;
    let response = send(
        &repo,
        create_test_request(Method::PUT, &[("id", "t1"), ("userID", "u1")], Some(update_body)),
    )
    .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(
        response_json(&response),
        serde_json::json!({"title": "Buy oat milk", "description": "1L", "completed": true})
    );

    let listed = send(
        &repo,
        create_test_request(Method::GET, &[("userID", "u1")], None),
    )
    .await;
    let todos = response_json(&listed);
    assert_eq!(todos.as_array().unwrap().len(), 1);
    assert_eq!(todos[0]["title"], "Buy oat milk");
    assert_eq!(todos[0]["completed"], true);
    assert_eq!(todos[0]["deadline"], "2024-01-01T00:00:00Z");
    assert_eq!(todos[0]["userID"], "u1");
}

#[tokio::test]
async fn test_delete_returns_204_with_empty_body() {
    let (table, repo) = setup();
    send(&repo, create_test_request(Method::POST, &[], Some(CREATE_BODY))).await;

    let response = send(
        &repo,
        create_test_request(Method::DELETE, &[("id", "t1"), ("userID", "whoever")], None),
    )
    .await;

    assert_eq!(response.status_code, 204);
    assert_eq!(response_body_to_string(&response), "");
    assert!(table.items().is_empty());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (table, repo) = setup();

    let first = send(
        &repo,
        create_test_request(Method::DELETE, &[("id", "missing")], None),
    )
    .await;
    let second = send(
        &repo,
        create_test_request(Method::DELETE, &[("id", "missing")], None),
    )
    .await;

    assert_eq!(first.status_code, 204);
    assert_eq!(second.status_code, 204);
    assert_eq!(table.calls(), vec![TableCall::Delete, TableCall::Delete]);
}

#[tokio::test]
async fn test_store_failures_map_to_500() {
    let (table, repo) = setup();
    table.fail_with(TableError::Unavailable("connection refused".to_string()));

    let requests = vec![
        create_test_request(Method::POST, &[], Some(CREATE_BODY)),
        create_test_request(Method::GET, &[("userID", "u1")], None),
        create_test_request(Method::PUT, &[("id", "t1"), ("userID", "u1")], Some(CREATE_BODY)),
        create_test_request(Method::DELETE, &[("id", "t1")], None),
    ];

    for request in requests {
        let response = send(&repo, request).await;
        assert_eq!(response.status_code, 500);
        let json = response_json(&response);
        assert_eq!(json["code"], "STORE_UNAVAILABLE");
        assert_eq!(json["message"], "Internal server error");
        assert_eq!(json["requestId"], "test-request-id");
    }

    // 1 リクエストにつきストア呼び出しはちょうど 1 回
    assert_eq!(table.calls().len(), 4);
}

#[tokio::test]
async fn test_update_for_other_owner_is_500() {
    let (_table, repo) = setup();
    send(&repo, create_test_request(Method::POST, &[], Some(CREATE_BODY))).await;

    let response = send(
        &repo,
        create_test_request(Method::PUT, &[("id", "t1"), ("userID", "u2")], Some(CREATE_BODY)),
    )
    .await;

    assert_eq!(response.status_code, 500);
    assert_eq!(response_json(&response)["code"], "WRITE_ERROR");
}

#[tokio::test]
async fn test_create_without_user_id_then_list_without_user_id() {
    let (table, repo) = setup();

    let created = send(
        &repo,
        create_test_request(Method::POST, &[], Some(r#"{"id":"t9","title":"x"}"#)),
    )
    .await;
    let listed = send(&repo, create_test_request(Method::GET, &[], None)).await;

    assert_eq!(created.status_code, 201);
    assert_eq!(response_json(&created)["userID"], "");
    assert_eq!(listed.status_code, 200);
    assert_eq!(response_body_to_string(&listed), "[]");
    // 空の所有者ではクエリを発行しない
    assert_eq!(table.calls(), vec![TableCall::Put]);
    assert_eq!(table.items().len(), 1);
}
