use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use infrastructure::TodoRepository;
use shared::telemetry::trace_http_request;
use shared::{AppError, LambdaErrorHandler};
use std::collections::HashMap;
use tracing::info;

use crate::handlers;
use crate::responses::ApiResponse;

/// HTTP メソッドから決まる操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    List,
    Update,
    Delete,
}

impl Operation {
    pub fn from_method(method: &str) -> Option<Self> {
        match method {
            "POST" => Some(Operation::Create),
            "GET" => Some(Operation::List),
            "PUT" => Some(Operation::Update),
            "DELETE" => Some(Operation::Delete),
            _ => None,
        }
    }
}

/// リクエストを処理してレスポンスを返す
///
/// ハンドラーのエラーはここで一度だけレスポンスに変換される。
pub async fn route(
    request: &ApiGatewayProxyRequest,
    repo: &TodoRepository,
    request_id: &str,
) -> ApiGatewayProxyResponse {
    let method = request.http_method.as_str();

    info!(method, path = ?request.path, "Incoming request");

    let response = match dispatch(request, repo, method).await {
        Ok(response) => response,
        Err(e) => {
            LambdaErrorHandler::log_error(&e, Some(error_context(request, method)));
            ApiResponse::error(&e, request_id)
        }
    };

    trace_http_request(method, u16::try_from(response.status_code).unwrap_or(500));
    response
}

/// エラーログに付与するリクエスト情報
fn error_context(request: &ApiGatewayProxyRequest, method: &str) -> HashMap<String, String> {
    HashMap::from([
        ("method".to_string(), method.to_string()),
        ("path".to_string(), request.path.clone().unwrap_or_default()),
    ])
}

async fn dispatch(
    request: &ApiGatewayProxyRequest,
    repo: &TodoRepository,
    method: &str,
) -> Result<ApiGatewayProxyResponse, AppError> {
    let operation = Operation::from_method(method)
        .ok_or_else(|| AppError::MethodNotAllowed(method.to_string()))?;

    match operation {
        Operation::Create => handlers::create_new_todo(request, repo).await,
        Operation::List => handlers::get_todos(request, repo).await,
        Operation::Update => handlers::edit_todo(request, repo).await,
        Operation::Delete => handlers::delete_todo(request, repo).await,
    }
}
