use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use base64::{engine::general_purpose, Engine as _};
use domain::Todo;
use infrastructure::TodoRepository;
use shared::AppError;
use tracing::info;

use crate::responses::ApiResponse;

/// パスパラメータ: ToDo ID
pub const TODO_ID_PARAM: &str = "id";
/// パスパラメータ: 所有ユーザー ID
pub const USER_ID_PARAM: &str = "userID";

/// ToDo を作成（同じ id があれば上書き）
pub async fn create_new_todo(
    request: &ApiGatewayProxyRequest,
    repo: &TodoRepository,
) -> Result<ApiGatewayProxyResponse, AppError> {
    let todo = parse_todo(request)?;

    repo.write(&todo).await?;

    info!(todo_id = %todo.id, user_id = %todo.user_id, "Todo created");
    ApiResponse::created(&todo)
}

/// 所有ユーザーの ToDo 一覧
pub async fn get_todos(
    request: &ApiGatewayProxyRequest,
    repo: &TodoRepository,
) -> Result<ApiGatewayProxyResponse, AppError> {
    let user_id = path_param(request, USER_ID_PARAM);

    let todos = repo.query_by_owner(user_id).await?;

    info!(user_id, count = todos.len(), "Todos listed");
    ApiResponse::ok(&todos)
}

/// title / description / completed を更新
pub async fn edit_todo(
    request: &ApiGatewayProxyRequest,
    repo: &TodoRepository,
) -> Result<ApiGatewayProxyResponse, AppError> {
    let todo_id = path_param(request, TODO_ID_PARAM);
    let user_id = path_param(request, USER_ID_PARAM);
    let todo = parse_todo(request)?;

    let changes = repo.update_by_key(user_id, todo_id, &todo).await?;

    info!(todo_id, user_id, "Todo updated");
    ApiResponse::ok(&changes)
}

/// ToDo を削除（存在しなくても 204）
pub async fn delete_todo(
    request: &ApiGatewayProxyRequest,
    repo: &TodoRepository,
) -> Result<ApiGatewayProxyResponse, AppError> {
    let todo_id = path_param(request, TODO_ID_PARAM);

    repo.delete_by_key(todo_id).await?;

    info!(todo_id, "Todo deleted");
    Ok(ApiResponse::no_content())
}

/// 未指定のパスパラメータは空文字列として扱う
fn path_param<'a>(request: &'a ApiGatewayProxyRequest, name: &str) -> &'a str {
    request
        .path_parameters
        .get(name)
        .map(String::as_str)
        .unwrap_or_default()
}

/// リクエストボディを Todo としてパース
fn parse_todo(request: &ApiGatewayProxyRequest) -> Result<Todo, AppError> {
    let body = request_body(request)?;
    serde_json::from_str(&body).map_err(|e| AppError::BadRequest(format!("Invalid JSON: {e}")))
}

/// ボディを文字列として取り出す（base64 エンコードされていればデコード）
fn request_body(request: &ApiGatewayProxyRequest) -> Result<String, AppError> {
    let raw = request.body.clone().unwrap_or_default();
    if !request.is_base64_encoded {
        return Ok(raw);
    }

    let bytes = general_purpose::STANDARD
        .decode(raw.as_bytes())
        .map_err(|e| AppError::BadRequest(format!("Invalid base64 body: {e}")))?;
    String::from_utf8(bytes).map_err(|_| AppError::BadRequest("Invalid UTF-8".to_string()))
}
