use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::{AppError, ErrorResponse, ErrorSeverity};

/// Lambda関数用のエラーハンドリングユーティリティ
pub struct LambdaErrorHandler;

impl LambdaErrorHandler {
    /// AppErrorをステータスコードとJSONボディに変換
    pub fn to_status_and_body(
        error: &AppError,
        request_id: Option<String>,
        include_details: bool,
    ) -> (u16, String) {
        let request_id = request_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let error_response = ErrorResponse::from_app_error(error, request_id, include_details);

        let body = error_response.to_json().unwrap_or_else(|_| {
            r#"{"code":"SERIALIZATION_ERROR","message":"Failed to render error response"}"#
                .to_string()
        });

        (error.http_status_code(), body)
    }

    /// エラーをログに記録
    pub fn log_error(error: &AppError, context: Option<HashMap<String, String>>) {
        let metadata = error.metadata();

        match metadata.severity {
            ErrorSeverity::Critical | ErrorSeverity::Error => {
                tracing::error!(
                    error = %error,
                    code = metadata.code,
                    category = ?metadata.category,
                    context = ?context,
                    "Request failed"
                );
            }
            ErrorSeverity::Info => {
                tracing::info!(
                    error = %error,
                    code = metadata.code,
                    context = ?context,
                    "Request rejected"
                );
            }
        }
    }
}
