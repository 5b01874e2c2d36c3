use serde::{Deserialize, Serialize};
use thiserror::Error;

/// アプリケーション全体で使用されるエラー型
///
/// ルーター境界で一度だけ HTTP ステータスに変換される。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    // クライアントエラー
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported HTTP method: {0}")]
    MethodNotAllowed(String),

    // ストアエラー
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Write error: {0}")]
    Write(String),

    #[error("Query error: {0}")]
    Query(String),

    // システムエラー
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// エラーの分類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    /// クライアントエラー（4xx相当）
    Client,
    /// サーバーエラー（5xx相当）
    Server,
}

/// エラーの重要度
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Error,
    Critical,
}

/// エラーメタデータ
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
}

impl AppError {
    /// エラーメタデータを取得
    pub fn metadata(&self) -> ErrorMetadata {
        let (code, category, severity) = match self {
            AppError::BadRequest(_) => ("BAD_REQUEST", ErrorCategory::Client, ErrorSeverity::Info),
            AppError::MethodNotAllowed(_) => (
                "METHOD_NOT_ALLOWED",
                ErrorCategory::Client,
                ErrorSeverity::Info,
            ),
            AppError::StoreUnavailable(_) => (
                "STORE_UNAVAILABLE",
                ErrorCategory::Server,
                ErrorSeverity::Critical,
            ),
            AppError::Serialization(_) => (
                "SERIALIZATION_ERROR",
                ErrorCategory::Server,
                ErrorSeverity::Error,
            ),
            AppError::Write(_) => ("WRITE_ERROR", ErrorCategory::Server, ErrorSeverity::Error),
            AppError::Query(_) => ("QUERY_ERROR", ErrorCategory::Server, ErrorSeverity::Error),
            AppError::Configuration(_) => (
                "CONFIGURATION_ERROR",
                ErrorCategory::Server,
                ErrorSeverity::Critical,
            ),
        };

        ErrorMetadata {
            code,
            category,
            severity,
        }
    }

    /// HTTPステータスコードを取得
    ///
    /// ストア系エラーの内訳は呼び出し側に見せず、一律 500 とする。
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::BadRequest(_) => 400,
            AppError::MethodNotAllowed(_) => 405,
            _ => 500,
        }
    }

    /// ユーザー向けメッセージを取得
    pub fn user_message(&self) -> String {
        match self {
            AppError::BadRequest(_) => "Request body is not a valid todo".to_string(),
            AppError::MethodNotAllowed(_) => self.to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

/// 標準化されたエラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// エラーコード
    pub code: String,
    /// ユーザー向けメッセージ
    pub message: String,
    /// 詳細情報（デバッグビルドのみ）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub request_id: String,
    pub timestamp: String,
}

impl ErrorResponse {
    /// AppErrorからErrorResponseを作成
    pub fn from_app_error(error: &AppError, request_id: String, include_details: bool) -> Self {
        Self {
            code: error.metadata().code.to_string(),
            message: error.user_message(),
            details: include_details.then(|| error.to_string()),
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// JSONレスポンスとして返すためのシリアライズ
    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string(self).map_err(|e| AppError::Serialization(e.to_string()))
    }
}
