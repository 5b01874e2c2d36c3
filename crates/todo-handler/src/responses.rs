use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::ApiGatewayProxyResponse;
use aws_lambda_events::http::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use aws_lambda_events::http::HeaderMap;
use serde::Serialize;
use shared::{AppError, LambdaErrorHandler};

pub struct ApiResponse;

impl ApiResponse {
    pub fn json<T: Serialize>(
        data: &T,
        status_code: i64,
    ) -> Result<ApiGatewayProxyResponse, AppError> {
        let body =
            serde_json::to_string(data).map_err(|e| AppError::Serialization(e.to_string()))?;

        Ok(Self::with_body(status_code, Some(Body::Text(body))))
    }

    pub fn created<T: Serialize>(data: &T) -> Result<ApiGatewayProxyResponse, AppError> {
        Self::json(data, 201)
    }

    pub fn ok<T: Serialize>(data: &T) -> Result<ApiGatewayProxyResponse, AppError> {
        Self::json(data, 200)
    }

    pub fn no_content() -> ApiGatewayProxyResponse {
        Self::with_body(204, None)
    }

    /// エラーを構造化されたJSONボディに変換（ステータス変換はここだけで行う）
    pub fn error(error: &AppError, request_id: &str) -> ApiGatewayProxyResponse {
        let (status_code, body) = LambdaErrorHandler::to_status_and_body(
            error,
            Some(request_id.to_string()),
            cfg!(debug_assertions), // デバッグビルドでのみ詳細情報を含める
        );

        Self::with_body(i64::from(status_code), Some(Body::Text(body)))
    }

    fn with_body(status_code: i64, body: Option<Body>) -> ApiGatewayProxyResponse {
        ApiGatewayProxyResponse {
            status_code,
            headers: Self::default_headers(),
            multi_value_headers: HeaderMap::new(),
            body,
            is_base64_encoded: false,
        }
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers
    }
}
