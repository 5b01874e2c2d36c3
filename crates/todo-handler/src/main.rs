use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use infrastructure::{DynamoDbClient, TodoRepository};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use shared::telemetry::{create_lambda_span, LambdaTraceContext};
use shared::{init_tracing, Config};
use std::sync::Arc;
use tracing::{info, Instrument};

/// ToDo ハンドラーのメイン関数
async fn function_handler(
    repo: &TodoRepository,
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ApiGatewayProxyResponse, Error> {
    let (request, context) = event.into_parts();

    let trace_context = LambdaTraceContext::from_lambda_context(&context);
    let span = create_lambda_span("todo-handler", &trace_context);

    let response = todo_handler::route(&request, repo, &context.request_id)
        .instrument(span)
        .await;

    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    if let Err(e) = init_tracing() {
        eprintln!("トレーシング初期化エラー: {e}");
        // トレーシング初期化に失敗してもアプリケーションは継続
    }

    let config = Config::from_env()?;

    info!(
        table = %config.todo_table,
        owner_index = %config.owner_index,
        environment = %config.environment,
        "Todo handler starting"
    );

    // クライアントはコールドスタート時に一度だけ構築して注入する
    let db_client = DynamoDbClient::new(&config).await;
    let repository = TodoRepository::new(Arc::new(db_client), config.owner_index.clone());

    run(service_fn(move |event: LambdaEvent<ApiGatewayProxyRequest>| {
        let repo = repository.clone();
        async move { function_handler(&repo, event).await }
    }))
    .await
}
