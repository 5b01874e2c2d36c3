use async_trait::async_trait;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::Client;
use shared::Config;

use crate::table::{
    DeleteRequest, Item, PutRequest, QueryRequest, TableClient, TableError, UpdateRequest,
};

/// DynamoDB テーブルクライアント
#[derive(Clone)]
pub struct DynamoDbClient {
    client: Client,
    table_name: String,
}

impl DynamoDbClient {
    pub async fn new(config: &Config) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()));

        // DynamoDB Local 向けの接続先上書き
        if let Some(endpoint) = &config.dynamodb_endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let aws_config = loader.load().await;
        Self::from_client(Client::new(&aws_config), config.todo_table.clone())
    }

    pub fn from_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

/// SDK エラーを接続系とサービス拒否に分類
fn classify_sdk_error<E, R>(error: SdkError<E, R>) -> TableError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let message = DisplayErrorContext(&error).to_string();
    match error {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            TableError::Unavailable(message)
        }
        _ => TableError::Rejected(message),
    }
}

/// update_item のエラー分類（条件不成立だけを区別する）
fn classify_update_error<R>(error: SdkError<UpdateItemError, R>) -> TableError
where
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let condition_failed = error
        .as_service_error()
        .map(|se| se.is_conditional_check_failed_exception())
        .unwrap_or(false);

    if condition_failed {
        TableError::ConditionFailed
    } else {
        classify_sdk_error(error)
    }
}

#[async_trait]
impl TableClient for DynamoDbClient {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    async fn put_item(&self, request: PutRequest) -> Result<(), TableError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(request.item))
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(())
    }

    async fn query(&self, request: QueryRequest) -> Result<Vec<Item>, TableError> {
        let mut items = Vec::new();
        let mut exclusive_start_key = None;

        // 1MB 単位のページを LastEvaluatedKey が無くなるまで追う
        loop {
            let output = self
                .client
                .query()
                .table_name(&self.table_name)
                .set_index_name(request.index_name.clone())
                .key_condition_expression("#pk = :pk")
                .expression_attribute_names("#pk", request.partition_key.clone())
                .expression_attribute_values(":pk", request.partition_value.clone())
                .set_exclusive_start_key(exclusive_start_key)
                .send()
                .await
                .map_err(classify_sdk_error)?;

            items.extend(output.items.unwrap_or_default());

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
                _ => break,
            }
        }

        Ok(items)
    }

    async fn update_item(&self, request: UpdateRequest) -> Result<(), TableError> {
        let expression = request.expression();

        self.client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(request.key))
            .update_expression(expression.update_expression)
            .set_condition_expression(expression.condition_expression)
            .set_expression_attribute_names(Some(expression.names))
            .set_expression_attribute_values(Some(expression.values))
            .send()
            .await
            .map_err(classify_update_error)?;

        Ok(())
    }

    async fn delete_item(&self, request: DeleteRequest) -> Result<(), TableError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(request.key))
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(())
    }
}
