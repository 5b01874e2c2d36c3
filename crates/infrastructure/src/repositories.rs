use aws_sdk_dynamodb::types::AttributeValue;
use domain::{Todo, TodoChanges};
use shared::AppError;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::models::{changes_to_assignments, item_to_todo, todo_key, todo_to_item, OWNER_ATTRIBUTE};
use crate::table::{DeleteRequest, PutRequest, QueryRequest, TableClient, TableError, UpdateRequest};

/// ToDo の永続化アダプター
///
/// テーブル固有のリクエストを組み立てるのはこの型だけ。
/// テーブルクライアントは構築時に注入する。
#[derive(Clone)]
pub struct TodoRepository {
    table: Arc<dyn TableClient>,
    owner_index: String,
}

/// 書き込み系（put / update / delete）のエラー変換
fn write_error(error: TableError) -> AppError {
    match error {
        TableError::Unavailable(msg) => AppError::StoreUnavailable(msg),
        TableError::ConditionFailed => {
            AppError::Write("todo does not exist for this owner".to_string())
        }
        TableError::Rejected(msg) => AppError::Write(msg),
    }
}

/// 読み取り系（query）のエラー変換
fn query_error(error: TableError) -> AppError {
    match error {
        TableError::Unavailable(msg) => AppError::StoreUnavailable(msg),
        other => AppError::Query(other.to_string()),
    }
}

impl TodoRepository {
    pub fn new(table: Arc<dyn TableClient>, owner_index: impl Into<String>) -> Self {
        Self {
            table,
            owner_index: owner_index.into(),
        }
    }

    /// ToDo を書き込む（同じ id があれば全置換）
    pub async fn write(&self, todo: &Todo) -> Result<(), AppError> {
        let item = todo_to_item(todo)?;

        self.traced("put_item", async {
            self.table
                .put_item(PutRequest { item })
                .await
                .map_err(write_error)
        })
        .await
    }

    /// 所有ユーザーの ToDo をすべて取得
    ///
    /// 1 件でも復元できないアイテムがあればクエリ全体を失敗させる。
    /// 空の所有者は GSI のキーにならないので、ストアに問い合わせず空を返す。
    pub async fn query_by_owner(&self, user_id: &str) -> Result<Vec<Todo>, AppError> {
        if user_id.is_empty() {
            info!(table = self.table.table_name(), "Empty owner, skipping query");
            return Ok(Vec::new());
        }

        let items = self
            .traced("query", async {
                self.table
                    .query(QueryRequest {
                        index_name: Some(self.owner_index.clone()),
                        partition_key: OWNER_ATTRIBUTE.to_string(),
                        partition_value: AttributeValue::S(user_id.to_string()),
                    })
                    .await
                    .map_err(query_error)
            })
            .await?;

        items.into_iter().map(item_to_todo).collect()
    }

    /// title / description / completed のみを更新
    ///
    /// `todo` の deadline と userID は使わない。戻り値は送られた値そのもの。
    pub async fn update_by_key(
        &self,
        user_id: &str,
        todo_id: &str,
        todo: &Todo,
    ) -> Result<TodoChanges, AppError> {
        let changes = todo.changes();

        self.traced("update_item", async {
            self.table
                .update_item(UpdateRequest {
                    key: todo_key(todo_id),
                    condition: Some((
                        OWNER_ATTRIBUTE.to_string(),
                        AttributeValue::S(user_id.to_string()),
                    )),
                    set: changes_to_assignments(&changes),
                })
                .await
                .map_err(write_error)
        })
        .await?;

        Ok(changes)
    }

    /// id のみで削除（所有者は見ない）。存在しなくても成功
    pub async fn delete_by_key(&self, todo_id: &str) -> Result<(), AppError> {
        self.traced("delete_item", async {
            self.table
                .delete_item(DeleteRequest {
                    key: todo_key(todo_id),
                })
                .await
                .map_err(write_error)
        })
        .await
    }

    /// DynamoDB 操作をトレース
    async fn traced<T, Fut>(&self, operation: &'static str, fut: Fut) -> Result<T, AppError>
    where
        Fut: Future<Output = Result<T, AppError>>,
    {
        let start_time = Instant::now();
        let result = fut.await;
        let duration_ms = start_time.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => info!(
                table = self.table.table_name(),
                operation,
                duration_ms,
                "DynamoDB operation completed successfully"
            ),
            Err(e) => error!(
                table = self.table.table_name(),
                operation,
                duration_ms,
                error = %e,
                "DynamoDB operation failed"
            ),
        }

        result
    }
}
