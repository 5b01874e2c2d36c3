use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;
use thiserror::Error;

/// DynamoDB のアイテム表現
pub type Item = HashMap<String, AttributeValue>;

/// アイテムの全置換（put セマンティクス）
#[derive(Debug, Clone, PartialEq)]
pub struct PutRequest {
    pub item: Item,
}

/// パーティションキーの等価条件によるクエリ
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub index_name: Option<String>,
    pub partition_key: String,
    pub partition_value: AttributeValue,
}

/// SET 式による部分更新
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub key: Item,
    /// 属性の等価条件（満たさない場合は ConditionFailed）
    pub condition: Option<(String, AttributeValue)>,
    pub set: Vec<(String, AttributeValue)>,
}

/// 無条件削除
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteRequest {
    pub key: Item,
}

/// UpdateItem に渡す式一式
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    pub update_expression: String,
    pub condition_expression: Option<String>,
    pub names: HashMap<String, String>,
    pub values: Item,
}

impl UpdateRequest {
    /// 予約語と衝突しないよう、属性名はすべてプレースホルダー経由で参照する
    pub fn expression(&self) -> UpdateExpression {
        let mut names = HashMap::new();
        let mut values = HashMap::new();
        let mut assignments = Vec::with_capacity(self.set.len());

        for (i, (attribute, value)) in self.set.iter().enumerate() {
            let name = format!("#f{i}");
            let placeholder = format!(":f{i}");
            assignments.push(format!("{name} = {placeholder}"));
            names.insert(name, attribute.clone());
            values.insert(placeholder, value.clone());
        }

        let condition_expression = self.condition.as_ref().map(|(attribute, value)| {
            names.insert("#cond".to_string(), attribute.clone());
            values.insert(":cond".to_string(), value.clone());
            "#cond = :cond".to_string()
        });

        UpdateExpression {
            update_expression: format!("SET {}", assignments.join(", ")),
            condition_expression,
            names,
            values,
        }
    }
}

/// テーブル操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// 接続できない・タイムアウト
    #[error("table unavailable: {0}")]
    Unavailable(String),

    #[error("conditional check failed")]
    ConditionFailed,

    /// サービス側で拒否された
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// キーバリューテーブルの最小抽象
///
/// 1 メソッド呼び出しにつき 1 回のリモート呼び出しを行う（query のページ追跡を除く）。
#[async_trait]
pub trait TableClient: Send + Sync {
    fn table_name(&self) -> &str;

    async fn put_item(&self, request: PutRequest) -> Result<(), TableError>;

    /// 条件に一致する全アイテムを返す
    async fn query(&self, request: QueryRequest) -> Result<Vec<Item>, TableError>;

    async fn update_item(&self, request: UpdateRequest) -> Result<(), TableError>;

    /// 存在しないキーの削除はエラーにならない
    async fn delete_item(&self, request: DeleteRequest) -> Result<(), TableError>;
}
