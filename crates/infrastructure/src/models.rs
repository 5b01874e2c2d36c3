use aws_sdk_dynamodb::types::AttributeValue;
use domain::{Todo, TodoChanges};
use shared::AppError;
use std::collections::HashMap;

use crate::table::Item;

/// テーブルの主キー属性
pub const ID_ATTRIBUTE: &str = "id";
/// 所有ユーザー属性（GSI のパーティションキー）
pub const OWNER_ATTRIBUTE: &str = "userID";

pub const TITLE_ATTRIBUTE: &str = "title";
pub const DESCRIPTION_ATTRIBUTE: &str = "description";
pub const COMPLETED_ATTRIBUTE: &str = "completed";

/// ToDo の主キーを生成
pub fn todo_key(todo_id: &str) -> Item {
    HashMap::from([(
        ID_ATTRIBUTE.to_string(),
        AttributeValue::S(todo_id.to_string()),
    )])
}

/// DynamoDB AttributeValue マップに変換
///
/// 空の `userID` は GSI のキーにできないため属性ごと落とす（スパースインデックス）。
/// 読み戻すと `#[serde(default)]` により空文字列に戻る。
pub fn todo_to_item(todo: &Todo) -> Result<Item, AppError> {
    let mut item: Item =
        serde_dynamo::to_item(todo).map_err(|e| AppError::Serialization(e.to_string()))?;

    if todo.user_id.is_empty() {
        item.remove(OWNER_ATTRIBUTE);
    }
    Ok(item)
}

/// DynamoDB AttributeValue マップから復元
pub fn item_to_todo(item: Item) -> Result<Todo, AppError> {
    serde_dynamo::from_item(item).map_err(|e| AppError::Serialization(e.to_string()))
}

/// 更新対象の 3 フィールドを SET 句の組に変換
pub fn changes_to_assignments(changes: &TodoChanges) -> Vec<(String, AttributeValue)> {
    vec![
        (
            TITLE_ATTRIBUTE.to_string(),
            AttributeValue::S(changes.title.clone()),
        ),
        (
            DESCRIPTION_ATTRIBUTE.to_string(),
            AttributeValue::S(changes.description.clone()),
        ),
        (
            COMPLETED_ATTRIBUTE.to_string(),
            AttributeValue::Bool(changes.completed),
        ),
    ]
}
