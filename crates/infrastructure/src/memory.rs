use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::{ID_ATTRIBUTE, OWNER_ATTRIBUTE};
use crate::table::{
    DeleteRequest, Item, PutRequest, QueryRequest, TableClient, TableError, UpdateRequest,
};

/// テーブル呼び出しの種類（テスト観測用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableCall {
    Put,
    Query,
    Update,
    Delete,
}

/// 簡易な InMemory 実装（開発/テスト用）
///
/// 主キーは `id` 単一属性。クエリは挿入順に結果を返す。
/// `userID` は GSI のキーなので、DynamoDB と同じく空文字列を受け付けない。
#[derive(Default)]
pub struct InMemoryTable {
    table_name: String,
    items: Mutex<Vec<Item>>,
    // 呼び出し履歴
    calls: Mutex<Vec<TableCall>>,
    // 設定されている間、すべての呼び出しがこのエラーで失敗する
    failure: Mutex<Option<TableError>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn same_key(item: &Item, key: &Item) -> bool {
    key.iter().all(|(name, value)| item.get(name) == Some(value))
}

fn is_empty_string(value: &AttributeValue) -> bool {
    matches!(value, AttributeValue::S(s) if s.is_empty())
}

fn empty_key_error(attribute: &str) -> TableError {
    TableError::Rejected(format!(
        "ValidationException: empty string value for key attribute {attribute}"
    ))
}

impl InMemoryTable {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<TableCall> {
        lock(&self.calls).clone()
    }

    pub fn items(&self) -> Vec<Item> {
        lock(&self.items).clone()
    }

    pub fn fail_with(&self, error: TableError) {
        *lock(&self.failure) = Some(error);
    }

    /// 呼び出しを記録し、失敗が設定されていればそれを返す
    fn record(&self, call: TableCall) -> Result<(), TableError> {
        lock(&self.calls).push(call);
        match lock(&self.failure).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TableClient for InMemoryTable {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    async fn put_item(&self, request: PutRequest) -> Result<(), TableError> {
        self.record(TableCall::Put)?;

        let key_value = request
            .item
            .get(ID_ATTRIBUTE)
            .cloned()
            .ok_or_else(|| TableError::Rejected(format!("missing key attribute {ID_ATTRIBUTE}")))?;

        for attribute in [ID_ATTRIBUTE, OWNER_ATTRIBUTE] {
            if request.item.get(attribute).is_some_and(is_empty_string) {
                return Err(empty_key_error(attribute));
            }
        }

        let mut items = lock(&self.items);
        match items
            .iter()
            .position(|item| item.get(ID_ATTRIBUTE) == Some(&key_value))
        {
            Some(i) => items[i] = request.item,
            None => items.push(request.item),
        }
        Ok(())
    }

    async fn query(&self, request: QueryRequest) -> Result<Vec<Item>, TableError> {
        self.record(TableCall::Query)?;

        if is_empty_string(&request.partition_value) {
            return Err(empty_key_error(&request.partition_key));
        }

        let items = lock(&self.items);
        Ok(items
            .iter()
            .filter(|item| item.get(&request.partition_key) == Some(&request.partition_value))
            .cloned()
            .collect())
    }

    async fn update_item(&self, request: UpdateRequest) -> Result<(), TableError> {
        self.record(TableCall::Update)?;

        let mut items = lock(&self.items);
        let position = items.iter().position(|item| same_key(item, &request.key));

        if let Some((attribute, expected)) = &request.condition {
            let satisfied = position
                .map(|i| items[i].get(attribute) == Some(expected))
                .unwrap_or(false);
            if !satisfied {
                return Err(TableError::ConditionFailed);
            }
        }

        // 条件なしで存在しない場合は DynamoDB と同じくキーだけのアイテムを作成
        let index = match position {
            Some(i) => i,
            None => {
                items.push(request.key.clone());
                items.len() - 1
            }
        };

        for (attribute, value) in request.set {
            items[index].insert(attribute, value);
        }
        Ok(())
    }

    async fn delete_item(&self, request: DeleteRequest) -> Result<(), TableError> {
        self.record(TableCall::Delete)?;

        lock(&self.items).retain(|item| !same_key(item, &request.key));
        Ok(())
    }
}
