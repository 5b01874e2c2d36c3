use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ToDo エンティティ
///
/// JSON とテーブル属性の両方で同じキー名を使う。
/// 欠けているフィールドはゼロ値（空文字列 / false / UNIX エポック）になる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Todo {
    /// 呼び出し側が採番する ID（サーバー側では生成しない）
    pub id: String,
    /// 所有ユーザー ID（一覧取得のパーティションキー）
    #[serde(rename = "userID", alias = "userId")]
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub completed: bool,
}

impl Todo {
    /// 更新で書き換え可能なフィールドだけを取り出す
    pub fn changes(&self) -> TodoChanges {
        TodoChanges {
            title: self.title.clone(),
            description: self.description.clone(),
            completed: self.completed,
        }
    }
}

/// 更新操作で適用されるフィールド
///
/// `deadline` と `userID` は更新対象外。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoChanges {
    pub title: String,
    pub description: String,
    pub completed: bool,
}
