use std::env;

use crate::errors::AppError;

/// Lambda 関数の実行時設定
#[derive(Debug, Clone)]
pub struct Config {
    pub todo_table: String,
    /// `userID` をパーティションキーに持つ GSI 名
    pub owner_index: String,
    pub environment: String,
    pub aws_region: String,
    /// DynamoDB Local などへの接続先上書き
    pub dynamodb_endpoint: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の取得関数から設定を組み立てる
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Config {
            todo_table: lookup("TODO_TABLE").unwrap_or_else(|| "Todos".to_string()),
            owner_index: lookup("OWNER_INDEX").unwrap_or_else(|| "userID-index".to_string()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()),
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "ap-south-1".to_string()),
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT").filter(|s| !s.is_empty()),
        };

        if config.todo_table.trim().is_empty() {
            return Err(AppError::Configuration(
                "TODO_TABLE must not be empty".to_string(),
            ));
        }
        if config.owner_index.trim().is_empty() {
            return Err(AppError::Configuration(
                "OWNER_INDEX must not be empty".to_string(),
            ));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.todo_table, "Todos");
        assert_eq!(config.owner_index, "userID-index");
        assert_eq!(config.environment, "dev");
        assert_eq!(config.aws_region, "ap-south-1");
        assert!(config.dynamodb_endpoint.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("TODO_TABLE", "todos-prod"),
            ("OWNER_INDEX", "owner"),
            ("ENVIRONMENT", "prod"),
            ("AWS_REGION", "us-east-1"),
            ("DYNAMODB_ENDPOINT", "http://localhost:8000"),
        ]))
        .unwrap();

        assert_eq!(config.todo_table, "todos-prod");
        assert_eq!(config.owner_index, "owner");
        assert_eq!(config.environment, "prod");
        assert_eq!(config.aws_region, "us-east-1");
        assert_eq!(
            config.dynamodb_endpoint.as_deref(),
            Some("http://localhost:8000")
        );
    }

    #[test]
    fn test_empty_endpoint_is_ignored() {
        let config = Config::from_lookup(lookup_from(&[("DYNAMODB_ENDPOINT", "")])).unwrap();
        assert!(config.dynamodb_endpoint.is_none());
    }

    #[test]
    fn test_empty_table_name_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[("TODO_TABLE", " ")]));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
