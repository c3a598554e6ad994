//! 数据库基础设施

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Error,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};

const CREATE_PRODUTOS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS produtos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nome TEXT NOT NULL,
        descricao TEXT NOT NULL
    )
"#;

pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    /// 创建连接池，连接在第一次使用时才真正建立
    pub fn new(database_url: &str, max_connections: u32) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // 内存数据库的每个连接都是独立的库，不能让连接过期
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_lazy_with(options);

        Ok(Self { pool })
    }

    /// 建表；失败时只记录日志，之后的每个查询都会失败
    pub async fn ensure_schema(&self) -> bool {
        match sqlx::query(CREATE_PRODUTOS_TABLE).execute(&self.pool).await {
            Ok(_) => {
                info!("已连接数据库，produtos 表就绪");
                true
            }
            Err(e) => {
                error!(error = %e, "连接数据库失败");
                false
            }
        }
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_schema_on_memory_database() {
        let db = DatabaseManager::new("sqlite::memory:", 1).unwrap();
        assert!(db.ensure_schema().await);

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM produtos")
            .fetch_one(db.get_pool())
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }

    #[tokio::test]
    async fn test_unreachable_database_is_reported_not_fatal() {
        let db = DatabaseManager::new("sqlite:///nonexistent-dir/sub/produtos.db", 1).unwrap();
        assert!(!db.ensure_schema().await);
    }
}
