//! 商品存储抽象

use axum::async_trait;

use super::model::{Item, ItemDraft};

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("商品不存在: {0}")]
    NotFound(i64),
    #[error("已有 id 达到上限，无法分配新 id")]
    IdExhausted,
    #[error("文件读写失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),
    #[error("数据库操作失败: {0}")]
    Database(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(Box::new(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 商品存储，文件和数据表两种实现可以互换
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// 全部商品
    async fn list_all(&self) -> StoreResult<Vec<Item>>;

    /// 分配新 id 并保存
    async fn create(&self, draft: ItemDraft) -> StoreResult<Item>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Item>>;

    /// 替换名称和描述，id 不变；找不到时返回 `StoreError::NotFound`
    async fn update(&self, id: i64, draft: ItemDraft) -> StoreResult<Item>;

    /// 删除商品，返回是否真的删除了记录
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}
