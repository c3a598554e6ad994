//! 数据表存储：每个操作只执行一条参数化语句

use axum::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use super::model::{Item, ItemDraft};
use super::store::{ItemStore, StoreError, StoreResult};

const SELECT_ALL: &str = "SELECT id, nome AS name, descricao AS description FROM produtos ORDER BY id";
const SELECT_ONE: &str =
    "SELECT id, nome AS name, descricao AS description FROM produtos WHERE id = ?";
const INSERT: &str = "INSERT INTO produtos (nome, descricao) VALUES (?, ?)";
const UPDATE: &str = "UPDATE produtos SET nome = ?, descricao = ? WHERE id = ?";
const DELETE: &str = "DELETE FROM produtos WHERE id = ?";

#[derive(Clone)]
pub struct SqlItemStore {
    pool: SqlitePool,
}

impl SqlItemStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for SqlItemStore {
    async fn list_all(&self) -> StoreResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(SELECT_ALL)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn create(&self, draft: ItemDraft) -> StoreResult<Item> {
        let result = sqlx::query(INSERT)
            .bind(&draft.name)
            .bind(&draft.description)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        debug!(id, "已插入商品");
        Ok(draft.into_item(id))
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(SELECT_ONE)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    async fn update(&self, id: i64, draft: ItemDraft) -> StoreResult<Item> {
        let result = sqlx::query(UPDATE)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(draft.into_item(id))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query(DELETE).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
