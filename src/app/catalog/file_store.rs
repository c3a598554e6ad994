//! JSON 文件存储
//!
//! 启动时读取一次数据文件，之后所有读操作都走内存。每次写操作在锁内
//! 先计算新的集合，写入临时文件再重命名覆盖，成功后才替换内存中的集合。

use std::path::{Path, PathBuf};

use axum::async_trait;
use tokio::{fs, sync::Mutex};
use tracing::{debug, info};

use super::model::{Item, ItemDraft};
use super::store::{ItemStore, StoreError, StoreResult};

pub struct JsonFileStore {
    path: PathBuf,
    items: Mutex<Vec<Item>>,
}

impl JsonFileStore {
    /// 打开数据文件，文件不存在时从空集合开始
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        let items = match fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "数据文件不存在，使用空集合");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), count = items.len(), "已加载商品数据");

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, items: &[Item]) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(items)?;
        write_atomic(&self.path, &bytes).await?;
        debug!(path = %self.path.display(), count = items.len(), "数据文件已写入");
        Ok(())
    }
}

#[async_trait]
impl ItemStore for JsonFileStore {
    async fn list_all(&self) -> StoreResult<Vec<Item>> {
        Ok(self.items.lock().await.clone())
    }

    async fn create(&self, draft: ItemDraft) -> StoreResult<Item> {
        let mut items = self.items.lock().await;

        let id = next_id(&items, chrono::Utc::now().timestamp_millis())
            .ok_or(StoreError::IdExhausted)?;
        let item = draft.into_item(id);

        let mut next = items.clone();
        next.push(item.clone());
        self.persist(&next).await?;
        *items = next;

        Ok(item)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Item>> {
        let items = self.items.lock().await;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    async fn update(&self, id: i64, draft: ItemDraft) -> StoreResult<Item> {
        let mut items = self.items.lock().await;

        let index = items
            .iter()
            .position(|item| item.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let mut next = items.clone();
        next[index].name = draft.name;
        next[index].description = draft.description;
        let updated = next[index].clone();

        self.persist(&next).await?;
        *items = next;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut items = self.items.lock().await;

        let next: Vec<Item> = items.iter().filter(|item| item.id != id).cloned().collect();
        let removed = next.len() != items.len();

        self.persist(&next).await?;
        *items = next;

        Ok(removed)
    }
}

/// 基于毫秒时间戳的新 id，时间戳不大于已有最大 id 时取最大 id + 1；
/// 最大 id 已是 `i64::MAX` 时没有可用 id
fn next_id(items: &[Item], now_millis: i64) -> Option<i64> {
    match items.iter().map(|item| item.id).max() {
        Some(max) if now_millis <= max => max.checked_add(1),
        _ => Some(now_millis),
    }
}

/// 先写 `<file>.tmp`，再重命名覆盖目标文件
async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, bytes).await?;
    fs::rename(&tmp, path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn item(id: i64, name: &str, description: &str) -> Item {
        Item {
            id,
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_next_id() {
        assert_eq!(next_id(&[], 1_000), Some(1_000));
        assert_eq!(next_id(&[item(10, "a", "b")], 1_000), Some(1_000));
        assert_eq!(next_id(&[item(5_000, "a", "b")], 1_000), Some(5_001));
        assert_eq!(next_id(&[item(1_000, "a", "b")], 1_000), Some(1_001));
    }

    #[test]
    fn test_next_id_at_i64_max() {
        assert_eq!(next_id(&[item(i64::MAX, "a", "b")], 1_000), None);
        assert_eq!(next_id(&[item(i64::MAX - 1, "a", "b")], 1_000), Some(i64::MAX));
    }

    #[tokio::test]
    async fn test_create_with_max_id_fails_without_change() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("items.json");
        let seed = format!(r#"[{{"id":{},"nome":"Caneta","descricao":"Azul"}}]"#, i64::MAX);
        std::fs::write(&path, &seed).unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        let result = store.create(ItemDraft::new("Mesa", "Madeira")).await;
        assert!(matches!(result, Err(StoreError::IdExhausted)));

        assert_eq!(
            store.list_all().await.unwrap(),
            vec![item(i64::MAX, "Caneta", "Azul")]
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), seed);
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("mock/items.json"))
            .await
            .unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_persists_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mock/items.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        let first = store.create(ItemDraft::new("Mesa", "Madeira")).await.unwrap();
        let second = store.create(ItemDraft::new("Cadeira", "Metal")).await.unwrap();
        assert!(second.id > first.id);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(reopened.list_all().await.unwrap(), vec![first, second]);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  {\n    \"id\""));
        assert!(text.contains("\"nome\": \"Mesa\""));
        assert!(!dir.path().join("mock/items.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, r#"[{"id":1,"nome":"Caneta","descricao":"Azul"}]"#).unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        let updated = store
            .update(1, ItemDraft::new("Lapis", "Grafite"))
            .await
            .unwrap();
        assert_eq!(updated, item(1, "Lapis", "Grafite"));
        assert_eq!(
            store.find_by_id(1).await.unwrap(),
            Some(item(1, "Lapis", "Grafite"))
        );

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(reopened.list_all().await.unwrap(), vec![item(1, "Lapis", "Grafite")]);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, r#"[{"id":1,"nome":"Caneta","descricao":"Azul"}]"#).unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        let result = store.update(999, ItemDraft::new("x", "y")).await;
        assert!(matches!(result, Err(StoreError::NotFound(999))));
        assert_eq!(store.list_all().await.unwrap(), vec![item(1, "Caneta", "Azul")]);
    }

    #[tokio::test]
    async fn test_delete_updates_memory_and_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(
            &path,
            r#"[{"id":1,"nome":"Caneta","descricao":"Azul"},{"id":2,"nome":"Mesa","descricao":"Madeira"}]"#,
        )
        .unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        assert!(store.delete(1).await.unwrap());
        assert_eq!(store.list_all().await.unwrap(), vec![item(2, "Mesa", "Madeira")]);

        assert!(!store.delete(1).await.unwrap());
        assert_eq!(store.list_all().await.unwrap().len(), 1);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(reopened.list_all().await.unwrap(), vec![item(2, "Mesa", "Madeira")]);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_unchanged() {
        let dir = tempdir().unwrap();
        // 数据文件路径指向一个目录，重命名会失败
        let path = dir.path().join("items.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"x").unwrap();

        let store = JsonFileStore {
            path: path.clone(),
            items: Mutex::new(vec![item(1, "Caneta", "Azul")]),
        };

        assert!(store.create(ItemDraft::new("Mesa", "Madeira")).await.is_err());
        assert!(store.delete(1).await.is_err());
        assert_eq!(store.list_all().await.unwrap(), vec![item(1, "Caneta", "Azul")]);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            JsonFileStore::open(&path).await,
            Err(StoreError::Json(_))
        ));
    }
}
