//! 商品目录：模型、存储、页面与处理器

pub mod file_store;
pub mod handler;
pub mod model;
#[cfg(feature = "database")]
pub mod sql_store;
pub mod store;
pub mod view;

pub use file_store::JsonFileStore;
pub use handler::AppState;
pub use model::{Item, ItemDraft};
#[cfg(feature = "database")]
pub use sql_store::SqlItemStore;
pub use store::{ItemStore, StoreError};
