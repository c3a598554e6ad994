//! # 商品目录服务
//!
//! 商品的列表、新增、编辑、删除，以及 PDF 报表导出。
//!
//! - [`app`] 路由与处理器，商品存储抽象及其 JSON 文件 / 数据表实现
//! - [`report`] PDF 报表排版与生成
//! - [`core`] 错误、中间件、响应
//! - [`infrastructure`] 数据库连接与日志
//! - [`config`] 配置加载

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;
pub mod report;

pub use app::{build_router, catalog::AppState};
pub use config::Config;
