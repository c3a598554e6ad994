use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use product_catalog::{
    app::{
        build_router,
        catalog::{AppState, ItemStore, JsonFileStore},
    },
    config::{self, Config, StorageBackend},
    infrastructure::logger::Logger,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load_config().context("加载配置失败")?;
    Logger::init(&config.logging.level);

    info!("启动商品目录服务...");

    let store = open_store(&config).await?;
    let app = build_router(
        AppState::new(store),
        &config.http.public_dir,
        config.http.timeout(),
    );

    let (host, port) = config.http.listen_addr();
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("无法绑定到 {}:{}", host, port))?;

    info!("🚀 服务器运行在 http://{}", listener.local_addr()?);
    info!("📖 可用端点:");
    info!("   GET  /              - 商品列表");
    info!("   GET  /cadastro      - 新增表单");
    info!("   POST /cadastro      - 新增商品");
    info!("   GET  /editar/:id    - 编辑表单");
    info!("   POST /editar/:id    - 更新商品");
    info!("   POST /deletar/:id   - 删除商品");
    info!("   GET  /relatorio     - 下载 PDF 报表");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务器已停止");
    Ok(())
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn ItemStore>> {
    match config.storage.backend {
        StorageBackend::File => {
            let store = JsonFileStore::open(&config.storage.data_file)
                .await
                .with_context(|| {
                    format!("无法读取数据文件 {}", config.storage.data_file.display())
                })?;
            info!(path = %config.storage.data_file.display(), "使用 JSON 文件存储");
            Ok(Arc::new(store))
        }
        StorageBackend::Database => open_database_store(config).await,
    }
}

#[cfg(feature = "database")]
async fn open_database_store(config: &Config) -> anyhow::Result<Arc<dyn ItemStore>> {
    use product_catalog::{app::catalog::SqlItemStore, infrastructure::database::DatabaseManager};

    let db = DatabaseManager::new(&config.storage.database_url, config.storage.max_connections)
        .context("无效的数据库连接地址")?;
    // 建表失败时继续运行，之后的请求返回 500
    db.ensure_schema().await;
    info!("使用数据库存储");
    Ok(Arc::new(SqlItemStore::new(db.get_pool().clone())))
}

#[cfg(not(feature = "database"))]
async fn open_database_store(_config: &Config) -> anyhow::Result<Arc<dyn ItemStore>> {
    anyhow::bail!("未启用 database 特性，无法使用数据库存储")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("收到退出信号，正在关闭...");
    }
}
