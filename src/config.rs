//! 服务配置
//!
//! 查找顺序：`CATALOG_CONFIG` 指定的文件、`config.toml`、`config/config.toml`，
//! 都不存在时使用默认配置。`DATABASE_URL` 和 `PORT` 环境变量会覆盖文件中的值。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "CATALOG_CONFIG";

const DEFAULT_CONFIG_PATHS: [&str; 2] = ["config.toml", "./config/config.toml"];

/// 目录服务配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 存储配置
    pub storage: StorageConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口
    pub port: u16,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
    /// 静态资源目录
    pub public_dir: PathBuf,
}

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON 文件
    File,
    /// 关系型数据表
    Database,
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// JSON 数据文件路径
    pub data_file: PathBuf,
    /// 数据库连接地址
    pub database_url: String,
    /// 连接池最大连接数
    pub max_connections: u32,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3000,
            timeout_seconds: 30,
            public_dir: PathBuf::from("public"),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_file: PathBuf::from("mock/items.json"),
            database_url: "sqlite://produtos.db".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl HttpConfig {
    /// 监听地址，`bind_address` 可以是 IP 或主机名，绑定时再解析
    pub fn listen_addr(&self) -> (&str, u16) {
        (self.bind_address.as_str(), self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        Self::from_toml(&content)
    }

    /// 解析 TOML 文本
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(
            std::env::var("DATABASE_URL").ok(),
            std::env::var("PORT").ok(),
        )
    }

    fn apply_overrides(
        &mut self,
        database_url: Option<String>,
        port: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = database_url {
            self.storage.database_url = url;
        }
        if let Some(port) = port {
            self.http.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Validation(format!("无效的端口: {}", port)))?;
        }
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation("HTTP端口必须大于0".to_string()));
        }
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }

        match self.storage.backend {
            StorageBackend::File if self.storage.data_file.as_os_str().is_empty() => {
                return Err(ConfigError::Validation("数据文件路径不能为空".to_string()));
            }
            StorageBackend::Database if self.storage.database_url.is_empty() => {
                return Err(ConfigError::Validation("数据库连接地址不能为空".to_string()));
            }
            _ => {}
        }
        if self.storage.max_connections == 0 {
            return Err(ConfigError::Validation("连接池大小必须大于0".to_string()));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

/// 从文件或默认值加载配置，应用环境变量并验证
pub fn load_config() -> Result<Config, ConfigError> {
    let mut config = match locate_config_file() {
        Some(path) => Config::load_from_file(&path)?,
        None => Config::default(),
    };

    config.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}

fn locate_config_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    DEFAULT_CONFIG_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.data_file, PathBuf::from("mock/items.json"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [storage]
            backend = "database"
            database_url = "sqlite::memory:"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Database);
        assert_eq!(config.storage.database_url, "sqlite::memory:");
        assert_eq!(config.storage.max_connections, 5);
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_unknown_backend_is_parse_error() {
        let result = Config::from_toml("[storage]\nbackend = \"mongo\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(Some("sqlite://other.db".to_string()), Some("8081".to_string()))
            .unwrap();
        assert_eq!(config.storage.database_url, "sqlite://other.db");
        assert_eq!(config.http.port, 8081);

        let err = config.apply_overrides(None, Some("porta".to_string()));
        assert!(matches!(err, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.storage.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.storage.backend = StorageBackend::Database;
        config.storage.database_url.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_listen_addr() {
        let config = Config::default();
        assert_eq!(config.http.listen_addr(), ("127.0.0.1", 3000));
    }

    #[tokio::test]
    async fn test_hostname_bind_address_is_resolved() {
        let http = HttpConfig {
            bind_address: "localhost".to_string(),
            port: 0,
            ..HttpConfig::default()
        };

        let listener = tokio::net::TcpListener::bind(http.listen_addr()).await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }
}
