//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::app::catalog::store::StoreError;

/// 找不到商品时返回的消息
pub const NOT_FOUND_MESSAGE: &str = "Item não encontrado";

/// 核心错误类型
#[derive(Debug)]
pub enum CoreError {
    NotFound(String),
    InternalServerError(String),
}

impl CoreError {
    /// 将存储层错误映射为 HTTP 错误，`message` 是 500 时返回给用户的固定文本
    pub fn from_store(err: StoreError, message: &str) -> Self {
        match err {
            StoreError::NotFound(_) => CoreError::NotFound(NOT_FOUND_MESSAGE.to_string()),
            other => {
                error!(error = %other, "存储操作失败");
                CoreError::InternalServerError(message.to_string())
            }
        }
    }

    pub fn not_found() -> Self {
        CoreError::NotFound(NOT_FOUND_MESSAGE.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            CoreError::NotFound(msg) | CoreError::InternalServerError(msg) => msg,
        };

        (status, message).into_response()
    }
}
