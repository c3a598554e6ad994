//! 核心响应处理模块

use axum::{
    body::Body,
    http::{header, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};

/// 写操作成功后返回列表页
pub fn redirect_home() -> Redirect {
    Redirect::to("/")
}

/// 以附件形式下载的 PDF 响应
pub struct PdfAttachment {
    pub filename: String,
    pub body: Body,
}

impl PdfAttachment {
    pub fn new(filename: impl Into<String>, body: Body) -> Self {
        Self {
            filename: filename.into(),
            body,
        }
    }

    fn disposition(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("attachment; filename={}", self.filename))
            .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
    }
}

impl IntoResponse for PdfAttachment {
    fn into_response(self) -> Response {
        let disposition = self.disposition();
        (
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.body,
        )
            .into_response()
    }
}
