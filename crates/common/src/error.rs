//! 统一错误类型定义
//!
//! 全项目共享一个错误类型，查询、管理接口和页面渲染都通过它传播错误。

use thiserror::Error;

/// 持久层故障时返回给调用方的通用提示，具体原因只写日志。
pub const PERSISTENCE_FAILURE_MESSAGE: &str = "temporary failure, please try again";

/// 统一错误类型
#[derive(Error, Debug)]
pub enum CertError {
    /// 资源未找到 (404)
    #[error("not found: {0}")]
    NotFound(String),

    /// 请求参数错误 (400)
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 输入校验失败 (400)，例如前缀过短、缺少证书编号
    #[error("{0}")]
    Validation(String),

    /// 日期无法解析 (400)，只在写入时出现
    #[error("invalid date for {field}: {value:?}")]
    InvalidDate { field: &'static str, value: String },

    /// 未登录或令牌无效 (401)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// 持久层错误 (500)
    #[error("persistence error: {0}")]
    Persistence(#[from] sea_orm::DbErr),

    /// 二维码生成失败 (500)
    #[error("qr code error: {0}")]
    QrCode(String),

    /// IO 错误 (500)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误 (500)
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 其他内部错误 (500)
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CertError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_date(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidDate {
            field,
            value: value.into(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn qr_code(msg: impl Into<String>) -> Self {
        Self::QrCode(msg.into())
    }

    /// 判断是否为客户端错误（4xx）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::BadRequest(_)
                | Self::Validation(_)
                | Self::InvalidDate { .. }
                | Self::Unauthorized(_)
        )
    }

    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::BadRequest(_) | Self::Validation(_) | Self::InvalidDate { .. } => 400,
            Self::Unauthorized(_) => 401,
            _ => 500,
        }
    }

    /// 对外展示的错误信息。服务端错误不暴露内部细节。
    pub fn public_message(&self) -> String {
        match self {
            Self::Persistence(_) => PERSISTENCE_FAILURE_MESSAGE.to_string(),
            err if err.is_server_error() => "internal server error".to_string(),
            err => err.to_string(),
        }
    }

    #[cfg(feature = "server")]
    pub fn axum_status_code(&self) -> axum::http::StatusCode {
        axum::http::StatusCode::from_u16(self.http_status_code())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// 按严重程度记录结构化日志。响应边界调用一次。
    pub fn log(&self) {
        let status = self.http_status_code();
        match self {
            CertError::NotFound(resource) => {
                tracing::info!(status, resource = %resource, "Resource not found");
            }
            CertError::BadRequest(msg) => {
                tracing::info!(status, reason = %msg, "Bad request");
            }
            CertError::Validation(msg) => {
                tracing::info!(status, validation_error = %msg, "Request validation failed");
            }
            CertError::InvalidDate { field, value } => {
                tracing::info!(status, field = %field, value = %value, "Invalid date");
            }
            CertError::Unauthorized(msg) => {
                tracing::info!(status, reason = %msg, "Unauthorized request");
            }
            CertError::Persistence(db_err) => {
                tracing::error!(status, error = %db_err, "Persistence operation failed");
            }
            CertError::QrCode(msg) => {
                tracing::error!(status, qr_error = %msg, "QR code generation failed");
            }
            CertError::Io(io_err) => {
                tracing::error!(status, io_error = %io_err, "IO operation failed");
            }
            CertError::Serialization(json_err) => {
                tracing::error!(
                    status,
                    serialization_error = %json_err,
                    "JSON serialization failed"
                );
            }
            CertError::Internal(internal_err) => {
                tracing::error!(status, internal_error = ?internal_err, "Internal server error");
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CertError>;

// ============ Axum HTTP 响应支持 ============

#[cfg(feature = "server")]
mod axum_impl {
    use super::*;
    use axum::{
        Json,
        response::{IntoResponse, Response},
    };
    use serde_json::json;

    impl IntoResponse for CertError {
        fn into_response(self) -> Response {
            self.log();
            let status = self.axum_status_code();
            let body = Json(json!({"error": self.public_message()}));
            (status, body).into_response()
        }
    }
}

// ============ 事务错误支持 ============

impl<T> From<sea_orm::TransactionError<T>> for CertError
where
    T: Into<CertError>,
{
    fn from(err: sea_orm::TransactionError<T>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(db) => Self::Persistence(db),
            sea_orm::TransactionError::Transaction(app) => app.into(),
        }
    }
}
