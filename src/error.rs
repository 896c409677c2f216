//! Application error types

use serde::Serialize;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("日期无效: {0}")]
    InvalidDate(String),

    #[error("八字计算失败: {0}")]
    Conversion(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("API错误 {status}: {body}")]
    Gateway { status: u16, body: String },

    #[error("模型未返回内容")]
    EmptyResponse,

    #[error("模型返回内容无法解析: {0}")]
    MalformedPayload(String),

    #[error("批次 {start_age}-{end_age} 返回格式错误")]
    BatchShape { start_age: u32, end_age: u32 },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Serializable error response for the rendering layer
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        let code = match &err {
            AppError::InvalidDate(_) => "INVALID_DATE",
            AppError::Conversion(_) => "CONVERSION_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Gateway { .. } => "GATEWAY_ERROR",
            AppError::EmptyResponse => "EMPTY_RESPONSE",
            AppError::MalformedPayload(_) => "MALFORMED_PAYLOAD",
            AppError::BatchShape { .. } => "BATCH_SHAPE_ERROR",
            AppError::Http(_) => "HTTP_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
        };

        ErrorResponse {
            code: code.to_string(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
