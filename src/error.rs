//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了数据迁移流水线的错误类型和分类。

use thiserror::Error;

/// 迁移流水线错误类型枚举
///
/// 致命错误（源库、缓存不可用）会中止整个流程；
/// 编码和解码错误只影响单条记录，由调用方计数后继续。
#[derive(Error, Debug)]
pub enum TransferError {
    /// 关系型数据库连接或查询失败
    #[error("Source store unavailable: {0}")]
    SourceUnavailable(String),

    /// 键值缓存连接或命令失败
    #[error("Cache store unavailable: {0}")]
    CacheUnavailable(String),

    /// 单条记录序列化失败
    #[error("Encode error: {0}")]
    Encode(String),

    /// 缓存中的值无法反序列化
    #[error("Decode error: {0}")]
    Decode(String),

    /// 请求的行或键不存在
    #[error("Not found: {0}")]
    NotFound(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransferError {
    /// 是否为可恢复错误（只影响单条记录，不应中止批处理）
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TransferError::Encode(_) | TransferError::Decode(_))
    }

    /// 是否为“不存在”类结果
    pub fn is_not_found(&self) -> bool {
        matches!(self, TransferError::NotFound(_))
    }
}

impl From<sea_orm::DbErr> for TransferError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::RecordNotFound(what) => TransferError::NotFound(what),
            other => TransferError::SourceUnavailable(other.to_string()),
        }
    }
}

impl From<redis::RedisError> for TransferError {
    fn from(err: redis::RedisError) -> Self {
        TransferError::CacheUnavailable(err.to_string())
    }
}

/// 迁移操作结果类型别名
pub type Result<T> = std::result::Result<T, TransferError>;
