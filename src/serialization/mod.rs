//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存值的文本编码机制。

pub mod json;

use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};

pub use json::JsonSerializer;

/// 序列化器特征
///
/// 定义缓存值的编码和解码接口。编码结果为文本，
/// 失败分别映射为 `Encode` 和 `Decode` 错误。
pub trait Serializer: Send + Sync {
    /// 序列化值为文本
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String>;

    /// 从文本反序列化值
    fn deserialize<T: DeserializeOwned>(&self, data: &str) -> Result<T>;
}
