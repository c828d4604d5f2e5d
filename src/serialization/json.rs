//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了JSON序列化器的实现。

use super::Serializer;
use crate::error::{Result, TransferError};
use serde::{de::DeserializeOwned, Serialize};

/// JSON序列化器
///
/// 实现基于serde_json的序列化和反序列化
#[derive(Clone, Debug, Default)]
pub struct JsonSerializer {
    /// 是否输出带缩进的JSON
    pretty: bool,
}

impl JsonSerializer {
    /// 创建新的JSON序列化器
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// 创建输出带缩进JSON的序列化器，用于命令行展示
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Serializer for JsonSerializer {
    /// 序列化值为JSON文本
    ///
    /// # 参数
    ///
    /// * `value` - 要序列化的值
    ///
    /// # 返回值
    ///
    /// 返回JSON文本或 `Encode` 错误
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        encoded.map_err(|e| TransferError::Encode(e.to_string()))
    }

    /// 从JSON文本反序列化值
    ///
    /// # 参数
    ///
    /// * `data` - JSON文本
    ///
    /// # 返回值
    ///
    /// 返回反序列化后的值或 `Decode` 错误
    fn deserialize<T: DeserializeOwned>(&self, data: &str) -> Result<T> {
        serde_json::from_str(data).map_err(|e| TransferError::Decode(e.to_string()))
    }
}
