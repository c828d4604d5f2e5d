//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存记录写入器，负责记录的编码、写入和读取。

use super::KeyValueStore;
use crate::domain::CacheRecord;
use crate::error::{Result, TransferError};
use crate::serialization::{JsonSerializer, Serializer};
use tracing::{debug, info, instrument, warn};

/// 批量写入结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteReport {
    /// 成功写入的记录数
    pub written: usize,
    /// 因编码失败被跳过的记录：`(城市ID, 原因)`
    pub skipped: Vec<(i32, String)>,
}

impl WriteReport {
    /// 被跳过的记录数
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// 缓存写入器
///
/// 持有一个键值连接，写入器被丢弃时连接随之释放。
/// 键为城市ID的十进制字符串（可带前缀），值为记录的JSON文本，
/// 不设置TTL，同一键后写覆盖先写。
pub struct CacheWriter<S: Serializer = JsonSerializer> {
    store: Box<dyn KeyValueStore>,
    serializer: S,
    key_prefix: String,
}

impl CacheWriter<JsonSerializer> {
    /// 使用JSON序列化器创建写入器
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_serializer(store, JsonSerializer::new())
    }
}

impl<S: Serializer> CacheWriter<S> {
    /// 使用指定的序列化器创建写入器
    pub fn with_serializer(store: Box<dyn KeyValueStore>, serializer: S) -> Self {
        Self {
            store,
            serializer,
            key_prefix: String::new(),
        }
    }

    /// 设置键前缀
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// 城市ID对应的缓存键
    pub fn key_for(&self, id: i32) -> String {
        format!("{}{}", self.key_prefix, id)
    }

    /// 编码并写入一条记录
    ///
    /// # 参数
    ///
    /// * `id` - 城市ID
    /// * `record` - 缓存记录
    ///
    /// # 返回值
    ///
    /// 编码失败返回 `Encode`，存储失败返回 `CacheUnavailable`
    pub async fn put(&self, id: i32, record: &CacheRecord) -> Result<()> {
        let value = self.serializer.serialize(record)?;
        self.store.set(&self.key_for(id), &value).await
    }

    /// 批量写入
    ///
    /// 单条记录编码失败时记录日志并跳过，不影响其余记录；
    /// 存储不可用时立即返回错误。
    #[instrument(skip(self, records), level = "info", fields(count = records.len()))]
    pub async fn put_all(&self, records: &[(i32, CacheRecord)]) -> Result<WriteReport> {
        let mut report = WriteReport::default();

        for (id, record) in records {
            match self.put(*id, record).await {
                Ok(()) => report.written += 1,
                Err(e) if e.is_recoverable() => {
                    warn!("Skipping city {}: {}", id, e);
                    report.skipped.push((*id, e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Wrote {} records, skipped {}",
            report.written,
            report.skipped_count()
        );
        Ok(report)
    }

    /// 读取并解码一条记录
    ///
    /// # 返回值
    ///
    /// 键不存在返回 `NotFound`，值无法解码返回 `Decode`
    pub async fn get(&self, id: i32) -> Result<CacheRecord> {
        let key = self.key_for(id);
        let value = self
            .store
            .get(&key)
            .await?
            .ok_or_else(|| TransferError::NotFound(format!("cache key {}", key)))?;
        debug!("Fetched {} bytes for key {}", value.len(), key);
        self.serializer.deserialize(&value)
    }
}
