//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了键值缓存的访问接口、Redis实现以及缓存记录写入器。

pub mod redis_store;
pub mod writer;

use crate::error::Result;
use async_trait::async_trait;

pub use redis_store::{RedisConnector, RedisStore};
pub use writer::{CacheWriter, WriteReport};

/// 键值存储连接
///
/// 仅使用字符串键的 GET / SET，不使用 TTL、事务等其他特性
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// 读取键对应的值，键不存在时返回 `None`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// 写入（创建或覆盖）键
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// 键值存储连接工厂
///
/// 每批操作获取一个连接，连接随返回值的生命周期结束而释放
#[async_trait]
pub trait CacheConnector: Send + Sync {
    /// 获取一个新连接
    async fn connect(&self) -> Result<Box<dyn KeyValueStore>>;
}
