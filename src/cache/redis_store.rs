//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了基于Redis的键值存储连接和连接工厂。

use super::{CacheConnector, KeyValueStore};
use crate::config::CacheConfig;
use crate::error::{Result, TransferError};
use crate::utils::redaction::redact_connection_string;
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, IntoConnectionInfo};
use secrecy::ExposeSecret;
use std::future::Future;
use tokio::time::{timeout, Duration};
use tracing::{debug, instrument};

/// Redis连接工厂
///
/// 持有客户端配置，`connect` 时才建立网络连接
#[derive(Clone)]
pub struct RedisConnector {
    client: Client,
    target: String,
    connection_timeout_ms: u64,
    command_timeout_ms: u64,
}

impl std::fmt::Debug for RedisConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConnector")
            .field("target", &self.target)
            .field("connection_timeout_ms", &self.connection_timeout_ms)
            .field("command_timeout_ms", &self.command_timeout_ms)
            .finish()
    }
}

impl RedisConnector {
    /// 根据配置创建连接工厂
    ///
    /// # 参数
    ///
    /// * `config` - 缓存配置
    ///
    /// # 返回值
    ///
    /// 返回连接工厂，连接字符串非法时返回 `Configuration` 错误
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let raw = config.connection_string.expose_secret();
        let connection_string = if config.enable_tls && !raw.starts_with("rediss://") {
            raw.replace("redis://", "rediss://")
        } else {
            raw.to_string()
        };
        let target = redact_connection_string(&connection_string);

        let mut info = connection_string.as_str().into_connection_info().map_err(|e| {
            TransferError::Configuration(format!("Invalid cache connection string {}: {}", target, e))
        })?;
        if let Some(password) = &config.password {
            info.redis.password = Some(password.expose_secret().to_string());
        }

        let client = Client::open(info).map_err(|e| {
            TransferError::Configuration(format!("Failed to create Redis client: {}", e))
        })?;

        Ok(Self {
            client,
            target,
            connection_timeout_ms: config.connection_timeout_ms,
            command_timeout_ms: config.command_timeout_ms,
        })
    }
}

#[async_trait]
impl CacheConnector for RedisConnector {
    #[instrument(skip(self), level = "debug", fields(target = %self.target))]
    async fn connect(&self) -> Result<Box<dyn KeyValueStore>> {
        let manager = match timeout(
            Duration::from_millis(self.connection_timeout_ms),
            self.client.get_connection_manager(),
        )
        .await
        {
            Ok(res) => res?,
            Err(_) => {
                return Err(TransferError::CacheUnavailable(format!(
                    "Connection timed out after {}ms. Target: {}",
                    self.connection_timeout_ms, self.target
                )));
            }
        };

        let store = RedisStore {
            manager,
            command_timeout: Duration::from_millis(self.command_timeout_ms),
        };
        store.ping().await?;
        debug!("Connected to Redis");
        Ok(Box::new(store))
    }
}

/// Redis连接
///
/// 丢弃时关闭底层连接
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
    command_timeout: Duration,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("command_timeout", &self.command_timeout)
            .finish()
    }
}

impl RedisStore {
    /// 检查连接是否可用
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.manager.clone();
        let response: String = self
            .with_timeout("PING", async move {
                redis::cmd("PING").query_async::<String>(&mut conn).await
            })
            .await?;
        debug!("Redis PING response: {}", response);
        Ok(())
    }

    async fn with_timeout<T, F>(&self, command: &str, fut: F) -> Result<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match timeout(self.command_timeout, fut).await {
            Ok(res) => Ok(res?),
            Err(_) => Err(TransferError::CacheUnavailable(format!(
                "{} timed out after {}ms",
                command,
                self.command_timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        self.with_timeout("GET", async move { conn.get::<_, Option<String>>(key).await })
            .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        self.with_timeout("SET", async move { conn.set::<_, _, ()>(key, value).await })
            .await
    }
}
