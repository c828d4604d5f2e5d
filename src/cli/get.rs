//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了读取单条缓存记录的命令。

use crate::cache::{CacheConnector, CacheWriter, RedisConnector};
use crate::cli::GetArgs;
use crate::config::Config;
use crate::error::TransferError;
use crate::serialization::{JsonSerializer, Serializer};
use anyhow::{bail, Result};

pub async fn execute(args: &GetArgs, config: &Config) -> Result<()> {
    // 只读缓存，不检查数据源和基准测试配置
    config.validate_cache()?;
    let connector = RedisConnector::new(&config.cache)?;
    let writer = CacheWriter::new(connector.connect().await?)
        .with_key_prefix(config.cache.key_prefix.clone());

    match writer.get(args.id).await {
        Ok(record) => {
            println!("{}", JsonSerializer::pretty().serialize(&record)?);
            Ok(())
        }
        Err(TransferError::NotFound(_)) => {
            bail!("No cached record for city {}", args.id)
        }
        Err(TransferError::Decode(reason)) => {
            bail!("Cached record for city {} is malformed: {}", args.id, reason)
        }
        Err(e) => Err(e.into()),
    }
}
