//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块对缓存和关系库的点查延迟进行顺序批量计时。

use crate::cache::CacheWriter;
use crate::error::Result;
use crate::serialization::Serializer;
use crate::source::SourceStore;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// 一批查询的计时结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTiming {
    /// 整批查询的墙钟耗时
    pub elapsed: Duration,
    /// 实际完成的查询次数（含解码失败的查询）
    pub lookups: usize,
    /// 解码失败的ID及原因
    pub decode_failures: Vec<(i32, String)>,
}

impl LookupTiming {
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// 对缓存顺序执行每个ID一次查询，返回整批耗时
///
/// 解码失败按ID记录并继续；ID不存在视为基准测试准备错误，立即返回。
#[instrument(skip(writer, ids), level = "info", fields(count = ids.len()))]
pub async fn time_cache_lookups<S: Serializer>(
    writer: &CacheWriter<S>,
    ids: &[i32],
) -> Result<LookupTiming> {
    let mut timing = LookupTiming::default();

    let start = Instant::now();
    for &id in ids {
        match writer.get(id).await {
            Ok(_) => {}
            Err(e) if e.is_recoverable() => {
                warn!("Cached value for city {} could not be decoded: {}", id, e);
                timing.decode_failures.push((id, e.to_string()));
            }
            Err(e) => return Err(e),
        }
        timing.lookups += 1;
    }
    timing.elapsed = start.elapsed();

    info!(
        "Cache lookups: {} in {:?} ({} undecodable)",
        timing.lookups,
        timing.elapsed,
        timing.decode_failures.len()
    );
    Ok(timing)
}

/// 对关系库顺序执行每个ID一次查询，返回整批耗时
///
/// 每次调用开启一个新的读事务，查询结束后关闭，计时不含事务的开启和提交。
#[instrument(skip(source, ids), level = "info", fields(count = ids.len()))]
pub async fn time_source_lookups(source: &dyn SourceStore, ids: &[i32]) -> Result<LookupTiming> {
    let session = source.begin_read().await?;
    let mut timing = LookupTiming::default();

    let start = Instant::now();
    for &id in ids {
        session.fetch_by_id(id).await?;
        timing.lookups += 1;
    }
    timing.elapsed = start.elapsed();

    session.close().await?;

    info!(
        "Source lookups: {} in {:?}",
        timing.lookups, timing.elapsed
    );
    Ok(timing)
}

/// 从已知存在的ID中随机抽取至多 `count` 个，不重复
pub fn sample_ids<R: Rng + ?Sized>(known: &[i32], count: usize, rng: &mut R) -> Vec<i32> {
    known.choose_multiple(rng, count).copied().collect()
}
