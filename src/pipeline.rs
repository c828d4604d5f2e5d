//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块按顺序编排迁移流水线：全量读取 → 扁平化 → 写入缓存 → 延迟对比。
//!
//! 任一阶段出现致命错误都会立即中止，并在错误中标明失败的阶段。

use crate::bench::{sample_ids, time_cache_lookups, time_source_lookups, LookupTiming};
use crate::cache::{CacheConnector, CacheWriter};
use crate::config::{Config, DEFAULT_PAGE_SIZE};
use crate::denormalize::flatten_all;
use crate::domain::City;
use crate::error::TransferError;
use crate::source::{fetch_all, SourceStore};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};

/// 流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Read,
    Write,
    BenchCache,
    BenchSource,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Read => "read",
            Stage::Write => "write",
            Stage::BenchCache => "bench-cache",
            Stage::BenchSource => "bench-source",
        };
        f.write_str(name)
    }
}

/// 带阶段信息的流水线错误
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    pub source: TransferError,
}

impl PipelineError {
    fn at(stage: Stage) -> impl FnOnce(TransferError) -> Self {
        move |source| Self { stage, source }
    }
}

/// 基准测试ID的选取方式
#[derive(Debug, Clone, PartialEq)]
pub enum BenchIds {
    /// 固定ID列表
    Fixed(Vec<i32>),
    /// 从本次迁移的城市中随机抽取
    Sample(usize),
    /// 不执行基准测试
    Skip,
}

/// 流水线选项
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub page_size: u64,
    pub key_prefix: String,
    pub bench_ids: BenchIds,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            key_prefix: String::new(),
            bench_ids: BenchIds::Skip,
        }
    }
}

impl PipelineOptions {
    /// 从配置构造选项，`sample_size` 大于0时优先于固定ID
    pub fn from_config(config: &Config) -> Self {
        let bench_ids = if config.bench.sample_size > 0 {
            BenchIds::Sample(config.bench.sample_size)
        } else {
            BenchIds::Fixed(config.bench.ids.clone())
        };
        Self {
            page_size: config.pipeline.page_size,
            key_prefix: config.cache.key_prefix.clone(),
            bench_ids,
        }
    }
}

/// 迁移阶段的结果
#[derive(Debug, Clone, Default)]
pub struct TransferSummary {
    /// 读取的城市数
    pub cities_read: usize,
    /// 写入的记录数
    pub written: usize,
    /// 编码失败被跳过的记录
    pub skipped: Vec<(i32, String)>,
    /// 成功写入缓存的城市ID
    pub written_ids: Vec<i32>,
}

/// 延迟对比结果
#[derive(Debug, Clone, Default)]
pub struct BenchReport {
    pub cache: LookupTiming,
    pub source: LookupTiming,
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Redis:\t{} ms", self.cache.elapsed_ms())?;
        write!(f, "Database:\t{} ms", self.source.elapsed_ms())
    }
}

/// 整次运行的结果
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub transfer: TransferSummary,
    /// 跳过基准测试时为 `None`
    pub bench: Option<BenchReport>,
}

/// 迁移流水线
///
/// 数据源和缓存连接工厂在构造时注入，连接按批次获取和释放
pub struct Pipeline {
    source: Arc<dyn SourceStore>,
    cache: Arc<dyn CacheConnector>,
    options: PipelineOptions,
}

impl Pipeline {
    /// 创建流水线
    pub fn new(
        source: Arc<dyn SourceStore>,
        cache: Arc<dyn CacheConnector>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            source,
            cache,
            options,
        }
    }

    /// 执行完整流水线
    #[instrument(skip(self), level = "info", name = "pipeline_run")]
    pub async fn run(&self) -> Result<PipelineReport, PipelineError> {
        let transfer = self.transfer().await?;

        let ids = match &self.options.bench_ids {
            BenchIds::Fixed(ids) => ids.clone(),
            BenchIds::Sample(count) => {
                sample_ids(&transfer.written_ids, *count, &mut rand::thread_rng())
            }
            BenchIds::Skip => {
                info!("Benchmark skipped");
                return Ok(PipelineReport {
                    transfer,
                    bench: None,
                });
            }
        };

        let bench = self.benchmark(&ids).await?;
        Ok(PipelineReport {
            transfer,
            bench: Some(bench),
        })
    }

    /// 读取、扁平化并写入全部城市
    ///
    /// 读事务在写入开始前关闭
    #[instrument(skip(self), level = "info")]
    pub async fn transfer(&self) -> Result<TransferSummary, PipelineError> {
        let cities = self.read_all().await?;
        let cities_read = cities.len();

        let records = flatten_all(&cities);
        drop(cities);
        info!("Flattened {} records", records.len());

        let report = {
            let store = self
                .cache
                .connect()
                .await
                .map_err(PipelineError::at(Stage::Write))?;
            let writer = CacheWriter::new(store).with_key_prefix(self.options.key_prefix.clone());
            writer
                .put_all(&records)
                .await
                .map_err(PipelineError::at(Stage::Write))?
        };

        let skipped: HashSet<i32> = report.skipped.iter().map(|(id, _)| *id).collect();
        let written_ids = records
            .iter()
            .map(|(id, _)| *id)
            .filter(|id| !skipped.contains(id))
            .collect();

        Ok(TransferSummary {
            cities_read,
            written: report.written,
            skipped: report.skipped,
            written_ids,
        })
    }

    /// 在一个读事务内分页读取全部城市，读取完成后关闭事务
    pub async fn read_all(&self) -> Result<Vec<City>, PipelineError> {
        let session = self
            .source
            .begin_read()
            .await
            .map_err(PipelineError::at(Stage::Read))?;
        let cities = fetch_all(session.as_ref(), self.options.page_size)
            .await
            .map_err(PipelineError::at(Stage::Read))?;
        session
            .close()
            .await
            .map_err(PipelineError::at(Stage::Read))?;

        info!("Read {} cities from source", cities.len());
        Ok(cities)
    }

    /// 对同一组ID分别计时缓存和关系库的点查
    #[instrument(skip(self, ids), level = "info", fields(count = ids.len()))]
    pub async fn benchmark(&self, ids: &[i32]) -> Result<BenchReport, PipelineError> {
        let cache = {
            let store = self
                .cache
                .connect()
                .await
                .map_err(PipelineError::at(Stage::BenchCache))?;
            let writer = CacheWriter::new(store).with_key_prefix(self.options.key_prefix.clone());
            time_cache_lookups(&writer, ids)
                .await
                .map_err(PipelineError::at(Stage::BenchCache))?
        };

        let source = time_source_lookups(self.source.as_ref(), ids)
            .await
            .map_err(PipelineError::at(Stage::BenchSource))?;

        Ok(BenchReport { cache, source })
    }
}
