//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了延迟对比命令的实现，要求缓存已加载。

use crate::bench::sample_ids;
use crate::cache::RedisConnector;
use crate::cli::BenchArgs;
use crate::config::Config;
use crate::pipeline::{Pipeline, PipelineOptions};
use crate::source::SeaOrmSource;
use anyhow::Result;
use std::sync::Arc;

pub async fn execute(args: &BenchArgs, config: &mut Config) -> Result<()> {
    args.ids.apply(config);
    config.validate_source()?;
    config.validate_cache()?;
    config.validate_bench()?;
    if config.bench.sample_size > 0 {
        // 抽样时需要分页读取全部城市ID
        config.validate_pipeline()?;
    }

    let source = SeaOrmSource::connect(&config.source).await?;
    let connector = RedisConnector::new(&config.cache)?;
    let pipeline = Pipeline::new(
        Arc::new(source),
        Arc::new(connector),
        PipelineOptions::from_config(config),
    );

    let ids = if config.bench.sample_size > 0 {
        let known: Vec<i32> = pipeline.read_all().await?.iter().map(|c| c.id).collect();
        sample_ids(&known, config.bench.sample_size, &mut rand::thread_rng())
    } else {
        config.bench.ids.clone()
    };

    let report = pipeline.benchmark(&ids).await?;
    println!("=== Lookup latency ({} ids) ===\n", ids.len());
    println!("{}", report);
    if !report.cache.decode_failures.is_empty() {
        println!(
            "Undecodable cache entries: {}",
            report.cache.decode_failures.len()
        );
        for (id, reason) in &report.cache.decode_failures {
            println!("  - city {}: {}", id, reason);
        }
    }
    Ok(())
}
