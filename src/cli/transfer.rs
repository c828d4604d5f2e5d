//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了全量迁移命令的实现。

use crate::cache::RedisConnector;
use crate::cli::TransferArgs;
use crate::config::Config;
use crate::pipeline::{BenchIds, Pipeline, PipelineOptions, PipelineReport};
use crate::source::SeaOrmSource;
use anyhow::Result;
use std::sync::Arc;

pub async fn execute(args: &TransferArgs, config: &mut Config) -> Result<()> {
    configure(args, config)?;

    let source = SeaOrmSource::connect(&config.source).await?;
    let connector = RedisConnector::new(&config.cache)?;

    let mut options = PipelineOptions::from_config(config);
    if args.skip_bench {
        options.bench_ids = BenchIds::Skip;
    }

    let pipeline = Pipeline::new(Arc::new(source), Arc::new(connector), options);
    let report = pipeline.run().await?;
    print_report(&report);
    Ok(())
}

/// 应用命令行覆盖项并验证本命令用到的配置段
fn configure(args: &TransferArgs, config: &mut Config) -> crate::error::Result<()> {
    if let Some(page_size) = args.page_size {
        config.pipeline.page_size = page_size;
    }
    args.ids.apply(config);

    config.validate_source()?;
    config.validate_cache()?;
    config.validate_pipeline()?;
    if !args.skip_bench {
        config.validate_bench()?;
    }
    Ok(())
}

fn print_report(report: &PipelineReport) {
    let transfer = &report.transfer;
    println!("=== Transfer ===\n");
    println!("Cities read:     {}", transfer.cities_read);
    println!("Records written: {}", transfer.written);
    println!("Records skipped: {}", transfer.skipped.len());
    for (id, reason) in &transfer.skipped {
        println!("  - city {}: {}", id, reason);
    }

    if let Some(bench) = &report.bench {
        println!("\n=== Lookup latency ({} ids) ===\n", bench.cache.lookups);
        println!("{}", bench);
        if !bench.cache.decode_failures.is_empty() {
            println!(
                "Undecodable cache entries: {}",
                bench.cache.decode_failures.len()
            );
        }
    }
}
