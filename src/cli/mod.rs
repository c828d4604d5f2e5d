//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了CLI命令行接口。

use crate::config::Config;
use crate::telemetry;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// 未指定 `--config` 时在当前目录查找的配置文件
pub const DEFAULT_CONFIG_FILE: &str = "citycache.toml";

#[derive(Parser, Debug)]
#[command(name = "citycache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    #[arg(short, long, global = true, help = "Path to the TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Log filter directives, overrides RUST_LOG")]
    pub log: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(name = "transfer", about = "Copy all cities into the cache, then compare lookup latency")]
    Transfer(TransferArgs),

    #[command(name = "bench", about = "Compare lookup latency of an already loaded cache")]
    Bench(BenchArgs),

    #[command(name = "get", about = "Print one cached city record")]
    Get(GetArgs),
}

#[derive(Parser, Debug)]
pub struct TransferArgs {
    #[arg(long, help = "Cities fetched per page")]
    pub page_size: Option<u64>,

    #[command(flatten)]
    pub ids: IdArgs,

    #[arg(long, help = "Only transfer, do not run the latency comparison")]
    pub skip_bench: bool,
}

#[derive(Parser, Debug)]
pub struct BenchArgs {
    #[command(flatten)]
    pub ids: IdArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct IdArgs {
    #[arg(long, value_delimiter = ',', help = "City ids to look up, comma separated")]
    pub ids: Option<Vec<i32>>,

    #[arg(long, conflicts_with = "ids", help = "Look up this many random transferred ids")]
    pub sample: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct GetArgs {
    #[arg(long, help = "City id")]
    pub id: i32,
}

mod bench;
mod get;
mod transfer;

/// 加载配置
///
/// 指定路径时读取该文件；否则读取当前目录下的 [`DEFAULT_CONFIG_FILE`]，
/// 不存在时使用默认配置。取值验证由各命令在应用命令行覆盖项之后进行。
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => Config::from_file(DEFAULT_CONFIG_FILE)
            .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_FILE)),
        None => Ok(Config::default()),
    }
}

impl IdArgs {
    /// 将命令行中的ID选项应用到配置上
    pub fn apply(&self, config: &mut Config) {
        if let Some(ids) = &self.ids {
            config.bench.ids = ids.clone();
            config.bench.sample_size = 0;
        }
        if let Some(sample) = self.sample {
            config.bench.sample_size = sample;
        }
    }
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing("citycache", cli.common.log.as_deref());

    let mut config = load_config(cli.common.config.as_deref())?;

    let result = match &cli.command {
        Commands::Transfer(args) => transfer::execute(args, &mut config).await,
        Commands::Bench(args) => bench::execute(args, &mut config).await,
        Commands::Get(args) => get::execute(args, &config).await,
    };

    telemetry::shutdown_tracing();
    result
}
