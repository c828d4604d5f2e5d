//! citycache - 关系库到缓存的一次性全量迁移工具
//!
//! 将 world 库中的城市、国家和语言分页读出，扁平化为每个城市一条的
//! JSON 记录写入 Redis，然后对比 Redis 与关系库的点查延迟。

#![doc(html_root_url = "https://docs.rs/citycache/0.1.0")]

pub mod bench;
pub mod cache;
pub mod cli;
pub mod config;
pub mod denormalize;
pub mod domain;
pub mod error;
pub mod pipeline;
pub mod serialization;
pub mod source;
pub mod telemetry;
pub mod utils;

// Re-export commonly used items
pub use cache::{CacheConnector, CacheWriter, KeyValueStore};
pub use config::Config;
pub use denormalize::flatten;
pub use domain::{CacheRecord, City, Continent, Country, CountryLanguage, Language};
pub use error::{Result, TransferError};
pub use pipeline::{Pipeline, PipelineError, PipelineOptions, PipelineReport};
pub use source::{ReadSession, SourceStore};

/// citycache 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
