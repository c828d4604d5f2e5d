//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了关系型数据源的读取接口和分页全量读取逻辑。

pub mod relational;

use crate::domain::City;
use crate::error::{Result, TransferError};
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

pub use relational::{SeaOrmSession, SeaOrmSource};

/// 关系型数据源
///
/// 每次调用 `begin_read` 开启一个新的读事务
#[async_trait]
pub trait SourceStore: Send + Sync {
    /// 开启读事务
    async fn begin_read(&self) -> Result<Box<dyn ReadSession>>;
}

/// 读事务会话
///
/// 会话内的计数和分页结果相互一致。返回的城市均已加载国家和语言。
/// 未调用 `close` 就被丢弃的会话会回滚。
#[async_trait]
pub trait ReadSession: Send + Sync {
    /// 城市总行数
    async fn count_total(&self) -> Result<u64>;

    /// 按城市ID顺序读取从 `offset` 开始的至多 `limit` 个城市
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Vec<City>>;

    /// 按ID读取单个城市，不存在时返回 `NotFound`
    async fn fetch_by_id(&self, id: i32) -> Result<City>;

    /// 结束事务
    async fn close(self: Box<Self>) -> Result<()>;
}

/// 在一个会话内分页读取全部城市
///
/// 先读取一次总数，再以固定页大小顺序翻页，直到偏移量不小于总数。
/// 读到的城市数与总数不一致时返回 `SourceUnavailable`。
///
/// # 参数
///
/// * `session` - 读事务会话
/// * `page_size` - 每页大小，必须大于0
///
/// # 返回值
///
/// 返回按页顺序拼接的全部城市
#[instrument(skip(session), level = "info")]
pub async fn fetch_all(session: &dyn ReadSession, page_size: u64) -> Result<Vec<City>> {
    if page_size == 0 {
        return Err(TransferError::Configuration(
            "page_size must be greater than zero".to_string(),
        ));
    }

    let total = session.count_total().await?;
    info!("Reading {} cities with page size {}", total, page_size);

    let mut cities = Vec::with_capacity(usize::try_from(total).unwrap_or_default());
    let mut offset = 0u64;
    while offset < total {
        let page = session.fetch_page(offset, page_size).await?;
        debug!("Fetched page at offset {}: {} cities", offset, page.len());
        if page.is_empty() {
            warn!(
                "Source returned an empty page at offset {} of {}, stopping early",
                offset, total
            );
            break;
        }
        cities.extend(page);
        offset += page_size;
    }

    if cities.len() as u64 != total {
        return Err(TransferError::SourceUnavailable(format!(
            "expected {} cities, read {}",
            total,
            cities.len()
        )));
    }

    Ok(cities)
}
