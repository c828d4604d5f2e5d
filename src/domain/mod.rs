//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了关系库中的城市、国家、语言聚合以及缓存中的扁平记录。
//!
//! 聚合在离开读事务前已全部加载，不存在延迟加载的引用。

pub mod continent;
pub mod record;

use rust_decimal::Decimal;

pub use continent::Continent;
pub use record::{CacheRecord, Language};

/// 城市，持有其所属国家的完整快照
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    /// 主键
    pub id: i32,
    pub name: String,
    pub district: String,
    pub population: i32,
    /// 所属国家（一对一，始终已加载）
    pub country: Country,
}

/// 国家，持有其全部语言
#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    pub id: i32,
    /// ISO 3166-1 alpha-3 代码
    pub code: String,
    /// ISO 3166-1 alpha-2 代码（`code_2` 列）
    pub alternative_code: String,
    pub name: String,
    pub continent: Continent,
    pub region: String,
    pub surface_area: Decimal,
    pub population: i32,
    /// 零个或多个语言
    pub languages: Vec<CountryLanguage>,
}

/// 国家内使用的语言，不具备独立身份
#[derive(Debug, Clone, PartialEq)]
pub struct CountryLanguage {
    pub language: String,
    pub official: bool,
    /// 使用该语言的人口百分比
    pub percentage: Decimal,
}
