//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了大洲枚举及其序号编码。

use serde::{Deserialize, Serialize};

/// 大洲
///
/// 关系库中以序号（0..=6）存储，序号属于外部存储契约，
/// 变体顺序不可调整。缓存 JSON 中以 `NORTH_AMERICA` 这样的名称写出。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Continent {
    Asia,
    Europe,
    NorthAmerica,
    Africa,
    Oceania,
    Antarctica,
    SouthAmerica,
}

impl Continent {
    /// 按存储序号排列的全部变体
    pub const ALL: [Continent; 7] = [
        Continent::Asia,
        Continent::Europe,
        Continent::NorthAmerica,
        Continent::Africa,
        Continent::Oceania,
        Continent::Antarctica,
        Continent::SouthAmerica,
    ];

    /// 从存储序号解析
    pub fn from_ordinal(ordinal: i32) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    /// 存储序号
    pub fn ordinal(self) -> i32 {
        match self {
            Continent::Asia => 0,
            Continent::Europe => 1,
            Continent::NorthAmerica => 2,
            Continent::Africa => 3,
            Continent::Oceania => 4,
            Continent::Antarctica => 5,
            Continent::SouthAmerica => 6,
        }
    }
}
