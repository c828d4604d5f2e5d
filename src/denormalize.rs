//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块将城市→国家→语言聚合扁平化为缓存记录。

use crate::domain::{CacheRecord, City, Language};

/// 将城市聚合扁平化为缓存记录
///
/// 纯函数：不做IO，不修改输入，相同输入产生相同输出。
/// 同一国家内重名且属性相同的语言会被集合语义合并。
pub fn flatten(city: &City) -> CacheRecord {
    let country = &city.country;

    CacheRecord {
        id: city.id,
        name: city.name.clone(),
        district: city.district.clone(),
        population: city.population,
        country_code: country.code.clone(),
        alternative_country_code: country.alternative_code.clone(),
        country_name: country.name.clone(),
        continent: country.continent,
        country_region: country.region.clone(),
        country_surface_area: country.surface_area,
        country_population: country.population,
        languages: country
            .languages
            .iter()
            .map(|cl| Language {
                language: cl.language.clone(),
                official: cl.official,
                percentage: cl.percentage,
            })
            .collect(),
    }
}

/// 批量扁平化，返回 `(城市ID, 记录)` 列表，顺序与输入一致
pub fn flatten_all(cities: &[City]) -> Vec<(i32, CacheRecord)> {
    cities.iter().map(|city| (city.id, flatten(city))).collect()
}
