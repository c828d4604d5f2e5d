//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块基于 Sea-ORM 实现关系型数据源，支持 MySQL、PostgreSQL 和 SQLite。

use super::{ReadSession, SourceStore};
use crate::config::SourceConfig;
use crate::domain::{City, Continent, Country, CountryLanguage};
use crate::error::{Result, TransferError};
use crate::utils::redaction::redact_connection_string;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection,
    DatabaseTransaction, QueryResult, Statement, TransactionTrait, Value,
};
use secrecy::ExposeSecret;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

const CITY_WITH_COUNTRY: &str = "SELECT c.id AS city_id, c.name AS city_name, \
     c.district AS district, c.population AS city_population, \
     co.id AS country_id, co.code AS code, co.code_2 AS code_2, co.name AS country_name, \
     co.continent AS continent, co.region AS region, co.surface_area AS surface_area, \
     co.population AS country_population \
     FROM city c INNER JOIN country co ON co.id = c.country_id";

/// Sea-ORM 数据源
///
/// 持有连接池，每个读会话从池中占用一个连接直到会话结束
#[derive(Clone)]
pub struct SeaOrmSource {
    connection: Arc<DatabaseConnection>,
}

impl std::fmt::Debug for SeaOrmSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeaOrmSource")
            .field("backend", &self.connection.get_database_backend())
            .finish()
    }
}

impl SeaOrmSource {
    /// 按配置建立连接池
    #[instrument(skip(config), level = "info", name = "connect_source")]
    pub async fn connect(config: &SourceConfig) -> Result<Self> {
        let url = config.connection_string.expose_secret();

        let mut opt = ConnectOptions::new(url.to_string());
        opt.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .sqlx_logging(config.sqlx_logging);

        let connection = Database::connect(opt).await.map_err(|e| {
            TransferError::SourceUnavailable(format!(
                "Failed to connect to {}: {}",
                redact_connection_string(url),
                e
            ))
        })?;

        info!(
            "Connected to source database {}",
            redact_connection_string(url)
        );
        Ok(Self::from_connection(connection))
    }

    /// 使用已有连接创建数据源
    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self {
            connection: Arc::new(connection),
        }
    }

    /// 底层连接
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}

#[async_trait]
impl SourceStore for SeaOrmSource {
    async fn begin_read(&self) -> Result<Box<dyn ReadSession>> {
        let txn = self.connection.begin().await?;
        debug!("Opened read transaction");
        Ok(Box::new(SeaOrmSession { txn }))
    }
}

/// Sea-ORM 读事务会话
pub struct SeaOrmSession {
    txn: DatabaseTransaction,
}

impl SeaOrmSession {
    fn backend(&self) -> DatabaseBackend {
        self.txn.get_database_backend()
    }

    /// 为查询到的城市批量加载其国家的语言
    async fn attach_languages(&self, cities: &mut [City]) -> Result<()> {
        let country_ids: BTreeSet<i32> = cities.iter().map(|c| c.country.id).collect();
        if country_ids.is_empty() {
            return Ok(());
        }

        let backend = self.backend();
        let sql = format!(
            "SELECT cl.country_id AS country_id, cl.language AS language, \
             cl.is_official AS is_official, cl.percentage AS percentage \
             FROM country_language cl WHERE cl.country_id IN ({}) \
             ORDER BY cl.country_id, cl.language",
            placeholders(backend, country_ids.len())
        );
        let values: Vec<Value> = country_ids.iter().map(|id| Value::from(*id)).collect();
        let rows = self
            .txn
            .query_all(Statement::from_sql_and_values(backend, sql, values))
            .await?;

        let mut by_country: HashMap<i32, Vec<CountryLanguage>> = HashMap::new();
        for row in rows {
            let country_id: i32 = row.try_get("", "country_id")?;
            by_country
                .entry(country_id)
                .or_default()
                .push(map_language_row(&row)?);
        }

        for city in cities.iter_mut() {
            city.country.languages = by_country
                .get(&city.country.id)
                .cloned()
                .unwrap_or_default();
        }
        Ok(())
    }
}

#[async_trait]
impl ReadSession for SeaOrmSession {
    async fn count_total(&self) -> Result<u64> {
        let row = self
            .txn
            .query_one(Statement::from_string(
                self.backend(),
                "SELECT COUNT(*) AS total FROM city".to_string(),
            ))
            .await?
            .ok_or_else(|| {
                TransferError::SourceUnavailable("COUNT query returned no rows".to_string())
            })?;
        let total: i64 = row.try_get("", "total")?;
        u64::try_from(total)
            .map_err(|_| TransferError::SourceUnavailable(format!("Invalid city count {}", total)))
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Vec<City>> {
        let sql = format!(
            "{} ORDER BY c.id LIMIT {} OFFSET {}",
            CITY_WITH_COUNTRY, limit, offset
        );
        let rows = self
            .txn
            .query_all(Statement::from_string(self.backend(), sql))
            .await?;

        let mut cities = rows.iter().map(map_city_row).collect::<Result<Vec<_>>>()?;
        self.attach_languages(&mut cities).await?;
        Ok(cities)
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_by_id(&self, id: i32) -> Result<City> {
        let backend = self.backend();
        let sql = format!(
            "{} WHERE c.id = {}",
            CITY_WITH_COUNTRY,
            placeholders(backend, 1)
        );
        let row = self
            .txn
            .query_one(Statement::from_sql_and_values(
                backend,
                sql,
                [Value::from(id)],
            ))
            .await?
            .ok_or_else(|| TransferError::NotFound(format!("city {}", id)))?;

        let mut cities = vec![map_city_row(&row)?];
        self.attach_languages(&mut cities).await?;
        Ok(cities.remove(0))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.txn.commit().await?;
        debug!("Closed read transaction");
        Ok(())
    }
}

/// 生成与后端匹配的参数占位符列表
fn placeholders(backend: DatabaseBackend, count: usize) -> String {
    (1..=count)
        .map(|n| match backend {
            DatabaseBackend::Postgres => format!("${}", n),
            _ => "?".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn map_city_row(row: &QueryResult) -> Result<City> {
    let ordinal: i32 = row.try_get("", "continent")?;
    let country_id: i32 = row.try_get("", "country_id")?;
    // 源数据损坏，读取阶段无法跳过
    let continent = Continent::from_ordinal(ordinal).ok_or_else(|| {
        TransferError::SourceUnavailable(format!(
            "unknown continent ordinal {} for country {}",
            ordinal, country_id
        ))
    })?;

    Ok(City {
        id: row.try_get("", "city_id")?,
        name: row.try_get("", "city_name")?,
        district: row.try_get("", "district")?,
        population: row.try_get("", "city_population")?,
        country: Country {
            id: country_id,
            code: row.try_get("", "code")?,
            alternative_code: row.try_get("", "code_2")?,
            name: row.try_get("", "country_name")?,
            continent,
            region: row.try_get("", "region")?,
            surface_area: row.try_get::<Decimal>("", "surface_area")?,
            population: row.try_get("", "country_population")?,
            languages: Vec::new(),
        },
    })
}

fn map_language_row(row: &QueryResult) -> Result<CountryLanguage> {
    Ok(CountryLanguage {
        language: row.try_get("", "language")?,
        official: row.try_get("", "is_official")?,
        percentage: row.try_get::<Decimal>("", "percentage")?,
    })
}
