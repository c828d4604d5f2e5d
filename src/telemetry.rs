//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了日志输出和链路追踪的初始化。

use opentelemetry::global;
use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::trace::TracerProvider as SdkTracerProvider;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// 默认日志过滤规则
pub const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// 初始化日志和 OpenTelemetry Tracing
///
/// 此函数应该在进程启动时调用一次，重复调用时后续调用不生效。
///
/// # 参数
///
/// * `service_name` - 服务名称，作为 tracer 名称
/// * `filter` - 日志过滤规则，`None` 时优先读取 `RUST_LOG`，否则使用 [`DEFAULT_FILTER`]
pub fn init_tracing(service_name: &str, filter: Option<&str>) {
    let env_filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    // 未配置 exporter 时 provider 不导出 span，仅为 span 分配 trace id
    let provider = SdkTracerProvider::builder().build();
    global::set_tracer_provider(provider.clone());
    let tracer = provider.tracer(service_name.to_string());

    let _ = Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .try_init();
}

/// 关闭全局 tracer provider
pub fn shutdown_tracing() {
    global::shutdown_tracer_provider();
}
