//! 日志初始化、批次 ID 与基础指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 基础指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub batches_sent: u64,
    pub batch_failures: u64,
    pub records_sent: u64,
    pub transform_errors: u64,
    pub transport_errors: u64,
    pub send_latency_ms_total: u64,
    pub send_latency_ms_count: u64,
}

/// 基础指标。
pub struct TelemetryMetrics {
    batches_sent: AtomicU64,
    batch_failures: AtomicU64,
    records_sent: AtomicU64,
    transform_errors: AtomicU64,
    transport_errors: AtomicU64,
    send_latency_ms_total: AtomicU64,
    send_latency_ms_count: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            batches_sent: AtomicU64::new(0),
            batch_failures: AtomicU64::new(0),
            records_sent: AtomicU64::new(0),
            transform_errors: AtomicU64::new(0),
            transport_errors: AtomicU64::new(0),
            send_latency_ms_total: AtomicU64::new(0),
            send_latency_ms_count: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches_sent: self.batches_sent.load(Ordering::Relaxed),
            batch_failures: self.batch_failures.load(Ordering::Relaxed),
            records_sent: self.records_sent.load(Ordering::Relaxed),
            transform_errors: self.transform_errors.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            send_latency_ms_total: self.send_latency_ms_total.load(Ordering::Relaxed),
            send_latency_ms_count: self.send_latency_ms_count.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 batch_id，用于串联一次发送的日志。
pub fn new_batch_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// 记录批次发送成功及其记录数。
pub fn record_batch_sent(records: usize) {
    let metrics = metrics();
    metrics.batches_sent.fetch_add(1, Ordering::Relaxed);
    metrics
        .records_sent
        .fetch_add(records as u64, Ordering::Relaxed);
}

/// 记录批次发送失败次数。
pub fn record_batch_failure() {
    metrics().batch_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录读数重组失败次数。
pub fn record_transform_error() {
    metrics().transform_errors.fetch_add(1, Ordering::Relaxed);
}

/// 记录传输失败次数。
pub fn record_transport_error() {
    metrics().transport_errors.fetch_add(1, Ordering::Relaxed);
}

/// 记录发送耗时（毫秒，包含连接+发送+关闭）。
pub fn record_send_latency_ms(latency_ms: u64) {
    let metrics = metrics();
    metrics
        .send_latency_ms_total
        .fetch_add(latency_ms, Ordering::Relaxed);
    metrics
        .send_latency_ms_count
        .fetch_add(1, Ordering::Relaxed);
}
