use domain::{InputReading, OutputRecord, ReadingId, TransformError};
use plugin_contract::SendOutcome;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use zmq_north_config::{ConfigError, PluginConfig};
use zmq_north_publish::{BatchPublisher, PublishError, ZmqPublisher, ZmqPublisherConfig};
use zmq_north_telemetry::{
    new_batch_id, record_batch_failure, record_batch_sent, record_send_latency_ms,
    record_transform_error, record_transport_error,
};

/// 转发错误。
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("transform error: {0}")]
    Transform(#[from] TransformError),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("transport error: {0}")]
    Transport(#[from] PublishError),
}

/// 转发器：持有初始化时确定的连接参数与发布器。
#[derive(Clone)]
pub struct Forwarder {
    config: PluginConfig,
    publisher: Arc<dyn BatchPublisher>,
}

impl Forwarder {
    /// 由宿主配置类目初始化；只解析配置，不做任何 I/O。
    pub fn initialize(category: &Value) -> Result<Self, ConfigError> {
        let config = PluginConfig::from_category(category)?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: PluginConfig) -> Self {
        let publisher = ZmqPublisher::new(ZmqPublisherConfig {
            host: config.proxy_host.clone(),
            port: config.proxy_port,
            connect_timeout_ms: config.connect_timeout_ms,
            subscription_settle_ms: config.subscription_settle_ms,
        });
        Self::with_publisher(config, Arc::new(publisher))
    }

    pub fn with_publisher(config: PluginConfig, publisher: Arc<dyn BatchPublisher>) -> Self {
        Self { config, publisher }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// 发送一个批次。
    ///
    /// 任何失败都只记录日志并转换为 `accepted = false, sent_count = 0`；
    /// `last_id` 始终是最后一条成功重组的读数 ID（一条都没有时为 0）。
    pub async fn send_batch(&self, readings: &[Value]) -> SendOutcome {
        let batch_id = new_batch_id();
        let started_at = Instant::now();
        let mut last_id: ReadingId = 0;

        let result = match transform_batch(readings, &mut last_id) {
            Ok(records) => self.transmit(&records).await,
            Err(err) => Err(ForwardError::from(err)),
        };
        record_send_latency_ms(started_at.elapsed().as_millis() as u64);

        match result {
            Ok(sent_count) => {
                record_batch_sent(sent_count);
                info!(
                    target: "zmq_north.forwarder",
                    batch_id = %batch_id,
                    topic = %self.config.topic,
                    records = sent_count,
                    last_id = last_id,
                    "batch_sent"
                );
                SendOutcome::sent(last_id, sent_count)
            }
            Err(err) => {
                match &err {
                    ForwardError::Transform(_) => record_transform_error(),
                    ForwardError::Transport(_) => record_transport_error(),
                    ForwardError::Encode(_) => {}
                }
                record_batch_failure();
                error!(
                    target: "zmq_north.forwarder",
                    batch_id = %batch_id,
                    endpoint = %self.config.endpoint(),
                    topic = %self.config.topic,
                    readings = readings.len(),
                    last_id = last_id,
                    error = %err,
                    "batch_send_failed"
                );
                SendOutcome::failed(last_id)
            }
        }
    }

    /// 序列化为 JSON 数组并在配置的 topic 上发布一条消息，返回记录数。
    pub async fn transmit(&self, records: &[OutputRecord]) -> Result<usize, ForwardError> {
        let payload =
            serde_json::to_vec(records).map_err(|err| ForwardError::Encode(err.to_string()))?;
        self.publisher.publish(&self.config.topic, payload).await?;
        Ok(records.len())
    }
}

/// 按顺序重组读数，`last_id` 随每条成功重组的读数推进。
fn transform_batch(
    readings: &[Value],
    last_id: &mut ReadingId,
) -> Result<Vec<OutputRecord>, TransformError> {
    let mut records = Vec::with_capacity(readings.len());
    for raw in readings {
        let reading = InputReading::from_json(raw)?;
        *last_id = reading.id;
        records.push(OutputRecord::from(reading));
    }
    Ok(records)
}
