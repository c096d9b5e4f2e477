//! 批次发布器：发布抽象与 ZeroMQ PUB 实现。
//!
//! 每次发布都独立建立一条 PUB 连接，等待对端订阅到达后发送一条双帧消息
//! `[topic, payload]`，随后无论成功与否都关闭 socket。

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use zeromq::{PubSocket, Socket, SocketSend, ZmqMessage};

/// 发布链路错误。
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("connect error: {0}")]
    Connect(String),
    #[error("send error: {0}")]
    Send(String),
    #[error("timeout: {0}")]
    Timeout(String),
}

/// 批次发布器抽象。
#[async_trait]
pub trait BatchPublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), PublishError>;
}

/// 空发布器（用于占位）。
#[derive(Debug, Default)]
pub struct NoopPublisher;

#[async_trait]
impl BatchPublisher for NoopPublisher {
    async fn publish(&self, _topic: &str, _payload: Vec<u8>) -> Result<(), PublishError> {
        Ok(())
    }
}

/// ZeroMQ 发布器配置。
#[derive(Debug, Clone)]
pub struct ZmqPublisherConfig {
    pub host: String,
    pub port: u16,
    /// 建立连接（含 ZMTP 握手）的最长等待时间。
    pub connect_timeout_ms: u64,
    /// 连接建立后等待对端订阅到达的时间，与握手共用 `connect_timeout_ms` 上限。
    ///
    /// PUB 会丢弃没有匹配订阅的消息，新连接上的订阅总是在握手之后才到达。
    pub subscription_settle_ms: u64,
}

/// ZeroMQ PUB 发布器，连接到代理的 XSUB 端。
#[derive(Debug, Clone)]
pub struct ZmqPublisher {
    endpoint: String,
    connect_timeout: Duration,
    subscription_settle: Duration,
}

impl ZmqPublisher {
    pub fn new(config: ZmqPublisherConfig) -> Self {
        Self {
            endpoint: format!("tcp://{}:{}", config.host, config.port),
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
            subscription_settle: Duration::from_millis(config.subscription_settle_ms),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn connect_and_send(
        &self,
        socket: &mut PubSocket,
        topic: &str,
        payload: Vec<u8>,
    ) -> Result<(), PublishError> {
        let started_at = Instant::now();
        match tokio::time::timeout(self.connect_timeout, socket.connect(&self.endpoint)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Err(PublishError::Connect(err.to_string())),
            Err(_) => {
                return Err(PublishError::Timeout(format!(
                    "connect to {} exceeded {}ms",
                    self.endpoint,
                    self.connect_timeout.as_millis()
                )));
            }
        }
        let settle = self
            .subscription_settle
            .min(self.connect_timeout.saturating_sub(started_at.elapsed()));
        debug!(
            target: "zmq_north.publish",
            endpoint = %self.endpoint,
            settle_ms = settle.as_millis() as u64,
            "publisher_connected"
        );
        tokio::time::sleep(settle).await;

        let mut message = ZmqMessage::from(topic.to_string());
        message.push_back(payload.into());
        socket
            .send(message)
            .await
            .map_err(|err| PublishError::Send(err.to_string()))
    }
}

#[async_trait]
impl BatchPublisher for ZmqPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), PublishError> {
        let started_at = Instant::now();
        let payload_size = payload.len();
        let mut socket = PubSocket::new();
        let result = self.connect_and_send(&mut socket, topic, payload).await;
        for err in socket.close().await {
            warn!(
                target: "zmq_north.publish",
                endpoint = %self.endpoint,
                error = %err,
                "publisher_close_error"
            );
        }
        if result.is_ok() {
            info!(
                target: "zmq_north.publish",
                endpoint = %self.endpoint,
                topic = %topic,
                payload_size = payload_size,
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                "batch_published"
            );
        }
        result
    }
}
