use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use zmq_north_config::{ConfigError, PluginConfig};
use zmq_north_forwarder::{
    Forwarder, PluginHandle, plugin_info, plugin_init, plugin_reconfigure, plugin_send,
    plugin_shutdown,
};
use zmq_north_publish::{BatchPublisher, NoopPublisher, PublishError};

fn category() -> serde_json::Value {
    json!({
        "plugin": {"type": "string", "default": "zmq", "value": "zmq"},
        "proxyHost": {"type": "string", "default": "localhost", "value": "localhost", "mandatory": "true"},
        "proxyPort": {"type": "integer", "default": "5559", "value": "5559", "mandatory": "true"},
        "topic": {"type": "string", "default": "DEFAULT", "value": "DEFAULT", "mandatory": "true"},
        "assetName": {"type": "string", "default": "zmq-", "value": "zmq-", "mandatory": "true"}
    })
}

/// 永不完成的发布器，用于模拟宿主取消。
struct PendingPublisher;

#[async_trait]
impl BatchPublisher for PendingPublisher {
    async fn publish(&self, _topic: &str, _payload: Vec<u8>) -> Result<(), PublishError> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

#[test]
fn plugin_info_describes_north_plugin() {
    let info = plugin_info();
    assert_eq!(info.name, "ZMQ Publisher");
    assert_eq!(info.plugin_type, "north");
    assert!(info.config.contains_key("proxyPort"));
}

#[test]
fn plugin_init_reads_category() {
    let handle = plugin_init(&category()).expect("handle");
    let config = handle.forwarder().config();
    assert_eq!(config.endpoint(), "tcp://localhost:5559");
    assert_eq!(config.topic, "DEFAULT");

    plugin_reconfigure(&handle, &category());
    assert_eq!(handle.forwarder().config().topic, "DEFAULT");
    plugin_shutdown(handle);
}

#[test]
fn plugin_init_rejects_missing_port() {
    let mut category = category();
    category.as_object_mut().expect("category").remove("proxyPort");
    let err = plugin_init(&category).err().expect("config error");
    assert_eq!(err, ConfigError::Missing("proxyPort".to_string()));
}

#[tokio::test]
async fn plugin_send_uses_handle() {
    let config = PluginConfig::from_category(&category()).expect("config");
    let handle = PluginHandle::new(Forwarder::with_publisher(config, Arc::new(NoopPublisher)));
    let payload = vec![json!({"id": 42, "asset_code": "A", "user_ts": "t", "reading": {"x": 1}})];

    let outcome = plugin_send(&handle, &payload, 1).await;
    assert_eq!(outcome.as_tuple(), (true, 42, 1));
}

#[tokio::test]
async fn cancelled_send_yields_no_outcome() {
    let config = PluginConfig::from_category(&category()).expect("config");
    let handle = PluginHandle::new(Forwarder::with_publisher(config, Arc::new(PendingPublisher)));
    let payload = vec![json!({"id": 1, "asset_code": "A", "user_ts": "t", "reading": {"x": 1}})];

    let result = tokio::time::timeout(Duration::from_millis(50), plugin_send(&handle, &payload, 1)).await;
    assert!(result.is_err());
}
