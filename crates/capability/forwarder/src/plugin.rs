//! 宿主插件生命周期入口。
//!
//! 初始化返回显式的 [`PluginHandle`]，之后的每次调用都通过它进行。

use crate::Forwarder;
use plugin_contract::{PluginInfo, SendOutcome};
use serde_json::Value;
use tracing::info;
use zmq_north_config::ConfigError;

/// 插件实例句柄。
#[derive(Clone)]
pub struct PluginHandle {
    forwarder: Forwarder,
}

impl PluginHandle {
    pub fn new(forwarder: Forwarder) -> Self {
        Self { forwarder }
    }

    pub fn forwarder(&self) -> &Forwarder {
        &self.forwarder
    }
}

/// 插件描述与默认配置类目。
pub fn plugin_info() -> PluginInfo {
    PluginInfo::north()
}

/// 解析配置类目并创建句柄；配置错误在此处直接返回，而不是推迟到首次发送。
pub fn plugin_init(category: &Value) -> Result<PluginHandle, ConfigError> {
    let forwarder = Forwarder::initialize(category)?;
    let config = forwarder.config();
    info!(
        target: "zmq_north.plugin",
        endpoint = %config.endpoint(),
        topic = %config.topic,
        asset_name = %config.asset_name,
        "plugin_initialized"
    );
    Ok(PluginHandle::new(forwarder))
}

/// 发送一批读数。
///
/// 若返回的 future 在完成前被丢弃（宿主取消），则不产生任何结果，
/// 宿主应视为没有进度，而不是确认失败。
pub async fn plugin_send(handle: &PluginHandle, payload: &[Value], stream_id: i64) -> SendOutcome {
    info!(
        target: "zmq_north.plugin",
        stream_id = stream_id,
        readings = payload.len(),
        "plugin_send"
    );
    handle.forwarder.send_batch(payload).await
}

pub fn plugin_shutdown(handle: PluginHandle) {
    info!(
        target: "zmq_north.plugin",
        endpoint = %handle.forwarder.config().endpoint(),
        "plugin_shutdown"
    );
}

/// 运行中重新配置不生效：只记录日志，新配置需重新初始化插件。
pub fn plugin_reconfigure(handle: &PluginHandle, category: &Value) {
    let keys: Vec<&str> = category
        .as_object()
        .map(|items| items.keys().map(String::as_str).collect())
        .unwrap_or_default();
    info!(
        target: "zmq_north.plugin",
        endpoint = %handle.forwarder.config().endpoint(),
        keys = ?keys,
        "plugin_reconfigure_ignored"
    );
}
