//! 与宿主平台之间稳定的插件契约：插件描述、配置类目、发送结果。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PLUGIN_NAME: &str = "ZMQ Publisher";
pub const PLUGIN_VERSION: &str = "0.0.1";
pub const PLUGIN_INTERFACE: &str = "1.0";

/// 配置类目中的键名。
pub const KEY_PLUGIN: &str = "plugin";
pub const KEY_PROXY_HOST: &str = "proxyHost";
pub const KEY_PROXY_PORT: &str = "proxyPort";
pub const KEY_TOPIC: &str = "topic";
pub const KEY_ASSET_NAME: &str = "assetName";
pub const KEY_CONNECT_TIMEOUT_MS: &str = "connectTimeoutMs";
pub const KEY_SUBSCRIPTION_SETTLE_MS: &str = "subscriptionSettleMs";

pub const DEFAULT_PROXY_HOST: &str = "localhost";
pub const DEFAULT_PROXY_PORT: u16 = 5559;
pub const DEFAULT_TOPIC: &str = "DEFAULT";
pub const DEFAULT_ASSET_NAME: &str = "zmq-";
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_SUBSCRIPTION_SETTLE_MS: u64 = 100;

/// 单个配置项的元数据（宿主约定全部以字符串表达），仅用于输出默认类目。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigItem {
    pub description: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub default: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mandatory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readonly: Option<String>,
}

impl ConfigItem {
    fn new(description: &str, item_type: &str, default: &str) -> Self {
        Self {
            description: description.to_string(),
            item_type: item_type.to_string(),
            default: default.to_string(),
            order: None,
            display_name: None,
            mandatory: None,
            readonly: None,
        }
    }

    fn ordered(mut self, order: u32, display_name: &str) -> Self {
        self.order = Some(order.to_string());
        self.display_name = Some(display_name.to_string());
        self
    }

    fn required(mut self) -> Self {
        self.mandatory = Some("true".to_string());
        self
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory.as_deref() == Some("true")
    }
}

/// 配置类目：键名 -> 配置项。
pub type ConfigCategory = BTreeMap<String, ConfigItem>;

/// 插件默认配置类目。
pub fn default_config() -> ConfigCategory {
    let mut plugin = ConfigItem::new("ZMQ Subscriber North Plugin", "string", "zmq");
    plugin.readonly = Some("true".to_string());

    let items = [
        (KEY_PLUGIN, plugin),
        (
            KEY_PROXY_HOST,
            ConfigItem::new(
                "Hostname or IP address of the proxy to connect to",
                "string",
                DEFAULT_PROXY_HOST,
            )
            .ordered(1, "ZMQ proxy host")
            .required(),
        ),
        (
            KEY_PROXY_PORT,
            ConfigItem::new(
                "The network port of the proxy to connect to",
                "integer",
                &DEFAULT_PROXY_PORT.to_string(),
            )
            .ordered(2, "ZMQ proxy port")
            .required(),
        ),
        (
            KEY_TOPIC,
            ConfigItem::new(
                "The subscription topic to publish messages to",
                "string",
                DEFAULT_TOPIC,
            )
            .ordered(3, "Topic To Publish")
            .required(),
        ),
        (
            KEY_ASSET_NAME,
            ConfigItem::new("Name of Asset", "string", DEFAULT_ASSET_NAME)
                .ordered(4, "Asset Name")
                .required(),
        ),
        (
            KEY_CONNECT_TIMEOUT_MS,
            ConfigItem::new(
                "Maximum time to wait for the proxy connection (milliseconds)",
                "integer",
                &DEFAULT_CONNECT_TIMEOUT_MS.to_string(),
            )
            .ordered(5, "Connect timeout"),
        ),
        (
            KEY_SUBSCRIPTION_SETTLE_MS,
            ConfigItem::new(
                "Time to wait for the proxy subscription before publishing (milliseconds)",
                "integer",
                &DEFAULT_SUBSCRIPTION_SETTLE_MS.to_string(),
            )
            .ordered(6, "Subscription settle time"),
        ),
    ];
    items
        .into_iter()
        .map(|(key, item)| (key.to_string(), item))
        .collect()
}

/// 插件描述（宿主发现插件时读取）。
#[derive(Debug, Clone, Serialize)]
pub struct PluginInfo {
    pub name: String,
    pub version: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub plugin_type: String,
    pub interface: String,
    pub config: ConfigCategory,
}

impl PluginInfo {
    pub fn north() -> Self {
        Self {
            name: PLUGIN_NAME.to_string(),
            version: PLUGIN_VERSION.to_string(),
            mode: "async".to_string(),
            plugin_type: "north".to_string(),
            interface: PLUGIN_INTERFACE.to_string(),
            config: default_config(),
        }
    }
}

/// 一次批量发送的结果，宿主据此推进投递检查点。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOutcome {
    pub accepted: bool,
    pub last_id: i64,
    pub sent_count: usize,
}

impl SendOutcome {
    pub fn sent(last_id: i64, sent_count: usize) -> Self {
        Self {
            accepted: true,
            last_id,
            sent_count,
        }
    }

    /// 失败批次：不报告进度，但仍携带已重组的最后一条读数 ID。
    pub fn failed(last_id: i64) -> Self {
        Self {
            accepted: false,
            last_id,
            sent_count: 0,
        }
    }

    /// 宿主习惯的三元组形式。
    pub fn as_tuple(&self) -> (bool, i64, usize) {
        (self.accepted, self.last_id, self.sent_count)
    }
}
