//! 插件运行配置加载。

use plugin_contract::{
    DEFAULT_ASSET_NAME, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_PROXY_HOST, DEFAULT_PROXY_PORT,
    DEFAULT_SUBSCRIPTION_SETTLE_MS, DEFAULT_TOPIC, KEY_ASSET_NAME, KEY_CONNECT_TIMEOUT_MS,
    KEY_PROXY_HOST, KEY_PROXY_PORT, KEY_SUBSCRIPTION_SETTLE_MS, KEY_TOPIC,
};
use serde_json::Value;
use std::env;

/// 配置加载错误。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required config: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 插件运行配置，初始化后不可变。
#[derive(Debug, Clone, PartialEq)]
pub struct PluginConfig {
    pub proxy_host: String,
    pub proxy_port: u16,
    pub topic: String,
    pub asset_name: String,
    pub connect_timeout_ms: u64,
    pub subscription_settle_ms: u64,
}

impl PluginConfig {
    /// 从宿主下发的配置类目读取，每项取 `.value`（缺省时回退到 `.default`）。
    pub fn from_category(category: &Value) -> Result<Self, ConfigError> {
        let proxy_host = category_string(category, KEY_PROXY_HOST)?;
        let proxy_port = parse_port(KEY_PROXY_PORT, &category_string(category, KEY_PROXY_PORT)?)?;
        let topic = category_string(category, KEY_TOPIC)?;
        let asset_name = category_string(category, KEY_ASSET_NAME)?;
        let connect_timeout_ms = match category_optional(category, KEY_CONNECT_TIMEOUT_MS) {
            Some(value) => parse_timeout(KEY_CONNECT_TIMEOUT_MS, &value)?,
            None => DEFAULT_CONNECT_TIMEOUT_MS,
        };
        let subscription_settle_ms = match category_optional(category, KEY_SUBSCRIPTION_SETTLE_MS)
        {
            Some(value) => parse_settle(KEY_SUBSCRIPTION_SETTLE_MS, &value)?,
            None => DEFAULT_SUBSCRIPTION_SETTLE_MS,
        };

        Ok(Self {
            proxy_host,
            proxy_port,
            topic,
            asset_name,
            connect_timeout_ms,
            subscription_settle_ms,
        })
    }

    /// 从环境变量读取配置（独立运行时使用）。
    pub fn from_env() -> Result<Self, ConfigError> {
        let proxy_host = read_string_with_default("ZMQ_NORTH_PROXY_HOST", DEFAULT_PROXY_HOST)?;
        let proxy_port = match env::var("ZMQ_NORTH_PROXY_PORT") {
            Ok(value) => parse_port("ZMQ_NORTH_PROXY_PORT", &value)?,
            Err(_) => DEFAULT_PROXY_PORT,
        };
        let topic = read_string_with_default("ZMQ_NORTH_TOPIC", DEFAULT_TOPIC)?;
        let asset_name = read_string_with_default("ZMQ_NORTH_ASSET_NAME", DEFAULT_ASSET_NAME)?;
        let connect_timeout_ms = match env::var("ZMQ_NORTH_CONNECT_TIMEOUT_MS") {
            Ok(value) => parse_timeout("ZMQ_NORTH_CONNECT_TIMEOUT_MS", &value)?,
            Err(_) => DEFAULT_CONNECT_TIMEOUT_MS,
        };
        let subscription_settle_ms = match env::var("ZMQ_NORTH_SUBSCRIPTION_SETTLE_MS") {
            Ok(value) => parse_settle("ZMQ_NORTH_SUBSCRIPTION_SETTLE_MS", &value)?,
            Err(_) => DEFAULT_SUBSCRIPTION_SETTLE_MS,
        };

        Ok(Self {
            proxy_host,
            proxy_port,
            topic,
            asset_name,
            connect_timeout_ms,
            subscription_settle_ms,
        })
    }

    /// 代理端点，例如 `tcp://localhost:5559`。
    pub fn endpoint(&self) -> String {
        format!("tcp://{}:{}", self.proxy_host, self.proxy_port)
    }
}

/// 读取必填配置项；空字符串视为非法。
fn category_string(category: &Value, key: &str) -> Result<String, ConfigError> {
    let value = category_optional(category, key).ok_or_else(|| ConfigError::Missing(key.to_string()))?;
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(key.to_string(), value));
    }
    Ok(value)
}

fn category_optional(category: &Value, key: &str) -> Option<String> {
    let item = category.get(key)?;
    item.get("value")
        .and_then(scalar_text)
        .or_else(|| item.get("default").and_then(scalar_text))
}

/// 数字按整数文本表达：`5559.0` 与 `5559` 等价。
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() && float.fract() == 0.0 && float >= 0.0 => {
                Some(format!("{}", float as u64))
            }
            _ => Some(number.to_string()),
        },
        _ => None,
    }
}

fn parse_port(key: &str, value: &str) -> Result<u16, ConfigError> {
    match value.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::Invalid(key.to_string(), value.to_string())),
    }
}

fn parse_timeout(key: &str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(timeout) if timeout > 0 => Ok(timeout),
        _ => Err(ConfigError::Invalid(key.to_string(), value.to_string())),
    }
}

/// 允许为 0（不等待订阅）。
fn parse_settle(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value.to_string()))
}

fn read_string_with_default(key: &str, default: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::Invalid(key.to_string(), value)),
        Ok(value) => Ok(value),
        Err(_) => Ok(default.to_string()),
    }
}
