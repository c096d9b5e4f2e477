//! 独立运行入口：从环境变量加载代理配置，发送一个批次并输出结果。
//!
//! ```bash
//! # 从文件读取批次（JSON 数组）
//! zmq-north batch.json
//!
//! # 从 stdin 读取
//! cat batch.json | zmq-north
//!
//! # 输出插件描述与默认配置类目
//! zmq-north info
//! ```

use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::info;
use zmq_north_config::PluginConfig;
use zmq_north_forwarder::{Forwarder, PluginHandle, plugin_info, plugin_send, plugin_shutdown};
use zmq_north_telemetry::{init_tracing, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在）
    dotenvy::dotenv().ok();
    // 初始化结构化日志
    init_tracing();

    let arg = std::env::args().nth(1);
    if arg.as_deref() == Some("info") {
        println!("{}", serde_json::to_string_pretty(&plugin_info())?);
        return Ok(());
    }

    // 从环境变量加载运行配置，配置错误直接退出
    let config = PluginConfig::from_env()?;
    let raw = match arg {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await?;
            buffer
        }
    };
    let batch = parse_batch(&raw)?;

    let handle = PluginHandle::new(Forwarder::from_config(config));
    let outcome = plugin_send(&handle, &batch, 0).await;
    println!("{}", serde_json::to_string(&outcome)?);

    let snapshot = metrics().snapshot();
    info!(
        batches_sent = snapshot.batches_sent,
        batch_failures = snapshot.batch_failures,
        records_sent = snapshot.records_sent,
        "run_finished"
    );
    plugin_shutdown(handle);
    Ok(())
}

/// 批次为读数 JSON 数组；单个对象视为只含一条读数的批次。
fn parse_batch(raw: &str) -> Result<Vec<Value>, serde_json::Error> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Array(readings) => Ok(readings),
        other => Ok(vec![other]),
    }
}
