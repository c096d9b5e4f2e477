//! 对外发布的输出记录。

use crate::{DatapointValue, InputReading};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 单条输出记录，批次以 JSON 数组形式发布。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub asset: String,
    pub timestamp: String,
    /// 原始读数（含数组值）。
    pub content: BTreeMap<String, DatapointValue>,
    /// 仅包含标量数据点；没有任何标量时省略。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readings: Option<BTreeMap<String, DatapointValue>>,
}

impl From<InputReading> for OutputRecord {
    fn from(reading: InputReading) -> Self {
        let scalars: BTreeMap<String, DatapointValue> = reading
            .reading
            .iter()
            .filter(|(_, value)| !value.is_array())
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Self {
            asset: reading.asset_code,
            timestamp: reading.user_ts,
            content: reading.reading,
            readings: (!scalars.is_empty()).then_some(scalars),
        }
    }
}
