//! 宿主缓冲区中的输入读数。

use crate::ReadingId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 读数重组错误。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    #[error("reading is not an object")]
    NotAnObject,
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("invalid field {0}: {1}")]
    InvalidField(&'static str, String),
    #[error("unsupported value for datapoint {0}")]
    UnsupportedValue(String),
}

/// 数据点取值。
///
/// 数组可以嵌套（多维），其余均视为标量。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatapointValue {
    I64(i64),
    F64(f64),
    String(String),
    Array(Vec<DatapointValue>),
}

impl DatapointValue {
    /// 从 JSON 值转换；`null`、布尔与嵌套对象不受支持。
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => number
                .as_i64()
                .map(Self::I64)
                .or_else(|| number.as_f64().map(Self::F64)),
            Value::String(text) => Some(Self::String(text.clone())),
            Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<Option<Vec<_>>>()
                .map(Self::Array),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }
}

/// 宿主交付的一条读数。
#[derive(Debug, Clone, PartialEq)]
pub struct InputReading {
    pub id: ReadingId,
    pub asset_code: String,
    pub user_ts: String,
    pub reading: BTreeMap<String, DatapointValue>,
}

impl InputReading {
    /// 解析宿主的读数字典（`id`、`asset_code`、`user_ts`、`reading`）。
    pub fn from_json(value: &Value) -> Result<Self, TransformError> {
        let object = value.as_object().ok_or(TransformError::NotAnObject)?;

        let id = match object.get("id") {
            Some(Value::Number(number)) => number.as_i64().ok_or_else(|| {
                TransformError::InvalidField("id", number.to_string())
            })?,
            Some(other) => return Err(TransformError::InvalidField("id", other.to_string())),
            None => return Err(TransformError::MissingField("id")),
        };
        let asset_code = read_string(object, "asset_code")?;
        if asset_code.trim().is_empty() {
            return Err(TransformError::InvalidField("asset_code", "empty".to_string()));
        }
        let user_ts = read_string(object, "user_ts")?;

        let values = match object.get("reading") {
            Some(Value::Object(values)) => values,
            Some(other) => {
                return Err(TransformError::InvalidField("reading", other.to_string()));
            }
            None => return Err(TransformError::MissingField("reading")),
        };
        let mut reading = BTreeMap::new();
        for (name, raw) in values {
            let datapoint = DatapointValue::from_json(raw)
                .ok_or_else(|| TransformError::UnsupportedValue(name.clone()))?;
            reading.insert(name.clone(), datapoint);
        }

        Ok(Self {
            id,
            asset_code,
            user_ts,
            reading,
        })
    }
}

fn read_string(
    object: &serde_json::Map<String, Value>,
    key: &'static str,
) -> Result<String, TransformError> {
    match object.get(key) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(TransformError::InvalidField(key, other.to_string())),
        None => Err(TransformError::MissingField(key)),
    }
}
