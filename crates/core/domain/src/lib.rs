//! 北向转发的领域模型：宿主输入读数与对外发布的输出记录。

pub mod reading;
pub mod record;

pub use reading::{DatapointValue, InputReading, TransformError};
pub use record::OutputRecord;

/// 读数 ID（宿主用作投递检查点游标）。
pub type ReadingId = i64;
