use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// ISBN 的处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Processed,
    Failed,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Processed => "processed",
            ProcessingStatus::Failed => "failed",
        }
    }
}

impl FromStr for ProcessingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processed" => Ok(ProcessingStatus::Processed),
            "failed" => Ok(ProcessingStatus::Failed),
            other => Err(format!("未知状态: {}", other)),
        }
    }
}

/// 某个 ISBN 最近一次的处理状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub isbn: String,
    pub status: ProcessingStatus,
    /// 由存储端生成的时间戳
    pub timestamp: DateTime<Utc>,
}
