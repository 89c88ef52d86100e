//! 处理状态记录 - 业务能力层
//!
//! 每个 ISBN 一条记录，后写覆盖先写，不保留历史

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::error::Result;
use crate::models::{ProcessingStatus, StatusRecord};

/// 状态存储
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// 写入状态，时间戳由存储端生成
    async fn mark(&self, isbn: &str, status: ProcessingStatus) -> Result<()>;

    /// 读取最近一次的状态
    async fn get(&self, isbn: &str) -> Result<Option<StatusRecord>>;
}

/// 进程内状态存储，用于测试和本地运行
#[derive(Default)]
pub struct InMemoryStatusStore {
    records: Mutex<HashMap<String, StatusRecord>>,
}

impl InMemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StatusStore for InMemoryStatusStore {
    async fn mark(&self, isbn: &str, status: ProcessingStatus) -> Result<()> {
        debug!("状态更新: {} → {}", isbn, status.as_str());
        let record = StatusRecord {
            isbn: isbn.to_string(),
            status,
            timestamp: Utc::now(),
        };
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        records.insert(isbn.to_string(), record);
        Ok(())
    }

    async fn get(&self, isbn: &str) -> Result<Option<StatusRecord>> {
        let records = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(records.get(isbn).cloned())
    }
}
