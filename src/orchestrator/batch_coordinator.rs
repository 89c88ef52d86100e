//! 批量 ISBN 处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **并发控制**：使用 Semaphore 限制同时存在的浏览器数量
//! 2. **排队**：超出并发数的 ISBN 等待空闲槽位
//! 3. **状态记录**：每个 ISBN 完成后立即写入状态
//! 4. **故障隔离**：单个 ISBN 失败不影响同批次其他 ISBN
//!
//! 结果顺序不保证与输入一致。

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::error::{AppError, Result};
use crate::models::{IsbnItem, ProcessingResult, ProcessingStatus};
use crate::services::StatusStore;
use crate::workflow::ItemProcessor;

/// 未能产出结果的 ISBN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub item: IsbnItem,
    pub reason: String,
}

/// 状态写入失败的 ISBN（其结果仍保留在 `results` 或 `failures` 中）
#[derive(Debug)]
pub struct StatusFailure {
    pub item: IsbnItem,
    pub error: AppError,
}

/// 一个批次的处理结果
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<ProcessingResult>,
    pub failures: Vec<ItemFailure>,
    pub status_failures: Vec<StatusFailure>,
}

/// 批量处理器
pub struct BatchCoordinator {
    processor: Arc<ItemProcessor>,
    status: Arc<dyn StatusStore>,
    concurrency: usize,
}

impl BatchCoordinator {
    pub fn new(
        processor: Arc<ItemProcessor>,
        status: Arc<dyn StatusStore>,
        concurrency: usize,
    ) -> Self {
        Self {
            processor,
            status,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// 处理一个批次
    ///
    /// 单个 ISBN 的失败记为 `failed` 状态并收集到 `failures`；
    /// 状态存储写入失败收集到 `status_failures`，不影响已完成的结果。
    pub async fn process_batch(&self, items: Vec<IsbnItem>) -> Result<BatchOutcome> {
        let total = items.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(total);

        for (idx, item) in items.into_iter().enumerate() {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| AppError::Task(e.to_string()))?;
            let processor = self.processor.clone();
            let status = self.status.clone();
            let task_item = item.clone();

            info!("📦 [{}/{}] 派发 {}", idx + 1, total, item);

            let handle = tokio::spawn(async move {
                let _permit = permit;
                run_item(&processor, status.as_ref(), task_item).await
            });
            handles.push((item, handle));
        }

        // 等待所有任务完成
        let mut outcome = BatchOutcome::default();

        for (item, handle) in handles {
            match handle.await {
                Ok(run) => {
                    match run.outcome {
                        ItemOutcome::Completed(result) => outcome.results.push(result),
                        ItemOutcome::Failed(failure) => outcome.failures.push(failure),
                    }
                    if let Some(error) = run.status_error {
                        error!("{} ❌ 状态写入失败: {}", item, error);
                        outcome.status_failures.push(StatusFailure { item, error });
                    }
                }
                Err(e) => {
                    error!("{} 任务执行失败: {}", item, e);
                    if let Err(error) = self.status.mark(&item.isbn, ProcessingStatus::Failed).await {
                        outcome.status_failures.push(StatusFailure {
                            item: item.clone(),
                            error,
                        });
                    }
                    outcome.failures.push(ItemFailure {
                        item,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(outcome)
    }
}

enum ItemOutcome {
    Completed(ProcessingResult),
    Failed(ItemFailure),
}

struct ItemRun {
    outcome: ItemOutcome,
    status_error: Option<AppError>,
}

/// 处理单个 ISBN 并立即记录状态
async fn run_item(processor: &ItemProcessor, status: &dyn StatusStore, item: IsbnItem) -> ItemRun {
    let (outcome, state) = match processor.process(&item).await {
        Ok(result) => (ItemOutcome::Completed(result), ProcessingStatus::Processed),
        Err(e) => (
            ItemOutcome::Failed(ItemFailure {
                reason: e.to_string(),
                item: item.clone(),
            }),
            ProcessingStatus::Failed,
        ),
    };

    ItemRun {
        outcome,
        status_error: status.mark(&item.isbn, state).await.err(),
    }
}
