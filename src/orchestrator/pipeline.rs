//! 批次流水线 - 编排层
//!
//! 批量处理（含逐条状态写入） → 表格回写 → 统计

use tracing::{error, warn};

use crate::error::Result;
use crate::models::{validate_rows, ExtractionResult, IsbnItem};
use crate::orchestrator::batch_coordinator::{BatchCoordinator, BatchOutcome};
use crate::services::SheetReconciler;
use crate::utils::logging::{log_batch_complete, log_batch_start};

/// 批次统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub site_a_unavailable: usize,
    pub site_b_unavailable: usize,
    pub not_profitable: usize,
}

impl BatchReport {
    fn from_outcome(total: usize, outcome: &BatchOutcome) -> Self {
        let results = &outcome.results;
        Self {
            total,
            succeeded: results.len(),
            failed: outcome.failures.len(),
            site_a_unavailable: results.iter().filter(|r| r.site_a_value.is_unavailable()).count(),
            site_b_unavailable: results.iter().filter(|r| r.site_b_value.is_unavailable()).count(),
            not_profitable: results
                .iter()
                .filter(|r| r.site_b_value == ExtractionResult::NotProfitable)
                .count(),
        }
    }
}

/// 队列触发的唯一处理入口
pub struct Pipeline {
    coordinator: BatchCoordinator,
    reconciler: SheetReconciler,
}

impl Pipeline {
    pub fn new(coordinator: BatchCoordinator, reconciler: SheetReconciler) -> Self {
        Self {
            coordinator,
            reconciler,
        }
    }

    /// 处理一个批次并回写表格
    ///
    /// 只有产出结果的 ISBN 会写入表格；失败的 ISBN 仅记录 `failed` 状态。
    /// 状态写入失败时，已完成的结果照常写入表格，之后返回第一个状态错误。
    pub async fn run_batch(&self, items: Vec<IsbnItem>) -> Result<BatchReport> {
        validate_rows(&items)?;

        if items.is_empty() {
            warn!("⚠️ 批次为空，跳过");
            return Ok(BatchReport::default());
        }

        let total = items.len();
        log_batch_start(total, self.coordinator.concurrency());

        let outcome = self.coordinator.process_batch(items).await?;
        self.reconciler.apply(&outcome.results).await?;

        let report = BatchReport::from_outcome(total, &outcome);
        log_batch_complete(&report);

        if let Some(first) = outcome.status_failures.into_iter().next() {
            error!("{} ❌ 批次中有状态未能写入", first.item);
            return Err(first.error);
        }
        Ok(report)
    }
}
