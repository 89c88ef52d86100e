//! 表格回写 - 业务能力层
//!
//! 按行号把两个站点的结果写入两列，各行之间互不影响

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::{BOOKSCOUTER_COLUMN, RESTRICTED_INVENTORY_COLUMN};
use crate::error::Result;
use crate::models::ProcessingResult;

/// 表格写入能力（行、列均从 1 开始）
#[async_trait]
pub trait SheetWriter: Send + Sync {
    async fn update_cell(&self, row: u32, column: u32, value: &str) -> Result<()>;
}

/// 表格回写服务
pub struct SheetReconciler {
    sheet: Arc<dyn SheetWriter>,
    site_a_column: u32,
    site_b_column: u32,
}

impl SheetReconciler {
    pub fn new(sheet: Arc<dyn SheetWriter>) -> Self {
        Self {
            sheet,
            site_a_column: BOOKSCOUTER_COLUMN,
            site_b_column: RESTRICTED_INVENTORY_COLUMN,
        }
    }

    /// 写入所有结果，任何一次写入失败都直接返回
    pub async fn apply(&self, results: &[ProcessingResult]) -> Result<()> {
        for result in results {
            debug!(
                "写入第 {} 行: {} | {}",
                result.row_index, result.site_a_value, result.site_b_value
            );
            self.sheet
                .update_cell(
                    result.row_index,
                    self.site_a_column,
                    result.site_a_value.as_cell(),
                )
                .await?;
            self.sheet
                .update_cell(
                    result.row_index,
                    self.site_b_column,
                    result.site_b_value.as_cell(),
                )
                .await?;
        }
        info!("✓ 已将 {} 条结果写入表格", results.len());
        Ok(())
    }
}

/// 进程内表格，用于测试和本地运行
#[derive(Default)]
pub struct InMemorySheet {
    cells: Mutex<HashMap<(u32, u32), String>>,
}

impl InMemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, row: u32, column: u32) -> Option<String> {
        self.cells
            .lock()
            .ok()
            .and_then(|cells| cells.get(&(row, column)).cloned())
    }

    pub fn written_cells(&self) -> usize {
        self.cells.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[async_trait]
impl SheetWriter for InMemorySheet {
    async fn update_cell(&self, row: u32, column: u32, value: &str) -> Result<()> {
        let mut cells = self
            .cells
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cells.insert((row, column), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExtractionResult, IsbnItem};

    #[tokio::test]
    async fn test_apply_writes_two_columns_per_row() {
        let sheet = Arc::new(InMemorySheet::new());
        let reconciler = SheetReconciler::new(sheet.clone());

        let results = vec![
            ProcessingResult::new(
                &IsbnItem::new("111", 2),
                ExtractionResult::Unavailable,
                ExtractionResult::Unavailable,
            ),
            ProcessingResult::new(
                &IsbnItem::new("222", 3),
                ExtractionResult::Success("12.50".into()),
                ExtractionResult::NotProfitable,
            ),
        ];

        reconciler.apply(&results).await.unwrap();

        assert_eq!(sheet.written_cells(), 4);
        assert_eq!(sheet.cell(2, 5).as_deref(), Some("N/A"));
        assert_eq!(sheet.cell(2, 6).as_deref(), Some("N/A"));
        assert_eq!(sheet.cell(3, 5).as_deref(), Some("12.50"));
        assert_eq!(sheet.cell(3, 6).as_deref(), Some("Not profitable"));
    }

    #[tokio::test]
    async fn test_apply_empty_is_noop() {
        let sheet = Arc::new(InMemorySheet::new());
        SheetReconciler::new(sheet.clone()).apply(&[]).await.unwrap();
        assert_eq!(sheet.written_cells(), 0);
    }
}
