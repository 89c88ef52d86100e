use crate::error::PayloadError;
use crate::models::extraction::ExtractionResult;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Display;

/// 待处理的 ISBN 及其在表格中的行号（从 1 开始）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IsbnItem {
    pub isbn: String,
    pub row_index: u32,
}

impl IsbnItem {
    pub fn new(isbn: impl Into<String>, row_index: u32) -> Self {
        Self {
            isbn: isbn.into(),
            row_index,
        }
    }
}

impl Display for IsbnItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[ISBN {} 行#{}]", self.isbn, self.row_index)
    }
}

/// 一个 ISBN 两个站点都处理完后的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub isbn: String,
    pub row_index: u32,
    pub site_a_value: ExtractionResult,
    pub site_b_value: ExtractionResult,
}

impl ProcessingResult {
    pub fn new(
        item: &IsbnItem,
        site_a_value: ExtractionResult,
        site_b_value: ExtractionResult,
    ) -> Self {
        Self {
            isbn: item.isbn.clone(),
            row_index: item.row_index,
            site_a_value,
            site_b_value,
        }
    }
}

/// 校验批次的行号：从 1 开始，且同一批次内互不相同
pub fn validate_rows(items: &[IsbnItem]) -> Result<(), PayloadError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if item.row_index == 0 {
            return Err(PayloadError::InvalidRow(item.to_string()));
        }
        if !seen.insert(item.row_index) {
            return Err(PayloadError::DuplicateRow(item.row_index));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disjoint_rows_accepted() {
        let items = vec![IsbnItem::new("111", 2), IsbnItem::new("111", 3)];
        assert!(validate_rows(&items).is_ok());
    }

    #[test]
    fn test_duplicate_row_rejected() {
        let items = vec![
            IsbnItem::new("111", 2),
            IsbnItem::new("222", 4),
            IsbnItem::new("333", 2),
        ];
        assert_eq!(
            validate_rows(&items),
            Err(PayloadError::DuplicateRow(2))
        );
    }

    #[test]
    fn test_row_zero_rejected() {
        let items = vec![IsbnItem::new("111", 2), IsbnItem::new("222", 0)];
        assert!(matches!(
            validate_rows(&items),
            Err(PayloadError::InvalidRow(_))
        ));
    }
}
