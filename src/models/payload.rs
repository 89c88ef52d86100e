//! 队列消息解析
//!
//! 消息体为逗号分隔的 `ISBN:行号` 列表，例如 `9780131103627:2,9780262033848:3`。

use crate::error::PayloadError;
use crate::models::item::{validate_rows, IsbnItem};

/// 将消息体解析为一个批次
///
/// 空条目（多余的逗号、空白）会被忽略；任何一个条目格式不对，整条消息都不接受。
pub fn parse_batch_payload(data: &str) -> Result<Vec<IsbnItem>, PayloadError> {
    let mut items = Vec::new();

    for raw in data.split(',') {
        let entry = raw.trim();
        if entry.is_empty() {
            continue;
        }

        let (isbn, row) = entry
            .split_once(':')
            .ok_or_else(|| PayloadError::MissingRow(entry.to_string()))?;

        let isbn = isbn.trim();
        if isbn.is_empty() {
            return Err(PayloadError::EmptyIsbn(entry.to_string()));
        }

        let row_index: u32 = row
            .trim()
            .parse()
            .map_err(|_| PayloadError::InvalidRow(entry.to_string()))?;
        if row_index == 0 {
            return Err(PayloadError::InvalidRow(entry.to_string()));
        }

        items.push(IsbnItem::new(isbn, row_index));
    }

    validate_rows(&items)?;
    Ok(items)
}
