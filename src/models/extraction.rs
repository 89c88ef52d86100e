use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 目标网站
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteId {
    /// 站点 A：按 ISBN 直接打开书籍页面
    BookScouter,
    /// 站点 B：搜索页填表后提交
    RestrictedInventory,
}

impl SiteId {
    pub fn name(&self) -> &'static str {
        match self {
            SiteId::BookScouter => "BookScouter",
            SiteId::RestrictedInventory => "RestrictedInventory",
        }
    }
}

impl Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 单个站点的提取结果
///
/// 提取失败不是错误，而是 `Unavailable`；
/// `NotProfitable` 只会由站点 B 产生。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum ExtractionResult {
    Success(String),
    Unavailable,
    NotProfitable,
}

impl ExtractionResult {
    /// 写入表格单元格的文本
    pub fn as_cell(&self) -> &str {
        match self {
            ExtractionResult::Success(value) => value,
            ExtractionResult::Unavailable => "N/A",
            ExtractionResult::NotProfitable => "Not profitable",
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, ExtractionResult::Unavailable)
    }
}

impl Display for ExtractionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_cell())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_render_as_sheet_text() {
        assert_eq!(ExtractionResult::Success("12.50".into()).as_cell(), "12.50");
        assert_eq!(ExtractionResult::Unavailable.as_cell(), "N/A");
        assert_eq!(ExtractionResult::NotProfitable.as_cell(), "Not profitable");
    }

    #[test]
    fn test_serializes_as_tagged_variant() {
        let json = serde_json::to_value(ExtractionResult::Success("3.10".into())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "Success", "value": "3.10"}));

        let json = serde_json::to_value(ExtractionResult::NotProfitable).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "NotProfitable"}));
    }
}
