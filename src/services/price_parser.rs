//! 价格文本解析 - 业务能力层
//!
//! 只处理页面上读到的文本，不接触浏览器

use crate::models::ExtractionResult;

/// 货币符号
pub const CURRENCY_MARKER: char = '$';

/// 站点 B 用来表示"不值得卖"的提示文本
pub const NOT_PROFITABLE_PHRASE: &str = "This item is not profitable enough to sell.";

/// 解析站点 A 的价格文本
///
/// 取第一个 `$` 之后（到下一个 `$` 之前）的片段并去掉空白。
/// 没有 `$`、片段为空或不以数字开头时返回 `Unavailable`。
pub fn parse_price(text: &str) -> ExtractionResult {
    let Some(segment) = text.split(CURRENCY_MARKER).nth(1) else {
        return ExtractionResult::Unavailable;
    };
    validate_amount(segment.trim())
}

/// 解析站点 B 的利润文本，只去掉两端的 `$`，空白不做处理
pub fn parse_profit(text: &str) -> ExtractionResult {
    validate_amount(text.trim_matches(CURRENCY_MARKER))
}

/// 提示文本是否表示"不盈利"
pub fn is_not_profitable(text: &str) -> bool {
    text.contains(NOT_PROFITABLE_PHRASE)
}

fn validate_amount(amount: &str) -> ExtractionResult {
    match amount.chars().next() {
        Some(c) if c.is_ascii_digit() => ExtractionResult::Success(amount.to_string()),
        _ => ExtractionResult::Unavailable,
    }
}
