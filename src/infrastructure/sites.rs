//! 两个目标站点的页面流程
//!
//! 选择器随网站改版而变化，集中放在这里

use std::future::Future;

use chromiumoxide::Page;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::SessionTimings;
use crate::infrastructure::dom::{self, ExtractError};
use crate::models::ExtractionResult;
use crate::services::price_parser::{is_not_profitable, parse_price, parse_profit};

const BOOKSCOUTER_BOOK_URL: &str = "https://bookscouter.com/book/";
const RESTRICTED_INVENTORY_URL: &str = "https://www.restrictedinventory.com/#";

mod selectors {
    pub const VENDOR_PRICE: &str = "[class*='VendorPriceContainer_vobfuvz']";
    pub const SEARCH_INPUT: &str = "#restrictiondata-asin";
    pub const SEARCH_BUTTON: &str = "#find-asin a";
    pub const NOT_PROFITABLE: &str = "#model_txt";
    pub const PROFIT: &str = "#profit";
}

pub fn bookscouter_url(isbn: &str) -> String {
    format!("{}{}", BOOKSCOUTER_BOOK_URL, isbn)
}

/// 站点 A：打开书籍页，读取最高回收价
pub async fn fetch_bookscouter(
    page: &Page,
    isbn: &str,
    timings: &SessionTimings,
) -> Result<ExtractionResult, ExtractError> {
    dom::navigate(page, &bookscouter_url(isbn), timings.page_load_timeout).await?;
    sleep(timings.settle_delay).await;

    let element = dom::wait_for_element(
        page,
        selectors::VENDOR_PRICE,
        timings.content_wait,
        timings.poll_interval,
    )
    .await?;
    let text = dom::element_text(&element).await?;

    let price = parse_price(&text);
    if price.is_unavailable() {
        warn!("[ISBN {}] ⚠️ 价格无效: {:?}", isbn, text);
    }
    Ok(price)
}

/// 站点 B：在搜索页输入 ISBN，读取利润或"不盈利"提示
pub async fn fetch_restricted_inventory(
    page: &Page,
    isbn: &str,
    timings: &SessionTimings,
) -> Result<ExtractionResult, ExtractError> {
    dom::navigate(page, RESTRICTED_INVENTORY_URL, timings.page_load_timeout).await?;
    sleep(timings.settle_delay).await;

    let search_bar = dom::wait_for_element(
        page,
        selectors::SEARCH_INPUT,
        timings.interaction_wait,
        timings.poll_interval,
    )
    .await?;
    dom::fill_input(&search_bar, isbn).await?;

    let search_button = dom::wait_for_clickable(
        page,
        selectors::SEARCH_BUTTON,
        timings.interaction_wait,
        timings.poll_interval,
    )
    .await?;
    search_button.click().await?;

    sleep(timings.settle_delay).await;

    let indicator = match dom::wait_for_element(
        page,
        selectors::NOT_PROFITABLE,
        timings.probe_wait,
        timings.poll_interval,
    )
    .await
    {
        Ok(element) => dom::element_text(&element).await.map(Some),
        Err(e) => Err(e),
    };

    resolve_profit(isbn, indicator, move || async move {
        let element = dom::wait_for_element(
            page,
            selectors::PROFIT,
            timings.interaction_wait,
            timings.poll_interval,
        )
        .await?;
        dom::element_text(&element).await
    })
    .await
}

/// 站点 B 的判定：先看"不盈利"提示，没有提示才读取利润
///
/// # 参数
/// - `indicator`: 提示元素的文本；等待超时或找不到元素表示没有提示
/// - `read_profit`: 读取利润元素文本，只在没有"不盈利"提示时调用
pub(crate) async fn resolve_profit<F, Fut>(
    isbn: &str,
    indicator: Result<Option<String>, ExtractError>,
    read_profit: F,
) -> Result<ExtractionResult, ExtractError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<String, ExtractError>>,
{
    match indicator {
        Ok(Some(text)) if is_not_profitable(&text) => return Ok(ExtractionResult::NotProfitable),
        Ok(_) | Err(ExtractError::Timeout(_) | ExtractError::ElementNotFound(_)) => {
            debug!("[ISBN {}] 没有不盈利提示", isbn);
        }
        Err(e) => return Err(e),
    }

    let text = read_profit().await?;
    let profit = parse_profit(&text);
    if profit.is_unavailable() {
        warn!("[ISBN {}] ⚠️ 利润无效: {:?}", isbn, text);
    }
    Ok(profit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_bookscouter_url_embeds_isbn() {
        assert_eq!(
            bookscouter_url("9780131103627"),
            "https://bookscouter.com/book/9780131103627"
        );
    }

    #[tokio::test]
    async fn test_not_profitable_wins_over_profit_element() {
        let profit_read = AtomicBool::new(false);
        let flag = &profit_read;
        let result = resolve_profit(
            "111",
            Ok(Some("This item is not profitable enough to sell.".into())),
            move || async move {
                flag.store(true, Ordering::SeqCst);
                Ok("$9.99".to_string())
            },
        )
        .await
        .unwrap();

        assert_eq!(result, ExtractionResult::NotProfitable);
        assert!(!profit_read.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_missing_indicator_falls_back_to_profit() {
        for indicator in [
            Err(ExtractError::Timeout("#model_txt".into())),
            Err(ExtractError::ElementNotFound("#model_txt".into())),
            Ok(Some(String::new())),
            Ok(None),
        ] {
            let result = resolve_profit("222", indicator, || async { Ok("$3.40".to_string()) })
                .await
                .unwrap();
            assert_eq!(result, ExtractionResult::Success("3.40".into()));
        }
    }

    #[tokio::test]
    async fn test_invalid_profit_is_unavailable() {
        let result = resolve_profit("333", Ok(None), || async { Ok("--".to_string()) })
            .await
            .unwrap();
        assert_eq!(result, ExtractionResult::Unavailable);
    }

    #[tokio::test]
    async fn test_indicator_and_profit_errors_propagate() {
        let stale = resolve_profit(
            "444",
            Err(ExtractError::StaleElement("#model_txt".into())),
            || async { Ok("$1.00".to_string()) },
        )
        .await;
        assert!(matches!(stale, Err(ExtractError::StaleElement(_))));

        let timeout = resolve_profit("444", Ok(None), || async {
            Err(ExtractError::Timeout("#profit".into()))
        })
        .await;
        assert!(matches!(timeout, Err(ExtractError::Timeout(_))));
    }
}
