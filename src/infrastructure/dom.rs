//! 页面操作辅助 - 基础设施层
//!
//! 导航、等待元素出现/可点击、读取文本，错误统一归类为 `ExtractError`

use std::time::Duration;

use chromiumoxide::error::CdpError;
use chromiumoxide::{Element, Page};
use thiserror::Error;
use tokio::time::{sleep, timeout, Instant};
use tracing::debug;

/// 单次提取过程中的错误
///
/// 只在会话内部流转，离开会话前全部转换为 `Unavailable`
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("等待超时: {0}")]
    Timeout(String),
    #[error("未找到元素: {0}")]
    ElementNotFound(String),
    #[error("元素引用已失效: {0}")]
    StaleElement(String),
    #[error("{0}")]
    Other(String),
}

impl From<CdpError> for ExtractError {
    fn from(err: CdpError) -> Self {
        classify(&err.to_string())
    }
}

/// 按 CDP 返回的错误信息归类
fn classify(message: &str) -> ExtractError {
    let lower = message.to_lowercase();
    if lower.contains("no node with given id")
        || lower.contains("detached")
        || lower.contains("cannot find context")
    {
        ExtractError::StaleElement(message.to_string())
    } else if lower.contains("timeout") || lower.contains("timed out") {
        ExtractError::Timeout(message.to_string())
    } else if lower.contains("could not find node") || lower.contains("not found") {
        ExtractError::ElementNotFound(message.to_string())
    } else {
        ExtractError::Other(message.to_string())
    }
}

/// 导航到指定 URL，超过 `load_timeout` 视为超时
pub async fn navigate(page: &Page, url: &str, load_timeout: Duration) -> Result<(), ExtractError> {
    debug!("导航到: {}", url);
    match timeout(load_timeout, page.goto(url)).await {
        Ok(result) => {
            result?;
            Ok(())
        }
        Err(_) => Err(ExtractError::Timeout(format!(
            "页面加载 {} ({}s)",
            url,
            load_timeout.as_secs()
        ))),
    }
}

/// 轮询直到元素出现
pub async fn wait_for_element(
    page: &Page,
    selector: &str,
    wait: Duration,
    poll_interval: Duration,
) -> Result<Element, ExtractError> {
    let deadline = Instant::now() + wait;
    loop {
        match page.find_element(selector).await {
            Ok(element) => return Ok(element),
            Err(e) => {
                if Instant::now() >= deadline {
                    debug!("等待 {} 失败: {}", selector, e);
                    return Err(ExtractError::Timeout(format!(
                        "{} ({}s)",
                        selector,
                        wait.as_secs()
                    )));
                }
            }
        }
        sleep(poll_interval).await;
    }
}

/// 轮询直到元素出现且可点击（可见、未禁用）
pub async fn wait_for_clickable(
    page: &Page,
    selector: &str,
    wait: Duration,
    poll_interval: Duration,
) -> Result<Element, ExtractError> {
    let deadline = Instant::now() + wait;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let element = wait_for_element(page, selector, remaining, poll_interval).await?;
        if is_clickable(&element).await? {
            return Ok(element);
        }
        if Instant::now() >= deadline {
            return Err(ExtractError::Timeout(format!(
                "{} 不可点击 ({}s)",
                selector,
                wait.as_secs()
            )));
        }
        sleep(poll_interval).await;
    }
}

async fn is_clickable(element: &Element) -> Result<bool, ExtractError> {
    let returns = element
        .call_js_fn(
            "function() { const r = this.getBoundingClientRect(); return !this.disabled && r.width > 0 && r.height > 0; }",
            false,
        )
        .await?;
    Ok(returns
        .result
        .value
        .and_then(|v| v.as_bool())
        .unwrap_or(false))
}

/// 读取元素的可见文本
pub async fn element_text(element: &Element) -> Result<String, ExtractError> {
    Ok(element.inner_text().await?.unwrap_or_default())
}

/// 清空输入框后输入文本
pub async fn fill_input(element: &Element, text: &str) -> Result<(), ExtractError> {
    element
        .call_js_fn("function() { this.value = ''; }", false)
        .await?;
    element.click().await?;
    element.type_str(text).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_stale_reference() {
        assert!(matches!(
            classify("No node with given id found"),
            ExtractError::StaleElement(_)
        ));
        assert!(matches!(
            classify("Node is detached from document"),
            ExtractError::StaleElement(_)
        ));
    }

    #[test]
    fn test_classify_timeout_and_missing() {
        assert!(matches!(
            classify("Request timed out."),
            ExtractError::Timeout(_)
        ));
        assert!(matches!(
            classify("Could not find node with given id"),
            ExtractError::ElementNotFound(_)
        ));
    }

    #[test]
    fn test_classify_other() {
        assert!(matches!(
            classify("net::ERR_NAME_NOT_RESOLVED"),
            ExtractError::Other(_)
        ));
    }
}
