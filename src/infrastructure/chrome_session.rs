//! Chrome 提取会话 - 基础设施层
//!
//! 持有唯一的 Browser / Page 资源，只暴露"从某站点提取"的能力

use async_trait::async_trait;
use chromiumoxide::{Browser, Page};
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::browser::{launch_headless_browser, LaunchedBrowser};
use crate::config::{Config, SessionTimings};
use crate::error::{BrowserError, Result};
use crate::infrastructure::dom::ExtractError;
use crate::infrastructure::session::{ExtractionSession, SessionFactory};
use crate::infrastructure::sites;
use crate::models::{ExtractionResult, SiteId};

/// 基于无头 Chrome 的提取会话
///
/// 职责：
/// - 独占一个浏览器进程和它的 profile 目录
/// - 站点 A、B 共用同一个 Page，顺序使用
/// - 不认识批次、表格、状态存储
pub struct ChromeSession {
    browser: Option<Browser>,
    page: Page,
    handler: JoinHandle<()>,
    /// 排在 browser 之后，drop 时先回收浏览器再删除目录
    profile_dir: Option<TempDir>,
    timings: SessionTimings,
}

impl ChromeSession {
    /// 启动浏览器并创建会话
    pub async fn open(executable: &str, timings: SessionTimings) -> Result<Self> {
        let LaunchedBrowser {
            browser,
            page,
            handler,
            profile_dir,
        } = launch_headless_browser(executable, timings.page_load_timeout).await?;

        Ok(Self {
            browser: Some(browser),
            page,
            handler,
            profile_dir: Some(profile_dir),
            timings,
        })
    }
}

#[async_trait]
impl ExtractionSession for ChromeSession {
    async fn extract(&self, site: SiteId, isbn: &str) -> ExtractionResult {
        let outcome = match site {
            SiteId::BookScouter => sites::fetch_bookscouter(&self.page, isbn, &self.timings).await,
            SiteId::RestrictedInventory => {
                sites::fetch_restricted_inventory(&self.page, isbn, &self.timings).await
            }
        };

        settle_outcome(site, isbn, outcome)
    }

    async fn close(&mut self) -> Result<()> {
        let Some(mut browser) = self.browser.take() else {
            return Ok(());
        };

        let closed = browser.close().await;
        if closed.is_ok() {
            let _ = browser.wait().await;
        }
        self.handler.abort();

        if let Some(dir) = self.profile_dir.take() {
            let path = dir.path().display().to_string();
            if let Err(e) = dir.close() {
                debug!("清理 profile 目录失败 {}: {}", path, e);
            }
        }

        closed.map_err(|e| BrowserError::CloseFailed(e.to_string()))?;
        debug!("浏览器已关闭");
        Ok(())
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if self.browser.is_some() {
            warn!("⚠️ 会话未显式关闭，浏览器进程和 profile 目录随会话一起回收");
        }
        self.handler.abort();
    }
}

/// 提取失败一律降级为 `Unavailable`，并按失败类型记录日志
fn settle_outcome(
    site: SiteId,
    isbn: &str,
    outcome: std::result::Result<ExtractionResult, ExtractError>,
) -> ExtractionResult {
    match outcome {
        Ok(value) => {
            debug!("[ISBN {}] {} → {}", isbn, site, value);
            value
        }
        Err(ExtractError::Timeout(what)) => {
            error!("[ISBN {}] {} 超时: {}", isbn, site, what);
            ExtractionResult::Unavailable
        }
        Err(ExtractError::ElementNotFound(what)) => {
            error!("[ISBN {}] {} 未找到元素: {}", isbn, site, what);
            ExtractionResult::Unavailable
        }
        Err(ExtractError::StaleElement(what)) => {
            error!("[ISBN {}] {} 元素引用失效: {}", isbn, site, what);
            ExtractionResult::Unavailable
        }
        Err(ExtractError::Other(cause)) => {
            error!("[ISBN {}] {} 处理出错: {}", isbn, site, cause);
            ExtractionResult::Unavailable
        }
    }
}

/// 为每个 ISBN 启动新浏览器的工厂
pub struct ChromeSessionFactory {
    executable: String,
    timings: SessionTimings,
}

impl ChromeSessionFactory {
    pub fn new(config: &Config) -> Self {
        info!("浏览器路径: {}", config.chrome_driver_path);
        Self {
            executable: config.chrome_driver_path.clone(),
            timings: config.session_timings(),
        }
    }
}

#[async_trait]
impl SessionFactory for ChromeSessionFactory {
    async fn open(&self) -> Result<Box<dyn ExtractionSession>> {
        let session = ChromeSession::open(&self.executable, self.timings).await?;
        Ok(Box::new(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_errors_become_unavailable() {
        let errors = [
            ExtractError::Timeout("#profit".into()),
            ExtractError::ElementNotFound("#restrictiondata-asin".into()),
            ExtractError::StaleElement("#find-asin a".into()),
            ExtractError::Other("net::ERR_CONNECTION_RESET".into()),
        ];
        for err in errors {
            assert_eq!(
                settle_outcome(SiteId::RestrictedInventory, "111", Err(err)),
                ExtractionResult::Unavailable
            );
        }
    }

    #[test]
    fn test_extracted_values_pass_through() {
        for value in [
            ExtractionResult::Success("12.50".into()),
            ExtractionResult::NotProfitable,
            ExtractionResult::Unavailable,
        ] {
            assert_eq!(
                settle_outcome(SiteId::BookScouter, "222", Ok(value.clone())),
                value
            );
        }
    }
}
