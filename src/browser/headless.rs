use std::path::Path;
use std::time::Duration;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::error::{BrowserError, Result};

/// 一个独立启动的无头浏览器
pub struct LaunchedBrowser {
    pub browser: Browser,
    pub page: Page,
    /// 后台事件循环
    pub handler: JoinHandle<()>,
    /// 本实例独占的用户数据目录，drop 时删除
    pub profile_dir: TempDir,
}

/// 启动无头浏览器并打开一个空白页
///
/// # 参数
/// - `executable`: 浏览器可执行文件路径，不存在时交给 chromiumoxide 自动查找
/// - `page_load_timeout`: 单次请求/页面加载的上限
pub async fn launch_headless_browser(
    executable: &str,
    page_load_timeout: Duration,
) -> Result<LaunchedBrowser> {
    let profile_dir = create_profile_dir()?;
    info!("🚀 启动无头浏览器...");
    debug!("用户数据目录: {}", profile_dir.path().display());

    let mut builder = BrowserConfig::builder()
        .new_headless_mode()
        .user_data_dir(profile_dir.path())
        .request_timeout(page_load_timeout)
        .args(vec![
            "--no-sandbox",            // 容器内没有沙盒权限
            "--disable-dev-shm-usage", // 防止共享内存不足
            "--disable-gpu",
        ]);

    if Path::new(executable).exists() {
        builder = builder.chrome_executable(Path::new(executable));
    } else {
        warn!("⚠️ 浏览器路径不存在: {}，将自动查找", executable);
    }

    let config = builder.build().map_err(|e| {
        error!("配置无头浏览器失败: {}", e);
        BrowserError::ConfigurationFailed(e)
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动无头浏览器失败: {}", e);
        BrowserError::LaunchFailed { source: e }
    })?;
    debug!("无头浏览器启动成功");

    // 在后台处理浏览器事件
    let handler = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(Duration::from_millis(300)).await;

    let page = match browser.new_page("about:blank").await {
        Ok(page) => page,
        Err(e) => {
            error!("创建页面失败: {}", e);
            handler.abort();
            return Err(BrowserError::PageCreationFailed { source: e }.into());
        }
    };

    Ok(LaunchedBrowser {
        browser,
        page,
        handler,
        profile_dir,
    })
}

/// 并发启动的浏览器不能共用同一个 profile
fn create_profile_dir() -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix("isbn-scraper-")
        .tempdir()
        .map_err(|e| BrowserError::ProfileDirFailed(e).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_dirs_are_unique() {
        let a = create_profile_dir().unwrap();
        let b = create_profile_dir().unwrap();
        assert_ne!(a.path(), b.path());
        assert!(a.path().is_dir());
    }

    #[test]
    fn test_profile_dir_removed_on_drop() {
        let dir = create_profile_dir().unwrap();
        let path = dir.path().to_path_buf();
        std::fs::write(path.join("Local State"), "{}").unwrap();

        drop(dir);

        assert!(!path.exists());
    }
}
