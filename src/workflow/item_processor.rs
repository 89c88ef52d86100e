//! 单个 ISBN 处理流程 - 流程层
//!
//! 流程顺序：
//! 1. 打开会话（启动浏览器）
//! 2. 站点 A 提取
//! 3. 站点 B 提取
//! 4. 关闭会话（任何路径都会执行）

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{error, info, warn};

use crate::error::{AppError, Result};
use crate::infrastructure::{ExtractionSession, SessionFactory};
use crate::models::{ExtractionResult, IsbnItem, ProcessingResult, SiteId};

/// 单个 ISBN 的处理流程
///
/// - 每次调用独占一个会话，用完即关
/// - 不重试，哨兵值就是最终结果
/// - 会话启动失败直接返回错误
pub struct ItemProcessor {
    sessions: Arc<dyn SessionFactory>,
}

impl ItemProcessor {
    pub fn new(sessions: Arc<dyn SessionFactory>) -> Self {
        Self { sessions }
    }

    pub async fn process(&self, item: &IsbnItem) -> Result<ProcessingResult> {
        info!("{} 🔍 开始处理", item);

        let mut session = self.sessions.open().await.map_err(|e| {
            error!("{} ❌ 会话启动失败: {}", item, e);
            e
        })?;

        let outcome = AssertUnwindSafe(extract_both(session.as_ref(), &item.isbn))
            .catch_unwind()
            .await;

        if let Err(e) = session.close().await {
            warn!("{} ⚠️ 关闭会话失败: {}", item, e);
        }

        match outcome {
            Ok((site_a_value, site_b_value)) => {
                info!(
                    "{} ✓ 处理完成: {} = {}, {} = {}",
                    item,
                    SiteId::BookScouter,
                    site_a_value,
                    SiteId::RestrictedInventory,
                    site_b_value
                );
                Ok(ProcessingResult::new(item, site_a_value, site_b_value))
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!("{} ❌ 提取过程中断: {}", item, message);
                Err(AppError::ItemPanicked {
                    isbn: item.isbn.clone(),
                    message,
                })
            }
        }
    }
}

/// 两个站点共用一个浏览器，必须顺序执行
async fn extract_both(
    session: &dyn ExtractionSession,
    isbn: &str,
) -> (ExtractionResult, ExtractionResult) {
    let site_a_value = session.extract(SiteId::BookScouter, isbn).await;
    let site_b_value = session.extract(SiteId::RestrictedInventory, isbn).await;
    (site_a_value, site_b_value)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
