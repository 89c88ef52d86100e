//! 提取会话接口 - 基础设施层
//!
//! 一个会话对应一个独立的浏览器实例，只被一个 ISBN 的处理流程持有

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ExtractionResult, SiteId};

/// 提取会话
///
/// 职责：
/// - 持有一个浏览器实例
/// - 对单个站点执行一次提取
/// - `extract` 不返回错误，失败一律为 `Unavailable`
#[async_trait]
pub trait ExtractionSession: Send + Sync {
    /// 从指定站点提取 ISBN 的数据
    async fn extract(&self, site: SiteId, isbn: &str) -> ExtractionResult;

    /// 关闭浏览器，重复调用无副作用
    async fn close(&mut self) -> Result<()>;
}

/// 会话工厂，每次调用都启动一个新的浏览器
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn ExtractionSession>>;
}
