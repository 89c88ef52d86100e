//! # ISBN Price Scraper
//!
//! 从 BookScouter 和 RestrictedInventory 抓取书籍回收价，写回 Google 表格
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（浏览器），只暴露提取能力
//! - `ChromeSession` - 一个 ISBN 独占一个浏览器实例
//!
//! ### ② 业务能力层（Services / Clients）
//! - `services/` - 价格解析、状态记录、表格回写、队列消费
//! - `clients/` - Firestore / Sheets / Pub/Sub 的 REST 客户端
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个 ISBN"的完整处理流程
//! - `ItemProcessor` - 打开会话 → 站点 A → 站点 B → 关闭会话
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_coordinator` - 并发控制、状态记录、故障隔离
//! - `orchestrator/pipeline` - 批次 → 表格
//!
//! ## 模块结构

pub mod app;
pub mod browser;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod server;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, Result};
pub use infrastructure::{ChromeSessionFactory, ExtractionSession, SessionFactory};
pub use models::{ExtractionResult, IsbnItem, ProcessingResult, ProcessingStatus, SiteId, StatusRecord};
pub use orchestrator::{BatchCoordinator, BatchOutcome, BatchReport, Pipeline};
pub use services::{QueueConsumer, SheetReconciler, StatusStore};
pub use workflow::ItemProcessor;
