//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_coordinator` - 批量 ISBN 处理器
//! - 控制并发数量（Semaphore）
//! - 每个 ISBN 完成后写入状态
//! - 隔离单个 ISBN 的失败
//!
//! ### `pipeline` - 批次流水线
//! - 校验批次（行号不重复）
//! - 调用批量处理器，再把结果写回表格
//! - 输出批次统计
//!
//! ## 层次关系
//!
//! ```text
//! queue_consumer (消息 → 批次)
//!     ↓
//! pipeline (批次 → 表格)
//!     ↓
//! batch_coordinator (Vec<IsbnItem>)
//!     ↓
//! workflow::ItemProcessor (单个 ISBN)
//!     ↓
//! infrastructure (ExtractionSession)
//! ```

pub mod batch_coordinator;
pub mod pipeline;

pub use batch_coordinator::{BatchCoordinator, BatchOutcome, ItemFailure, StatusFailure};
pub use pipeline::{BatchReport, Pipeline};
