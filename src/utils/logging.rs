/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::orchestrator::BatchReport;
use crate::services::ConsumeStats;

/// 初始化日志，级别由 `RUST_LOG` 控制，默认 info
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 ISBN 价格抓取服务启动");
    info!("📊 最大并发浏览器数: {}", config.concurrent_browsers);
    info!("📄 目标表格: {}", config.google_sheet_name);
    info!("📨 订阅: {}", config.pubsub_subscription);
    info!("{}", "=".repeat(60));
}

/// 记录批次开始信息
///
/// # 参数
/// - `total`: ISBN 总数
/// - `concurrency`: 并发数
pub fn log_batch_start(total: usize, concurrency: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理批次: 共 {} 个 ISBN", total);
    info!("📋 同时运行 {} 个浏览器，其余排队", concurrency);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(report: &BatchReport) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 批次完成: 成功 {}/{}，失败 {}",
        report.succeeded, report.total, report.failed
    );
    info!(
        "BookScouter 无数据 {}，RestrictedInventory 无数据 {}，不盈利 {}",
        report.site_a_unavailable, report.site_b_unavailable, report.not_profitable
    );
    info!("{}", "─".repeat(60));
}

/// 打印一次队列消费的统计
pub fn print_consume_stats(stats: &ConsumeStats) {
    info!("\n{}", "=".repeat(60));
    info!("📊 队列消费完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📨 消息: {}", stats.messages);
    info!("✅ 已确认: {}", stats.acknowledged);
    info!("❌ 格式错误: {}", stats.rejected);
    info!("📚 ISBN: {}", stats.items);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("abc", 5), "abc");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("书籍价格", 2), "书籍...");
    }
}
