//! 队列消费 - 业务能力层
//!
//! 持续拉取消息直到队列为空或出错，每条消息是一个批次

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::error::{PayloadError, Result};
use crate::models::{parse_batch_payload, IsbnItem};
use crate::orchestrator::Pipeline;
use crate::utils::logging::truncate_text;

/// 每次拉取的最大消息数
pub const DEFAULT_MAX_MESSAGES: usize = 10;

/// 拉取到的一条消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    pub ack_id: String,
    pub message_id: String,
    /// 已解码的消息体；无法解码时保留错误，由消费者确认丢弃
    pub data: std::result::Result<Vec<u8>, PayloadError>,
}

/// 消息来源
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn pull(&self, max_messages: usize) -> Result<Vec<QueueMessage>>;

    async fn acknowledge(&self, ack_ids: &[String]) -> Result<()>;
}

/// 一次消费的统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConsumeStats {
    pub messages: usize,
    pub acknowledged: usize,
    pub rejected: usize,
    pub items: usize,
}

/// 队列消费者
pub struct QueueConsumer {
    source: Arc<dyn MessageSource>,
    pipeline: Arc<Pipeline>,
    max_messages: usize,
}

impl QueueConsumer {
    pub fn new(source: Arc<dyn MessageSource>, pipeline: Arc<Pipeline>) -> Self {
        Self {
            source,
            pipeline,
            max_messages: DEFAULT_MAX_MESSAGES,
        }
    }

    /// 拉取并处理消息，直到一次拉取返回空
    ///
    /// 格式错误的消息会被确认丢弃；流水线出错时该消息不确认，循环结束并返回错误。
    pub async fn run(&self) -> Result<ConsumeStats> {
        let mut stats = ConsumeStats::default();

        loop {
            let messages = self.source.pull(self.max_messages).await?;
            if messages.is_empty() {
                info!("📭 队列已空，停止拉取");
                break;
            }

            for message in messages {
                stats.messages += 1;

                let decoded = message.data.as_deref().map_err(Clone::clone).and_then(decode_batch);
                let items = match decoded {
                    Ok(items) => items,
                    Err(e) => {
                        error!("❌ 消息 {} 格式错误，已丢弃: {}", message.message_id, e);
                        self.source.acknowledge(&[message.ack_id]).await?;
                        stats.rejected += 1;
                        continue;
                    }
                };

                info!(
                    "📨 消息 {}: {} 个 ISBN",
                    message.message_id,
                    items.len()
                );

                let report = self.pipeline.run_batch(items).await.map_err(|e| {
                    warn!("⚠️ 消息 {} 处理失败，保留在队列中", message.message_id);
                    e
                })?;

                self.source.acknowledge(&[message.ack_id]).await?;
                stats.acknowledged += 1;
                stats.items += report.total;
            }
        }

        Ok(stats)
    }
}

fn decode_batch(data: &[u8]) -> std::result::Result<Vec<IsbnItem>, PayloadError> {
    let text = std::str::from_utf8(data).map_err(|e| PayloadError::Undecodable(e.to_string()))?;
    info!("消息内容: {}", truncate_text(text, 120));
    parse_batch_payload(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_batch_rejects_invalid_utf8() {
        assert!(matches!(
            decode_batch(&[0xff, 0xfe]),
            Err(PayloadError::Undecodable(_))
        ));
    }

    #[test]
    fn test_decode_batch_parses_pairs() {
        let items = decode_batch(b"111:2,222:3").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], IsbnItem::new("222", 3));
    }
}
