/// Pub/Sub 拉取订阅客户端
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::clients::google_http::GoogleHttp;
use crate::error::{PayloadError, Result};
use crate::services::{MessageSource, QueueMessage};

pub struct PubSubClient {
    http: GoogleHttp,
    base_url: String,
    subscription_path: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullResponse {
    #[serde(default)]
    received_messages: Vec<ReceivedMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReceivedMessage {
    ack_id: String,
    message: PubsubMessage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PubsubMessage {
    #[serde(default)]
    data: String,
    #[serde(default)]
    message_id: String,
}

impl PubSubClient {
    pub fn new(
        http: GoogleHttp,
        base_url: impl Into<String>,
        project_id: &str,
        subscription: &str,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            subscription_path: format!("projects/{}/subscriptions/{}", project_id, subscription),
        }
    }

    pub fn subscription_path(&self) -> &str {
        &self.subscription_path
    }
}

#[async_trait]
impl MessageSource for PubSubClient {
    async fn pull(&self, max_messages: usize) -> Result<Vec<QueueMessage>> {
        let url = format!("{}/{}:pull", self.base_url, self.subscription_path);
        let response: PullResponse = self
            .http
            .send_json(Method::POST, &url, &json!({ "maxMessages": max_messages }))
            .await?;

        debug!("拉取到 {} 条消息", response.received_messages.len());

        Ok(response
            .received_messages
            .into_iter()
            .map(|received| {
                let message_id = received.message.message_id;
                let data = STANDARD
                    .decode(received.message.data.as_bytes())
                    .map_err(|e| {
                        warn!("⚠️ 消息 {} 不是合法的 base64: {}", message_id, e);
                        PayloadError::Undecodable(e.to_string())
                    });
                QueueMessage {
                    ack_id: received.ack_id,
                    message_id,
                    data,
                }
            })
            .collect())
    }

    async fn acknowledge(&self, ack_ids: &[String]) -> Result<()> {
        if ack_ids.is_empty() {
            return Ok(());
        }
        let url = format!("{}/{}:acknowledge", self.base_url, self.subscription_path);
        let _: Value = self
            .http
            .send_json(Method::POST, &url, &json!({ "ackIds": ack_ids }))
            .await?;
        Ok(())
    }
}
