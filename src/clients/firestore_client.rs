/// Firestore 状态存储
///
/// 每个 ISBN 一个文档，字段 `status` 和服务端生成的 `timestamp`
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::clients::google_http::GoogleHttp;
use crate::config::STATUS_COLLECTION;
use crate::error::{ApiError, Result};
use crate::models::{ProcessingStatus, StatusRecord};
use crate::services::StatusStore;

pub struct FirestoreStatusStore {
    http: GoogleHttp,
    base_url: String,
    project_id: String,
    collection: String,
}

impl FirestoreStatusStore {
    pub fn new(http: GoogleHttp, base_url: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            project_id: project_id.into(),
            collection: STATUS_COLLECTION.to_string(),
        }
    }

    fn database(&self) -> String {
        format!("projects/{}/databases/(default)", self.project_id)
    }

    fn document_name(&self, isbn: &str) -> String {
        format!("{}/documents/{}/{}", self.database(), self.collection, isbn)
    }
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    #[serde(default)]
    fields: HashMap<String, FirestoreValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirestoreValue {
    string_value: Option<String>,
    timestamp_value: Option<DateTime<Utc>>,
}

#[async_trait]
impl StatusStore for FirestoreStatusStore {
    async fn mark(&self, isbn: &str, status: ProcessingStatus) -> Result<()> {
        let url = format!("{}/{}/documents:commit", self.base_url, self.database());
        // update 不带 updateMask 即整文档覆盖，时间戳由服务端写入
        let body = json!({
            "writes": [{
                "update": {
                    "name": self.document_name(isbn),
                    "fields": { "status": { "stringValue": status.as_str() } }
                },
                "updateTransforms": [{
                    "fieldPath": "timestamp",
                    "setToServerValue": "REQUEST_TIME"
                }]
            }]
        });

        let _: Value = self.http.send_json(Method::POST, &url, &body).await?;
        debug!("Firestore 状态已写入: {} → {}", isbn, status.as_str());
        Ok(())
    }

    async fn get(&self, isbn: &str) -> Result<Option<StatusRecord>> {
        let url = format!("{}/{}", self.base_url, self.document_name(isbn));
        let Some(document) = self.http.get_json::<FirestoreDocument>(&url, &[]).await? else {
            return Ok(None);
        };

        let decode_err = |message: String| ApiError::DecodeFailed {
            endpoint: url.clone(),
            message,
        };

        let status = document
            .fields
            .get("status")
            .and_then(|v| v.string_value.as_deref())
            .ok_or_else(|| decode_err("缺少 status 字段".to_string()))?
            .parse::<ProcessingStatus>()
            .map_err(decode_err)?;
        let timestamp = document
            .fields
            .get("timestamp")
            .and_then(|v| v.timestamp_value)
            .ok_or_else(|| decode_err("缺少 timestamp 字段".to_string()))?;

        Ok(Some(StatusRecord {
            isbn: isbn.to_string(),
            status,
            timestamp,
        }))
    }
}
