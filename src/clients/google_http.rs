/// Google REST 调用的公共部分
///
/// 封装 Bearer 认证、状态码检查和 JSON 解析
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{ApiError, ConfigError, Result};

#[derive(Clone)]
pub struct GoogleHttp {
    client: Client,
    token: String,
}

impl GoogleHttp {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
        }
    }

    /// 从配置加载访问令牌并创建客户端
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(load_access_token(config)?))
    }

    /// GET 请求，404 返回 `None`
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                endpoint: url.to_string(),
                source: e,
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(url, response).await.map(Some)
    }

    /// 发送 JSON 请求体
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: &Value,
    ) -> Result<T> {
        debug!("{} {}", method, url);
        let response = self
            .client
            .request(method, url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                endpoint: url.to_string(),
                source: e,
            })?;

        decode(url, response).await
    }
}

async fn decode<T: DeserializeOwned>(endpoint: &str, response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::BadResponse {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        }
        .into());
    }

    let text = response.text().await.map_err(|e| ApiError::RequestFailed {
        endpoint: endpoint.to_string(),
        source: e,
    })?;
    let text = if text.trim().is_empty() { "{}" } else { text.as_str() };

    serde_json::from_str(text).map_err(|e| {
        ApiError::DecodeFailed {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

/// 读取访问令牌
///
/// `GOOGLE_ACCESS_TOKEN` 优先，否则读取凭证文件中的 `access_token` 字段
pub fn load_access_token(config: &Config) -> Result<String> {
    if let Some(token) = &config.access_token {
        return Ok(token.clone());
    }

    let path = &config.credentials_path;
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::CredentialsUnreadable {
            path: path.clone(),
            message: e.to_string(),
        })?;
    let json: Value =
        serde_json::from_str(&content).map_err(|e| ConfigError::CredentialsUnreadable {
            path: path.clone(),
            message: e.to_string(),
        })?;

    json.get("access_token")
        .and_then(|v| v.as_str())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::MissingAccessToken(path.clone()).into())
}
