/// Google 表格客户端
///
/// 按名称打开表格，写入第一个工作表的单元格
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::clients::google_http::GoogleHttp;
use crate::error::{ApiError, Result};
use crate::services::SheetWriter;

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

pub struct GoogleSheet {
    http: GoogleHttp,
    base_url: String,
    spreadsheet_id: String,
}

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

impl GoogleSheet {
    pub fn new(http: GoogleHttp, base_url: impl Into<String>, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    /// 通过 Drive 按名称查找表格
    ///
    /// # 参数
    /// - `drive_url`: Drive API 地址
    /// - `sheets_url`: Sheets API 地址
    /// - `name`: 表格名称
    pub async fn open_by_name(
        http: GoogleHttp,
        drive_url: &str,
        sheets_url: &str,
        name: &str,
    ) -> Result<Self> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            name.replace('\'', "\\'"),
            SPREADSHEET_MIME
        );
        let url = format!("{}/files", drive_url);
        let list: DriveFileList = http
            .get_json(&url, &[("q", query.as_str()), ("fields", "files(id,name)")])
            .await?
            .ok_or_else(|| ApiError::SpreadsheetNotFound(name.to_string()))?;

        let file = list
            .files
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::SpreadsheetNotFound(name.to_string()))?;

        info!("✓ 已打开表格: {} ({})", name, file.id);
        Ok(Self::new(http, sheets_url, file.id))
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }
}

#[async_trait]
impl SheetWriter for GoogleSheet {
    async fn update_cell(&self, row: u32, column: u32, value: &str) -> Result<()> {
        let range = format!("{}{}", column_letter(column), row);
        let url = format!(
            "{}/spreadsheets/{}/values/{}?valueInputOption=RAW",
            self.base_url, self.spreadsheet_id, range
        );
        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": [[value]]
        });

        let _: Value = self.http.send_json(Method::PUT, &url, &body).await?;
        debug!("单元格 {} 已更新", range);
        Ok(())
    }
}

/// 列号转 A1 表示法的列字母（1 → A，27 → AA）
pub fn column_letter(column: u32) -> String {
    let mut n = column;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
