use std::time::Duration;

/// 同时运行的浏览器数量
pub const CONCURRENT_BROWSERS: usize = 3;
/// 页面导航后的固定等待时间（秒）
pub const DELAY_SECS: u64 = 10;
/// 页面加载超时（秒）
pub const PAGE_LOAD_TIMEOUT_SECS: u64 = 60;
/// 处理状态所在的文档集合
pub const STATUS_COLLECTION: &str = "isbn_processing_status";
/// BookScouter 价格写入的列（E 列）
pub const BOOKSCOUTER_COLUMN: u32 = 5;
/// RestrictedInventory 利润写入的列（F 列）
pub const RESTRICTED_INVENTORY_COLUMN: u32 = 6;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 凭证文件路径
    pub credentials_path: String,
    /// 直接提供的访问令牌（优先于凭证文件）
    pub access_token: Option<String>,
    /// 目标表格名称
    pub google_sheet_name: String,
    /// 浏览器可执行文件路径
    pub chrome_driver_path: String,
    /// GCP 项目 ID
    pub project_id: String,
    /// Pub/Sub 订阅名称
    pub pubsub_subscription: String,
    /// HTTP 监听端口
    pub port: u16,
    /// 并发浏览器数量
    pub concurrent_browsers: usize,
    // --- Google API 地址 ---
    pub endpoints: GoogleEndpoints,
}

/// Google REST API 地址，测试时可替换为本地 mock
#[derive(Clone, Debug)]
pub struct GoogleEndpoints {
    pub firestore: String,
    pub sheets: String,
    pub drive: String,
    pub pubsub: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            firestore: "https://firestore.googleapis.com/v1".to_string(),
            sheets: "https://sheets.googleapis.com/v4".to_string(),
            drive: "https://www.googleapis.com/drive/v3".to_string(),
            pubsub: "https://pubsub.googleapis.com/v1".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials_path: "/workspace/isbn-scraper-credentials.json".to_string(),
            access_token: None,
            google_sheet_name: "Book_Data".to_string(),
            chrome_driver_path: "/usr/bin/chromium".to_string(),
            project_id: "isbn-scraper-container-project".to_string(),
            pubsub_subscription: "isbn-processor-subscription".to_string(),
            port: 8080,
            concurrent_browsers: CONCURRENT_BROWSERS,
            endpoints: GoogleEndpoints::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            credentials_path: std::env::var("CREDENTIALS_PATH").unwrap_or(default.credentials_path),
            access_token: std::env::var("GOOGLE_ACCESS_TOKEN").ok().filter(|v| !v.trim().is_empty()),
            google_sheet_name: std::env::var("GOOGLE_SHEET_NAME").unwrap_or(default.google_sheet_name),
            chrome_driver_path: std::env::var("CHROME_DRIVER_PATH").unwrap_or(default.chrome_driver_path),
            project_id: std::env::var("PROJECT_ID").unwrap_or(default.project_id),
            pubsub_subscription: std::env::var("PUBSUB_SUBSCRIPTION").unwrap_or(default.pubsub_subscription),
            port: std::env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.port),
            concurrent_browsers: default.concurrent_browsers,
            endpoints: default.endpoints,
        }
    }

    /// 浏览器会话的时间参数
    pub fn session_timings(&self) -> SessionTimings {
        SessionTimings::default()
    }
}

/// 浏览器会话内各阶段的等待上限
#[derive(Clone, Copy, Debug)]
pub struct SessionTimings {
    /// 每次导航/交互后的固定等待
    pub settle_delay: Duration,
    /// 页面加载上限
    pub page_load_timeout: Duration,
    /// 价格元素等待上限
    pub content_wait: Duration,
    /// 搜索框、按钮、利润元素等待上限
    pub interaction_wait: Duration,
    /// "不盈利"提示的探测上限
    pub probe_wait: Duration,
    /// 轮询元素的间隔
    pub poll_interval: Duration,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(DELAY_SECS),
            page_load_timeout: Duration::from_secs(PAGE_LOAD_TIMEOUT_SECS),
            content_wait: Duration::from_secs(10),
            interaction_wait: Duration::from_secs(30),
            probe_wait: Duration::from_secs(10),
            poll_interval: Duration::from_millis(500),
        }
    }
}
