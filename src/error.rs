use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// Google API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 队列消息格式错误
    #[error("消息格式错误: {0}")]
    Payload(#[from] PayloadError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 单个 ISBN 处理过程中发生 panic
    #[error("ISBN {isbn} 处理中断: {message}")]
    ItemPanicked { isbn: String, message: String },
    /// 后台任务执行失败
    #[error("任务执行失败: {0}")]
    Task(String),
}

/// 浏览器生命周期错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 浏览器配置失败
    #[error("浏览器配置失败: {0}")]
    ConfigurationFailed(String),
    /// 无法创建用户数据目录
    #[error("创建用户数据目录失败: {0}")]
    ProfileDirFailed(std::io::Error),
    /// 启动浏览器失败
    #[error("启动浏览器失败: {source}")]
    LaunchFailed {
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 创建页面失败
    #[error("创建页面失败: {source}")]
    PageCreationFailed {
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 关闭浏览器失败
    #[error("关闭浏览器失败: {0}")]
    CloseFailed(String),
}

/// Google REST API 错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回非成功状态码
    #[error("API返回错误响应 ({endpoint}): status={status}, body={body}")]
    BadResponse {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// 响应体解析失败
    #[error("响应解析失败 ({endpoint}): {message}")]
    DecodeFailed { endpoint: String, message: String },
    /// 按名称找不到表格
    #[error("找不到表格: {0}")]
    SpreadsheetNotFound(String),
}

/// 队列消息格式错误
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// 消息体不是合法的 base64 / UTF-8
    #[error("无法解码消息体: {0}")]
    Undecodable(String),
    /// 条目缺少行号
    #[error("条目缺少行号: '{0}'")]
    MissingRow(String),
    /// 行号不是正整数
    #[error("行号无效: '{0}'")]
    InvalidRow(String),
    /// ISBN 为空
    #[error("ISBN为空: '{0}'")]
    EmptyIsbn(String),
    /// 同一批次中行号重复
    #[error("行号 {0} 在同一批次中重复")]
    DuplicateRow(u32),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 无法读取凭证文件
    #[error("无法读取凭证文件 {path}: {message}")]
    CredentialsUnreadable { path: String, message: String },
    /// 凭证文件中缺少访问令牌
    #[error("凭证文件 {0} 中没有 access_token")]
    MissingAccessToken(String),
}

/// 应用程序结果类型
pub type Result<T> = std::result::Result<T, AppError>;
