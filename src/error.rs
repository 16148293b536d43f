//! 错误类型
//!
//! 所有失败最终都落到同一个面向用户的消息槽里（一次只显示一条），
//! 因此每个错误除了 `Display` 之外还提供 [`AppError::kind`] 分类。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 无法连接到后端
    #[error("Cannot connect to backend at {endpoint}. Make sure the backend is running and PIPELINE_API_URL points to it.")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 504 / 408 或客户端超时
    #[error("⏱️ Extraction timed out{status_note}. OCR + extraction can take 30-60+ seconds; raise the gateway timeout or host the backend without a function time limit.", status_note = .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Timeout {
        endpoint: String,
        status: Option<u16>,
    },

    /// 上传接口返回非 2xx
    #[error("Upload failed: {reason} - {body}")]
    Upload {
        status: u16,
        reason: String,
        body: String,
    },

    /// 比对接口返回非 2xx
    #[error("Extraction failed: {reason} ({status}) - {body}")]
    Extraction {
        status: u16,
        reason: String,
        body: String,
    },

    /// 其它接口返回了无法使用的响应
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// 读取本地待上传文件失败
    #[error("Cannot read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 部署在托管域名下却没有配置后端地址
    #[error("Backend not configured. Please set PIPELINE_API_URL for the deployment on {host}.")]
    BackendNotConfigured { host: String },

    /// 后端地址无法解析
    #[error("PIPELINE_API_URL '{value}' is not a valid URL: {reason}")]
    InvalidApiUrl { value: String, reason: String },

    /// 配置文件解析失败
    #[error("Cannot parse config file {path}: {reason}")]
    FileParseFailed { path: String, reason: String },
}

/// 响应错误（列目录失败、响应体无法解码）
#[derive(Debug, Error)]
pub enum ResponseError {
    /// 返回非 2xx
    #[error("Failed to fetch {what}: {reason} ({status})")]
    BadStatus {
        what: String,
        status: u16,
        reason: String,
    },

    /// 响应体不是预期的 JSON
    #[error("Unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Network,
    Timeout,
    Upload,
    Extraction,
    Response,
    File,
}

impl AppError {
    /// 获取错误分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Config(_) => ErrorKind::Configuration,
            AppError::Network { .. } => ErrorKind::Network,
            AppError::Timeout { .. } => ErrorKind::Timeout,
            AppError::Upload { .. } => ErrorKind::Upload,
            AppError::Extraction { .. } => ErrorKind::Extraction,
            AppError::Response(_) => ErrorKind::Response,
            AppError::File { .. } => ErrorKind::File,
        }
    }

    /// 面向用户的消息
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// 根据传输层错误构造 Network / Timeout
    pub fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        let endpoint = endpoint.into();
        if source.is_timeout() {
            AppError::Timeout {
                endpoint,
                status: None,
            }
        } else {
            AppError::Network { endpoint, source }
        }
    }
}

/// 失败快照
///
/// `AppError` 持有 `reqwest::Error`，不能 Clone；状态机里保存的是这个快照。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&AppError> for Failure {
    fn from(err: &AppError) -> Self {
        Self {
            kind: err.kind(),
            message: err.user_message(),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
