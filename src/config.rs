use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// 未配置时使用的本地后端地址
pub const DEFAULT_API_URL: &str = "http://localhost:8001";

/// 托管平台域名；部署在这些域名下时必须显式配置后端地址
pub const MANAGED_HOST_SUFFIXES: &[&str] = &["vercel.app"];

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 流水线服务地址
    pub api_url: Option<String>,
    /// 当前部署所在的主机名（用于识别托管域名）
    pub host_name: Option<String>,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 运行报告文件
    pub output_log_file: String,
    /// 待上传 PDF 所在目录
    pub upload_dir: Option<String>,
    /// 要运行比对的文件夹
    pub target_folder: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            host_name: None,
            request_timeout_secs: 300,
            verbose_logging: false,
            output_log_file: "run_report.txt".to_string(),
            upload_dir: None,
            target_folder: None,
        }
    }
}

impl Config {
    /// 读取配置：先读 `DASHBOARD_CONFIG` 指向的 TOML 文件（可选），再用环境变量覆盖
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("DASHBOARD_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(&path))?,
            _ => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件读取
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::FileParseFailed { reason, .. } => ConfigError::FileParseFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::FileParseFailed {
            path: String::new(),
            reason: e.to_string(),
        })
    }

    fn with_env_overrides(self) -> Self {
        let env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            api_url: env("PIPELINE_API_URL").or(self.api_url),
            host_name: env("DASHBOARD_HOST").or(self.host_name),
            request_timeout_secs: env("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.request_timeout_secs),
            verbose_logging: env("VERBOSE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
            output_log_file: env("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            upload_dir: env("UPLOAD_DIR").or(self.upload_dir),
            target_folder: env("TARGET_FOLDER").or(self.target_folder),
        }
    }

    /// 是否部署在托管平台域名下
    pub fn is_managed_host(&self) -> bool {
        self.host_name.as_deref().is_some_and(|host| {
            let host = host.to_ascii_lowercase();
            MANAGED_HOST_SUFFIXES.iter().any(|suffix| host.ends_with(suffix))
        })
    }

    /// 解析后端基础地址（去掉末尾的 `/`）
    ///
    /// 托管域名下仍指向默认本地地址时视为配置错误。
    pub fn api_base_url(&self) -> Result<String, ConfigError> {
        let configured = self
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty() && *url != DEFAULT_API_URL);

        let url = match configured {
            Some(url) => url,
            None if self.is_managed_host() => {
                return Err(ConfigError::BackendNotConfigured {
                    host: self.host_name.clone().unwrap_or_default(),
                });
            }
            None => {
                warn!("⚠️ 未配置 PIPELINE_API_URL，使用默认地址 {}", DEFAULT_API_URL);
                DEFAULT_API_URL
            }
        };

        let url = url.trim_end_matches('/');
        reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidApiUrl {
            value: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(url.to_string())
    }
}
