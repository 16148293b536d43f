/// 流水线服务 API 客户端
///
/// 封装所有与流水线服务（列目录、上传、比对、PDF 地址）相关的调用逻辑
use crate::config::Config;
use crate::error::{AppError, AppResult, ResponseError};
use crate::models::{Folder, FolderListing, RunResult, UploadFile, UploadReceipt};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// 流水线服务能力
///
/// 协调器只依赖这个 trait，测试时可以换成假实现。
#[async_trait]
pub trait PipelineApi: Send + Sync {
    /// `GET /folders`
    async fn list_folders(&self) -> AppResult<Vec<Folder>>;

    /// `POST /upload`，一次 multipart 请求上传整批文件
    async fn upload(&self, files: &[UploadFile]) -> AppResult<UploadReceipt>;

    /// `POST /compare/{folder}`，四个阶段一次返回
    async fn compare(&self, folder: &str) -> AppResult<RunResult>;

    /// `GET /pdf/{folder}/{filename}` 的地址（只构建，不请求）
    fn pdf_url(&self, folder: &str, filename: &str) -> String;
}

/// 基于 reqwest 的流水线客户端
#[derive(Clone)]
pub struct PipelineClient {
    http: Client,
    base_url: Url,
}

impl PipelineClient {
    /// 创建新的客户端
    ///
    /// 后端地址未配置（托管域名下）或无法解析时返回配置错误。
    pub fn new(config: &Config) -> AppResult<Self> {
        let base_url = config.api_base_url()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::transport(base_url.clone(), e))?;
        Self::with_client(http, &base_url)
    }

    /// 使用已有的 reqwest 客户端
    pub fn with_client(http: Client, base_url: &str) -> AppResult<Self> {
        let base_url = parse_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        join_segments(&self.base_url, segments)
    }

    /// 解码 JSON 响应体
    async fn decode<T: DeserializeOwned>(endpoint: &Url, response: Response) -> AppResult<T> {
        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                AppError::transport(endpoint.as_str(), e)
            } else {
                AppError::Response(ResponseError::Decode {
                    endpoint: endpoint.to_string(),
                    source: e,
                })
            }
        })
    }
}

#[async_trait]
impl PipelineApi for PipelineClient {
    async fn list_folders(&self) -> AppResult<Vec<Folder>> {
        let url = self.endpoint(&["folders"]);
        debug!("获取文件夹列表: {}", url);

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AppError::transport(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResponseError::BadStatus {
                what: "folders".to_string(),
                status: status.as_u16(),
                reason: reason_phrase(status),
            }
            .into());
        }

        let listing: FolderListing = Self::decode(&url, response).await?;
        debug!("找到 {} 个文件夹", listing.folders.len());
        Ok(listing.folders)
    }

    async fn upload(&self, files: &[UploadFile]) -> AppResult<UploadReceipt> {
        let url = self.endpoint(&["upload"]);
        info!("📤 正在上传 {} 个文件...", files.len());

        let form = files.iter().try_fold(Form::new(), |form, file| {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str("application/pdf")
                .map_err(|e| AppError::transport(url.as_str(), e))?;
            Ok::<_, AppError>(form.part("files", part))
        })?;

        let response = self
            .http
            .post(url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::transport(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_upload_status(status, body));
        }

        let receipt: UploadReceipt = Self::decode(&url, response).await?;
        info!(
            "✓ 上传完成: {} 个文件 -> 文件夹 {}",
            receipt.count, receipt.folder_name
        );
        Ok(receipt)
    }

    async fn compare(&self, folder: &str) -> AppResult<RunResult> {
        let url = self.endpoint(&["compare", folder]);
        info!("🔍 运行流水线: {}", folder);

        let response = self
            .http
            .post(url.clone())
            .send()
            .await
            .map_err(|e| AppError::transport(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_compare_status(url.as_str(), status, body));
        }

        let result: RunResult = Self::decode(&url, response).await?;
        debug!(
            "流水线返回 {} 个文档, {} 条比对行",
            result.extraction.documents.len(),
            result.comparison.rows.len()
        );
        Ok(result)
    }

    fn pdf_url(&self, folder: &str, filename: &str) -> String {
        build_pdf_url(&self.base_url, folder, filename)
    }
}

// ========== 辅助函数 ==========

fn parse_base_url(base_url: &str) -> AppResult<Url> {
    // 保证以 `/` 结尾，否则 path_segments_mut 会丢掉最后一段前缀
    let normalized = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalized).map_err(|e| {
        crate::error::ConfigError::InvalidApiUrl {
            value: base_url.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// 在基础地址后追加路径段（逐段百分号编码）
fn join_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty();
        path.extend(segments);
    }
    url
}

fn build_pdf_url(base: &Url, folder: &str, filename: &str) -> String {
    join_segments(base, &["pdf", folder, filename]).to_string()
}

fn reason_phrase(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown").to_string()
}

/// 比对接口的非 2xx 分类：504 / 408 为超时，其余为提取失败
pub fn classify_compare_status(endpoint: &str, status: StatusCode, body: String) -> AppError {
    if status == StatusCode::GATEWAY_TIMEOUT || status == StatusCode::REQUEST_TIMEOUT {
        AppError::Timeout {
            endpoint: endpoint.to_string(),
            status: Some(status.as_u16()),
        }
    } else {
        AppError::Extraction {
            status: status.as_u16(),
            reason: reason_phrase(status),
            body,
        }
    }
}

/// 上传接口的非 2xx：响应体是纯文本错误信息
pub fn classify_upload_status(status: StatusCode, body: String) -> AppError {
    AppError::Upload {
        status: status.as_u16(),
        reason: reason_phrase(status),
        body,
    }
}
