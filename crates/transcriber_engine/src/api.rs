use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::multipart;
use serde::Deserialize;
use url::Url;

use crate::csrf::extract_csrf_token;
use crate::types::{
    map_reqwest_error, ApiError, JobRequest, StartReceipt, StatusSnapshot, SubmitError, TaskState,
    UploadReceipt,
};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Fixed period between status polls.
    pub poll_interval: Duration,
    /// Consecutive failed polls tolerated before polling is declared lost.
    pub max_consecutive_poll_failures: u32,
    pub max_result_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(2000),
            max_consecutive_poll_failures: 5,
            max_result_bytes: 2 * 1024 * 1024,
        }
    }
}

/// The pipeline server's surface as the controller sees it. One seam for
/// the whole wire protocol; the engine and tests both talk through it.
#[async_trait::async_trait]
pub trait PipelineApi: Send + Sync {
    async fn upload(&self, local_path: &Path) -> Result<UploadReceipt, ApiError>;
    async fn start_job(&self, request: &JobRequest) -> Result<StartReceipt, SubmitError>;
    async fn job_status(&self, task_id: &str) -> Result<StatusSnapshot, ApiError>;
    async fn fetch_result(&self, task_id: &str) -> Result<String, ApiError>;
}

pub struct ReqwestPipelineApi {
    settings: ClientSettings,
    client: reqwest::Client,
    base: Url,
    // Fetched from the form page once, then reused for the session.
    csrf: Mutex<Option<String>>,
}

impl ReqwestPipelineApi {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base =
            Url::parse(&settings.base_url).map_err(|err| ApiError::InvalidUrl(err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            // The anti-forgery header is only honored alongside its session
            // cookie, so the client must carry a jar.
            .cookie_store(true)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self {
            settings,
            client,
            base,
            csrf: Mutex::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::InvalidUrl(err.to_string()))
    }

    /// Returns the cached anti-forgery token, fetching the form page first
    /// if this session has none yet.
    async fn csrf_token(&self) -> Result<String, ApiError> {
        if let Some(token) = self.cached_csrf() {
            return Ok(token);
        }
        let url = self.endpoint("/")?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }
        let html = response.text().await.map_err(map_reqwest_error)?;
        let token = extract_csrf_token(&html).ok_or(ApiError::MissingCsrfToken)?;
        *self.csrf.lock().expect("csrf cache lock") = Some(token.clone());
        Ok(token)
    }

    fn cached_csrf(&self) -> Option<String> {
        self.csrf.lock().expect("csrf cache lock").clone()
    }

    async fn read_capped_body(&self, response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
        let max_bytes = self.settings.max_result_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                });
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ApiError::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                });
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl PipelineApi for ReqwestPipelineApi {
    async fn upload(&self, local_path: &Path) -> Result<UploadReceipt, ApiError> {
        let token = self.csrf_token().await?;
        let url = self.endpoint("/upload/")?;
        let file_name = local_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("audio")
            .to_string();
        let contents = tokio::fs::read(local_path)
            .await
            .map_err(|err| ApiError::File(err.to_string()))?;
        let part = multipart::Part::bytes(contents).file_name(file_name.clone());
        let form = multipart::Form::new().part("audio", part);

        let response = self
            .client
            .post(url)
            .header("X-CSRFToken", token)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        parse_upload_response(&body, status.as_u16(), file_name)
    }

    async fn start_job(&self, request: &JobRequest) -> Result<StartReceipt, SubmitError> {
        let token = self.csrf_token().await?;
        let url = self.endpoint("/pipeline/start/")?;
        let form = multipart::Form::new()
            .text("file_path", request.file_path.clone())
            .text("file_name", request.file_name.clone())
            .text("chord_algorithm", request.chord_algorithm.clone())
            .text("language", request.language.clone());

        let response = self
            .client
            .post(url)
            .header("X-CSRFToken", token)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        parse_start_response(&body, status.as_u16())
    }

    async fn job_status(&self, task_id: &str) -> Result<StatusSnapshot, ApiError> {
        let url = self.endpoint(&format!("/pipeline/status/{task_id}/"))?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        #[derive(Deserialize)]
        struct StatusResponse {
            status: String,
            #[serde(default)]
            progress: Option<i64>,
            #[serde(default)]
            current_step: Option<String>,
            #[serde(default)]
            error_message: Option<String>,
        }

        let parsed: StatusResponse = response.json().await.map_err(map_reqwest_error)?;
        let state = TaskState::from_wire(&parsed.status)
            .ok_or_else(|| ApiError::Malformed(format!("unknown task state {:?}", parsed.status)))?;
        Ok(StatusSnapshot {
            state,
            progress: parsed.progress.unwrap_or(0).clamp(0, 100) as u8,
            current_step: parsed.current_step,
            error_message: parsed.error_message,
        })
    }

    async fn fetch_result(&self, task_id: &str) -> Result<String, ApiError> {
        let url = self.endpoint(&format!("/pipeline/result/{task_id}/"))?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        let bytes = self.read_capped_body(response).await?;
        String::from_utf8(bytes).map_err(|err| ApiError::Malformed(err.to_string()))
    }
}

#[derive(Deserialize)]
struct StartResponse {
    status: String,
    #[serde(default)]
    task_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Rejections may arrive with non-2xx codes; the JSON body is authoritative
/// whenever it parses.
fn parse_start_response(body: &str, http_status: u16) -> Result<StartReceipt, SubmitError> {
    let parsed: StartResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(err) if (200..300).contains(&http_status) => {
            return Err(ApiError::Malformed(err.to_string()).into());
        }
        Err(_) => return Err(ApiError::HttpStatus(http_status).into()),
    };

    if parsed.status == "success" {
        match parsed.task_id {
            Some(task_id) => Ok(StartReceipt { task_id }),
            None => Err(ApiError::Malformed("success response without task_id".to_string()).into()),
        }
    } else {
        Err(SubmitError::Rejected(parsed.message.unwrap_or_else(|| {
            format!("pipeline start failed ({})", parsed.status)
        })))
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    status: String,
    #[serde(default)]
    file_path: Option<String>,
    #[serde(default)]
    file_url: Option<String>,
    #[serde(default)]
    file_name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn parse_upload_response(
    body: &str,
    http_status: u16,
    local_name: String,
) -> Result<UploadReceipt, ApiError> {
    let parsed: UploadResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(err) if (200..300).contains(&http_status) => {
            return Err(ApiError::Malformed(err.to_string()));
        }
        Err(_) => return Err(ApiError::HttpStatus(http_status)),
    };

    if parsed.status == "success" {
        match parsed.file_path {
            Some(file_path) => Ok(UploadReceipt {
                file_path,
                file_url: parsed.file_url.unwrap_or_default(),
                file_name: parsed.file_name.or(Some(local_name)),
            }),
            None => Err(ApiError::Malformed(
                "success response without file_path".to_string(),
            )),
        }
    } else {
        Err(ApiError::UploadRejected(
            parsed
                .message
                .unwrap_or_else(|| format!("upload failed ({})", parsed.status)),
        ))
    }
}
