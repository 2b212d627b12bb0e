//! ストーリーアルバムAPI連携
//!
//! 3つのエンドポイントを呼び出す:
//! - POST /api/analyze: multipart（`files` を写真ごとに繰り返し）
//! - POST /api/story: JSON
//! - POST /api/export: JSON

use crate::config::Config;
use crate::error::{Result, StoryAlbumError};
use crate::source::SourceFile;
use crate::status::Stage;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::time::Duration;
use story_album_common::{AnalyzeResponse, ExportRequest, ExportResponse, StoryRequest, StoryResponse};

const ANALYZE_PATH: &str = "/api/analyze";
const STORY_PATH: &str = "/api/story";
const EXPORT_PATH: &str = "/api/export";

/// リモートサービスの境界
#[async_trait]
pub trait StoryApi: Send + Sync {
    /// ダウンロードURLの基準となるサービスURL
    fn base_url(&self) -> &str;

    async fn analyze(&self, files: &[SourceFile]) -> Result<AnalyzeResponse>;

    async fn generate_story(&self, request: &StoryRequest) -> Result<StoryResponse>;

    async fn export(&self, request: &ExportRequest) -> Result<ExportResponse>;
}

/// reqwestによる実装
#[derive(Debug, Clone)]
pub struct HttpStoryApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStoryApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api_base_url.clone(), config.timeout())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(stage: Stage, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(StoryAlbumError::StageRequest {
                stage,
                status: status.as_u16(),
                detail: extract_detail(&text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl StoryApi for HttpStoryApi {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn analyze(&self, files: &[SourceFile]) -> Result<AnalyzeResponse> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes().to_vec())
                .file_name(file.file_name.clone())
                .mime_str(&file.mime_type)?;
            form = form.part("files", part);
        }

        let response = self
            .client
            .post(self.endpoint(ANALYZE_PATH))
            .multipart(form)
            .send()
            .await?;

        Self::read_json(Stage::Analyze, response).await
    }

    async fn generate_story(&self, request: &StoryRequest) -> Result<StoryResponse> {
        let response = self
            .client
            .post(self.endpoint(STORY_PATH))
            .json(request)
            .send()
            .await?;

        Self::read_json(Stage::Story, response).await
    }

    async fn export(&self, request: &ExportRequest) -> Result<ExportResponse> {
        let response = self
            .client
            .post(self.endpoint(EXPORT_PATH))
            .json(request)
            .send()
            .await?;

        Self::read_json(Stage::Export, response).await
    }
}

/// サービスURLと返却パスからダウンロードURLを組み立てる
pub fn export_link(base_url: &str, download_path: &str) -> String {
    if download_path.starts_with("http://") || download_path.starts_with("https://") {
        return download_path.to_string();
    }

    let base = base_url.trim_end_matches('/');
    if download_path.starts_with('/') {
        format!("{}{}", base, download_path)
    } else {
        format!("{}/{}", base, download_path)
    }
}

/// エラーレスポンスから `detail` を取り出す（なければ本文そのまま）
fn extract_detail(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => match value.get("detail") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => body.trim().to_string(),
        },
        Err(_) => body.trim().to_string(),
    }
}
