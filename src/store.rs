//! ワークフローストア
//!
//! 取り込み → 解析 → 物語生成 → エクスポートの状態を一元管理する。
//!
//! - 各ステージは前段のデータがなければ何もしない
//! - 上流のデータが変わったら、下流の成果物は破棄する
//! - 呼び出し開始時の入力がすでに置き換わっていれば、結果は反映しない
//!
//! 各ステージは `begin_*`（リクエスト内容の確定）と `finish_*`（結果の反映）に
//! 分かれており、`analyze` などの非同期メソッドはその2つをAPI呼び出しで繋ぐ。

use crate::client::{export_link, StoryApi};
use crate::error::{Result, StoryAlbumError};
use crate::preview::{PreviewRegistry, PreviewSet};
use crate::source::SourceFile;
use crate::status::{Stage, StageStatus, StageTicket, StageTracker};
use std::collections::HashMap;
use story_album_common::{
    AnalyzeResponse, ExportRequest, ExportResponse, Panel, PhotoAnalysis, StoryRequest,
    StoryResponse, StyleConfig,
};
use tracing::{debug, info, warn};

/// ステージ呼び出しの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// 結果をストアに反映した
    Applied,
    /// 前段のデータがないため呼び出さなかった
    Skipped,
    /// 呼び出し中に入力が置き換わったため結果を捨てた
    Discarded,
}

/// 解析リクエストの内容
#[derive(Debug, Clone)]
pub struct PendingAnalyze {
    pub ticket: StageTicket,
    pub files: Vec<SourceFile>,
}

#[derive(Debug, Clone)]
pub struct PendingStory {
    pub ticket: StageTicket,
    pub request: StoryRequest,
}

#[derive(Debug, Clone)]
pub struct PendingExport {
    pub ticket: StageTicket,
    pub request: ExportRequest,
}

/// データのリビジョン（置き換えのたびに加算）
#[derive(Debug, Default)]
struct Revisions {
    files: u64,
    photos: u64,
    panels: u64,
}

#[derive(Debug)]
pub struct WorkflowStore {
    registry: PreviewRegistry,
    files: Vec<SourceFile>,
    previews: PreviewSet,
    photos: Vec<PhotoAnalysis>,
    photo_previews: HashMap<String, String>,
    panels: Vec<Panel>,
    summary: String,
    export_link: Option<String>,
    style: StyleConfig,
    analyze: StageTracker,
    story: StageTracker,
    export: StageTracker,
    revisions: Revisions,
}

impl Default for WorkflowStore {
    fn default() -> Self {
        Self::new(StyleConfig::default())
    }
}

impl WorkflowStore {
    pub fn new(style: StyleConfig) -> Self {
        Self::with_registry(PreviewRegistry::new(), style)
    }

    pub fn with_registry(registry: PreviewRegistry, style: StyleConfig) -> Self {
        Self {
            registry,
            files: Vec::new(),
            previews: PreviewSet::default(),
            photos: Vec::new(),
            photo_previews: HashMap::new(),
            panels: Vec::new(),
            summary: String::new(),
            export_link: None,
            style,
            analyze: StageTracker::new(Stage::Analyze),
            story: StageTracker::new(Stage::Story),
            export: StageTracker::new(Stage::Export),
            revisions: Revisions::default(),
        }
    }

    // ---- 参照 ----

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn previews(&self) -> &PreviewSet {
        &self.previews
    }

    pub fn registry(&self) -> &PreviewRegistry {
        &self.registry
    }

    pub fn photos(&self) -> &[PhotoAnalysis] {
        &self.photos
    }

    /// image_id → プレビューURL
    pub fn photo_preview_map(&self) -> &HashMap<String, String> {
        &self.photo_previews
    }

    pub fn preview_for(&self, image_id: &str) -> Option<&str> {
        self.photo_previews.get(image_id).map(String::as_str)
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn export_link(&self) -> Option<&str> {
        self.export_link.as_deref()
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn status(&self, stage: Stage) -> &StageStatus {
        self.tracker(stage).status()
    }

    pub fn is_loading(&self, stage: Stage) -> bool {
        self.status(stage).is_loading()
    }

    fn tracker(&self, stage: Stage) -> &StageTracker {
        match stage {
            Stage::Analyze => &self.analyze,
            Stage::Story => &self.story,
            Stage::Export => &self.export,
        }
    }

    // ---- 文体設定（いつでも変更可、物語生成の開始時に読む） ----

    pub fn set_style(&mut self, style: impl Into<String>) {
        self.style.style = style.into();
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.style.language = language.into();
    }

    pub fn set_style_config(&mut self, style: StyleConfig) {
        self.style = style;
    }

    // ---- 取り込み ----

    /// 写真を取り込み、下流のデータをすべて破棄する
    pub fn set_files<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = SourceFile>,
    {
        // 旧世代のプレビューを先に解放
        drop(std::mem::take(&mut self.previews));

        self.files = files.into_iter().collect();
        self.previews = PreviewSet::generate(&self.registry, &self.files);

        self.photos.clear();
        self.photo_previews.clear();
        self.panels.clear();
        self.summary.clear();
        self.export_link = None;

        self.revisions.files += 1;
        self.revisions.photos += 1;
        self.revisions.panels += 1;

        for tracker in [&mut self.analyze, &mut self.story, &mut self.export] {
            tracker.reset_if_settled();
        }

        debug!(files = self.files.len(), "files ingested");
    }

    // ---- 解析 ----

    pub fn begin_analyze(&mut self) -> Option<PendingAnalyze> {
        if self.files.is_empty() {
            return None;
        }

        self.export_link = None;
        let ticket = self.analyze.begin(self.revisions.files);
        debug!(files = self.files.len(), generation = ticket.generation(), "analyze started");

        Some(PendingAnalyze {
            ticket,
            files: self.files.clone(),
        })
    }

    pub fn finish_analyze(
        &mut self,
        ticket: StageTicket,
        result: Result<AnalyzeResponse>,
    ) -> Result<StageOutcome> {
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "analyze failed");
                self.analyze.settle(&ticket, StageStatus::Failed(err.to_string()));
                return Err(err);
            }
        };

        if !self.analyze.is_current(&ticket) {
            warn!(generation = ticket.generation(), "superseded analyze result discarded");
            return Ok(StageOutcome::Discarded);
        }
        if ticket.basis != self.revisions.files {
            warn!("analyze result for replaced files discarded");
            self.analyze.settle(&ticket, StageStatus::Idle);
            return Ok(StageOutcome::Discarded);
        }

        if response.photos.len() != self.previews.len() {
            let err = StoryAlbumError::AnalysisCountMismatch {
                expected: self.previews.len(),
                actual: response.photos.len(),
            };
            warn!(error = %err, "analyze response rejected");
            self.analyze.settle(&ticket, StageStatus::Failed(err.to_string()));
            return Err(err);
        }

        self.photo_previews = response
            .photos
            .iter()
            .zip(self.previews.iter())
            .map(|(photo, preview)| (photo.image_id.clone(), preview.url().to_string()))
            .collect();
        self.photos = response.photos;
        self.revisions.photos += 1;

        // 旧写真に基づく物語は無効
        self.panels.clear();
        self.summary.clear();
        self.revisions.panels += 1;
        self.export_link = None;

        self.analyze.settle(&ticket, StageStatus::Succeeded);
        info!(photos = self.photos.len(), "analyze finished");
        Ok(StageOutcome::Applied)
    }

    pub async fn analyze<A>(&mut self, api: &A) -> Result<StageOutcome>
    where
        A: StoryApi + ?Sized,
    {
        let Some(pending) = self.begin_analyze() else {
            return Ok(StageOutcome::Skipped);
        };
        let result = api.analyze(&pending.files).await;
        self.finish_analyze(pending.ticket, result)
    }

    // ---- 物語生成 ----

    pub fn begin_story(&mut self) -> Option<PendingStory> {
        if self.photos.is_empty() {
            return None;
        }

        self.export_link = None;
        let ticket = self.story.begin(self.revisions.photos);
        debug!(
            photos = self.photos.len(),
            style = %self.style.style,
            language = %self.style.language,
            "story started"
        );

        Some(PendingStory {
            ticket,
            request: StoryRequest::from_photos(&self.photos, &self.style),
        })
    }

    pub fn finish_story(
        &mut self,
        ticket: StageTicket,
        result: Result<StoryResponse>,
    ) -> Result<StageOutcome> {
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "story generation failed");
                self.story.settle(&ticket, StageStatus::Failed(err.to_string()));
                return Err(err);
            }
        };

        if !self.story.is_current(&ticket) {
            warn!(generation = ticket.generation(), "superseded story result discarded");
            return Ok(StageOutcome::Discarded);
        }
        if ticket.basis != self.revisions.photos {
            warn!("story result for replaced photos discarded");
            self.story.settle(&ticket, StageStatus::Idle);
            return Ok(StageOutcome::Discarded);
        }

        self.panels = response.panels;
        self.summary = response.summary;
        self.revisions.panels += 1;
        self.export_link = None;

        self.story.settle(&ticket, StageStatus::Succeeded);
        info!(panels = self.panels.len(), "story generated");
        Ok(StageOutcome::Applied)
    }

    pub async fn generate_story<A>(&mut self, api: &A) -> Result<StageOutcome>
    where
        A: StoryApi + ?Sized,
    {
        let Some(pending) = self.begin_story() else {
            return Ok(StageOutcome::Skipped);
        };
        let result = api.generate_story(&pending.request).await;
        self.finish_story(pending.ticket, result)
    }

    // ---- エクスポート ----

    pub fn begin_export(&mut self) -> Option<PendingExport> {
        if self.panels.is_empty() {
            return None;
        }

        self.export_link = None;
        let ticket = self.export.begin(self.revisions.panels);
        debug!(panels = self.panels.len(), "export started");

        Some(PendingExport {
            ticket,
            request: ExportRequest::pdf(&self.panels, &self.summary),
        })
    }

    /// `base_url` はダウンロードパスの基準となるサービスURL
    pub fn finish_export(
        &mut self,
        ticket: StageTicket,
        base_url: &str,
        result: Result<ExportResponse>,
    ) -> Result<StageOutcome> {
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "export failed");
                self.export.settle(&ticket, StageStatus::Failed(err.to_string()));
                return Err(err);
            }
        };

        if !self.export.is_current(&ticket) {
            warn!(generation = ticket.generation(), "superseded export result discarded");
            return Ok(StageOutcome::Discarded);
        }
        if ticket.basis != self.revisions.panels {
            warn!("export result for replaced panels discarded");
            self.export.settle(&ticket, StageStatus::Idle);
            return Ok(StageOutcome::Discarded);
        }

        let link = export_link(base_url, &response.download_url);
        info!(link = %link, "export finished");
        self.export_link = Some(link);

        self.export.settle(&ticket, StageStatus::Succeeded);
        Ok(StageOutcome::Applied)
    }

    pub async fn export_story<A>(&mut self, api: &A) -> Result<StageOutcome>
    where
        A: StoryApi + ?Sized,
    {
        let Some(pending) = self.begin_export() else {
            return Ok(StageOutcome::Skipped);
        };
        let result = api.export(&pending.request).await;
        self.finish_export(pending.ticket, api.base_url(), result)
    }
}
