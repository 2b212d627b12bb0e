//! ストーリーアルバムAPIの型定義
//!
//! クライアントとサーバ間で受け渡される型:
//! - PhotoAnalysis: /api/analyze の出力（写真1枚ごと）
//! - StoryRequest / StoryResponse: /api/story
//! - ExportRequest / ExportResponse: /api/export
//! - StyleConfig: 物語生成時に送る文体・言語

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// エクスポート時の固定タイトル
pub const DEFAULT_TITLE: &str = "AI Story Album";

/// デフォルトの文体
pub const DEFAULT_STYLE: &str = "Heartwarming (溫馨)";

/// デフォルトの出力言語
pub const DEFAULT_LANGUAGE: &str = "zh-TW";

/// 文体プリセット（サーバは任意の文字列を受け付ける）
pub const STYLE_PRESETS: &[&str] = &[
    "Heartwarming (溫馨)",
    "Humorous (搞笑)",
    "Philosophical (文青/哲學)",
    "Cinematic (電影感)",
    "Horror (恐怖)",
];

/// 色彩プロファイル
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorProfile {
    pub brightness: f64,
    pub saturation: f64,
    pub dominant_colors: Vec<String>,
}

/// 解析内容の型付きビュー
///
/// `PhotoAnalysis::analysis` は送受信で内容を変えないよう `Value` のまま保持し、
/// 表示用にこの型へ読み替える。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisContent {
    pub caption: String,
    pub emotion: String,
    pub color_profile: ColorProfile,
    pub tags: Vec<String>,
}

/// /api/analyze が返す写真1枚分の解析結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoAnalysis {
    /// サーバ側で採番された画像ID
    pub image_id: String,

    /// アップロード時のファイル名（ローカル表示用、/api/story には送らない）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default)]
    pub analysis: Value,

    /// 未知のフィールドはそのまま保持
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PhotoAnalysis {
    pub fn new(image_id: impl Into<String>, analysis: Value) -> Self {
        Self {
            image_id: image_id.into(),
            analysis,
            ..Default::default()
        }
    }

    /// 解析内容を型付きで取得（形式が異なる場合はNone）
    pub fn content(&self) -> Option<AnalysisContent> {
        if !self.analysis.is_object() {
            return None;
        }
        serde_json::from_value(self.analysis.clone()).ok()
    }
}

/// /api/analyze のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub photos: Vec<PhotoAnalysis>,
}

/// 物語のパネル（写真1枚につき1つ、順序のみが意味を持つ）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    #[serde(default)]
    pub image_id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub body: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 文体・言語設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub style: String,
    pub language: String,
}

impl StyleConfig {
    pub fn new(style: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            language: language.into(),
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STYLE, DEFAULT_LANGUAGE)
    }
}

/// /api/story に送る写真（IDと解析内容のみ）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryPhoto {
    pub image_id: String,
    pub analysis: Value,
}

/// /api/story のリクエスト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryRequest {
    pub photos: Vec<StoryPhoto>,
    pub style: String,
    pub language: String,
}

impl StoryRequest {
    /// 解析結果から送信用ペイロードを作成
    ///
    /// ファイル名などローカル専用のフィールドは含めない。
    pub fn from_photos(photos: &[PhotoAnalysis], style: &StyleConfig) -> Self {
        Self {
            photos: photos
                .iter()
                .map(|p| StoryPhoto {
                    image_id: p.image_id.clone(),
                    analysis: p.analysis.clone(),
                })
                .collect(),
            style: style.style.clone(),
            language: style.language.clone(),
        }
    }
}

/// /api/story のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryResponse {
    pub panels: Vec<Panel>,
    pub summary: String,
}

/// 出力形式（サーバはPDFのみ対応）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
}

/// エクスポート対象のストーリーブック
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storybook {
    pub title: String,
    pub panels: Vec<Panel>,
    pub summary: String,
}

/// /api/export のリクエスト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub storybook: Storybook,
    pub format: ExportFormat,
}

impl ExportRequest {
    pub fn pdf(panels: &[Panel], summary: &str) -> Self {
        Self {
            storybook: Storybook {
                title: DEFAULT_TITLE.to_string(),
                panels: panels.to_vec(),
                summary: summary.to_string(),
            },
            format: ExportFormat::Pdf,
        }
    }
}

/// /api/export のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportResponse {
    /// サービス基準の相対パス（例: /api/exports/xxxx）
    pub download_url: String,

    #[serde(default)]
    pub export_id: Option<String>,
}
