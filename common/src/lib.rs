//! Story Album Common Library
//!
//! ストーリーアルバムAPIとの間で共有される型

pub mod types;

pub use types::{
    AnalysisContent, AnalyzeResponse, ColorProfile, ExportFormat, ExportRequest, ExportResponse,
    Panel, PhotoAnalysis, StoryPhoto, StoryRequest, StoryResponse, Storybook, StyleConfig,
    DEFAULT_LANGUAGE, DEFAULT_STYLE, DEFAULT_TITLE, STYLE_PRESETS,
};
