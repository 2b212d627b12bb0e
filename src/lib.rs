//! AI写真ストーリーアルバム・クライアント
//!
//! 写真の取り込みから解析・物語生成・PDFエクスポートまでの状態を
//! `WorkflowStore` で管理し、リモートサービスは `StoryApi` 越しに呼び出す。

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod preview;
pub mod source;
pub mod status;
pub mod store;

pub use client::{export_link, HttpStoryApi, StoryApi};
pub use config::Config;
pub use error::{Result, StoryAlbumError};
pub use preview::{PreviewHandle, PreviewRegistry, PreviewSet};
pub use source::{scan_folder, SourceFile};
pub use status::{Stage, StageStatus, StageTicket};
pub use store::{PendingAnalyze, PendingExport, PendingStory, StageOutcome, WorkflowStore};
pub use story_album_common as common;
