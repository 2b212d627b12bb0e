use crate::status::Stage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoryAlbumError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{stage}リクエスト失敗 (HTTP {status}): {detail}")]
    StageRequest {
        stage: Stage,
        status: u16,
        detail: String,
    },

    #[error("解析結果の件数が一致しません: 送信 {expected}枚, 受信 {actual}件")]
    AnalysisCountMismatch { expected: usize, actual: usize },

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoryAlbumError>;
