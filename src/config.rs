use crate::error::{Result, StoryAlbumError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use story_album_common::{StyleConfig, DEFAULT_LANGUAGE, DEFAULT_STYLE};

/// サービスURLを上書きする環境変数
pub const API_BASE_URL_ENV: &str = "STORY_ALBUM_API_BASE_URL";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub timeout_seconds: u64,
    pub style: String,
    pub language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            timeout_seconds: 120,  // 解析・PDF生成は時間がかかる
            style: DEFAULT_STYLE.into(),
            language: DEFAULT_LANGUAGE.into(),
        }
    }
}

impl Config {
    /// 設定ファイル → 環境変数の順に読み込む
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_base_url_override(std::env::var(API_BASE_URL_ENV).ok());
        Ok(config)
    }

    /// 指定パスから読み込み（存在しなければデフォルト）
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| StoryAlbumError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("story-album").join("config.json"))
    }

    fn apply_base_url_override(&mut self, value: Option<String>) {
        // 空文字は未設定扱い
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// ストアの初期文体設定
    pub fn style_config(&self) -> StyleConfig {
        StyleConfig::new(self.style.clone(), self.language.clone())
    }
}
