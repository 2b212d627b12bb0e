//! プレビューハンドル管理
//!
//! 取り込んだ写真ごとに、表示用の参照（`blob:` URL）を発行する。
//! ハンドルは取り込み1回分（世代）の `PreviewSet` が所有し、次の取り込みで
//! セットごと破棄された時点で `Drop` により一度だけ解放される。

use crate::source::SourceFile;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const URL_PREFIX: &str = "blob:story-album/";

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    /// URL → data URL
    live: HashMap<String, String>,
    released: u64,
}

/// プロセス内のプレビュー参照レジストリ
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

fn lock(inner: &Mutex<RegistryInner>) -> MutexGuard<'_, RegistryInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// ファイル内容からプレビューを作成
    pub fn create(&self, file: &SourceFile) -> PreviewHandle {
        let data_url = format!("data:{};base64,{}", file.mime_type, STANDARD.encode(file.bytes()));

        let mut inner = lock(&self.inner);
        inner.next_id += 1;
        let url = format!("{}{}", URL_PREFIX, inner.next_id);
        inner.live.insert(url.clone(), data_url);

        PreviewHandle {
            url,
            registry: Arc::clone(&self.inner),
        }
    }

    /// 表示用のdata URLを取得（解放済みならNone）
    pub fn resolve(&self, url: &str) -> Option<String> {
        lock(&self.inner).live.get(url).cloned()
    }

    pub fn is_live(&self, url: &str) -> bool {
        lock(&self.inner).live.contains_key(url)
    }

    pub fn live_count(&self) -> usize {
        lock(&self.inner).live.len()
    }

    /// これまでに解放したハンドル数
    pub fn released_count(&self) -> u64 {
        lock(&self.inner).released
    }
}

/// 解放責任を持つプレビュー参照
///
/// `Clone` は実装しない。所有者は常に1つ。
pub struct PreviewHandle {
    url: String,
    registry: Arc<Mutex<RegistryInner>>,
}

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PreviewHandle").field(&self.url).finish()
    }
}

impl fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        let mut inner = lock(&self.registry);
        if inner.live.remove(&self.url).is_some() {
            inner.released += 1;
            tracing::trace!(url = %self.url, "preview released");
        }
    }
}

/// 取り込み1回分のプレビュー（ファイルと同じ順序）
#[derive(Debug, Default)]
pub struct PreviewSet {
    handles: Vec<PreviewHandle>,
}

impl PreviewSet {
    pub fn generate(registry: &PreviewRegistry, files: &[SourceFile]) -> Self {
        Self {
            handles: files.iter().map(|f| registry.create(f)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PreviewHandle> {
        self.handles.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PreviewHandle> {
        self.handles.iter()
    }

    pub fn urls(&self) -> Vec<String> {
        self.handles.iter().map(|h| h.url.clone()).collect()
    }
}
