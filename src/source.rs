//! アップロード対象ファイル
//!
//! ユーザーが選択した写真を、ファイル名・MIMEタイプ・内容とともに保持する。
//! 入力リスト内の位置がそのまま識別子になる。

use crate::error::{Result, StoryAlbumError};
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub file_name: String,
    pub mime_type: String,
    bytes: Arc<[u8]>,
}

impl SourceFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// ファイルを読み込み、拡張子からMIMEタイプを推定
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(StoryAlbumError::FileNotFound(path.display().to_string()));
        }

        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self::new(file_name, mime_for_path(path), bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => OCTET_STREAM,
    }
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// フォルダ直下の写真を読み込む（ファイル名順）
pub fn scan_folder(folder: &Path) -> Result<Vec<SourceFile>> {
    if !folder.is_dir() {
        return Err(StoryAlbumError::FolderNotFound(folder.display().to_string()));
    }

    let mut paths: Vec<_> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_image_path(p))
        .collect();

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    paths.iter().map(|p| SourceFile::from_path(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.JPEG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("a.gif")), OCTET_STREAM);
        assert_eq!(mime_for_path(Path::new("noext")), OCTET_STREAM);
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(StoryAlbumError::FolderNotFound(_))));
    }

    #[test]
    fn test_scan_folder_filters_and_sorts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("c.png"), b"png").unwrap();
        fs::write(dir.path().join("a.JPG"), b"jpg").unwrap();
        fs::write(dir.path().join("b.jpeg"), b"jpeg").unwrap();
        fs::write(dir.path().join("notes.txt"), b"text").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("d.jpg"), b"deep").unwrap();

        let files = scan_folder(dir.path()).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();

        assert_eq!(names, vec!["a.JPG", "b.jpeg", "c.png"]);
        assert_eq!(files[0].mime_type, "image/jpeg");
        assert_eq!(files[2].mime_type, "image/png");
        assert_eq!(files[1].bytes(), b"jpeg");
    }

    #[test]
    fn test_from_path_missing() {
        let result = SourceFile::from_path(Path::new("/nonexistent/photo.jpg"));
        assert!(matches!(result, Err(StoryAlbumError::FileNotFound(_))));
    }
}
