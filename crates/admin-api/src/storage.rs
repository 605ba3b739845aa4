//! 업로드 이미지 저장소.
//!
//! 업로드된 파일은 설정된 디렉토리에 저장되고 `public_base_url` 아래 URL로 노출됩니다.

use std::path::{Path, PathBuf};

use admin_core::AdminError;
use axum::body::Bytes;
use tracing::{info, warn};

/// 이름 검증을 마친, 아직 디스크에 쓰지 않은 업로드 파일.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    name: String,
    bytes: Bytes,
}

impl PendingUpload {
    pub fn new(file_name: &str, bytes: Bytes) -> Result<Self, AdminError> {
        Ok(Self {
            name: sanitize_file_name(file_name)?,
            bytes,
        })
    }
}

/// 로컬 디렉토리 기반 업로드 저장소.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    public_base_url: String,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 검증된 파일들을 모두 저장하고 URL 목록을 반환합니다.
    ///
    /// 같은 이름의 파일은 덮어씁니다.
    /// 중간에 쓰기가 실패하면 이번 요청에서 쓴 파일을 지우고 에러를 반환합니다.
    pub async fn save_all(&self, uploads: &[PendingUpload]) -> Result<Vec<String>, AdminError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let mut written: Vec<PathBuf> = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let path = self.dir.join(&upload.name);
            if let Err(e) = tokio::fs::write(&path, &upload.bytes).await {
                self.discard(&written).await;
                return Err(e.into());
            }
            written.push(path);
        }

        info!(count = uploads.len(), "Stored uploads");
        Ok(uploads.iter().map(|u| self.url_for(&u.name)).collect())
    }

    async fn discard(&self, paths: &[PathBuf]) {
        for path in paths {
            if let Err(e) = tokio::fs::remove_file(path).await {
                warn!(file = %path.display(), error = %e, "Failed to remove partial upload");
            }
        }
    }

    /// 파일 이름의 공개 URL.
    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), name)
    }
}

/// 클라이언트가 보낸 파일 이름을 마지막 경로 요소로 줄입니다.
///
/// 비어 있거나 `.`/`..`인 이름은 거부합니다.
pub fn sanitize_file_name(file_name: &str) -> Result<String, AdminError> {
    let name = file_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return Err(AdminError::Validation(format!(
            "invalid file name: {:?}",
            file_name
        )));
    }

    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("photo.png").unwrap(), "photo.png");
        assert_eq!(sanitize_file_name("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\a\\cat.jpg").unwrap(), "cat.jpg");
        assert_eq!(sanitize_file_name("/abs/path/x.gif").unwrap(), "x.gif");
    }

    #[test]
    fn test_sanitize_rejects_empty_and_dots() {
        for bad in ["", "   ", ".", "..", "dir/", "a/.."] {
            assert!(
                matches!(sanitize_file_name(bad), Err(AdminError::Validation(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_url_for_joins_base() {
        let store = UploadStore::new("./uploads", "http://localhost:5000/api/uploads/");
        assert_eq!(
            store.url_for("a.png"),
            "http://localhost:5000/api/uploads/a.png"
        );
    }

    #[tokio::test]
    async fn test_save_writes_inside_dir() {
        let dir = std::env::temp_dir().join(format!("admin-uploads-{}", std::process::id()));
        let store = UploadStore::new(&dir, "http://host/api/uploads");

        let upload = PendingUpload::new("../escape.txt", Bytes::from_static(b"hello")).unwrap();
        let urls = store.save_all(&[upload]).await.unwrap();

        assert_eq!(urls, vec!["http://host/api/uploads/escape.txt".to_string()]);
        let written = tokio::fs::read(dir.join("escape.txt")).await.unwrap();
        assert_eq!(written, b"hello");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[test]
    fn test_pending_upload_rejects_bad_name() {
        assert!(PendingUpload::new("..", Bytes::from_static(b"x")).is_err());
        assert!(PendingUpload::new("a/b.png", Bytes::from_static(b"x")).is_ok());
    }

    #[tokio::test]
    async fn test_save_all_returns_url_per_file() {
        let dir = std::env::temp_dir().join(format!("admin-uploads-all-{}", std::process::id()));
        let store = UploadStore::new(&dir, "http://host/api/uploads");
        let uploads = vec![
            PendingUpload::new("one.png", Bytes::from_static(b"1")).unwrap(),
            PendingUpload::new("two.png", Bytes::from_static(b"2")).unwrap(),
        ];

        let urls = store.save_all(&uploads).await.unwrap();

        assert_eq!(
            urls,
            vec![
                "http://host/api/uploads/one.png".to_string(),
                "http://host/api/uploads/two.png".to_string(),
            ]
        );
        assert_eq!(tokio::fs::read(dir.join("two.png")).await.unwrap(), b"2");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
