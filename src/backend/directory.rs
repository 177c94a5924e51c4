//! Serves files under a root directory as resources.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use super::Backend;
use crate::clock::http_date;
use crate::constants::{CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED};
use crate::resource::{FetchError, FetchResult, Headers, Resource};

/// Backend reading `{root}/{identifier}` from disk.
///
/// Missing files map to 404 and unreadable files to 403, so both are cacheable.
/// Identifiers that try to leave the root are rejected as 403.
#[derive(Debug, Clone)]
pub struct DirectoryBackend {
    root: PathBuf,
}

impl DirectoryBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn sanitize_identifier(identifier: &str) -> Option<PathBuf> {
    let trimmed = identifier.trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }

    let mut out = PathBuf::new();
    for c in Path::new(trimmed).components() {
        match c {
            Component::Normal(seg) => out.push(seg),
            Component::CurDir => continue,
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("pbf") | Some("mvt") => "application/x-protobuf",
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl Backend for DirectoryBackend {
    async fn fetch(&self, identifier: &str) -> FetchResult {
        let Some(rel) = sanitize_identifier(identifier) else {
            tracing::warn!(identifier, "Rejected identifier outside of root");
            return Err(FetchError::forbidden());
        };
        let path = self.root.join(rel);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return Err(match e.kind() {
                    ErrorKind::NotFound => FetchError::not_found(),
                    ErrorKind::PermissionDenied => FetchError::forbidden(),
                    // A directory is not a resource.
                    ErrorKind::IsADirectory => FetchError::not_found(),
                    _ => FetchError::new(format!("failed to read {}: {}", path.display(), e)),
                });
            }
        };

        let mut headers = Headers::new();
        headers.insert(CONTENT_TYPE, content_type_for(&path));
        headers.insert(CONTENT_LENGTH, bytes.len().to_string());
        if let Ok(modified) = tokio::fs::metadata(&path).await.and_then(|m| m.modified()) {
            headers.insert(LAST_MODIFIED, http_date(DateTime::<Utc>::from(modified)));
        }

        Ok(Resource::new(bytes, headers))
    }

    fn descriptor(&self) -> Value {
        json!({ "type": "directory", "root": self.root.display().to_string() })
    }
}
