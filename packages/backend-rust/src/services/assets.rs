use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

use crate::gateway::{DataGateway, GatewayError};

pub const AUDIO_BUCKET: &str = "word-audios";
pub const IMAGE_BUCKET: &str = "word-images";
pub const COURSE_COVER_BUCKET: &str = "course-covers";
pub const LECTURE_COVER_BUCKET: &str = "lecture-covers";

const KNOWN_BUCKETS: [&str; 4] = [
    AUDIO_BUCKET,
    IMAGE_BUCKET,
    COURSE_COVER_BUCKET,
    LECTURE_COVER_BUCKET,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAsset {
    pub path: String,
    pub public_url: Option<String>,
}

pub fn is_known_bucket(bucket: &str) -> bool {
    KNOWN_BUCKETS.contains(&bucket)
}

/// Random object name keeping the uploaded file's extension
pub fn asset_path(file_name: &str) -> String {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "bin".to_string());
    format!("{}.{}", Uuid::new_v4(), ext)
}

pub fn content_type_for(path: &str) -> &'static str {
    match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

pub async fn upload_asset(
    gateway: &dyn DataGateway,
    bucket: &str,
    file_name: &str,
    bytes: Bytes,
    content_type: Option<&str>,
) -> Result<StoredAsset, GatewayError> {
    let path = asset_path(file_name);
    let content_type = content_type.unwrap_or_else(|| content_type_for(&path));
    let stored = gateway.upload_asset(bucket, &path, bytes, content_type).await?;
    tracing::info!(bucket, path = %stored, "asset uploaded");
    Ok(StoredAsset {
        public_url: gateway.resolve_public_url(bucket, Some(&stored)),
        path: stored,
    })
}
