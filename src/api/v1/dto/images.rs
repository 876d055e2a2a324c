/*
 * Responsibility
 * - Images の request/response DTO
 * - ownerId は呼び出し元の sub と同じ値になる (他人の画像は返さない)
 */
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::image_repo::ImageRow;

pub const TITLE_MAX_LEN: usize = 150;

fn validate_title(title: &str) -> Result<(), &'static str> {
    if title.trim().is_empty() {
        return Err("title is required");
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err("title is too long");
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateImageRequest {
    pub title: String,
    pub bytes: String, // base64 (standard alphabet)
}

impl CreateImageRequest {
    /// Validate and return the decoded image bytes.
    pub fn validate(&self) -> Result<Vec<u8>, &'static str> {
        validate_title(&self.title)?;

        if self.bytes.trim().is_empty() {
            return Err("bytes is required");
        }
        let bytes = STANDARD
            .decode(self.bytes.trim())
            .map_err(|_| "bytes must be base64")?;
        if bytes.is_empty() {
            return Err("bytes is required");
        }

        Ok(bytes)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateImageRequest {
    pub title: String,
}

impl UpdateImageRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_title(&self.title)
    }
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub id: String, // UUID
    pub title: String,
    pub file_name: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ImageRow> for ImageResponse {
    fn from(row: ImageRow) -> Self {
        Self {
            id: row.image_id.to_string(),
            title: row.title,
            file_name: row.file_name,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
