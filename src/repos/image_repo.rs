/*
 * Responsibility
 * - images テーブル向け SQLx 操作
 * - "ownerId" は作成時に決まり、以後このモジュールでも更新しない
 * - OwnershipLookup の Postgres 実装 (PgImageOwnership)
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::authz::ownership::{ImageId, OwnershipLookup};
use crate::repos::error::RepoError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ImageRow {
    #[sqlx(rename = "imageId")]
    pub image_id: Uuid,

    pub title: String,

    #[sqlx(rename = "fileName")]
    pub file_name: String,

    #[sqlx(rename = "ownerId")]
    pub owner_id: String,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

pub async fn list_by_owner(pool: &PgPool, owner_id: &str) -> Result<Vec<ImageRow>, RepoError> {
    let rows = sqlx::query_as::<_, ImageRow>(
        r#"
        SELECT
            "imageId", title, "fileName", "ownerId", "createdAt", "updatedAt"
        FROM images
        WHERE "ownerId" = $1
        ORDER BY title
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get(pool: &PgPool, image_id: ImageId) -> Result<Option<ImageRow>, RepoError> {
    let row = sqlx::query_as::<_, ImageRow>(
        r#"
        SELECT
            "imageId", title, "fileName", "ownerId", "createdAt", "updatedAt"
        FROM images
        WHERE "imageId" = $1
        "#,
    )
    .bind(image_id.0)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn create(
    pool: &PgPool,
    image_id: ImageId,
    title: &str,
    file_name: &str,
    owner_id: &str,
) -> Result<ImageRow, RepoError> {
    let row = sqlx::query_as::<_, ImageRow>(
        r#"
        INSERT INTO images ("imageId", title, "fileName", "ownerId")
        VALUES ($1, $2, $3, $4)
        RETURNING
            "imageId", title, "fileName", "ownerId", "createdAt", "updatedAt"
        "#,
    )
    .bind(image_id.0)
    .bind(title)
    .bind(file_name)
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn update_title(
    pool: &PgPool,
    image_id: ImageId,
    title: &str,
) -> Result<Option<ImageRow>, RepoError> {
    let row = sqlx::query_as::<_, ImageRow>(
        r#"
        UPDATE images
        SET
            title = $2,
            "updatedAt" = now()
        WHERE "imageId" = $1
        RETURNING
            "imageId", title, "fileName", "ownerId", "createdAt", "updatedAt"
        "#,
    )
    .bind(image_id.0)
    .bind(title)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns the deleted row so the caller can remove the stored file.
pub async fn delete(pool: &PgPool, image_id: ImageId) -> Result<Option<ImageRow>, RepoError> {
    let row = sqlx::query_as::<_, ImageRow>(
        r#"
        DELETE FROM images
        WHERE "imageId" = $1
        RETURNING
            "imageId", title, "fileName", "ownerId", "createdAt", "updatedAt"
        "#,
    )
    .bind(image_id.0)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn is_owner(pool: &PgPool, image_id: ImageId, owner_id: &str) -> Result<bool, RepoError> {
    let owned = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM images
            WHERE "imageId" = $1 AND "ownerId" = $2
        )
        "#,
    )
    .bind(image_id.0)
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    Ok(owned)
}

/// Postgres-backed ownership lookup. `PgPool` is cheap to clone and safe for concurrent reads.
#[derive(Clone, Debug)]
pub struct PgImageOwnership {
    pool: PgPool,
}

impl PgImageOwnership {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnershipLookup for PgImageOwnership {
    async fn is_owner(&self, image_id: ImageId, subject: &str) -> Result<bool, RepoError> {
        is_owner(&self.pool, image_id, subject).await
    }
}
