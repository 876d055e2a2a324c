/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - db: PgPool, auth: AuthService, ownership: OwnershipPolicy, images: ImageStore
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::authz::OwnershipPolicy;
use crate::services::{auth::AuthService, image_store::ImageStore};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub auth: Arc<AuthService>,
    pub ownership: OwnershipPolicy,
    pub images: ImageStore,
}

impl AppState {
    pub fn new(
        db: sqlx::PgPool,
        auth: Arc<AuthService>,
        ownership: OwnershipPolicy,
        images: ImageStore,
    ) -> Self {
        Self {
            db,
            auth,
            ownership,
            images,
        }
    }
}
