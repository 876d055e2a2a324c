use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::authz::Principal;
use crate::error::AppError;

/// Handler で Principal を受け取るための extractor
/// access middleware が Principal を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（認証がかかってない・ミドルウェア未設定）
pub struct PrincipalExtractor(pub Principal);

impl<S> FromRequestParts<S> for PrincipalExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(PrincipalExtractor)
            .ok_or(AppError::Unauthorized)
    }
}
