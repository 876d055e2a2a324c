//! access token (JWT) 検証 → Principal を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` を受け取り、AuthService で署名 + iss/aud/exp/nbf を検証する
//! - 成功時は payload 全体を `Principal` として request extensions に格納する
//! - 失敗時は 401 (理由はログにだけ残す)
//!
//! 認可 (所有者チェック / claim ポリシー) はここでは行わない。route_layer 側の責務。

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

/// 認証を掛けるための middleware を適用する。
///
/// 例：
/// ```ignore
/// let images = middleware::auth::access::apply(images, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?;

    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req).ok_or(AppError::Unauthorized)?;

    let principal = match state.auth.verify(token) {
        Ok(principal) => principal,
        Err(err) => {
            tracing::warn!(
                error = %err,
                "access token verification failed"
            );
            return Err(AppError::Unauthorized);
        }
    };

    tracing::debug!(
        sub = principal.subject().unwrap_or("-"),
        claims = principal.claims().len(),
        "access token verified"
    );

    // middleware → extractor / route_layer への受け渡し
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{Router, body::Body, http::{Request, StatusCode, header}, routing::get};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::api::v1::extractors::PrincipalExtractor;
    use crate::state::AppState;
    use crate::testing::{self, StubOwnership};

    fn router() -> Router {
        async fn whoami(PrincipalExtractor(principal): PrincipalExtractor) -> String {
            principal.subject().unwrap_or("-").to_string()
        }

        let state = testing::lazy_state(Arc::new(StubOwnership::default()));
        let routes: Router<AppState> = Router::new().route("/whoami", get(whoami));
        super::apply(routes, state.clone()).with_state(state)
    }

    async fn call(authorization: Option<String>) -> (StatusCode, String) {
        let mut req = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            req = req.header(header::AUTHORIZATION, value);
        }
        let res = router()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let (status, _) = call(None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthorized() {
        let (status, _) = call(Some("Basic dXNlcjpwYXNz".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_token_is_unauthorized() {
        let (status, _) = call(Some("Bearer abc.def.ghi".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_principal() {
        let (status, body) = call(Some(testing::bearer_for(Some("user-42"), json!({})))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "user-42");
    }

    #[tokio::test]
    async fn scheme_is_case_insensitive() {
        let bearer = testing::bearer_for(Some("user-42"), json!({}));
        let lower = bearer.replacen("Bearer", "bearer", 1);
        let (status, _) = call(Some(lower)).await;
        assert_eq!(status, StatusCode::OK);
    }
}
