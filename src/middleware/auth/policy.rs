//! Claims-policy gate, e.g. "PayingUser" for uploads.
//!
//! Attach per method with
//! `route_layer(middleware::from_fn_with_state(policy, require_policy))`.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::authz::{ClaimsPolicy, Decision, Principal};
use crate::error::AppError;

pub async fn require_policy(
    State(policy): State<ClaimsPolicy>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let principal = req
        .extensions()
        .get::<Principal>()
        .ok_or(AppError::Unauthorized)?;

    let decision = policy.evaluate(principal);

    match decision {
        Decision::Allow => Ok(next.run(req).await),
        Decision::Deny(reason) => {
            tracing::info!(
                policy = policy.name,
                reason = reason.as_str(),
                "claims policy denied request"
            );
            Err(AppError::Forbidden)
        }
    }
}
