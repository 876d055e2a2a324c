//! Resource-ownership gate for `/images/{id}` routes.
//!
//! Runs as a `route_layer` after the access middleware, so the route's path
//! params and the caller's `Principal` are both available. The handler is
//! never reached on `Deny`.

use axum::{
    body::Body,
    extract::{RawPathParams, State, rejection::RawPathParamsRejection},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::authz::{Decision, Principal};
use crate::error::AppError;
use crate::state::AppState;

pub const RESOURCE_ID_PARAM: &str = "id";

pub async fn must_own_image(
    State(state): State<AppState>,
    params: Result<RawPathParams, RawPathParamsRejection>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let principal = req
        .extensions()
        .get::<Principal>()
        .ok_or(AppError::Unauthorized)?;

    // a missing `id` segment evaluates like a malformed one
    let resource_id = match &params {
        Ok(params) => params
            .iter()
            .find(|(name, _)| *name == RESOURCE_ID_PARAM)
            .map(|(_, value)| value.to_owned())
            .unwrap_or_default(),
        Err(_) => String::new(),
    };

    let decision = state.ownership.evaluate(&resource_id, principal).await;

    match decision {
        Decision::Allow => Ok(next.run(req).await),
        Decision::Deny(reason) => {
            tracing::info!(
                reason = reason.as_str(),
                path = %req.uri().path(),
                "ownership check denied request"
            );
            Err(AppError::Forbidden)
        }
    }
}
