/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は認証なし、それ以外は access middleware (Bearer) の内側
 * - 認可は route_layer で handler の手前に掛ける
 *   - /images/{id}: 所有者チェック (must_own_image)
 *   - POST /images: PayingUser, GET /frames/order: CanOrderFrame
 */
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::{
    api::v1::handlers::{
        frames::order_frame,
        health::health,
        images::{create_image, delete_image, get_image, list_images, update_image},
    },
    authz::ClaimsPolicy,
    middleware::auth::{access, ownership::must_own_image, policy::require_policy},
    state::AppState,
};

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route(
            "/images",
            get(list_images).merge(
                post(create_image)
                    .route_layer(from_fn_with_state(ClaimsPolicy::paying_user(), require_policy)),
            ),
        )
        .route(
            "/images/{id}",
            get(get_image)
                .put(update_image)
                .delete(delete_image)
                .route_layer(from_fn_with_state(state.clone(), must_own_image)),
        )
        .route(
            "/frames/order",
            get(order_frame)
                .route_layer(from_fn_with_state(ClaimsPolicy::can_order_frame(), require_policy)),
        );

    Router::new()
        .route("/health", get(health))
        .merge(access::apply(protected, state))
}
