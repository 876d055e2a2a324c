/*
 * Responsibility
 * - GET /frames/order (CanOrderFrame ポリシー通過済み)
 * - 送付先は address claim をそのまま返す
 */
use axum::Json;

use crate::api::v1::{dto::frames::OrderFrameResponse, extractors::PrincipalExtractor};

pub async fn order_frame(
    PrincipalExtractor(principal): PrincipalExtractor,
) -> Json<OrderFrameResponse> {
    Json(OrderFrameResponse {
        address: principal.get_claim("address").map(str::to_owned),
    })
}
