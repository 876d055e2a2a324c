use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct OrderFrameResponse {
    /// Shipping address as delivered in the caller's `address` claim.
    pub address: Option<String>,
}
