/// Factory: build `AuthService` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AuthService, access_jwt::AccessJwtError};

pub fn build_auth_service(config: &Config) -> Result<Arc<AuthService>, AccessJwtError> {
    let auth = AuthService::new(
        &config.access_jwt_public_key_pem,
        config.auth_issuer.as_str(),
        &config.auth_audience,
        config.access_token_leeway_seconds,
    )?;

    Ok(Arc::new(auth))
}
