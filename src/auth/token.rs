use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::identity::Role;
use crate::{config::Config, error::ServiceError};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

pub fn issue(
    config: &Config,
    id: i32,
    role: Role,
    kind: Option<String>,
) -> Result<String, ServiceError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: id.to_string(),
        role,
        kind,
        iat: now,
        exp: now + config.token_ttl_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|err| ServiceError::Internal(format!("failed to sign token: {}", err)))
}

pub fn verify(config: &Config, token: &str) -> Result<Claims, ServiceError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|err| {
        debug!("token rejected: {}", err);
        ServiceError::Unauthorized("invalid or expired token".to_string())
    })
}
