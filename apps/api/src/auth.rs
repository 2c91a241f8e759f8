//! JWT authentication module.
//!
//! Customer tokens are issued by the DeliverUS auth service, which shares the
//! signing secret with this server. Handlers that need a customer take a
//! [`Customer`] argument; the extractor rejects the request with 401 before
//! the handler runs.
//!
//! ```text
//! Authorization: Bearer eyJhbGciOi...
//!                       │
//!                       ▼
//! JwtManager::validate_access_token ──► Claims { sub: "42", .. } ──► Customer { id: 42 }
//! ```

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

const ACCESS: &str = "access";

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (customer id)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,

    /// Token type, always "access" for customer tokens
    pub token_type: String,
}

/// JWT token manager.
pub struct JwtManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime_secs: i64,
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: &str, lifetime_secs: i64) -> Self {
        JwtManager {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime_secs,
        }
    }

    /// Issues an access token for a customer.
    ///
    /// Production tokens come from the auth service; this is what the seed
    /// tooling and the integration tests use.
    pub fn issue(&self, customer_id: i64) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: customer_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: ACCESS.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(token, &self.decoding, &validation)
            .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }

    /// Validate that a token is an access token and return its customer id.
    pub fn validate_access_token(&self, token: &str) -> Result<i64, ApiError> {
        let claims = self.validate_token(token)?;

        if claims.token_type != ACCESS {
            return Err(ApiError::unauthorized("Expected access token"));
        }

        claims
            .sub
            .parse()
            .map_err(|_| ApiError::unauthorized("Token subject is not a customer id"))
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// =============================================================================
// Customer Extractor
// =============================================================================

/// The authenticated customer making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Customer {
    pub id: i64,
}

impl Customer {
    /// Fails with 403 unless `owner_id` is this customer.
    pub fn ensure_owns(&self, owner_id: i64, order_id: i64) -> Result<(), ApiError> {
        if self.id == owner_id {
            Ok(())
        } else {
            tracing::warn!(customer_id = self.id, order_id, "Access to another customer's order");
            Err(ApiError::forbidden(format!(
                "Order {} belongs to another customer",
                order_id
            )))
        }
    }
}

impl FromRequestParts<Arc<AppState>> for Customer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

        let id = state.jwt.validate_access_token(token)?;
        Ok(Customer { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret", 3600);

        let token = manager.issue(42).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.token_type, "access");
        assert_eq!(manager.validate_access_token(&token).unwrap(), 42);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtManager::new("issuer-secret", 3600);
        let verifier = JwtManager::new("other-secret", 3600);

        let token = issuer.issue(42).unwrap();
        let err = verifier.validate_access_token(&token).unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[test]
    fn test_expired_token_rejected() {
        // Past the default 60s leeway
        let manager = JwtManager::new("test-secret", -3600);
        let token = manager.issue(42).unwrap();
        assert!(manager.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
    }

    #[test]
    fn test_ensure_owns() {
        let customer = Customer { id: 1 };
        assert!(customer.ensure_owns(1, 10).is_ok());
        let err = customer.ensure_owns(2, 10).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
