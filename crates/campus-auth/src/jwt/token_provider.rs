//! JWT token provider for creating and validating tokens.

use super::Claims;
use campus_config::SecurityConfig;
use campus_core::{CampusError, CampusResult, UserId, UserRole};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tracing::{debug, warn};

/// JWT token provider service.
#[derive(Clone)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: Arc<SecurityConfig>,
    validation: Validation,
}

impl TokenProvider {
    /// Creates a new token provider.
    #[must_use]
    pub fn new(config: Arc<SecurityConfig>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.jwt_issuer]);
        validation.set_audience(&[&config.jwt_audience]);
        validation.validate_exp = true;

        Self {
            encoding_key,
            decoding_key,
            config,
            validation,
        }
    }

    /// Generates an access token for a user.
    pub fn generate_token(&self, user_id: UserId, role: UserRole) -> CampusResult<String> {
        let expires_at = Utc::now() + Duration::seconds(self.config.jwt_expiration_secs as i64);

        let claims = Claims::new(
            user_id,
            role,
            self.config.jwt_issuer.clone(),
            self.config.jwt_audience.clone(),
            expires_at,
        );

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| CampusError::Internal(format!("Failed to generate token: {}", e)))?;

        debug!("Generated access token for user {}", user_id);
        Ok(token)
    }

    /// Validates a token's signature and expiry and returns the claims.
    pub fn validate_token(&self, token: &str) -> CampusResult<Claims> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                warn!("Token validation failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => CampusError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidToken
                    | jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        CampusError::InvalidToken("Invalid token signature".to_string())
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                        CampusError::InvalidToken("Invalid token issuer".to_string())
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                        CampusError::InvalidToken("Invalid token audience".to_string())
                    }
                    _ => CampusError::InvalidToken(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("issuer", &self.config.jwt_issuer)
            .field("audience", &self.config.jwt_audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_provider() -> TokenProvider {
        let config = SecurityConfig {
            jwt_secret: "test-secret-key-for-testing-only".to_string(),
            jwt_expiration_secs: 3600,
            jwt_issuer: "test-issuer".to_string(),
            jwt_audience: "test-audience".to_string(),
            token_cache_ttl_secs: 600,
        };
        TokenProvider::new(Arc::new(config))
    }

    #[test]
    fn test_generate_and_validate_token() {
        let provider = create_test_provider();
        let user_id = UserId::new();

        let token = provider.generate_token(user_id, UserRole::Student).unwrap();
        let claims = provider.validate_token(&token).unwrap();

        assert_eq!(claims.user_id(), Some(user_id));
        assert_eq!(claims.role, UserRole::Student);
    }

    #[test]
    fn test_invalid_token() {
        let provider = create_test_provider();
        let result = provider.validate_token("invalid-token");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let provider1 = create_test_provider();
        let provider2 = TokenProvider::new(Arc::new(SecurityConfig {
            jwt_secret: "a-completely-different-secret".to_string(),
            jwt_expiration_secs: 3600,
            jwt_issuer: "test-issuer".to_string(),
            jwt_audience: "test-audience".to_string(),
            token_cache_ttl_secs: 600,
        }));

        let token = provider1
            .generate_token(UserId::new(), UserRole::Student)
            .unwrap();
        assert!(provider2.validate_token(&token).is_err());
    }
}
