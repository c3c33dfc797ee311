//! Session token minting and verification.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domains::auth::types::Role;

/// Fixed validity window for session tokens.
///
/// Expiry is the only invalidation path: there is no refresh or revocation
/// in this service, so a compromised token stays valid until it lapses.
/// Revocation would have to be layered on top, e.g. a denylist keyed by
/// `jti`.
pub const TOKEN_VALIDITY_DAYS: i64 = 30;

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,    // Subject (identity id as string)
    pub uid: Uuid,      // Identity UUID
    pub mobile: String, // Mobile number the identity was verified against
    pub role: Role,     // Role claimed at issuance
    pub exp: i64,       // Expiration timestamp
    pub iat: i64,       // Issued at timestamp
    pub iss: String,    // Issuer
    pub jti: String,    // JWT ID (unique token identifier)
}

/// Mints and verifies session tokens over a process-wide signing secret.
///
/// The secret and issuer are injected at construction from configuration;
/// a missing secret fails startup, never an individual request.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Mint a session token asserting {identity id, mobile, role}.
    pub fn issue_token(
        &self,
        identity_id: Uuid,
        mobile: String,
        role: Role,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::days(TOKEN_VALIDITY_DAYS);

        let claims = Claims {
            sub: identity_id.to_string(),
            uid: identity_id,
            mobile,
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Verify and decode a session token.
    ///
    /// Returns claims if the signature, issuer, and expiry all check out.
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test_secret_key", "test_issuer".to_string())
    }

    #[test]
    fn test_issue_and_verify_token() {
        let service = service();
        let identity_id = Uuid::new_v4();

        let token = service
            .issue_token(identity_id, "9876543210".to_string(), Role::Employer)
            .unwrap();

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.uid, identity_id);
        assert_eq!(claims.sub, identity_id.to_string());
        assert_eq!(claims.mobile, "9876543210");
        assert_eq!(claims.role, Role::Employer);
        assert_eq!(claims.iss, "test_issuer");
    }

    #[test]
    fn test_invalid_token() {
        let result = service().verify_token("invalid_token");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = JwtService::new("secret1", "test_issuer".to_string());
        let service2 = JwtService::new("secret2", "test_issuer".to_string());

        let token = service1
            .issue_token(Uuid::new_v4(), "9876543210".to_string(), Role::Candidate)
            .unwrap();

        // Token minted with secret1 must not verify with secret2
        assert!(service2.verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let issuer_a = JwtService::new("shared_secret", "issuer-a".to_string());
        let issuer_b = JwtService::new("shared_secret", "issuer-b".to_string());

        let token = issuer_a
            .issue_token(Uuid::new_v4(), "9876543210".to_string(), Role::Candidate)
            .unwrap();

        assert!(issuer_b.verify_token(&token).is_err());
    }

    #[test]
    fn test_validity_window_is_thirty_days() {
        let service = service();
        let token = service
            .issue_token(Uuid::new_v4(), "9876543210".to_string(), Role::Candidate)
            .unwrap();

        let claims = service.verify_token(&token).unwrap();
        let now = chrono::Utc::now().timestamp();
        let expires_in = claims.exp - now;
        assert!(expires_in > 29 * 24 * 3600);
        assert!(expires_in <= 30 * 24 * 3600);
    }
}
