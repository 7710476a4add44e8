use crate::{auth::TokenPair, config::AuthConfig, error::AppError};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Distinguishes short-lived access tokens from long-lived refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the username it was issued to.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Which of the two token kinds this is.
    pub kind: TokenKind,
}

/// Signs and verifies the service's bearer tokens.
///
/// Built once at startup from [`AuthConfig`] and shared with handlers as
/// `web::Data<TokenIssuer>`. Tokens are stateless: validity depends only on
/// the HS256 signature, the expiry and the kind claim.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expired means expired; no clock-skew grace.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            config.access_token_ttl,
            config.refresh_token_ttl,
        )
    }

    pub fn create_access_token(&self, subject: &str) -> Result<String, AppError> {
        self.issue(subject, TokenKind::Access, Utc::now())
    }

    pub fn create_refresh_token(&self, subject: &str) -> Result<String, AppError> {
        self.issue(subject, TokenKind::Refresh, Utc::now())
    }

    /// Issues a fresh access/refresh pair for `subject`.
    pub fn create_token_pair(&self, subject: &str) -> Result<TokenPair, AppError> {
        Ok(TokenPair::bearer(
            self.create_access_token(subject)?,
            self.create_refresh_token(subject)?,
        ))
    }

    /// Verifies an access token and returns its claims.
    ///
    /// Bad signature, malformed input, expiry and a refresh token presented
    /// here all yield the same `AppError::Unauthorized("Invalid token")`.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode(token, TokenKind::Access)
    }

    /// Verifies a refresh token and returns its claims. Fails like
    /// [`TokenIssuer::decode_access_token`].
    pub fn decode_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode(token, TokenKind::Refresh)
    }

    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    fn issue(
        &self,
        subject: &str,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let expiration = now
            .checked_add_signed(self.ttl(kind))
            .ok_or_else(|| AppError::InternalServerError("Token expiry out of range".into()))?;

        let claims = Claims {
            sub: subject.to_owned(),
            exp: expiration.timestamp().max(0) as usize,
            iat: now.timestamp().max(0) as usize,
            kind,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    fn decode(&self, token: &str, expected: TokenKind) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;
        if claims.kind != expected {
            log::debug!("rejected {:?} token where {:?} was expected", claims.kind, expected);
            return Err(AppError::Unauthorized("Invalid token".into()));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(secret.as_bytes(), Duration::minutes(30), Duration::days(7))
    }

    fn assert_invalid(result: Result<Claims, AppError>) {
        match result {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token"),
            Ok(claims) => panic!("token should have been rejected, got {:?}", claims),
            Err(e) => panic!("unexpected error type: {:?}", e),
        }
    }

    #[test]
    fn test_access_token_roundtrip() {
        let issuer = issuer("test_secret_for_gen_verify");
        let token = issuer.create_access_token("alice").unwrap();
        let claims = issuer.decode_access_token(&token).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.kind, TokenKind::Access);
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_refresh_token_outlives_access_token() {
        let issuer = issuer("test_secret_for_refresh");
        let pair = issuer.create_token_pair("bob").unwrap();

        let access = issuer.decode_access_token(&pair.access_token).unwrap();
        let refresh = issuer.decode_refresh_token(&pair.refresh_token).unwrap();

        assert_eq!(access.sub, "bob");
        assert_eq!(refresh.sub, "bob");
        assert_eq!(refresh.kind, TokenKind::Refresh);
        assert!(refresh.exp > access.exp);
        assert_eq!(pair.token_type, "bearer");
    }

    #[test]
    fn test_token_expiration() {
        let issuer = TokenIssuer::new(
            b"test_secret_for_expiration",
            Duration::seconds(-1),
            Duration::seconds(-1),
        );
        let access = issuer.create_access_token("carol").unwrap();
        let refresh = issuer.create_refresh_token("carol").unwrap();

        assert_invalid(issuer.decode_access_token(&access));
        assert_invalid(issuer.decode_refresh_token(&refresh));
    }

    #[test]
    fn test_token_issued_in_the_past_has_expired() {
        let issuer = issuer("test_secret_for_backdating");
        let issued_at = Utc::now() - Duration::hours(2);
        let token = issuer.issue("dave", TokenKind::Access, issued_at).unwrap();

        assert_invalid(issuer.decode_access_token(&token));
    }

    #[test]
    fn test_kind_confusion_is_rejected() {
        let issuer = issuer("test_secret_for_kinds");
        let pair = issuer.create_token_pair("erin").unwrap();

        assert_invalid(issuer.decode_access_token(&pair.refresh_token));
        assert_invalid(issuer.decode_refresh_token(&pair.access_token));
    }

    #[test]
    fn test_invalid_token_signature() {
        let token = issuer("one_secret").create_access_token("frank").unwrap();
        assert_invalid(issuer("a_completely_different_secret").decode_access_token(&token));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let issuer = issuer("test_secret_for_tampering");
        let honest = issuer.create_access_token("grace").unwrap();
        let other = issuer.create_access_token("mallory").unwrap();

        let honest_parts: Vec<&str> = honest.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", honest_parts[0], other_parts[1], honest_parts[2]);

        assert_invalid(issuer.decode_access_token(&forged));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let issuer = issuer("test_secret_for_garbage");
        assert_invalid(issuer.decode_access_token(""));
        assert_invalid(issuer.decode_access_token("invalid.token.here"));
        assert_invalid(issuer.decode_refresh_token("not-a-jwt"));
    }
}
