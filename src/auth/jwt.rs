use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use super::Claims;
use crate::error::AppError;

/// Decodes bearer tokens into [`Claims`].
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// For tokens whose signature the API gateway authorizer has already
    /// checked. Expiry is still enforced.
    pub fn upstream() -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.insecure_disable_signature_validation();
        validation.validate_aud = false;
        validation.validate_exp = true;
        Self {
            key: DecodingKey::from_secret(&[]),
            validation,
        }
    }

    pub fn hs256(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        validation.validate_exp = true;
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        Ok(decode::<Claims>(token, &self.key, &self.validation)?.claims)
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::unauthorized(format!("Invalid or expired token: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

    use super::JwtVerifier;
    use crate::{
        auth::Claims,
        error::AppError,
        test_helpers::{now_unix, sign_token},
    };

    #[test]
    fn upstream_mode_reads_subject_without_signature_key() {
        let token = sign_token(b"whatever-the-authorizer-used", "auth0|alice");

        let claims = JwtVerifier::upstream().decode(&token).expect("claims decode");

        assert_eq!(claims.sub, "auth0|alice");
    }

    #[test]
    fn upstream_mode_still_rejects_expired_tokens() {
        let claims = Claims {
            sub: "auth0|alice".to_string(),
            iat: 1_000,
            exp: 2_000,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"s"),
        )
        .unwrap();

        let err = JwtVerifier::upstream().decode(&token).expect_err("expired");
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn hs256_mode_rejects_foreign_signature() {
        let token = sign_token(b"someone-else", "auth0|mallory");

        let err = JwtVerifier::hs256(b"local-dev-secret")
            .decode(&token)
            .expect_err("signature mismatch");

        assert!(
            err.message().starts_with("Invalid or expired token:"),
            "unexpected message: {}",
            err.message()
        );
    }

    #[test]
    fn hs256_mode_accepts_own_tokens() {
        let token = sign_token(b"local-dev-secret", "auth0|alice");

        let claims = JwtVerifier::hs256(b"local-dev-secret")
            .decode(&token)
            .expect("valid token");

        assert_eq!(claims.sub, "auth0|alice");
        assert!(claims.exp > now_unix());
    }
}
