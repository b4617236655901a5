//! Admin authentication: credential check and session tokens.

mod extractor;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use crate::config::AuthSettings;
use crate::error::{AppError, AppResult};
use crate::models::SessionClaims;

pub use extractor::{AuthError, BearerAuth};

/// Issuer claim stamped on every session token.
pub const SESSION_ISSUER: &str = "ngo-impact";

/// Check a login attempt against the configured admin credentials.
///
/// Both fields are compared with `subtle::ConstantTimeEq` and both
/// comparisons always run, so a wrong username is indistinguishable from a
/// wrong password.
pub fn verify_credentials(settings: &AuthSettings, username: &str, password: &str) -> bool {
    let user_ok = settings
        .admin_username
        .as_bytes()
        .ct_eq(username.as_bytes());
    let pass_ok = settings
        .admin_password
        .expose_secret()
        .as_bytes()
        .ct_eq(password.as_bytes());

    (user_ok & pass_ok).into()
}

/// Issue an HS256 session token for `username`.
pub fn issue_token(username: &str, settings: &AuthSettings) -> AppResult<String> {
    let now = chrono::Utc::now();
    let exp = now + chrono::Duration::seconds(settings.token_ttl_secs as i64);

    let claims = SessionClaims {
        sub: username.to_string(),
        iss: SESSION_ISSUER.to_string(),
        exp: exp.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let key = EncodingKey::from_secret(settings.jwt_secret.expose_secret().as_bytes());
    encode(&Header::default(), &claims, &key)
        .map_err(|e| AppError::InvalidInput(format!("Failed to create session token: {}", e)))
}

/// Verify a session token and return its claims.
pub fn verify_token(token: &str, secret: &SecretString) -> Result<SessionClaims, String> {
    let key = DecodingKey::from_secret(secret.expose_secret().as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[SESSION_ISSUER]);
    validation.validate_aud = false;

    let token_data = decode::<SessionClaims>(token, &key, &validation)
        .map_err(|e| format!("Invalid session token: {}", e))?;

    Ok(token_data.claims)
}
