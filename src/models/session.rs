//! Session model: token claims and the injected session context

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT claims issued by the authentication provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub email: String,
    /// Display name, when the provider has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

/// Identity of the signed-in user submitting a registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Submitter {
    pub email: String,
    pub display_name: Option<String>,
}

impl Submitter {
    pub fn new(email: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            email: email.into(),
            display_name,
        }
    }

    /// Name shown in notifications, falling back to the email
    pub fn label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

impl From<UserClaims> for Submitter {
    fn from(claims: UserClaims) -> Self {
        Self {
            email: claims.email,
            display_name: claims.name,
        }
    }
}

/// Session passed into the registration workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionContext {
    SignedIn(Submitter),
    SignedOut,
}

impl SessionContext {
    pub fn submitter(&self) -> Option<&Submitter> {
        match self {
            SessionContext::SignedIn(submitter) => Some(submitter),
            SessionContext::SignedOut => None,
        }
    }
}

impl From<Option<UserClaims>> for SessionContext {
    fn from(claims: Option<UserClaims>) -> Self {
        claims
            .map(|c| SessionContext::SignedIn(c.into()))
            .unwrap_or(SessionContext::SignedOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(exp_offset: i64) -> UserClaims {
        let now = chrono::Utc::now().timestamp();
        UserClaims {
            sub: "user@example.com".to_string(),
            email: "user@example.com".to_string(),
            name: Some("Taro".to_string()),
            exp: now + exp_offset,
            iat: now,
        }
    }

    #[test]
    fn test_token_roundtrip() {
        let token = claims(3600).create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.email, "user@example.com");
        assert_eq!(parsed.name.as_deref(), Some("Taro"));
    }

    #[test]
    fn test_token_rejected_with_wrong_secret_or_expired() {
        let token = claims(3600).create_token("secret").unwrap();
        assert!(UserClaims::from_token(&token, "other").is_err());

        let expired = claims(-3600).create_token("secret").unwrap();
        assert!(UserClaims::from_token(&expired, "secret").is_err());
    }

    #[test]
    fn test_submitter_label_falls_back_to_email() {
        assert_eq!(Submitter::new("a@b.c", Some("Hanako".into())).label(), "Hanako");
        assert_eq!(Submitter::new("a@b.c", None).label(), "a@b.c");
        assert_eq!(Submitter::new("a@b.c", Some(" ".into())).label(), "a@b.c");
    }
}
