//! Session and token shapes shared with the auth provider.
//!
//! The auth provider owns issuance and expiry. Everything else in the
//! workspace only reads these types, so they describe the fields other code
//! relies on: a required user identifier and an optional role, on top of the
//! base profile fields the provider supplies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// The user embedded in an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Provider-issued user identifier.
    pub id: UserId,
    /// Display name, if the provider has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address, if the provider has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Role classifier; `"admin"` grants elevated access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl SessionUser {
    /// Create a session user with only an identifier.
    #[must_use]
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            image: None,
            role: None,
        }
    }

    /// Set the role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// An authenticated session as stored server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: SessionUser,
    pub expires: DateTime<Utc>,
}

impl AuthSession {
    /// Whether the session has passed its expiry.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}

/// Claims carried by the signed session token.
///
/// `id` and `role` mirror [`SessionUser`] so the session can be rebuilt from
/// the token alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject assigned by the identity provider.
    ///
    /// Set to `id` when claims are built from a [`SessionUser`]. Tokens
    /// decoded from the provider are not checked; the user is rebuilt from
    /// `id`.
    pub sub: String,
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

impl From<&SessionUser> for TokenClaims {
    fn from(user: &SessionUser) -> Self {
        Self {
            sub: user.id.to_string(),
            id: user.id.clone(),
            role: user.role.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            picture: user.image.clone(),
        }
    }
}

impl From<TokenClaims> for SessionUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            id: claims.id,
            name: claims.name,
            email: claims.email,
            image: claims.picture,
            role: claims.role,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_session_user_omits_absent_fields() {
        let user = SessionUser::new("u1");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "u1" }));
    }

    #[test]
    fn test_session_user_accepts_missing_role() {
        let user: SessionUser =
            serde_json::from_str(r#"{"id":"u1","name":"小明","email":"a@b.cn"}"#).unwrap();
        assert_eq!(user.id.as_str(), "u1");
        assert_eq!(user.name.as_deref(), Some("小明"));
        assert!(user.role.is_none());
    }

    #[test]
    fn test_claims_carry_id_and_role() {
        let user = SessionUser::new("u1").with_role("admin");
        let claims = TokenClaims::from(&user);
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.role.as_deref(), Some("admin"));

        let back = SessionUser::from(claims);
        assert_eq!(back, user);
    }

    #[test]
    fn test_claims_rebuild_user_from_id_not_subject() {
        let claims: TokenClaims = serde_json::from_str(
            r#"{"sub":"oauth|42","id":"u1","role":"admin","picture":"https://a.cn/p.png"}"#,
        )
        .unwrap();
        assert_eq!(claims.sub, "oauth|42");

        let user = SessionUser::from(claims);
        assert_eq!(user.id.as_str(), "u1");
        assert_eq!(user.image.as_deref(), Some("https://a.cn/p.png"));
        assert_eq!(user.role.as_deref(), Some("admin"));
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let session = AuthSession {
            user: SessionUser::new("u1"),
            expires: now + Duration::hours(1),
        };
        assert!(!session.is_expired_at(now));
        assert!(session.is_expired_at(now + Duration::hours(2)));
    }
}
