//! Authorization predicates.
//!
//! Absent users and absent sessions are never errors; they are simply not
//! authorized.

use crate::session::{AuthSession, SessionUser, TokenClaims};

/// The role string that grants elevated access.
pub const ADMIN_ROLE: &str = "admin";

/// A user-like record that may carry a role.
pub trait HasRole {
    fn role(&self) -> Option<&str>;
}

impl HasRole for SessionUser {
    fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

impl HasRole for TokenClaims {
    fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

/// Returns `true` if and only if the user is present and its role is exactly `"admin"`.
#[must_use]
pub fn is_admin<U: HasRole + ?Sized>(user: Option<&U>) -> bool {
    user.and_then(HasRole::role) == Some(ADMIN_ROLE)
}

/// Returns `true` if the session exists and its user passes [`is_admin`].
#[must_use]
pub fn is_admin_session(session: Option<&AuthSession>) -> bool {
    session.is_some_and(|s| is_admin(Some(&s.user)))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn session_with(role: Option<&str>) -> AuthSession {
        let mut user = SessionUser::new("u1");
        user.role = role.map(String::from);
        AuthSession {
            user,
            expires: Utc::now(),
        }
    }

    #[test]
    fn test_is_admin_exact_match() {
        let admin = SessionUser::new("u1").with_role("admin");
        assert!(is_admin(Some(&admin)));
    }

    #[test]
    fn test_is_admin_rejects_other_roles() {
        for role in ["user", "Admin", "ADMIN", "admin ", " admin", "", "superadmin"] {
            let user = SessionUser::new("u1").with_role(role);
            assert!(!is_admin(Some(&user)), "role {role:?} must not be admin");
        }
    }

    #[test]
    fn test_is_admin_absent() {
        assert!(!is_admin::<SessionUser>(None));
        assert!(!is_admin(Some(&SessionUser::new("u1"))));
    }

    #[test]
    fn test_is_admin_on_claims() {
        let claims = TokenClaims::from(&SessionUser::new("u1").with_role("admin"));
        assert!(is_admin(Some(&claims)));
    }

    #[test]
    fn test_session_guard() {
        assert!(!is_admin_session(None));
        assert!(is_admin_session(Some(&session_with(Some("admin")))));
        assert!(!is_admin_session(Some(&session_with(Some("user")))));
        assert!(!is_admin_session(Some(&session_with(None))));
    }
}
