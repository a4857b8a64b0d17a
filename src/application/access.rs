//! Shared-secret verification for the admin surface.

use subtle::ConstantTimeEq;

/// Admin shared key and login credentials, loaded once from configuration.
///
/// Comparisons run in constant time so probing the header or the login
/// endpoint cannot learn matching prefixes from response latency.
#[derive(Clone)]
pub struct AdminAccess {
    api_key: String,
    username: String,
    password: String,
}

impl AdminAccess {
    pub fn new(
        api_key: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check a presented `x-admin-key` header value.
    pub fn verify_key(&self, presented: &str) -> bool {
        constant_time_eq(&self.api_key, presented)
    }

    /// Check a login attempt. Both fields are always compared so a failed
    /// username costs the same as a failed password.
    pub fn verify_login(&self, username: &str, password: &str) -> bool {
        let username_ok = constant_time_eq(&self.username, username);
        let password_ok = constant_time_eq(&self.password, password);
        username_ok & password_ok
    }
}

impl std::fmt::Debug for AdminAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccess")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

fn constant_time_eq(expected: &str, presented: &str) -> bool {
    expected.as_bytes().ct_eq(presented.as_bytes()).unwrap_u8() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access() -> AdminAccess {
        AdminAccess::new("gate-key", "admin", "handloom")
    }

    #[test]
    fn verify_key_accepts_exact_match_only() {
        let access = access();
        assert!(access.verify_key("gate-key"));
        assert!(!access.verify_key("gate-ke"));
        assert!(!access.verify_key("gate-key "));
        assert!(!access.verify_key(""));
    }

    #[test]
    fn verify_login_requires_both_fields() {
        let access = access();
        assert!(access.verify_login("admin", "handloom"));
        assert!(!access.verify_login("admin", "wrong"));
        assert!(!access.verify_login("wrong", "handloom"));
        assert!(!access.verify_login("", ""));
    }
}
