// Declaro — Session data models
//
// SECURITY: `CredentialEntry::password_hash` is private and redacted from
// Debug output. Plaintext passwords never reach these types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The authenticated user's identity and store profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub store_name: String,
    #[serde(default)]
    pub store_address: String,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.username, self.store_name)
    }
}

/// Partial profile update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub store_name: Option<String>,
    pub store_address: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.store_name.is_none() && self.store_address.is_none()
    }

    /// Return `user` with this update merged over it.
    pub fn merged(&self, user: &User) -> User {
        let mut updated = user.clone();
        if let Some(ref username) = self.username {
            updated.username = username.clone();
        }
        if let Some(ref store_name) = self.store_name {
            updated.store_name = store_name.clone();
        }
        if let Some(ref store_address) = self.store_address {
            updated.store_address = store_address.clone();
        }
        updated
    }
}

/// One row of the credential table: the profile plus its password hash.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialEntry {
    pub user: User,
    /// Argon2 PHC string.
    password_hash: String,
}

impl CredentialEntry {
    pub fn new(user: User, password_hash: String) -> Self {
        Self {
            user,
            password_hash,
        }
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
    }
}

impl fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialEntry")
            .field("user", &self.user)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_user() -> User {
        User {
            id: "1".to_string(),
            username: "demo".to_string(),
            store_name: "HAJI RAHMATHULLAH STORE".to_string(),
            store_address: "1, PARK ROAD".to_string(),
        }
    }

    #[test]
    fn test_credential_entry_debug_redacts_hash() {
        let entry = CredentialEntry::new(demo_user(), "$argon2id$v=19$secret-hash".to_string());

        let debug_output = format!("{:?}", entry);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(
            !debug_output.contains("secret-hash"),
            "Debug output must NEVER contain the password hash"
        );
    }

    #[test]
    fn test_profile_update_merges_only_given_fields() {
        let update = ProfileUpdate {
            store_name: Some("New Store".to_string()),
            ..Default::default()
        };

        let updated = update.merged(&demo_user());
        assert_eq!(updated.store_name, "New Store");
        assert_eq!(updated.username, "demo");
        assert_eq!(updated.store_address, "1, PARK ROAD");
        assert_eq!(updated.id, "1");
    }

    #[test]
    fn test_empty_profile_update() {
        assert!(ProfileUpdate::default().is_empty());
        assert!(!ProfileUpdate {
            username: Some("x".to_string()),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let json = serde_json::to_string(&demo_user()).unwrap();
        assert!(json.contains("\"storeName\""));
        assert!(json.contains("\"storeAddress\""));
    }
}
