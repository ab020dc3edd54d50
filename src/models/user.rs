use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Vendor,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::User => "user",
            Role::Vendor => "vendor",
            Role::Admin => "admin",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub name: String,
    pub role: Role,
    pub password_hash: String,
}

impl User {
    pub fn new(username: &str, name: &str, password: &str, role: Role) -> Self {
        Self {
            username: username.to_string(),
            name: name.to_string(),
            role,
            password_hash: hash_password(password),
        }
    }

    // Plain SHA-256, no salt: good enough for a single-user console app
    pub fn verify_password(&self, password: &str) -> bool {
        self.password_hash == hash_password(password)
    }
}

pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_is_stored_hashed() {
        let user = User::new("alice", "Alice", "s3cret", Role::User);
        assert_ne!(user.password_hash, "s3cret");
        assert_eq!(user.password_hash.len(), 64);
        assert!(user.verify_password("s3cret"));
        assert!(!user.verify_password("S3cret"));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::Vendor).unwrap(), "vendor");
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}
