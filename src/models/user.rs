use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Public view of a user record. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    /// Optional display name.
    pub full_name: Option<String>,
}

/// The subset of a user row needed to check a login attempt.
#[derive(Debug, FromRow)]
pub struct UserCredentials {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization_has_no_hash() {
        let user = User {
            id: 7,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["username"], "alice");
        assert!(json["full_name"].is_null());
        assert!(json.get("password_hash").is_none());
    }
}
