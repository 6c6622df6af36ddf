//! User identity type for core messages.

use serde::{Deserialize, Serialize};

/// User identity (id, username, names).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl User {
    /// Display name: first/last name joined, falling back to `@username`,
    /// then to `"User"`.
    pub fn display_name(&self) -> String {
        let name = match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => String::new(),
        };
        if !name.trim().is_empty() {
            return name.trim().to_string();
        }
        match &self.username {
            Some(username) => format!("@{}", username),
            None => "User".to_string(),
        }
    }
}
