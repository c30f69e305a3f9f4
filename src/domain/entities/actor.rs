use serde::{Deserialize, Serialize};

/// An already-authenticated caller acting on the calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
    /// Admin or project manager
    pub privileged: bool,
}

impl Actor {
    pub fn member(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            privileged: false,
        }
    }

    pub fn privileged(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            privileged: true,
        }
    }

    pub fn is_owner_of(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
