//! Caller identity as reported by the auth collaborator

use crate::UserId;

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Stable user identifier
    pub id: UserId,

    /// Name shown next to the user's comments
    pub display_name: String,
}

impl CurrentUser {
    /// Create a new current user
    pub fn new(id: impl Into<UserId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}
