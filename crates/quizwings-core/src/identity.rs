//! Identity collaborator: turns user ids into labels people recognize.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::ids::UserId;

/// Maps users to display labels.
///
/// A friendly name assigned for a quiz (for example "Ivan Petrov 5406")
/// takes precedence over the name reported by the platform.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// The label to show for `user_id`. Falls back to a generic label.
    async fn display_label(&self, user_id: UserId) -> String;

    /// Assign an operator-facing friendly name.
    async fn set_friendly_name(&self, user_id: UserId, name: String) -> Result<(), DomainError>;

    /// Record the name the platform reports for the user.
    async fn set_platform_name(&self, user_id: UserId, name: String) -> Result<(), DomainError>;
}

/// Compose a label from the known names of a user.
#[must_use]
pub fn compose_label(user_id: UserId, friendly: Option<&str>, platform: Option<&str>) -> String {
    match (friendly, platform) {
        (Some(friendly), Some(platform)) => format!("{friendly} ({platform})"),
        (Some(name), None) | (None, Some(name)) => name.to_owned(),
        (None, None) => format!("user {user_id}"),
    }
}
