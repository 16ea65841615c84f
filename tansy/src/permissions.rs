//! The permission query interface consumed by the library.

use tansy_model::guild::Guild;
use tansy_model::types::{Permission, UserId};

/// Answers permission queries for a user acting on a guild.
///
/// Computing effective permissions from role grants and channel overwrites is outside the
/// scope of this library; implementations own that logic. Checks are re-run at commit time,
/// so an implementation may answer differently between staging a change and committing it.
pub trait PermissionChecker: Send + Sync + 'static {
    /// Returns whether `user` holds `permission` on `guild`.
    fn has_permission(&self, user: UserId, permission: Permission, guild: &Guild) -> bool;
}
