//! Defines a convenient to use API for managing guilds.
//!
//! Most of the types defined here are not useful on their own, and are obtained by calling
//! methods on [`ClientContext`].

use crate::context::ClientContext;
use tansy_model::guild::Guild;

mod guild;
mod staging;

pub use guild::*;
pub use staging::IconChange;

impl ClientContext {
    /// Returns a manager that stages changes against the given guild.
    ///
    /// The manager borrows the guild for its lifetime; it re-checks the guild's
    /// availability before every state-changing operation.
    pub fn guild<'a>(&'a self, guild: &'a Guild) -> GuildManager<'a> {
        GuildManager::new(self, guild)
    }
}
