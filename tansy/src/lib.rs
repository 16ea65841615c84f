#![deny(unused_must_use)]

//! An asynchronous library for managing guilds through the Discord API.
//!
//! Changes to a guild's settings and to its members' roles are staged locally on a
//! [`GuildManager`](`api::GuildManager`) and applied in as few API calls as possible when
//! [`commit`](`api::GuildManager::commit`) is called. The HTTP transport and permission
//! computation are supplied by the caller through the [`RequestClient`](`http::RequestClient`)
//! and [`PermissionChecker`](`permissions::PermissionChecker`) traits.

#[macro_use] extern crate derivative;
#[macro_use] extern crate tansy_errors;
#[macro_use] extern crate tracing;

#[macro_use] pub mod http;

pub mod api;
mod context;
pub mod permissions;

#[doc(inline)] pub use context::*;
#[doc(inline)] pub use tansy_errors::{Error, ErrorKind, Result};

/// Types used to interact with the Discord API.
#[doc(inline)] pub extern crate tansy_model as model;

/// A set of reexports for more conveniently using the library.
pub mod prelude {
    #[doc(no_inline)] pub use crate::api::{GuildManager, IconChange};
    #[doc(no_inline)] pub use crate::context::ClientContext;
    #[doc(no_inline)] pub use crate::http::RequestClient;
    #[doc(no_inline)] pub use crate::permissions::PermissionChecker;
    #[doc(no_inline)] pub use tansy_model::types::Permission;
}
