//! A module for making raw requests to the Discord API.
//!
//! The library does not ship a transport of its own. Callers provide a [`RequestClient`]
//! implementation; it is expected to attach authentication, apply rate limits, and retry
//! transient failures before surfacing an error.

use async_trait::async_trait;
use tansy_errors::Result;

pub use serde_json::Value as JsonValue;

macro_rules! route {
    ($base:literal) => {
        concat!("https://discordapp.com/api/v6", $base).to_string()
    };
    ($base:literal, $($val:expr),* $(,)?) => {
        format!(concat!("https://discordapp.com/api/v6", $base), $($val,)*)
    };
}

/// A client capable of making authenticated calls against the Discord REST API.
///
/// All methods take a full route URL. Errors surfaced by an implementation should use
/// [`ErrorKind::RequestFailed`](`tansy_errors::ErrorKind::RequestFailed`) with the underlying
/// cause attached; this library treats them as opaque.
#[async_trait]
pub trait RequestClient: Send + Sync + 'static {
    /// Makes a `GET` request, returning the decoded JSON response.
    async fn get(&self, route: &str) -> Result<JsonValue>;
    /// Makes a `PATCH` request carrying a JSON body.
    async fn patch(&self, route: &str, body: JsonValue) -> Result<()>;
    /// Makes a `PUT` request carrying a JSON body.
    async fn put(&self, route: &str, body: JsonValue) -> Result<()>;
    /// Makes a `DELETE` request.
    async fn delete(&self, route: &str) -> Result<()>;
}
