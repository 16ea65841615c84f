use crate::serde::*;
use crate::types::*;

/// A struct representing a user of the service. Returned by most API calls involving users.
#[derive(Serialize, Deserialize, Default, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub discriminator: String,
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "utils::if_false")]
    pub bot: bool,
}
into_id!(User, UserId, id);
