//! Basic types common to all API calls.

use crate::serde::*;
use std::fmt;

/// A permission that a user may have.
///
/// The static string form of a variant is used to name the permission in
/// `PermissionDenied` errors.
#[derive(EnumSetType, IntoStaticStr, Ord, PartialOrd, Debug, Hash)]
#[enumset(serialize_repr = "u64")]
#[non_exhaustive]
pub enum Permission {
    CreateInstantInvite = 0,
    KickMembers = 1,
    BanMembers = 2,
    Administrator = 3,
    ManageChannels = 4,
    ManageGuild = 5,
    AddReactions = 6,
    ViewAuditLog = 7,
    PrioritySpeaker = 8,
    Stream = 9,
    ViewChannel = 10,
    SendMessages = 11,
    SendTtsMessages = 12,
    ManageMessages = 13,
    EmbedLinks = 14,
    AttachFiles = 15,
    ReadMessageHistory = 16,
    MentionEveryone = 17,
    UseExternalEmojis = 18,
    Connect = 20,
    Speak = 21,
    MuteMembers = 22,
    DeafenMembers = 23,
    MoveMembers = 24,
    UseVoiceActivity = 25,
    ChangeNickname = 26,
    ManageNicknames = 27,
    ManageRoles = 28,
    ManageWebhooks = 29,
    ManageEmojis = 30,
}

/// An untyped snowflake used for IDs and some related things.
#[derive(Serialize, Deserialize, Default, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
#[serde(transparent)]
pub struct Snowflake(#[serde(with = "utils::snowflake")] pub u64);
impl fmt::Debug for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
impl From<u64> for Snowflake {
    fn from(i: u64) -> Self {
        Snowflake(i)
    }
}
impl From<Snowflake> for u64 {
    fn from(i: Snowflake) -> Self {
        i.0
    }
}

/// A channel ID.
#[derive(Serialize, Deserialize, Default, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
#[serde(transparent)]
pub struct ChannelId(pub Snowflake);

/// A guild ID.
#[derive(Serialize, Deserialize, Default, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
#[serde(transparent)]
pub struct GuildId(pub Snowflake);

/// A role ID.
#[derive(Serialize, Deserialize, Default, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
#[serde(transparent)]
pub struct RoleId(pub Snowflake);

/// An user ID.
#[derive(Serialize, Deserialize, Default, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
#[serde(transparent)]
pub struct UserId(pub Snowflake);

macro_rules! id_structs {
    ($($name:ident)*) => {$(
        impl From<Snowflake> for $name {
            fn from(s: Snowflake) -> $name {
                $name(s)
            }
        }
        impl From<$name> for Snowflake {
            fn from(id: $name) -> Snowflake {
                id.0
            }
        }
        impl From<u64> for $name {
            fn from(s: u64) -> $name {
                $name(s.into())
            }
        }
        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.0.into()
            }
        }
    )*};
}

id_structs! {
    ChannelId GuildId RoleId UserId
}

impl GuildId {
    /// Returns the id of the implicit role every member of the guild holds.
    ///
    /// The everyone role shares the guild's own id.
    pub fn everyone_role(self) -> RoleId {
        RoleId(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everyone_role_shares_the_guild_id() {
        let guild: GuildId = 10495_u64.into();
        assert_eq!(guild.everyone_role(), RoleId::from(10495_u64));
    }

    #[test]
    fn snowflakes_serialize_as_strings() {
        let id = Snowflake(80351110224678912);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"80351110224678912\"");
        let back: Snowflake = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn snowflakes_deserialize_from_integers() {
        let id: Snowflake = serde_json::from_str("80351110224678912").unwrap();
        assert_eq!(id, Snowflake(80351110224678912));
    }

    #[test]
    fn permission_names_match_variants() {
        let name: &'static str = Permission::ManageGuild.into();
        assert_eq!(name, "ManageGuild");
    }
}
