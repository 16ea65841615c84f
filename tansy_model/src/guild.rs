//! Types related to guilds.

use chrono::{DateTime, Utc};
use crate::serde::*;
use crate::types::*;
use crate::user::*;

/// A voice region a guild's voice channels may be hosted in.
#[derive(Serialize, Deserialize, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum Region {
    Amsterdam,
    Brazil,
    EuCentral,
    EuWest,
    Frankfurt,
    HongKong,
    London,
    Russia,
    Singapore,
    Sydney,
    UsCentral,
    UsEast,
    UsSouth,
    UsWest,
    /// An unrecognized voice region.
    #[serde(other)]
    Unknown,
}

/// The idle time after which a user in a voice channel is moved to the AFK channel.
///
/// Only these five values are accepted by the service.
#[derive(Serialize_repr, Deserialize_repr)]
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
#[repr(u32)]
pub enum AfkTimeout {
    Seconds60 = 60,
    Seconds300 = 300,
    Seconds900 = 900,
    Seconds1800 = 1800,
    Seconds3600 = 3600,
}
impl AfkTimeout {
    /// Returns the timeout in seconds.
    pub fn as_secs(self) -> u32 {
        self as u32
    }
}

/// Information related to a role in a guild.
#[derive(Serialize, Deserialize, Clone, PartialOrd, Ord, Eq, PartialEq, Debug, Hash)]
#[non_exhaustive]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub color: u32,
    pub hoist: bool,
    pub position: u64,
    pub permissions: EnumSet<Permission>,
    pub managed: bool,
    pub mentionable: bool,
}
into_id!(Role, RoleId, id);

/// Information related to a member in a guild.
#[derive(Serialize, Deserialize, Clone, PartialOrd, Ord, Eq, PartialEq, Debug, Hash)]
#[non_exhaustive]
pub struct Member {
    pub user: User,
    #[serde(flatten)]
    pub info: MemberInfo,
}

/// Information related to a member in a guild, without the `user` field.
#[derive(Serialize, Deserialize, Clone, PartialOrd, Ord, Eq, PartialEq, Debug, Hash)]
#[non_exhaustive]
pub struct MemberInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    pub roles: Vec<RoleId>,
    pub joined_at: DateTime<Utc>,
    pub deaf: bool,
    pub mute: bool,
}

/// Information related to a guild.
#[derive(Serialize, Deserialize, Clone, PartialOrd, Ord, Eq, PartialEq, Debug, Hash)]
#[non_exhaustive]
pub struct Guild {
    pub id: GuildId,
    pub name: String,
    pub icon: Option<String>,
    pub owner_id: UserId,
    pub region: Region,
    pub afk_channel_id: Option<ChannelId>,
    pub afk_timeout: AfkTimeout,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,
    #[serde(default, skip_serializing_if = "utils::if_false")]
    pub unavailable: bool,
}
into_id!(Guild, GuildId, id);

impl Guild {
    /// Returns whether the guild is currently available.
    ///
    /// An unavailable guild cannot be modified; availability may change at any time.
    pub fn is_available(&self) -> bool {
        !self.unavailable
    }

    /// Gets the @everyone role for this guild.
    pub fn everyone_role(&self) -> RoleId {
        self.id.everyone_role()
    }

    /// Returns the member entry for the given user, if they are a member of this guild.
    pub fn member(&self, id: impl Into<UserId>) -> Option<&Member> {
        let id = id.into();
        self.members.iter().find(|m| m.user.id == id)
    }

    /// Returns whether the given user is a member of this guild.
    pub fn is_member(&self, id: impl Into<UserId>) -> bool {
        self.member(id).is_some()
    }

    /// Returns the ids of the roles currently assigned to the given user.
    ///
    /// Returns an empty slice for users that are not members of this guild.
    pub fn member_roles(&self, id: impl Into<UserId>) -> &[RoleId] {
        self.member(id).map_or(&[], |m| &m.info.roles)
    }
}

/// A banned user on a guild.
#[derive(Serialize, Deserialize, Clone, PartialOrd, Ord, Eq, PartialEq, Debug, Hash)]
#[non_exhaustive]
pub struct GuildBan {
    pub reason: Option<String>,
    pub user: User,
}
