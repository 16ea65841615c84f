//! Local buffers for changes staged against a guild before they are committed.

use tansy_model::guild::{AfkTimeout, Guild, Region};
use tansy_model::http::ModifyGuildParams;
use tansy_model::image::ImageData;
use tansy_model::types::{ChannelId, RoleId};

/// A staged change to a guild's icon.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum IconChange {
    /// Replaces the current icon with the given image.
    Set(ImageData),
    /// Removes the current icon.
    Remove,
}

/// Scalar guild settings with a change queued locally.
///
/// Each field is `None` while no change is queued for it. The AFK channel is the exception:
/// it always holds the currently desired channel, seeded from the guild when the buffer is
/// created, and is diffed against the guild's live value when the payload is built.
#[derive(Clone, Debug)]
pub(crate) struct PendingAttributes {
    pub name: Option<String>,
    pub region: Option<Region>,
    pub icon: Option<IconChange>,
    pub afk_timeout: Option<AfkTimeout>,
    pub afk_channel_id: Option<ChannelId>,
}
impl PendingAttributes {
    pub fn new(guild: &Guild) -> Self {
        PendingAttributes {
            name: None,
            region: None,
            icon: None,
            afk_timeout: None,
            afk_channel_id: guild.afk_channel_id,
        }
    }

    pub fn afk_channel_changed(&self, guild: &Guild) -> bool {
        self.afk_channel_id != guild.afk_channel_id
    }

    /// Returns whether any change would be written by a commit.
    pub fn any_pending(&self, guild: &Guild) -> bool {
        self.name.is_some()
            || self.region.is_some()
            || self.icon.is_some()
            || self.afk_timeout.is_some()
            || self.afk_channel_changed(guild)
    }

    /// Builds the patch payload, containing only the fields with a queued change.
    pub fn to_params(&self, guild: &Guild) -> ModifyGuildParams {
        ModifyGuildParams {
            name: self.name.clone(),
            region: self.region,
            afk_timeout: self.afk_timeout,
            icon: self.icon.as_ref().map(|change| match change {
                IconChange::Set(image) => Some(image.clone()),
                IconChange::Remove => None,
            }),
            afk_channel_id: if self.afk_channel_changed(guild) {
                Some(self.afk_channel_id)
            } else {
                None
            },
            owner_id: None,
        }
    }

    pub fn clear(&mut self, guild: &Guild) {
        *self = PendingAttributes::new(guild);
    }
}

/// Pending role grants and revocations for a single member.
///
/// The two sets are kept disjoint: staging a role into one side drops it from the other.
/// Insertion order is preserved so that newly granted roles are appended to the member's
/// role list in the order they were staged.
#[derive(Clone, Debug, Default)]
pub(crate) struct RoleDelta {
    added: Vec<RoleId>,
    removed: Vec<RoleId>,
}
impl RoleDelta {
    /// Stages a role grant, cancelling any staged revocation of the same role.
    pub fn add(&mut self, role: RoleId) {
        self.removed.retain(|&r| r != role);
        if !self.added.contains(&role) {
            self.added.push(role);
        }
    }

    /// Stages a role revocation, cancelling any staged grant of the same role.
    pub fn remove(&mut self, role: RoleId) {
        self.added.retain(|&r| r != role);
        if !self.removed.contains(&role) {
            self.removed.push(role);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Merges this delta into a member's current role list.
    ///
    /// Retained ids keep their current order; granted roles the member does not already
    /// hold are appended, and revocations of roles the member does not hold are ignored.
    pub fn apply(&self, current: &[RoleId]) -> Vec<RoleId> {
        let mut roles: Vec<RoleId> = current
            .iter()
            .copied()
            .filter(|role| !self.removed.contains(role))
            .collect();
        for &role in &self.added {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        roles
    }
}
