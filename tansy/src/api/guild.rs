use crate::api::staging::*;
use crate::context::ClientContext;
use crate::http::*;
use fnv::FnvHashMap;
use futures::future::join_all;
use tansy_errors::*;
use tansy_model::channel::Channel;
use tansy_model::guild::*;
use tansy_model::http::*;
use tansy_model::types::*;
use tansy_model::user::User;

/// Stages changes to a guild's settings and its members' roles, then applies them in as few
/// API calls as possible.
///
/// Instances can be obtained by calling [`ClientContext::guild`]. Setters only validate and
/// update the local buffers; nothing is written to the service until [`commit`] is called.
/// Setters return the manager again on success, so calls can be chained with `?`.
///
/// The operations in the second half of this type (kicking, banning, ownership transfer and
/// leaving) bypass staging and are applied immediately.
///
/// A manager is intended to be driven by a single caller; it performs no internal
/// synchronization.
///
/// [`commit`]: `GuildManager::commit`
#[derive(Debug)]
pub struct GuildManager<'a> {
    ctx: &'a ClientContext,
    guild: &'a Guild,
    pending: PendingAttributes,
    role_changes: FnvHashMap<UserId, RoleDelta>,
}

impl <'a> GuildManager<'a> {
    pub(crate) fn new(ctx: &'a ClientContext, guild: &'a Guild) -> Self {
        GuildManager {
            ctx,
            guild,
            pending: PendingAttributes::new(guild),
            role_changes: FnvHashMap::default(),
        }
    }

    /// Returns the guild this manager is bound to.
    pub fn guild(&self) -> &Guild {
        self.guild
    }

    fn check_available(&self) -> Result<()> {
        ensure!(self.guild.is_available(), GuildUnavailable);
        Ok(())
    }

    fn check_permission(&self, permission: Permission) -> Result<()> {
        let has = self.ctx.permissions()
            .has_permission(self.ctx.self_user(), permission, self.guild);
        ensure!(has, PermissionDenied, permission.into());
        Ok(())
    }

    /// Stages a change to the guild's name.
    ///
    /// Staging the guild's current name clears any queued name change instead, since the
    /// write would change nothing.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.check_available()?;
        self.check_permission(Permission::ManageGuild)?;
        let name = name.into();
        self.pending.name = if name == self.guild.name { None } else { Some(name) };
        Ok(self)
    }

    /// Stages a change to the guild's voice region.
    ///
    /// Staging the guild's current region, or [`Region::Unknown`], clears any queued
    /// region change instead.
    pub fn set_region(&mut self, region: Region) -> Result<&mut Self> {
        self.check_available()?;
        self.check_permission(Permission::ManageGuild)?;
        self.pending.region = if region == self.guild.region || region == Region::Unknown {
            None
        } else {
            Some(region)
        };
        Ok(self)
    }

    /// Stages a change to the guild's icon.
    pub fn set_icon(&mut self, icon: IconChange) -> Result<&mut Self> {
        self.check_available()?;
        self.check_permission(Permission::ManageGuild)?;
        self.pending.icon = Some(icon);
        Ok(self)
    }

    /// Stages a change to the guild's AFK voice channel. Passing `None` disables it.
    ///
    /// Unlike the other setters this always records the desired channel; whether a write
    /// is issued is decided by comparing against the guild's live value at commit time.
    pub fn set_afk_channel(&mut self, channel: Option<&Channel>) -> Result<&mut Self> {
        self.check_available()?;
        self.check_permission(Permission::ManageGuild)?;
        if let Some(channel) = channel {
            ensure!(channel.guild_id == Some(self.guild.id), InvalidInput,
                    "AFK channel must belong to the guild being modified.");
            ensure!(channel.is_voice(), InvalidInput,
                    "AFK channel must be a voice channel.");
        }
        self.pending.afk_channel_id = channel.map(|ch| ch.id);
        Ok(self)
    }

    /// Stages a change to the guild's AFK timeout.
    ///
    /// Staging the guild's current timeout clears any queued timeout change instead.
    pub fn set_afk_timeout(&mut self, timeout: AfkTimeout) -> Result<&mut Self> {
        self.check_available()?;
        self.check_permission(Permission::ManageGuild)?;
        self.pending.afk_timeout = if timeout == self.guild.afk_timeout {
            None
        } else {
            Some(timeout)
        };
        Ok(self)
    }

    /// Stages role grants for a member.
    ///
    /// The guild's implicit everyone role cannot be granted; it is skipped without error.
    /// Granting a role that has a staged revocation cancels the revocation.
    pub fn add_roles(
        &mut self,
        user: impl Into<UserId>,
        roles: impl IntoIterator<Item = impl Into<RoleId>>,
    ) -> Result<&mut Self> {
        self.check_available()?;
        self.check_permission(Permission::ManageRoles)?;
        let everyone = self.guild.everyone_role();
        let delta = self.role_changes.entry(user.into()).or_default();
        for role in roles {
            let role = role.into();
            if role == everyone {
                continue;
            }
            delta.add(role);
        }
        Ok(self)
    }

    /// Stages role revocations for a member.
    ///
    /// The guild's implicit everyone role cannot be revoked; it is skipped without error.
    /// Revoking a role that has a staged grant cancels the grant.
    pub fn remove_roles(
        &mut self,
        user: impl Into<UserId>,
        roles: impl IntoIterator<Item = impl Into<RoleId>>,
    ) -> Result<&mut Self> {
        self.check_available()?;
        self.check_permission(Permission::ManageRoles)?;
        let everyone = self.guild.everyone_role();
        let delta = self.role_changes.entry(user.into()).or_default();
        for role in roles {
            let role = role.into();
            if role == everyone {
                continue;
            }
            delta.remove(role);
        }
        Ok(self)
    }

    /// Applies all staged changes to the guild.
    ///
    /// At most one settings patch is issued, carrying exactly the queued fields, followed
    /// by one membership patch per member with staged role changes. The membership patches
    /// are dispatched simultaneously and fail independently; their outcomes are collected
    /// into the returned [`CommitReport`].
    ///
    /// Both buffers are cleared once their phase has run, regardless of how many patches
    /// succeeded, so retrying a partially failed commit requires staging the failed
    /// changes again. Availability and permission failures abort before the corresponding
    /// phase runs and leave its buffer intact.
    pub async fn commit(&mut self) -> Result<CommitReport> {
        self.check_available()?;

        let mut report = CommitReport::default();

        if self.pending.any_pending(self.guild) {
            self.check_permission(Permission::ManageGuild)?;
            let params = self.pending.to_params(self.guild);
            let body = serde_json::to_value(&params).unexpected()?;
            debug!("Patching settings of guild {}", self.guild.id.0);
            let result = self.ctx.raw()
                .patch(&route!("/guilds/{}", self.guild.id.0), body)
                .await;
            if let Err(err) = &result {
                warn!("Failed to patch settings of guild {}: {}", self.guild.id.0, err);
            }
            report.attributes = Some(result);
            self.pending.clear(self.guild);
        }

        if !self.role_changes.is_empty() {
            self.check_permission(Permission::ManageRoles)?;
            let mut patches = Vec::new();
            for (&user, delta) in &self.role_changes {
                if delta.is_empty() {
                    continue;
                }
                patches.push((user, delta.apply(self.guild.member_roles(user))));
            }
            let ctx = self.ctx;
            let guild_id = self.guild.id;
            report.roles = join_all(patches.into_iter().map(|(user, roles)| async move {
                let result = patch_member_roles(ctx, guild_id, user, roles).await;
                if let Err(err) = &result {
                    warn!("Failed to update roles of member {}: {}", user.0, err);
                }
                RolePatchOutcome { user, result }
            })).await;
            self.role_changes.clear();
        }

        Ok(report)
    }

    /// Kicks a member from the guild. This change is applied immediately.
    pub async fn kick(&self, user: impl Into<UserId>) -> Result<()> {
        self.check_available()?;
        self.check_permission(Permission::KickMembers)?;
        let user = user.into();
        debug!("Kicking member {} from guild {}", user.0, self.guild.id.0);
        self.ctx.raw()
            .delete(&route!("/guilds/{}/members/{}", self.guild.id.0, user.0))
            .await
    }

    /// Bans a user from the guild and deletes their messages sent within the last
    /// `delete_message_days` days. Pass `0` to delete no messages. This change is applied
    /// immediately.
    pub async fn ban(&self, user: impl Into<UserId>, delete_message_days: u32) -> Result<()> {
        self.check_available()?;
        self.check_permission(Permission::BanMembers)?;
        let user = user.into();
        let mut route = route!("/guilds/{}/bans/{}", self.guild.id.0, user.0);
        if delete_message_days > 0 {
            route.push_str(&format!("?delete-message-days={}", delete_message_days));
        }
        debug!("Banning user {} from guild {}", user.0, self.guild.id.0);
        self.ctx.raw().put(&route, JsonValue::Object(Default::default())).await
    }

    /// Unbans a user from the guild. This change is applied immediately.
    pub async fn unban(&self, user: impl Into<UserId>) -> Result<()> {
        self.check_available()?;
        self.check_permission(Permission::BanMembers)?;
        let user = user.into();
        self.ctx.raw()
            .delete(&route!("/guilds/{}/bans/{}", self.guild.id.0, user.0))
            .await
    }

    /// Returns the users currently banned from the guild.
    ///
    /// Banned users that appear in the guild's member list are returned from it; the rest
    /// are built from the response payload alone.
    pub async fn get_bans(&self) -> Result<Vec<User>> {
        self.check_available()?;
        let response = self.ctx.raw()
            .get(&route!("/guilds/{}/bans", self.guild.id.0))
            .await?;
        let bans: Vec<GuildBan> = serde_json::from_value(response)
            .bad_response("Could not parse ban list.")?;
        Ok(bans.into_iter()
            .map(|ban| match self.guild.member(ban.user.id) {
                Some(member) => member.user.clone(),
                None => ban.user,
            })
            .collect())
    }

    /// Transfers ownership of the guild to another member. This change is applied
    /// immediately.
    ///
    /// The current user must own the guild, and the new owner must be a member of it.
    pub async fn transfer_ownership(&self, new_owner: impl Into<UserId>) -> Result<()> {
        self.check_available()?;
        ensure!(self.ctx.self_user() == self.guild.owner_id, PermissionDenied,
                "only the guild owner may transfer ownership");
        let new_owner = new_owner.into();
        ensure!(self.guild.is_member(new_owner), InvalidInput,
                "The new owner must be a member of the guild.");
        let params = ModifyGuildParams {
            owner_id: Some(new_owner),
            ..Default::default()
        };
        let body = serde_json::to_value(&params).unexpected()?;
        info!("Transferring ownership of guild {} to {}", self.guild.id.0, new_owner.0);
        self.ctx.raw()
            .patch(&route!("/guilds/{}", self.guild.id.0), body)
            .await
    }

    /// Leaves the guild, or deletes it if the current user owns it. This change is applied
    /// immediately.
    ///
    /// The service decides between the two based on the acting user; the library makes no
    /// local distinction.
    pub async fn leave_or_delete(&self) -> Result<()> {
        self.check_available()?;
        self.ctx.raw()
            .delete(&route!("/guilds/{}", self.guild.id.0))
            .await
    }
}

async fn patch_member_roles(
    ctx: &ClientContext, guild: GuildId, user: UserId, roles: Vec<RoleId>,
) -> Result<()> {
    let params = ModifyMemberParams { roles: Some(roles) };
    let body = serde_json::to_value(&params).unexpected()?;
    ctx.raw()
        .patch(&route!("/guilds/{}/members/{}", guild.0, user.0), body)
        .await
}

/// The per-operation outcome of a [`GuildManager::commit`] call.
///
/// The staged buffers are cleared when their phase runs regardless of these outcomes;
/// callers that want to retry a failed patch must stage the change again.
#[derive(Debug, Default)]
pub struct CommitReport {
    /// The outcome of the settings patch, if one was issued.
    pub attributes: Option<Result<()>>,
    /// The outcome of each membership patch issued, in no particular order.
    pub roles: Vec<RolePatchOutcome>,
}
impl CommitReport {
    /// Returns `true` if every operation the commit attempted succeeded.
    pub fn fully_applied(&self) -> bool {
        self.attributes.as_ref().map_or(true, |r| r.is_ok())
            && self.roles.iter().all(|outcome| outcome.result.is_ok())
    }
}

/// The outcome of a single membership patch issued during [`GuildManager::commit`].
#[derive(Debug)]
pub struct RolePatchOutcome {
    /// The member whose role list was written.
    pub user: UserId,
    /// The outcome of the patch.
    pub result: Result<()>,
}
