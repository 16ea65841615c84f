use async_trait::async_trait;
use futures::executor::block_on;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tansy::{ClientContext, Error, ErrorKind};
use tansy::api::IconChange;
use tansy::http::{JsonValue, RequestClient};
use tansy::model::channel::Channel;
use tansy::model::guild::{AfkTimeout, Guild, Region};
use tansy::model::image::ImageData;
use tansy::model::types::{Permission, UserId};
use tansy::permissions::PermissionChecker;
use tansy_errors::Result;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Get(String),
    Patch(String, JsonValue),
    Put(String, JsonValue),
    Delete(String),
}

#[derive(Default)]
struct ClientState {
    calls: Mutex<Vec<Call>>,
    fail_routes: Mutex<Vec<&'static str>>,
    get_response: Mutex<Option<JsonValue>>,
}

/// Records every request it receives; mutating calls fail if their route contains one of
/// the configured substrings.
#[derive(Clone, Default)]
struct RecordingClient(Arc<ClientState>);
impl RecordingClient {
    fn calls(&self) -> Vec<Call> {
        self.0.calls.lock().unwrap().clone()
    }

    fn fail_routes_containing(&self, fragment: &'static str) {
        self.0.fail_routes.lock().unwrap().push(fragment);
    }

    fn respond_to_get(&self, response: JsonValue) {
        *self.0.get_response.lock().unwrap() = Some(response);
    }

    fn check_fail(&self, route: &str, operation: &'static str) -> Result<()> {
        let failing = self.0.fail_routes.lock().unwrap()
            .iter()
            .any(|fragment| route.contains(fragment));
        if failing {
            Err(Error::new(ErrorKind::RequestFailed(operation)))
        } else {
            Ok(())
        }
    }
}
#[async_trait]
impl RequestClient for RecordingClient {
    async fn get(&self, route: &str) -> Result<JsonValue> {
        self.0.calls.lock().unwrap().push(Call::Get(route.to_owned()));
        Ok(self.0.get_response.lock().unwrap().clone().unwrap_or_else(|| json!([])))
    }
    async fn patch(&self, route: &str, body: JsonValue) -> Result<()> {
        self.0.calls.lock().unwrap().push(Call::Patch(route.to_owned(), body));
        self.check_fail(route, "patch")
    }
    async fn put(&self, route: &str, body: JsonValue) -> Result<()> {
        self.0.calls.lock().unwrap().push(Call::Put(route.to_owned(), body));
        self.check_fail(route, "put")
    }
    async fn delete(&self, route: &str) -> Result<()> {
        self.0.calls.lock().unwrap().push(Call::Delete(route.to_owned()));
        self.check_fail(route, "delete")
    }
}

#[derive(Clone, Default)]
struct SharedPerms(Arc<Mutex<Vec<Permission>>>);
impl SharedPerms {
    fn grant(&self, permission: Permission) {
        self.0.lock().unwrap().push(permission);
    }

    fn revoke(&self, permission: Permission) {
        self.0.lock().unwrap().retain(|&p| p != permission);
    }
}
impl PermissionChecker for SharedPerms {
    fn has_permission(&self, _user: UserId, permission: Permission, _guild: &Guild) -> bool {
        self.0.lock().unwrap().contains(&permission)
    }
}

fn member_json(id: &str, username: &str, roles: &[&str]) -> JsonValue {
    json!({
        "user": { "id": id, "username": username, "discriminator": "0001", "avatar": null },
        "roles": roles,
        "joined_at": "2020-01-01T00:00:00Z",
        "deaf": false,
        "mute": false,
    })
}

fn test_guild(unavailable: bool) -> Guild {
    serde_json::from_value(json!({
        "id": "100",
        "name": "Glade",
        "icon": null,
        "owner_id": "1",
        "region": "us-west",
        "afk_channel_id": "900",
        "afk_timeout": 3600,
        "unavailable": unavailable,
        "members": [
            member_json("1", "sylvia", &["201"]),
            member_json("2", "rowan", &["201", "202"]),
        ],
    })).unwrap()
}

fn channel_json(id: &str, guild: &str, channel_type: u32) -> Channel {
    serde_json::from_value(json!({
        "id": id,
        "type": channel_type,
        "guild_id": guild,
        "name": "afk",
    })).unwrap()
}

fn context_as(self_user: u64, permissions: &[Permission]) -> (RecordingClient, SharedPerms, ClientContext) {
    let client = RecordingClient::default();
    let perms = SharedPerms::default();
    for &permission in permissions {
        perms.grant(permission);
    }
    let ctx = ClientContext::new(self_user, client.clone(), perms.clone());
    (client, perms, ctx)
}

fn find_patch(calls: &[Call], route_part: &str) -> JsonValue {
    calls.iter()
        .find_map(|call| match call {
            Call::Patch(route, body) if route.contains(route_part) => Some(body.clone()),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no patch matching {:?} in {:?}", route_part, calls))
}

#[test]
fn staged_attribute_changes_commit_as_one_patch() {
    let (client, _, ctx) = context_as(1, &[Permission::ManageGuild]);
    let guild = test_guild(false);
    let mut mgr = ctx.guild(&guild);

    mgr.set_name("Meadow").unwrap()
        .set_afk_timeout(AfkTimeout::Seconds300).unwrap();
    let report = block_on(mgr.commit()).unwrap();

    assert!(report.fully_applied());
    assert!(report.attributes.is_some());
    assert!(report.roles.is_empty());
    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        find_patch(&calls, "/guilds/100"),
        json!({ "name": "Meadow", "afk_timeout": 300 }),
    );
}

#[test]
fn staging_current_values_issues_no_patch() {
    let (client, _, ctx) = context_as(1, &[Permission::ManageGuild]);
    let guild = test_guild(false);
    let mut mgr = ctx.guild(&guild);

    mgr.set_name("Glade").unwrap();
    mgr.set_region(Region::UsWest).unwrap();
    mgr.set_afk_timeout(AfkTimeout::Seconds3600).unwrap();
    let report = block_on(mgr.commit()).unwrap();

    assert!(report.attributes.is_none());
    assert!(client.calls().is_empty());
}

#[test]
fn unknown_region_clears_a_staged_region_change() {
    let (client, _, ctx) = context_as(1, &[Permission::ManageGuild]);
    let guild = test_guild(false);
    let mut mgr = ctx.guild(&guild);

    mgr.set_region(Region::UsEast).unwrap();
    mgr.set_region(Region::Unknown).unwrap();
    block_on(mgr.commit()).unwrap();

    assert!(client.calls().is_empty());
}

#[test]
fn setting_a_name_back_to_current_cancels_the_change() {
    let (client, _, ctx) = context_as(1, &[Permission::ManageGuild]);
    let guild = test_guild(false);
    let mut mgr = ctx.guild(&guild);

    mgr.set_name("Meadow").unwrap();
    mgr.set_name("Glade").unwrap();
    block_on(mgr.commit()).unwrap();

    assert!(client.calls().is_empty());
}

#[test]
fn everyone_role_changes_are_silently_ignored() {
    let (client, _, ctx) = context_as(1, &[Permission::ManageRoles]);
    let guild = test_guild(false);
    let everyone = guild.everyone_role();
    let mut mgr = ctx.guild(&guild);

    mgr.add_roles(2_u64, vec![everyone]).unwrap();
    mgr.remove_roles(2_u64, vec![everyone]).unwrap();
    let report = block_on(mgr.commit()).unwrap();

    assert!(report.roles.is_empty());
    assert!(client.calls().is_empty());
}

#[test]
fn role_changes_patch_each_member_once() {
    let (client, _, ctx) = context_as(1, &[Permission::ManageRoles]);
    let guild = test_guild(false);
    let mut mgr = ctx.guild(&guild);

    mgr.add_roles(2_u64, vec![203_u64]).unwrap();
    mgr.remove_roles(2_u64, vec![202_u64]).unwrap();
    mgr.add_roles(3_u64, vec![204_u64]).unwrap();
    let report = block_on(mgr.commit()).unwrap();

    assert!(report.fully_applied());
    assert_eq!(report.roles.len(), 2);
    let calls = client.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        find_patch(&calls, "/guilds/100/members/2"),
        json!({ "roles": ["201", "203"] }),
    );
    assert_eq!(
        find_patch(&calls, "/guilds/100/members/3"),
        json!({ "roles": ["204"] }),
    );
}

#[test]
fn granting_then_revoking_a_role_nets_to_a_revocation() {
    let (client, _, ctx) = context_as(1, &[Permission::ManageRoles]);
    let guild = test_guild(false);
    let mut mgr = ctx.guild(&guild);

    mgr.add_roles(2_u64, vec![202_u64]).unwrap();
    mgr.remove_roles(2_u64, vec![202_u64]).unwrap();
    block_on(mgr.commit()).unwrap();

    assert_eq!(
        find_patch(&client.calls(), "/guilds/100/members/2"),
        json!({ "roles": ["201"] }),
    );
}

#[test]
fn commit_clears_staging_even_when_patches_fail() {
    let (client, _, ctx) = context_as(1, &[Permission::ManageRoles]);
    client.fail_routes_containing("/members/2");
    let guild = test_guild(false);
    let mut mgr = ctx.guild(&guild);

    mgr.add_roles(2_u64, vec![203_u64]).unwrap();
    mgr.add_roles(3_u64, vec![204_u64]).unwrap();
    let report = block_on(mgr.commit()).unwrap();

    assert!(!report.fully_applied());
    assert_eq!(report.roles.len(), 2);
    let failed = report.roles.iter()
        .find(|outcome| outcome.user == UserId::from(2_u64))
        .unwrap();
    assert!(failed.result.as_ref().unwrap_err().is_remote());
    assert_eq!(client.calls().len(), 2);

    // Both patches were attempted once; a second commit must not re-send anything.
    block_on(mgr.commit()).unwrap();
    assert_eq!(client.calls().len(), 2);
}

#[test]
fn unavailable_guilds_reject_every_operation() {
    let (client, _, ctx) = context_as(1, &[Permission::ManageGuild, Permission::ManageRoles,
                                           Permission::KickMembers, Permission::BanMembers]);
    let guild = test_guild(true);
    let mut mgr = ctx.guild(&guild);

    assert!(mgr.set_name("Meadow").unwrap_err().is_unavailable());
    assert!(mgr.add_roles(2_u64, vec![203_u64]).unwrap_err().is_unavailable());
    assert!(block_on(mgr.commit()).unwrap_err().is_unavailable());
    assert!(block_on(mgr.kick(2_u64)).unwrap_err().is_unavailable());
    assert!(block_on(mgr.ban(2_u64, 0)).unwrap_err().is_unavailable());
    assert!(block_on(mgr.get_bans()).unwrap_err().is_unavailable());
    assert!(block_on(mgr.leave_or_delete()).unwrap_err().is_unavailable());
    assert!(client.calls().is_empty());
}

#[test]
fn missing_permissions_block_staging() {
    let (client, _, ctx) = context_as(1, &[Permission::ManageGuild]);
    let guild = test_guild(false);
    let mut mgr = ctx.guild(&guild);

    assert!(mgr.add_roles(2_u64, vec![203_u64]).unwrap_err().is_permission_denied());
    assert!(mgr.set_name("Meadow").is_ok());
    assert!(client.calls().is_empty());
}

#[test]
fn permissions_are_rechecked_at_commit_time() {
    let (client, perms, ctx) = context_as(1, &[Permission::ManageGuild]);
    let guild = test_guild(false);
    let mut mgr = ctx.guild(&guild);

    mgr.set_name("Meadow").unwrap();
    perms.revoke(Permission::ManageGuild);
    assert!(block_on(mgr.commit()).unwrap_err().is_permission_denied());
    assert!(client.calls().is_empty());

    // The aborted commit left the buffer intact, so the change applies once the
    // permission is restored.
    perms.grant(Permission::ManageGuild);
    let report = block_on(mgr.commit()).unwrap();
    assert!(report.fully_applied());
    assert_eq!(find_patch(&client.calls(), "/guilds/100"), json!({ "name": "Meadow" }));
}

#[test]
fn afk_channel_changes_are_diffed_against_the_live_value() {
    let (client, _, ctx) = context_as(1, &[Permission::ManageGuild]);
    let guild = test_guild(false);
    let current = channel_json("900", "100", 2);
    let mut mgr = ctx.guild(&guild);

    // Staging the channel the guild already uses must not produce a write.
    mgr.set_afk_channel(Some(&current)).unwrap();
    block_on(mgr.commit()).unwrap();
    assert!(client.calls().is_empty());

    // Disabling it must send an explicit null.
    mgr.set_afk_channel(None).unwrap();
    block_on(mgr.commit()).unwrap();
    assert_eq!(
        find_patch(&client.calls(), "/guilds/100"),
        json!({ "afk_channel_id": null }),
    );
}

#[test]
fn afk_channel_must_be_a_voice_channel_of_the_same_guild() {
    let (_, _, ctx) = context_as(1, &[Permission::ManageGuild]);
    let guild = test_guild(false);
    let foreign = channel_json("901", "555", 2);
    let text = channel_json("902", "100", 0);
    let mut mgr = ctx.guild(&guild);

    assert!(mgr.set_afk_channel(Some(&foreign)).unwrap_err().is_error());
    assert!(mgr.set_afk_channel(Some(&text)).unwrap_err().is_error());
}

#[test]
fn icon_changes_upload_a_data_uri_or_null() {
    let (client, _, ctx) = context_as(1, &[Permission::ManageGuild]);
    let guild = test_guild(false);
    let mut mgr = ctx.guild(&guild);

    mgr.set_icon(IconChange::Remove).unwrap();
    block_on(mgr.commit()).unwrap();
    assert_eq!(find_patch(&client.calls(), "/guilds/100"), json!({ "icon": null }));

    let image = ImageData::new(&b"\x89PNG\r\n\x1a\n\x00"[..]).unwrap();
    mgr.set_icon(IconChange::Set(image)).unwrap();
    block_on(mgr.commit()).unwrap();
    let patch = client.calls().into_iter().rev()
        .find_map(|call| match call {
            Call::Patch(_, body) => Some(body),
            _ => None,
        })
        .unwrap();
    let uri = patch["icon"].as_str().unwrap();
    assert!(uri.starts_with("data:image/png;base64,"));
}

#[test]
fn bans_append_the_message_deletion_query_only_when_positive() {
    let (client, _, ctx) = context_as(1, &[Permission::BanMembers]);
    let guild = test_guild(false);
    let mgr = ctx.guild(&guild);

    block_on(mgr.ban(5_u64, 7)).unwrap();
    block_on(mgr.ban(6_u64, 0)).unwrap();

    let calls = client.calls();
    assert_eq!(calls, vec![
        Call::Put(
            "https://discordapp.com/api/v6/guilds/100/bans/5?delete-message-days=7".to_owned(),
            json!({}),
        ),
        Call::Put(
            "https://discordapp.com/api/v6/guilds/100/bans/6".to_owned(),
            json!({}),
        ),
    ]);
}

#[test]
fn kick_and_unban_hit_the_expected_routes() {
    let (client, _, ctx) = context_as(1, &[Permission::KickMembers, Permission::BanMembers]);
    let guild = test_guild(false);
    let mgr = ctx.guild(&guild);

    block_on(mgr.kick(2_u64)).unwrap();
    block_on(mgr.unban(5_u64)).unwrap();

    assert_eq!(client.calls(), vec![
        Call::Delete("https://discordapp.com/api/v6/guilds/100/members/2".to_owned()),
        Call::Delete("https://discordapp.com/api/v6/guilds/100/bans/5".to_owned()),
    ]);
}

#[test]
fn listing_bans_prefers_locally_known_users() {
    let (client, _, ctx) = context_as(1, &[]);
    client.respond_to_get(json!([
        {
            "reason": null,
            "user": { "id": "2", "username": "impostor", "discriminator": "9999", "avatar": null },
        },
        {
            "reason": "spam",
            "user": { "id": "5", "username": "stranger", "discriminator": "0005", "avatar": null },
        },
    ]));
    let guild = test_guild(false);
    let mgr = ctx.guild(&guild);

    let bans = block_on(mgr.get_bans()).unwrap();

    assert_eq!(bans.len(), 2);
    // User 2 is a member of the guild, so the local record wins over the response's.
    assert_eq!(bans[0].username, "rowan");
    assert_eq!(bans[1].username, "stranger");
    assert_eq!(client.calls(), vec![
        Call::Get("https://discordapp.com/api/v6/guilds/100/bans".to_owned()),
    ]);
}

#[test]
fn ownership_transfer_validates_owner_and_membership() {
    let guild = test_guild(false);

    let (client, _, ctx) = context_as(2, &[]);
    let mgr = ctx.guild(&guild);
    assert!(block_on(mgr.transfer_ownership(2_u64)).unwrap_err().is_permission_denied());
    assert!(client.calls().is_empty());

    let (client, _, ctx) = context_as(1, &[]);
    let mgr = ctx.guild(&guild);
    assert!(block_on(mgr.transfer_ownership(5_u64)).unwrap_err().is_error());
    assert!(client.calls().is_empty());

    block_on(mgr.transfer_ownership(2_u64)).unwrap();
    assert_eq!(find_patch(&client.calls(), "/guilds/100"), json!({ "owner_id": "2" }));
}

#[test]
fn leave_or_delete_targets_the_guild_itself() {
    let (client, _, ctx) = context_as(1, &[]);
    let guild = test_guild(false);
    let mgr = ctx.guild(&guild);

    block_on(mgr.leave_or_delete()).unwrap();

    assert_eq!(client.calls(), vec![
        Call::Delete("https://discordapp.com/api/v6/guilds/100".to_owned()),
    ]);
}
