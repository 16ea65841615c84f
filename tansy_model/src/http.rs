//! Parameter types for API endpoints.

use crate::guild::*;
use crate::image::ImageData;
use crate::serde::*;
use crate::types::*;

/// The parameters of the `Modify Guild` endpoint.
///
/// Absent fields leave the current value unchanged on the remote side; fields carrying an
/// explicit `null` clear the current value.
#[serde_with::skip_serializing_none]
#[derive(Serialize, Clone, Default, PartialEq, Eq, Debug)]
pub struct ModifyGuildParams {
    pub name: Option<String>,
    pub region: Option<Region>,
    pub afk_timeout: Option<AfkTimeout>,
    pub icon: Option<Option<ImageData>>,
    pub afk_channel_id: Option<Option<ChannelId>>,
    pub owner_id: Option<UserId>,
}

/// The parameters of the `Modify Guild Member` endpoint.
#[serde_with::skip_serializing_none]
#[derive(Serialize, Clone, Default, PartialEq, Eq, Debug)]
pub struct ModifyMemberParams {
    pub roles: Option<Vec<RoleId>>,
}
