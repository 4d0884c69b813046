use serde::{Deserialize, Serialize};

pub type UserId = u32;
pub type ChannelId = u32;
pub type DmId = u32;
pub type MessageId = u32;
pub type ReactId = u32;

/// Wire value used in place of a channel or DM id that does not apply.
pub const NO_CONTAINER: i64 = -1;

/// The channel or DM that holds a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Container {
    Channel(ChannelId),
    Dm(DmId),
}

impl Container {
    /// Resolve a `(channel_id, dm_id)` pair where exactly one side is
    /// [`NO_CONTAINER`]. Returns `None` for any other combination.
    pub fn from_ids(channel_id: i64, dm_id: i64) -> Option<Self> {
        match (channel_id, dm_id) {
            (NO_CONTAINER, NO_CONTAINER) => None,
            (NO_CONTAINER, dm) => u32::try_from(dm).ok().map(Self::Dm),
            (channel, NO_CONTAINER) => u32::try_from(channel).ok().map(Self::Channel),
            _ => None,
        }
    }

    pub fn channel_id(&self) -> i64 {
        match self {
            Self::Channel(id) => i64::from(*id),
            Self::Dm(_) => NO_CONTAINER,
        }
    }

    pub fn dm_id(&self) -> i64 {
        match self {
            Self::Channel(_) => NO_CONTAINER,
            Self::Dm(id) => i64::from(*id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub u_id: UserId,
    pub email: String,
    pub name_first: String,
    pub name_last: String,
    pub handle_str: String,
    pub profile_img_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct React {
    pub react_id: ReactId,
    pub u_ids: Vec<UserId>,
    pub is_this_user_reacted: bool,
}

/// A message as seen by one particular user (`is_this_user_reacted` is
/// relative to the viewer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: MessageId,
    pub u_id: UserId,
    pub message: String,
    pub time_created: i64,
    pub reacts: Vec<React>,
    pub is_pinned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    pub start: i64,
    /// `start + page size` while older messages remain, `-1` once exhausted.
    pub end: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub channel_id: ChannelId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDetails {
    pub name: String,
    pub is_public: bool,
    pub owner_members: Vec<UserProfile>,
    pub all_members: Vec<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmSummary {
    pub dm_id: DmId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmDetails {
    pub name: String,
    pub members: Vec<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub channel_id: i64,
    pub dm_id: i64,
    pub notification_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandupStatus {
    pub is_active: bool,
    pub time_finish: Option<i64>,
}
