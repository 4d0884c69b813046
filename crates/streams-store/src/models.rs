//! Entity records held by the store. Distinct from the streams-types view
//! models so the store can carry fields (hashes, tombstones) never exposed.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use chrono::{DateTime, Utc};

use streams_types::models::{ChannelId, Container, DmId, MessageId, ReactId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    GlobalOwner,
    Member,
}

impl Permission {
    pub fn id(self) -> u32 {
        match self {
            Self::GlobalOwner => 1,
            Self::Member => 2,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(Self::GlobalOwner),
            2 => Some(Self::Member),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Removed,
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub name_first: String,
    pub name_last: String,
    pub handle: String,
    pub permission: Permission,
    pub profile_img_url: String,
    pub status: UserStatus,
}

impl UserRecord {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    pub fn is_global_owner(&self) -> bool {
        self.is_active() && self.permission == Permission::GlobalOwner
    }
}

#[derive(Debug, Clone)]
pub struct Standup {
    pub starter: UserId,
    pub time_finish: DateTime<Utc>,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ChannelRecord {
    pub id: ChannelId,
    pub name: String,
    pub is_public: bool,
    pub owners: Vec<UserId>,
    pub members: Vec<UserId>,
    /// Newest first.
    pub messages: VecDeque<MessageId>,
    pub standup: Option<Standup>,
}

#[derive(Debug, Clone)]
pub struct DmRecord {
    pub id: DmId,
    pub name: String,
    pub creator: UserId,
    pub members: Vec<UserId>,
    /// Newest first.
    pub messages: VecDeque<MessageId>,
}

#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub id: MessageId,
    pub sender: UserId,
    pub text: String,
    pub time_created: DateTime<Utc>,
    pub reacts: BTreeMap<ReactId, BTreeSet<UserId>>,
    pub is_pinned: bool,
    pub container: Container,
}

impl MessageRecord {
    pub fn new(
        id: MessageId,
        sender: UserId,
        text: String,
        time_created: DateTime<Utc>,
        container: Container,
    ) -> Self {
        Self {
            id,
            sender,
            text,
            time_created,
            reacts: BTreeMap::new(),
            is_pinned: false,
            container,
        }
    }

    pub fn has_reacted(&self, react_id: ReactId, user_id: UserId) -> bool {
        self.reacts
            .get(&react_id)
            .is_some_and(|users| users.contains(&user_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub container: Container,
    pub text: String,
}
