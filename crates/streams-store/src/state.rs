use std::collections::{BTreeMap, HashMap, VecDeque};

use tracing::info;
use uuid::Uuid;

use streams_types::models::{ChannelId, DmId, MessageId, UserId};

use crate::models::{ChannelRecord, DmRecord, MessageRecord, NotificationRecord, UserRecord};

const FIRST_ID: u32 = 1;

/// Every collection the platform keeps. Ids come from private monotonic
/// counters and are never handed out twice within one epoch.
#[derive(Debug)]
pub struct State {
    /// Active and removed users share one id space.
    pub users: BTreeMap<UserId, UserRecord>,
    /// Session id (carried inside the token) -> owning user.
    pub sessions: HashMap<Uuid, UserId>,
    /// SHA-256 hex digest of an outstanding reset code -> user.
    pub reset_codes: HashMap<String, UserId>,
    pub channels: BTreeMap<ChannelId, ChannelRecord>,
    pub dms: BTreeMap<DmId, DmRecord>,
    /// Live messages only.
    pub messages: HashMap<MessageId, MessageRecord>,
    /// Tombstones of removed messages.
    pub removed_messages: BTreeMap<MessageId, MessageRecord>,
    /// Newest first, per user.
    pub notifications: HashMap<UserId, VecDeque<NotificationRecord>>,

    next_user_id: UserId,
    next_channel_id: ChannelId,
    next_dm_id: DmId,
    next_message_id: MessageId,
    epoch: u64,
}

impl State {
    pub fn new() -> Self {
        Self {
            users: BTreeMap::new(),
            sessions: HashMap::new(),
            reset_codes: HashMap::new(),
            channels: BTreeMap::new(),
            dms: BTreeMap::new(),
            messages: HashMap::new(),
            removed_messages: BTreeMap::new(),
            notifications: HashMap::new(),
            next_user_id: FIRST_ID,
            next_channel_id: FIRST_ID,
            next_dm_id: FIRST_ID,
            next_message_id: FIRST_ID,
            epoch: 0,
        }
    }

    /// Bumped on every [`State::reset`]. Deferred work records the epoch it
    /// was scheduled in and does nothing once it no longer matches.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Drop everything and restart all id sequences.
    pub fn reset(&mut self) {
        let epoch = self.epoch + 1;
        *self = Self::new();
        self.epoch = epoch;
        info!("Store cleared (epoch {})", epoch);
    }

    /// The id the next `allocate_user_id` will hand out.
    pub fn next_user_id(&self) -> UserId {
        self.next_user_id
    }

    pub fn allocate_user_id(&mut self) -> UserId {
        let id = self.next_user_id;
        self.next_user_id += 1;
        id
    }

    pub fn allocate_channel_id(&mut self) -> ChannelId {
        let id = self.next_channel_id;
        self.next_channel_id += 1;
        id
    }

    pub fn allocate_dm_id(&mut self) -> DmId {
        let id = self.next_dm_id;
        self.next_dm_id += 1;
        id
    }

    /// Message ids are global across channels and DMs. A reserved id that is
    /// never delivered simply stays unused.
    pub fn allocate_message_id(&mut self) -> MessageId {
        let id = self.next_message_id;
        self.next_message_id += 1;
        id
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
