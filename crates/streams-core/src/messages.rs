use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use streams_store::State;
use streams_store::models::MessageRecord;
use streams_types::events::NotificationEvent;
use streams_types::models::{
    ChannelId, Container, DmId, Message, MessageId, MessagePage, React, ReactId, UserId,
};

use crate::Streams;
use crate::config::PAGE_SIZE;
use crate::error::{Error, Result};
use crate::notifications::{notify, notify_tags};
use crate::permissions;
use crate::validation;

/// The only react currently offered.
pub const THUMBS_UP: ReactId = 1;

/// Separates a shared message from the comment appended to it.
const SHARE_SEPARATOR: &str = "\n\n";

pub(crate) fn message_view(record: &MessageRecord, viewer: UserId) -> Message {
    let u_ids = record
        .reacts
        .get(&THUMBS_UP)
        .map(|users| users.iter().copied().collect())
        .unwrap_or_default();

    Message {
        message_id: record.id,
        u_id: record.sender,
        message: record.text.clone(),
        time_created: record.time_created.timestamp(),
        reacts: vec![React {
            react_id: THUMBS_UP,
            u_ids,
            is_this_user_reacted: record.has_reacted(THUMBS_UP, viewer),
        }],
        is_pinned: record.is_pinned,
    }
}

/// One window of a container's messages, newest first, starting `start`
/// messages back from the newest.
pub(crate) fn page(state: &State, container: Container, viewer: UserId, start: i64) -> Result<MessagePage> {
    let ids = state
        .container_messages(container)
        .ok_or_else(|| Error::input("Invalid container"))?;
    let total = ids.len();
    let begin = usize::try_from(start)
        .ok()
        .filter(|s| *s <= total)
        .ok_or_else(|| Error::input("start is outside the message list"))?;

    let messages = ids
        .iter()
        .skip(begin)
        .take(PAGE_SIZE)
        .filter_map(|id| state.message(*id))
        .map(|m| message_view(m, viewer))
        .collect();
    let end = if begin + PAGE_SIZE < total {
        start + PAGE_SIZE as i64
    } else {
        -1
    };

    Ok(MessagePage { messages, start, end })
}

/// Make `record` visible and notify anyone it tags.
fn deliver(state: &mut State, record: MessageRecord) -> bool {
    let (sender, container, text) = (record.sender, record.container, record.text.clone());
    if !state.insert_message(record) {
        return false;
    }
    notify_tags(state, sender, container, &text);
    true
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| Error::input("time_sent is out of range"))
}

impl Streams {
    pub fn message_send(&self, token: &str, channel_id: ChannelId, text: &str) -> Result<MessageId> {
        self.send_to(token, Container::Channel(channel_id), text)
    }

    pub fn message_senddm(&self, token: &str, dm_id: DmId, text: &str) -> Result<MessageId> {
        self.send_to(token, Container::Dm(dm_id), text)
    }

    fn send_to(&self, token: &str, container: Container, text: &str) -> Result<MessageId> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            permissions::require_member(state, container, user_id)?;
            validation::message_text(text)?;

            let id = state.allocate_message_id();
            deliver(state, MessageRecord::new(id, user_id, text.to_string(), Utc::now(), container));
            debug!("User {} sent message {} to {:?}", user_id, id, container);
            Ok(id)
        })
    }

    /// Replace a message's text. Empty text removes the message.
    pub fn message_edit(&self, token: &str, message_id: MessageId, text: &str) -> Result<()> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            let message = permissions::visible_message(state, message_id, user_id)?;
            let container = message.container;
            if message.sender != user_id && !permissions::can_moderate(state, container, user_id) {
                return Err(Error::access("Not allowed to edit this message"));
            }
            validation::optional_text(text)?;

            if text.is_empty() {
                state.remove_message(message_id);
                debug!("User {} removed message {} by clearing it", user_id, message_id);
                return Ok(());
            }
            if let Some(message) = state.message_mut(message_id) {
                message.text = text.to_string();
            }
            notify_tags(state, user_id, container, text);
            debug!("User {} edited message {}", user_id, message_id);
            Ok(())
        })
    }

    pub fn message_remove(&self, token: &str, message_id: MessageId) -> Result<()> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            let message = permissions::visible_message(state, message_id, user_id)?;
            if message.sender != user_id && !permissions::can_moderate(state, message.container, user_id) {
                return Err(Error::access("Not allowed to remove this message"));
            }

            state.remove_message(message_id);
            debug!("User {} removed message {}", user_id, message_id);
            Ok(())
        })
    }

    /// Post a copy of `og_message_id` into the channel or DM named by
    /// exactly one of `channel_id`/`dm_id` (the other is `-1`), optionally
    /// followed by a comment.
    pub fn message_share(
        &self,
        token: &str,
        og_message_id: MessageId,
        message: &str,
        channel_id: i64,
        dm_id: i64,
    ) -> Result<MessageId> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            let target = Container::from_ids(channel_id, dm_id)
                .ok_or_else(|| Error::input("Exactly one of channel_id and dm_id must be -1"))?;
            permissions::require_member(state, target, user_id)?;
            let original = permissions::visible_message(state, og_message_id, user_id)?;
            validation::optional_text(message)?;

            let mut text = original.text.clone();
            if !message.is_empty() {
                text.push_str(SHARE_SEPARATOR);
                text.push_str(message);
            }

            let id = state.allocate_message_id();
            state.insert_message(MessageRecord::new(id, user_id, text, Utc::now(), target));
            notify_tags(state, user_id, target, message);
            debug!("User {} shared message {} as {}", user_id, og_message_id, id);
            Ok(id)
        })
    }

    pub fn message_react(&self, token: &str, message_id: MessageId, react_id: ReactId) -> Result<()> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            let message = permissions::visible_message(state, message_id, user_id)?;
            if react_id != THUMBS_UP {
                return Err(Error::input("Invalid react_id"));
            }
            if message.has_reacted(react_id, user_id) {
                return Err(Error::input("Already reacted to this message"));
            }

            let (sender, container) = (message.sender, message.container);
            let event = NotificationEvent::Reacted {
                reactor_handle: state.handle_of(user_id).unwrap_or_default().to_string(),
                container_name: state.container_name(container).unwrap_or_default().to_string(),
            };
            if let Some(message) = state.message_mut(message_id) {
                message.reacts.entry(react_id).or_default().insert(user_id);
            }
            if permissions::is_member(state, container, sender) {
                notify(state, sender, container, event);
            }
            Ok(())
        })
    }

    pub fn message_unreact(&self, token: &str, message_id: MessageId, react_id: ReactId) -> Result<()> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            let message = permissions::visible_message(state, message_id, user_id)?;
            if react_id != THUMBS_UP {
                return Err(Error::input("Invalid react_id"));
            }
            if !message.has_reacted(react_id, user_id) {
                return Err(Error::input("Not reacted to this message"));
            }

            if let Some(message) = state.message_mut(message_id) {
                if let Some(users) = message.reacts.get_mut(&react_id) {
                    users.remove(&user_id);
                    if users.is_empty() {
                        message.reacts.remove(&react_id);
                    }
                }
            }
            Ok(())
        })
    }

    pub fn message_pin(&self, token: &str, message_id: MessageId) -> Result<()> {
        self.set_pinned(token, message_id, true)
    }

    pub fn message_unpin(&self, token: &str, message_id: MessageId) -> Result<()> {
        self.set_pinned(token, message_id, false)
    }

    fn set_pinned(&self, token: &str, message_id: MessageId, pinned: bool) -> Result<()> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            let message = permissions::visible_message(state, message_id, user_id)?;
            if !permissions::can_moderate(state, message.container, user_id) {
                return Err(Error::access("Owner permissions required"));
            }
            if message.is_pinned == pinned {
                return Err(Error::input(if pinned {
                    "Message is already pinned"
                } else {
                    "Message is not pinned"
                }));
            }

            if let Some(message) = state.message_mut(message_id) {
                message.is_pinned = pinned;
            }
            Ok(())
        })
    }

    pub fn message_sendlater(
        &self,
        token: &str,
        channel_id: ChannelId,
        text: &str,
        time_sent: i64,
    ) -> Result<MessageId> {
        self.send_later_to(token, Container::Channel(channel_id), text, time_sent)
    }

    pub fn message_sendlaterdm(&self, token: &str, dm_id: DmId, text: &str, time_sent: i64) -> Result<MessageId> {
        self.send_later_to(token, Container::Dm(dm_id), text, time_sent)
    }

    /// Reserve a message id now and deliver the message at `time_sent`.
    /// Anything sent in between ends up older than the scheduled message.
    fn send_later_to(&self, token: &str, container: Container, text: &str, time_sent: i64) -> Result<MessageId> {
        let slot = self.scheduler.reserve()?;

        let (id, sender, epoch, when) = self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            permissions::require_member(state, container, user_id)?;
            validation::message_text(text)?;
            if time_sent < Utc::now().timestamp() {
                return Err(Error::input("time_sent is in the past"));
            }
            let when = timestamp(time_sent)?;

            Ok((state.allocate_message_id(), user_id, state.epoch(), when))
        })?;

        let store = self.store.clone();
        let text = text.to_string();
        slot.run_at(when, move || {
            let outcome = store.with_state_mut(|state| {
                if state.epoch() != epoch {
                    return Ok(false);
                }
                if !permissions::is_member(state, container, sender) {
                    return Ok(false);
                }
                Ok::<_, streams_store::StoreError>(deliver(
                    state,
                    MessageRecord::new(id, sender, text, when, container),
                ))
            });
            match outcome {
                Ok(true) => info!("Delivered scheduled message {} to {:?}", id, container),
                Ok(false) => warn!("Dropped scheduled message {}: {:?} is gone or sender left", id, container),
                Err(e) => warn!("Scheduled message {} failed: {}", id, e),
            }
        });

        debug!("User {} scheduled message {} for {}", sender, id, when);
        Ok(id)
    }
}
