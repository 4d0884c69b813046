//! Membership and ownership predicates, plus the guards operations use to
//! turn them into errors.

use streams_store::State;
use streams_store::models::{ChannelRecord, DmRecord, MessageRecord};
use streams_types::models::{ChannelId, Container, DmId, MessageId, UserId};

use crate::error::{Error, Result};

pub fn is_global_owner(state: &State, user_id: UserId) -> bool {
    state.user(user_id).is_some_and(|u| u.is_global_owner())
}

pub fn is_channel_member(channel: &ChannelRecord, user_id: UserId) -> bool {
    channel.members.contains(&user_id)
}

/// Listed in the channel's owner set. Global owners are not implied.
pub fn is_channel_owner(channel: &ChannelRecord, user_id: UserId) -> bool {
    channel.owners.contains(&user_id)
}

/// Channel owner, or a global owner who is also a member.
pub fn has_channel_owner_permissions(state: &State, channel: &ChannelRecord, user_id: UserId) -> bool {
    is_channel_owner(channel, user_id)
        || (is_global_owner(state, user_id) && is_channel_member(channel, user_id))
}

pub fn is_dm_member(dm: &DmRecord, user_id: UserId) -> bool {
    dm.members.contains(&user_id)
}

/// Only the creator owns a DM, and only while still in it.
pub fn is_dm_owner(dm: &DmRecord, user_id: UserId) -> bool {
    dm.creator == user_id && is_dm_member(dm, user_id)
}

pub fn is_member(state: &State, container: Container, user_id: UserId) -> bool {
    match container {
        Container::Channel(id) => state.channel(id).is_some_and(|c| is_channel_member(c, user_id)),
        Container::Dm(id) => state.dm(id).is_some_and(|d| is_dm_member(d, user_id)),
    }
}

/// Owner-level rights over a container's messages (edit/remove others',
/// pin, unpin).
pub fn can_moderate(state: &State, container: Container, user_id: UserId) -> bool {
    match container {
        Container::Channel(id) => state
            .channel(id)
            .is_some_and(|c| has_channel_owner_permissions(state, c, user_id)),
        Container::Dm(id) => state.dm(id).is_some_and(|d| is_dm_owner(d, user_id)),
    }
}

// -- Guards --

pub fn channel(state: &State, channel_id: ChannelId) -> Result<&ChannelRecord> {
    state
        .channel(channel_id)
        .ok_or_else(|| Error::input("Invalid channel_id"))
}

pub fn dm(state: &State, dm_id: DmId) -> Result<&DmRecord> {
    state.dm(dm_id).ok_or_else(|| Error::input("Invalid dm_id"))
}

pub fn container_exists(state: &State, container: Container) -> Result<()> {
    match container {
        Container::Channel(id) => channel(state, id).map(|_| ()),
        Container::Dm(id) => dm(state, id).map(|_| ()),
    }
}

/// Container exists (InputError) and the user belongs to it (AccessError).
pub fn require_member(state: &State, container: Container, user_id: UserId) -> Result<()> {
    container_exists(state, container)?;
    if !is_member(state, container, user_id) {
        return Err(match container {
            Container::Channel(_) => Error::access("Not a member of channel"),
            Container::Dm(_) => Error::access("Not a member of DM"),
        });
    }
    Ok(())
}

/// A live message inside a container the user currently belongs to.
pub fn visible_message(state: &State, message_id: MessageId, user_id: UserId) -> Result<&MessageRecord> {
    state
        .message(message_id)
        .filter(|m| is_member(state, m.container, user_id))
        .ok_or_else(|| Error::input("Invalid message_id"))
}

pub fn require_global_owner(state: &State, user_id: UserId) -> Result<()> {
    if !is_global_owner(state, user_id) {
        return Err(Error::access("Not a global owner"));
    }
    Ok(())
}
