use tracing::{debug, info};

use streams_store::models::ChannelRecord;
use streams_types::events::NotificationEvent;
use streams_types::models::{
    ChannelDetails, ChannelId, ChannelSummary, Container, MessagePage, UserId,
};

use crate::Streams;
use crate::error::{Error, Result};
use crate::messages::page;
use crate::notifications::notify;
use crate::permissions::{self, has_channel_owner_permissions, is_channel_member, is_channel_owner};
use crate::users::profiles;
use crate::validation;

fn summary(channel: &ChannelRecord) -> ChannelSummary {
    ChannelSummary { channel_id: channel.id, name: channel.name.clone() }
}

impl Streams {
    /// Create a channel with the caller as its first owner and member.
    pub fn channels_create(&self, token: &str, name: &str, is_public: bool) -> Result<ChannelId> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            validation::channel_name(name)?;

            let id = state.allocate_channel_id();
            state.channels.insert(
                id,
                ChannelRecord {
                    id,
                    name: name.to_string(),
                    is_public,
                    owners: vec![user_id],
                    members: vec![user_id],
                    messages: Default::default(),
                    standup: None,
                },
            );
            info!("User {} created channel {} ({})", user_id, id, name);
            Ok(id)
        })
    }

    /// Channels the caller belongs to.
    pub fn channels_list(&self, token: &str) -> Result<Vec<ChannelSummary>> {
        self.store.with_state(|state| {
            let user_id = self.authorize(state, token)?;
            Ok(state
                .channels
                .values()
                .filter(|c| is_channel_member(c, user_id))
                .map(summary)
                .collect())
        })
    }

    /// Every channel, public or private.
    pub fn channels_listall(&self, token: &str) -> Result<Vec<ChannelSummary>> {
        self.store.with_state(|state| {
            self.authorize(state, token)?;
            Ok(state.channels.values().map(summary).collect())
        })
    }

    pub fn channel_details(&self, token: &str, channel_id: ChannelId) -> Result<ChannelDetails> {
        self.store.with_state(|state| {
            let user_id = self.authorize(state, token)?;
            permissions::require_member(state, Container::Channel(channel_id), user_id)?;
            let channel = permissions::channel(state, channel_id)?;

            Ok(ChannelDetails {
                name: channel.name.clone(),
                is_public: channel.is_public,
                owner_members: profiles(state, &channel.owners),
                all_members: profiles(state, &channel.members),
            })
        })
    }

    pub fn channel_join(&self, token: &str, channel_id: ChannelId) -> Result<()> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            let channel = permissions::channel(state, channel_id)?;
            if is_channel_member(channel, user_id) {
                return Err(Error::input("Already a member of channel"));
            }
            if !channel.is_public && !permissions::is_global_owner(state, user_id) {
                return Err(Error::access("Channel is private"));
            }

            if let Some(channel) = state.channel_mut(channel_id) {
                channel.members.push(user_id);
            }
            debug!("User {} joined channel {}", user_id, channel_id);
            Ok(())
        })
    }

    pub fn channel_invite(&self, token: &str, channel_id: ChannelId, u_id: UserId) -> Result<()> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            let container = Container::Channel(channel_id);
            permissions::require_member(state, container, user_id)?;
            let channel = permissions::channel(state, channel_id)?;

            if state.active_user(u_id).is_none() {
                return Err(Error::input("Invalid u_id"));
            }
            if is_channel_member(channel, u_id) {
                return Err(Error::input("User is already a member of channel"));
            }

            let event = NotificationEvent::Added {
                inviter_handle: state.handle_of(user_id).unwrap_or_default().to_string(),
                container_name: channel.name.clone(),
            };
            if let Some(channel) = state.channel_mut(channel_id) {
                channel.members.push(u_id);
            }
            notify(state, u_id, container, event);
            debug!("User {} invited {} to channel {}", user_id, u_id, channel_id);
            Ok(())
        })
    }

    /// Leave a channel, dropping owner status with it. The channel stays
    /// even when nobody is left in it.
    pub fn channel_leave(&self, token: &str, channel_id: ChannelId) -> Result<()> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            permissions::require_member(state, Container::Channel(channel_id), user_id)?;
            let channel = permissions::channel(state, channel_id)?;
            if channel.standup.as_ref().is_some_and(|s| s.starter == user_id) {
                return Err(Error::input("Cannot leave while running a standup"));
            }

            if let Some(channel) = state.channel_mut(channel_id) {
                channel.members.retain(|m| *m != user_id);
                channel.owners.retain(|m| *m != user_id);
            }
            debug!("User {} left channel {}", user_id, channel_id);
            Ok(())
        })
    }

    pub fn channel_addowner(&self, token: &str, channel_id: ChannelId, u_id: UserId) -> Result<()> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            let channel = permissions::channel(state, channel_id)?;
            if !has_channel_owner_permissions(state, channel, user_id) {
                return Err(Error::access("Not an owner of channel"));
            }
            if state.active_user(u_id).is_none() {
                return Err(Error::input("Invalid u_id"));
            }
            if !is_channel_member(channel, u_id) {
                return Err(Error::input("User is not a member of channel"));
            }
            if is_channel_owner(channel, u_id) {
                return Err(Error::input("User is already an owner of channel"));
            }

            if let Some(channel) = state.channel_mut(channel_id) {
                channel.owners.push(u_id);
            }
            info!("User {} made {} an owner of channel {}", user_id, u_id, channel_id);
            Ok(())
        })
    }

    pub fn channel_removeowner(&self, token: &str, channel_id: ChannelId, u_id: UserId) -> Result<()> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            let channel = permissions::channel(state, channel_id)?;
            if !has_channel_owner_permissions(state, channel, user_id) {
                return Err(Error::access("Not an owner of channel"));
            }
            if state.active_user(u_id).is_none() {
                return Err(Error::input("Invalid u_id"));
            }
            if !is_channel_owner(channel, u_id) {
                return Err(Error::input("User is not an owner of channel"));
            }
            if channel.owners.len() == 1 {
                return Err(Error::input("Cannot remove the only owner of channel"));
            }

            if let Some(channel) = state.channel_mut(channel_id) {
                channel.owners.retain(|m| *m != u_id);
            }
            info!("User {} removed {} as owner of channel {}", user_id, u_id, channel_id);
            Ok(())
        })
    }

    pub fn channel_messages(&self, token: &str, channel_id: ChannelId, start: i64) -> Result<MessagePage> {
        self.store.with_state(|state| {
            let user_id = self.authorize(state, token)?;
            let container = Container::Channel(channel_id);
            permissions::require_member(state, container, user_id)?;
            page(state, container, user_id, start)
        })
    }
}
