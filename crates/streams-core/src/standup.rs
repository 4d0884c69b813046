use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use streams_store::StoreError;
use streams_store::models::{MessageRecord, Standup};
use streams_types::models::{ChannelId, Container, StandupStatus};

use crate::Streams;
use crate::error::{Error, Result};
use crate::permissions;
use crate::validation;

impl Streams {
    /// Open a standup window of `length` seconds. Lines sent during the
    /// window are posted as one message, authored by the caller, when it
    /// closes. Returns the finish time in epoch seconds.
    pub fn standup_start(&self, token: &str, channel_id: ChannelId, length: i64) -> Result<i64> {
        let slot = self.scheduler.reserve()?;

        let (starter, epoch, time_finish) = self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            permissions::require_member(state, Container::Channel(channel_id), user_id)?;
            if length < 0 {
                return Err(Error::input("length cannot be negative"));
            }
            let time_finish = Duration::try_seconds(length)
                .and_then(|d| Utc::now().checked_add_signed(d))
                .ok_or_else(|| Error::input("length is too large"))?;

            let channel = state
                .channel_mut(channel_id)
                .ok_or_else(|| Error::input("Invalid channel_id"))?;
            if channel.standup.is_some() {
                return Err(Error::input("A standup is already active"));
            }
            channel.standup = Some(Standup { starter: user_id, time_finish, lines: Vec::new() });
            Ok((user_id, state.epoch(), time_finish))
        })?;

        let store = self.store.clone();
        slot.run_at(time_finish, move || {
            let outcome = store.with_state_mut(|state| {
                if state.epoch() != epoch {
                    return Ok(None);
                }
                let Some(channel) = state.channel_mut(channel_id) else {
                    return Ok(None);
                };
                if !channel.standup.as_ref().is_some_and(|s| s.time_finish == time_finish) {
                    return Ok(None);
                }
                let Some(standup) = channel.standup.take() else {
                    return Ok(None);
                };
                if standup.lines.is_empty() {
                    return Ok(Some(None));
                }

                let id = state.allocate_message_id();
                let record = MessageRecord::new(
                    id,
                    standup.starter,
                    standup.lines.join("\n"),
                    standup.time_finish,
                    Container::Channel(channel_id),
                );
                state.insert_message(record);
                Ok::<_, StoreError>(Some(Some(id)))
            });
            match outcome {
                Ok(Some(Some(id))) => info!("Standup in channel {} closed as message {}", channel_id, id),
                Ok(Some(None)) => info!("Standup in channel {} closed with no lines", channel_id),
                Ok(None) => warn!("Standup in channel {} was gone before it closed", channel_id),
                Err(e) => warn!("Closing standup in channel {} failed: {}", channel_id, e),
            }
        });

        debug!("User {} started a {}s standup in channel {}", starter, length, channel_id);
        Ok(time_finish.timestamp())
    }

    pub fn standup_active(&self, token: &str, channel_id: ChannelId) -> Result<StandupStatus> {
        self.store.with_state(|state| {
            let user_id = self.authorize(state, token)?;
            permissions::require_member(state, Container::Channel(channel_id), user_id)?;
            let channel = permissions::channel(state, channel_id)?;

            Ok(StandupStatus {
                is_active: channel.standup.is_some(),
                time_finish: channel.standup.as_ref().map(|s| s.time_finish.timestamp()),
            })
        })
    }

    /// Buffer `handle: message` for the channel's active standup.
    pub fn standup_send(&self, token: &str, channel_id: ChannelId, message: &str) -> Result<()> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            permissions::require_member(state, Container::Channel(channel_id), user_id)?;
            validation::optional_text(message)?;

            let line = format!("{}: {}", state.handle_of(user_id).unwrap_or_default(), message);
            let standup = state
                .channel_mut(channel_id)
                .and_then(|c| c.standup.as_mut())
                .ok_or_else(|| Error::input("No standup is active"))?;
            standup.lines.push(line);
            Ok(())
        })
    }
}
