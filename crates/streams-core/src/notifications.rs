use std::collections::BTreeSet;

use tracing::debug;

use streams_store::State;
use streams_store::models::NotificationRecord;
use streams_types::events::NotificationEvent;
use streams_types::models::{Container, Notification, UserId};

use crate::Streams;
use crate::config::NOTIFICATION_CAP;
use crate::error::Result;

impl Streams {
    /// The caller's most recent notifications, newest first.
    pub fn notifications_get(&self, token: &str) -> Result<Vec<Notification>> {
        self.store.with_state(|state| {
            let user_id = self.authorize(state, token)?;
            let notifications = state
                .notifications
                .get(&user_id)
                .map(|list| {
                    list.iter()
                        .take(NOTIFICATION_CAP)
                        .map(|n| Notification {
                            channel_id: n.container.channel_id(),
                            dm_id: n.container.dm_id(),
                            notification_message: n.text.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default();
            Ok(notifications)
        })
    }
}

pub(crate) fn notify(state: &mut State, user_id: UserId, container: Container, event: NotificationEvent) {
    debug!("Notifying user {}: {:?}", user_id, event);
    state.push_notification(
        user_id,
        NotificationRecord { container, text: event.to_string() },
        NOTIFICATION_CAP,
    );
}

/// Handles mentioned as `@handle` in `text`, deduplicated, in first-seen order.
pub(crate) fn tagged_handles(text: &str) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    text.split('@')
        .skip(1)
        .map(|rest| {
            let end = rest
                .char_indices()
                .find(|(_, c)| !c.is_alphanumeric())
                .map_or(rest.len(), |(i, _)| i);
            &rest[..end]
        })
        .filter(|handle| !handle.is_empty() && seen.insert(*handle))
        .collect()
}

/// Notify every active member of `container` whose handle is tagged in
/// `text`. Each user is notified at most once per message.
pub(crate) fn notify_tags(state: &mut State, sender: UserId, container: Container, text: &str) {
    let (Some(sender_handle), Some(container_name), Some(members)) = (
        state.handle_of(sender),
        state.container_name(container),
        state.container_members(container),
    ) else {
        return;
    };

    let targets: Vec<UserId> = tagged_handles(text)
        .into_iter()
        .filter_map(|handle| {
            members
                .iter()
                .copied()
                .find(|m| state.active_user(*m).is_some_and(|u| u.handle == handle))
        })
        .collect();
    if targets.is_empty() {
        return;
    }

    let event = NotificationEvent::Tagged {
        sender_handle: sender_handle.to_string(),
        container_name: container_name.to_string(),
        message: text.to_string(),
    };
    for user_id in targets {
        notify(state, user_id, container, event.clone());
    }
}
