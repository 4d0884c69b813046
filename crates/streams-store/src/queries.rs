use std::collections::VecDeque;

use streams_types::models::{ChannelId, Container, DmId, MessageId, UserId};

use crate::State;
use crate::models::{
    ChannelRecord, DmRecord, MessageRecord, NotificationRecord, UserRecord, UserStatus,
};

impl State {
    // -- Users --

    /// Any user ever registered, removed ones included.
    pub fn user(&self, id: UserId) -> Option<&UserRecord> {
        self.users.get(&id)
    }

    pub fn user_mut(&mut self, id: UserId) -> Option<&mut UserRecord> {
        self.users.get_mut(&id)
    }

    pub fn active_user(&self, id: UserId) -> Option<&UserRecord> {
        self.users.get(&id).filter(|u| u.is_active())
    }

    pub fn active_users(&self) -> impl Iterator<Item = &UserRecord> {
        self.users.values().filter(|u| u.is_active())
    }

    pub fn active_user_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.active_users().find(|u| u.email == email)
    }

    pub fn handle_taken(&self, handle: &str) -> bool {
        self.active_users().any(|u| u.handle == handle)
    }

    pub fn global_owner_count(&self) -> usize {
        self.active_users().filter(|u| u.is_global_owner()).count()
    }

    pub fn handle_of(&self, id: UserId) -> Option<&str> {
        self.user(id).map(|u| u.handle.as_str())
    }

    // -- Sessions --

    /// Drop every session belonging to `user_id`. Returns how many went.
    pub fn revoke_sessions(&mut self, user_id: UserId) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, owner| *owner != user_id);
        before - self.sessions.len()
    }

    // -- Channels / DMs --

    pub fn channel(&self, id: ChannelId) -> Option<&ChannelRecord> {
        self.channels.get(&id)
    }

    pub fn channel_mut(&mut self, id: ChannelId) -> Option<&mut ChannelRecord> {
        self.channels.get_mut(&id)
    }

    pub fn dm(&self, id: DmId) -> Option<&DmRecord> {
        self.dms.get(&id)
    }

    pub fn dm_mut(&mut self, id: DmId) -> Option<&mut DmRecord> {
        self.dms.get_mut(&id)
    }

    pub fn container_exists(&self, container: Container) -> bool {
        match container {
            Container::Channel(id) => self.channels.contains_key(&id),
            Container::Dm(id) => self.dms.contains_key(&id),
        }
    }

    pub fn container_name(&self, container: Container) -> Option<&str> {
        match container {
            Container::Channel(id) => self.channel(id).map(|c| c.name.as_str()),
            Container::Dm(id) => self.dm(id).map(|d| d.name.as_str()),
        }
    }

    pub fn container_members(&self, container: Container) -> Option<&[UserId]> {
        match container {
            Container::Channel(id) => self.channel(id).map(|c| c.members.as_slice()),
            Container::Dm(id) => self.dm(id).map(|d| d.members.as_slice()),
        }
    }

    /// Message ids of a container, newest first.
    pub fn container_messages(&self, container: Container) -> Option<&VecDeque<MessageId>> {
        match container {
            Container::Channel(id) => self.channel(id).map(|c| &c.messages),
            Container::Dm(id) => self.dm(id).map(|d| &d.messages),
        }
    }

    fn container_messages_mut(&mut self, container: Container) -> Option<&mut VecDeque<MessageId>> {
        match container {
            Container::Channel(id) => self.channel_mut(id).map(|c| &mut c.messages),
            Container::Dm(id) => self.dm_mut(id).map(|d| &mut d.messages),
        }
    }

    // -- Messages --

    pub fn message(&self, id: MessageId) -> Option<&MessageRecord> {
        self.messages.get(&id)
    }

    pub fn message_mut(&mut self, id: MessageId) -> Option<&mut MessageRecord> {
        self.messages.get_mut(&id)
    }

    /// Make a message visible in its container. Lists stay ordered newest
    /// first by `(time_created, id)`, so a fresh send lands at the front and
    /// scheduled deliveries sharing a timestamp settle in id order however
    /// their timers race. Returns false (and stores nothing) if the container
    /// no longer exists.
    pub fn insert_message(&mut self, record: MessageRecord) -> bool {
        let key = (record.time_created, record.id);
        let Some(at) = self.container_messages(record.container).map(|list| {
            list.iter()
                .take_while(|id| {
                    self.messages
                        .get(*id)
                        .is_some_and(|m| (m.time_created, m.id) > key)
                })
                .count()
        }) else {
            return false;
        };
        if let Some(list) = self.container_messages_mut(record.container) {
            list.insert(at, record.id);
        }
        self.messages.insert(record.id, record);
        true
    }

    /// Compact a message out of its container and keep it as a tombstone.
    pub fn remove_message(&mut self, id: MessageId) -> Option<MessageRecord> {
        let record = self.messages.remove(&id)?;
        if let Some(list) = self.container_messages_mut(record.container) {
            list.retain(|m| *m != id);
        }
        self.removed_messages.insert(id, record.clone());
        Some(record)
    }

    /// Delete a DM along with all of its messages.
    pub fn remove_dm(&mut self, id: DmId) -> Option<DmRecord> {
        let dm = self.dms.remove(&id)?;
        for message_id in &dm.messages {
            if let Some(record) = self.messages.remove(message_id) {
                self.removed_messages.insert(*message_id, record);
            }
        }
        Some(dm)
    }

    // -- Notifications --

    /// Record a notification for `user_id`, keeping at most `cap` entries.
    pub fn push_notification(&mut self, user_id: UserId, record: NotificationRecord, cap: usize) {
        let list = self.notifications.entry(user_id).or_default();
        list.push_front(record);
        list.truncate(cap);
    }

    // -- Removal --

    /// Soft-delete a user: flag them removed and strip them from every
    /// membership. Their messages and id stay in place.
    pub fn mark_user_removed(&mut self, id: UserId) -> bool {
        let Some(user) = self.users.get_mut(&id) else {
            return false;
        };
        user.status = UserStatus::Removed;

        for channel in self.channels.values_mut() {
            channel.members.retain(|m| *m != id);
            channel.owners.retain(|m| *m != id);
        }
        for dm in self.dms.values_mut() {
            dm.members.retain(|m| *m != id);
        }
        self.revoke_sessions(id);
        self.reset_codes.retain(|_, owner| *owner != id);
        self.notifications.remove(&id);
        true
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::{NotificationRecord, Permission};

    fn user(state: &mut State, handle: &str) -> UserId {
        let id = state.allocate_user_id();
        state.users.insert(
            id,
            UserRecord {
                id,
                email: format!("{}@example.com", handle),
                password_hash: String::new(),
                name_first: handle.into(),
                name_last: handle.into(),
                handle: handle.into(),
                permission: Permission::Member,
                profile_img_url: String::new(),
                status: UserStatus::Active,
            },
        );
        id
    }

    fn channel(state: &mut State, owner: UserId) -> ChannelId {
        let id = state.allocate_channel_id();
        state.channels.insert(
            id,
            ChannelRecord {
                id,
                name: "general".into(),
                is_public: true,
                owners: vec![owner],
                members: vec![owner],
                messages: VecDeque::new(),
                standup: None,
            },
        );
        id
    }

    fn message(state: &mut State, sender: UserId, container: Container) -> MessageId {
        let id = state.allocate_message_id();
        assert!(state.insert_message(MessageRecord::new(
            id,
            sender,
            format!("message {}", id),
            Utc::now(),
            container,
        )));
        id
    }

    #[test]
    fn insert_prepends_newest() {
        let mut state = State::new();
        let u = user(&mut state, "alice");
        let c = Container::Channel(channel(&mut state, u));

        let first = message(&mut state, u, c);
        let second = message(&mut state, u, c);

        let list: Vec<_> = state.container_messages(c).unwrap().iter().copied().collect();
        assert_eq!(list, vec![second, first]);
    }

    #[test]
    fn same_time_deliveries_settle_in_id_order() {
        let mut state = State::new();
        let u = user(&mut state, "alice");
        let c = Container::Channel(channel(&mut state, u));
        let at = Utc::now() + chrono::Duration::seconds(5);

        let ids: Vec<_> = (0..3).map(|_| state.allocate_message_id()).collect();
        // Timers fired out of order.
        for id in [ids[1], ids[2], ids[0]] {
            assert!(state.insert_message(MessageRecord::new(id, u, "later".into(), at, c)));
        }
        let list: Vec<_> = state.container_messages(c).unwrap().iter().copied().collect();
        assert_eq!(list, vec![ids[2], ids[1], ids[0]]);

        // A later delivery still goes to the front.
        let fresh = state.allocate_message_id();
        let record = MessageRecord::new(fresh, u, "newest".into(), at + chrono::Duration::seconds(1), c);
        assert!(state.insert_message(record));
        assert_eq!(state.container_messages(c).unwrap().front(), Some(&fresh));
    }

    #[test]
    fn insert_into_missing_container_is_refused() {
        let mut state = State::new();
        let record = MessageRecord::new(1, 1, "hi".into(), Utc::now(), Container::Dm(9));
        assert!(!state.insert_message(record));
        assert!(state.messages.is_empty());
    }

    #[test]
    fn remove_keeps_tombstone_and_other_ids() {
        let mut state = State::new();
        let u = user(&mut state, "alice");
        let c = Container::Channel(channel(&mut state, u));
        let a = message(&mut state, u, c);
        let b = message(&mut state, u, c);
        let d = message(&mut state, u, c);

        assert!(state.remove_message(b).is_some());

        let list: Vec<_> = state.container_messages(c).unwrap().iter().copied().collect();
        assert_eq!(list, vec![d, a]);
        assert!(state.message(b).is_none());
        assert!(state.removed_messages.contains_key(&b));
        assert_eq!(state.allocate_message_id(), d + 1);
    }

    #[test]
    fn removed_users_free_their_handle_and_sessions() {
        let mut state = State::new();
        let u = user(&mut state, "alice");
        let c = channel(&mut state, u);
        state.sessions.insert(Uuid::new_v4(), u);

        assert!(state.handle_taken("alice"));
        assert!(state.mark_user_removed(u));

        assert!(!state.handle_taken("alice"));
        assert!(state.sessions.is_empty());
        assert!(state.channel(c).unwrap().members.is_empty());
        assert!(state.user(u).is_some());
        assert!(state.active_user(u).is_none());
    }

    #[test]
    fn notifications_are_capped_newest_first() {
        let mut state = State::new();
        for i in 0..5 {
            state.push_notification(
                1,
                NotificationRecord { container: Container::Channel(1), text: i.to_string() },
                3,
            );
        }
        let texts: Vec<_> = state.notifications[&1].iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["4", "3", "2"]);
    }
}
