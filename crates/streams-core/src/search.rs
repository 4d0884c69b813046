use std::cmp::Reverse;

use streams_types::models::Message;

use crate::Streams;
use crate::error::{Error, Result};
use crate::messages::message_view;
use crate::permissions;
use crate::validation::MAX_MESSAGE_CHARS;

impl Streams {
    /// Messages in any of the caller's channels or DMs containing
    /// `query_str` (case-sensitive), most recent first.
    pub fn search(&self, token: &str, query_str: &str) -> Result<Vec<Message>> {
        self.store.with_state(|state| {
            let user_id = self.authorize(state, token)?;
            let len = query_str.chars().count();
            if !(1..=MAX_MESSAGE_CHARS).contains(&len) {
                return Err(Error::input("query_str must be 1 to 1000 characters"));
            }

            let mut hits: Vec<_> = state
                .messages
                .values()
                .filter(|m| m.text.contains(query_str))
                .filter(|m| permissions::is_member(state, m.container, user_id))
                .collect();
            hits.sort_by_key(|m| Reverse((m.time_created, m.id)));

            Ok(hits.into_iter().map(|m| message_view(m, user_id)).collect())
        })
    }
}
