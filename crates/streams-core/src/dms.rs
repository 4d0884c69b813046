use std::collections::BTreeSet;

use tracing::{debug, info};

use streams_store::models::DmRecord;
use streams_types::events::NotificationEvent;
use streams_types::models::{Container, DmDetails, DmId, DmSummary, MessagePage, UserId};

use crate::Streams;
use crate::error::{Error, Result};
use crate::messages::page;
use crate::notifications::notify;
use crate::permissions::{self, is_dm_member, is_dm_owner};
use crate::users::profiles;

impl Streams {
    /// Open a DM between the caller and `u_ids`. The name is every member's
    /// handle, sorted and comma separated.
    pub fn dm_create(&self, token: &str, u_ids: &[UserId]) -> Result<DmId> {
        self.store.with_state_mut(|state| {
            let creator = self.authorize(state, token)?;

            let mut seen = BTreeSet::from([creator]);
            for u_id in u_ids {
                if state.active_user(*u_id).is_none() {
                    return Err(Error::input(format!("Invalid u_id {}", u_id)));
                }
                if !seen.insert(*u_id) {
                    return Err(Error::input(format!("Duplicate u_id {}", u_id)));
                }
            }

            let mut members = vec![creator];
            members.extend_from_slice(u_ids);
            let mut handles: Vec<&str> = members.iter().filter_map(|m| state.handle_of(*m)).collect();
            handles.sort_unstable();
            let name = handles.join(", ");
            let creator_handle = state.handle_of(creator).unwrap_or_default().to_string();

            let id = state.allocate_dm_id();
            state.dms.insert(
                id,
                DmRecord {
                    id,
                    name: name.clone(),
                    creator,
                    members,
                    messages: Default::default(),
                },
            );
            for u_id in u_ids {
                let event = NotificationEvent::Added {
                    inviter_handle: creator_handle.clone(),
                    container_name: name.clone(),
                };
                notify(state, *u_id, Container::Dm(id), event);
            }

            info!("User {} created DM {} ({})", creator, id, name);
            Ok(id)
        })
    }

    pub fn dm_list(&self, token: &str) -> Result<Vec<DmSummary>> {
        self.store.with_state(|state| {
            let user_id = self.authorize(state, token)?;
            Ok(state
                .dms
                .values()
                .filter(|d| is_dm_member(d, user_id))
                .map(|d| DmSummary { dm_id: d.id, name: d.name.clone() })
                .collect())
        })
    }

    /// Delete a DM and its messages. Only the creator, while still a member,
    /// may do this.
    pub fn dm_remove(&self, token: &str, dm_id: DmId) -> Result<()> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            let dm = permissions::dm(state, dm_id)?;
            if !is_dm_owner(dm, user_id) {
                return Err(Error::access("Only the creator can remove a DM"));
            }

            state.remove_dm(dm_id);
            info!("User {} removed DM {}", user_id, dm_id);
            Ok(())
        })
    }

    pub fn dm_details(&self, token: &str, dm_id: DmId) -> Result<DmDetails> {
        self.store.with_state(|state| {
            let user_id = self.authorize(state, token)?;
            permissions::require_member(state, Container::Dm(dm_id), user_id)?;
            let dm = permissions::dm(state, dm_id)?;
            Ok(DmDetails {
                name: dm.name.clone(),
                members: profiles(state, &dm.members),
            })
        })
    }

    /// Leave a DM. Its name and messages are unchanged.
    pub fn dm_leave(&self, token: &str, dm_id: DmId) -> Result<()> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            permissions::require_member(state, Container::Dm(dm_id), user_id)?;

            if let Some(dm) = state.dm_mut(dm_id) {
                dm.members.retain(|m| *m != user_id);
            }
            debug!("User {} left DM {}", user_id, dm_id);
            Ok(())
        })
    }

    pub fn dm_messages(&self, token: &str, dm_id: DmId, start: i64) -> Result<MessagePage> {
        self.store.with_state(|state| {
            let user_id = self.authorize(state, token)?;
            let container = Container::Dm(dm_id);
            permissions::require_member(state, container, user_id)?;
            page(state, container, user_id, start)
        })
    }
}
