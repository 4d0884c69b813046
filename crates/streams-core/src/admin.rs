use tracing::info;

use streams_store::models::Permission;
use streams_types::models::UserId;

use crate::Streams;
use crate::error::{Error, Result};
use crate::permissions;

/// Text every message of a removed user is rewritten to.
pub const REMOVED_MESSAGE_TEXT: &str = "Removed user";

impl Streams {
    /// Remove a user from the platform. Their id and profile remain
    /// resolvable, everything else about them is gone.
    pub fn admin_user_remove(&self, token: &str, u_id: UserId) -> Result<()> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            permissions::require_global_owner(state, user_id)?;
            let target = state.active_user(u_id).ok_or_else(|| Error::input("Invalid u_id"))?;
            if target.is_global_owner() && state.global_owner_count() == 1 {
                return Err(Error::input("Cannot remove the only global owner"));
            }

            for message in state.messages.values_mut().filter(|m| m.sender == u_id) {
                message.text = REMOVED_MESSAGE_TEXT.to_string();
            }
            if let Some(user) = state.user_mut(u_id) {
                user.name_first = "Removed".into();
                user.name_last = "user".into();
            }
            for channel in state.channels.values_mut() {
                if channel.standup.as_ref().is_some_and(|s| s.starter == u_id) {
                    channel.standup = None;
                }
            }
            state.mark_user_removed(u_id);

            info!("User {} removed user {}", user_id, u_id);
            Ok(())
        })
    }

    pub fn admin_userpermission_change(&self, token: &str, u_id: UserId, permission_id: u32) -> Result<()> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            permissions::require_global_owner(state, user_id)?;
            let target = state.active_user(u_id).ok_or_else(|| Error::input("Invalid u_id"))?;
            let permission =
                Permission::from_id(permission_id).ok_or_else(|| Error::input("Invalid permission_id"))?;
            if target.permission == permission {
                return Err(Error::input("User already has that permission"));
            }
            if target.is_global_owner() && state.global_owner_count() == 1 {
                return Err(Error::input("Cannot demote the only global owner"));
            }

            if let Some(user) = state.user_mut(u_id) {
                user.permission = permission;
            }
            info!("User {} set permission of {} to {}", user_id, u_id, permission_id);
            Ok(())
        })
    }
}
