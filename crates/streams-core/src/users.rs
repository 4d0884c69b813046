use tracing::info;

use streams_store::State;
use streams_store::models::UserRecord;
use streams_types::models::{UserId, UserProfile};

use crate::Streams;
use crate::error::{Error, Result};
use crate::validation;

pub(crate) fn profile(user: &UserRecord) -> UserProfile {
    UserProfile {
        u_id: user.id,
        email: user.email.clone(),
        name_first: user.name_first.clone(),
        name_last: user.name_last.clone(),
        handle_str: user.handle.clone(),
        profile_img_url: user.profile_img_url.clone(),
    }
}

/// Profiles for a list of member ids, skipping anyone no longer resolvable.
pub(crate) fn profiles(state: &State, ids: &[UserId]) -> Vec<UserProfile> {
    ids.iter()
        .filter_map(|id| state.active_user(*id))
        .map(profile)
        .collect()
}

impl Streams {
    pub fn users_all(&self, token: &str) -> Result<Vec<UserProfile>> {
        self.store.with_state(|state| {
            self.authorize(state, token)?;
            Ok(state.active_users().map(profile).collect())
        })
    }

    /// Any user ever registered, including removed ones.
    pub fn user_profile(&self, token: &str, u_id: UserId) -> Result<UserProfile> {
        self.store.with_state(|state| {
            self.authorize(state, token)?;
            state
                .user(u_id)
                .map(profile)
                .ok_or_else(|| Error::input("Invalid u_id"))
        })
    }

    pub fn user_setname(&self, token: &str, name_first: &str, name_last: &str) -> Result<()> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            validation::name(name_first, "name_first")?;
            validation::name(name_last, "name_last")?;

            let user = current_user(state, user_id)?;
            if user.name_first == name_first && user.name_last == name_last {
                return Err(Error::input("Name is unchanged"));
            }
            user.name_first = name_first.to_string();
            user.name_last = name_last.to_string();
            Ok(())
        })
    }

    pub fn user_setemail(&self, token: &str, email: &str) -> Result<()> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            validation::email(email)?;

            match state.active_user_by_email(email) {
                Some(owner) if owner.id == user_id => {
                    return Err(Error::input("Email is unchanged"));
                }
                Some(_) => return Err(Error::input("Email is already in use")),
                None => {}
            }
            current_user(state, user_id)?.email = email.to_string();
            Ok(())
        })
    }

    pub fn user_sethandle(&self, token: &str, handle: &str) -> Result<()> {
        self.store.with_state_mut(|state| {
            let user_id = self.authorize(state, token)?;
            validation::handle(handle)?;

            match state.active_users().find(|u| u.handle == handle) {
                Some(owner) if owner.id == user_id => {
                    return Err(Error::input("Handle is unchanged"));
                }
                Some(_) => return Err(Error::input("Handle is already in use")),
                None => {}
            }
            let user = current_user(state, user_id)?;
            info!("User {} changed handle {} -> {}", user_id, user.handle, handle);
            user.handle = handle.to_string();
            Ok(())
        })
    }
}

fn current_user(state: &mut State, user_id: UserId) -> Result<&mut UserRecord> {
    state
        .user_mut(user_id)
        .ok_or_else(|| Error::access("Invalid token"))
}
