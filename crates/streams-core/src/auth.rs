use anyhow::anyhow;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use rand::distr::Alphanumeric;
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use streams_store::State;
use streams_store::models::{Permission, UserRecord, UserStatus};
use streams_types::api::AuthResponse;
use streams_types::models::UserId;

use crate::Streams;
use crate::error::{Error, Result};
use crate::validation;

const RESET_CODE_CHARS: usize = 10;

/// Token payload. `sid` names the session entry in the store; a token is only
/// honoured while that entry exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,
    pub sid: Uuid,
    pub exp: usize,
}

impl Streams {
    pub fn register(
        &self,
        email: &str,
        password: &str,
        name_first: &str,
        name_last: &str,
    ) -> Result<AuthResponse> {
        validation::email(email)?;
        validation::password(password)?;
        validation::name(name_first, "name_first")?;
        validation::name(name_last, "name_last")?;
        if validation::base_handle(name_first, name_last).is_empty() {
            return Err(Error::input("Names must contain an alphanumeric character"));
        }

        // Fail fast before paying for the hash; re-checked under the write lock.
        self.store.with_state(|state| ensure_email_free(state, email))?;

        let password_hash = self.hash_password(password)?;

        self.store.with_state_mut(|state| {
            ensure_email_free(state, email)?;
            let handle = validation::unique_handle(state, name_first, name_last)?;
            let permission = if state.users.is_empty() {
                Permission::GlobalOwner
            } else {
                Permission::Member
            };

            // Sign before allocating so a signing failure consumes no id.
            let id = state.next_user_id();
            let (sid, token) = self.sign_session(id)?;
            state.allocate_user_id();
            state.sessions.insert(sid, id);
            state.users.insert(
                id,
                UserRecord {
                    id,
                    email: email.to_string(),
                    password_hash,
                    name_first: name_first.to_string(),
                    name_last: name_last.to_string(),
                    handle: handle.clone(),
                    permission,
                    profile_img_url: self.config.default_profile_img_url(),
                    status: UserStatus::Active,
                },
            );

            info!("Registered user {} ({})", id, handle);
            Ok(AuthResponse { token, auth_user_id: id })
        })
    }

    pub fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let (user_id, password_hash) = self.store.with_state(|state| {
            state
                .active_user_by_email(email)
                .map(|u| (u.id, u.password_hash.clone()))
                .ok_or_else(|| Error::input("Email is not registered"))
        })?;

        let parsed = PasswordHash::new(&password_hash)
            .map_err(|e| Error::Internal(anyhow!("stored password hash is corrupt: {}", e)))?;
        self.hasher
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| Error::input("Incorrect password"))?;

        self.store.with_state_mut(|state| {
            if state.active_user(user_id).is_none() {
                return Err(Error::input("Email is not registered"));
            }
            let (sid, token) = self.sign_session(user_id)?;
            state.sessions.insert(sid, user_id);
            debug!("User {} logged in", user_id);
            Ok(AuthResponse { token, auth_user_id: user_id })
        })
    }

    /// Invalidate exactly the session this token belongs to.
    pub fn logout(&self, token: &str) -> Result<()> {
        let claims = self.decode_token(token)?;
        self.store.with_state_mut(|state| {
            session_user(state, &claims)?;
            state.sessions.remove(&claims.sid);
            debug!("User {} logged out", claims.sub);
            Ok(())
        })
    }

    /// Resolve a token to its user. Every token-taking operation goes
    /// through this first.
    pub fn validate_token(&self, token: &str) -> Result<UserId> {
        self.store.with_state(|state| self.authorize(state, token))
    }

    /// Issue a single-use reset code for `email`, hand it to the reset sink
    /// and sign the user out everywhere. Unknown emails are accepted silently.
    pub fn password_reset_request(&self, email: &str) -> Result<()> {
        self.store.with_state_mut(|state| {
            let Some(user_id) = state.active_user_by_email(email).map(|u| u.id) else {
                debug!("Password reset requested for unknown email");
                return Ok(());
            };

            let code: String = rand::rng()
                .sample_iter(&Alphanumeric)
                .take(RESET_CODE_CHARS)
                .map(char::from)
                .collect();
            self.reset_sink.deliver(user_id, email, &code)?;

            let revoked = state.revoke_sessions(user_id);
            state.reset_codes.insert(digest(&code), user_id);
            info!("Issued password reset code for user {} ({} sessions revoked)", user_id, revoked);
            Ok(())
        })
    }

    /// Consume a reset code and set a new password.
    pub fn password_reset(&self, reset_code: &str, new_password: &str) -> Result<()> {
        validation::password(new_password)?;
        let key = digest(reset_code);

        self.store.with_state(|state| {
            if state.reset_codes.contains_key(&key) {
                Ok(())
            } else {
                Err(Error::input("Invalid reset code"))
            }
        })?;

        let password_hash = self.hash_password(new_password)?;

        self.store.with_state_mut(|state| {
            let user_id = state
                .reset_codes
                .get(&key)
                .copied()
                .ok_or_else(|| Error::input("Invalid reset code"))?;
            let user = state
                .users
                .get_mut(&user_id)
                .filter(|u| u.is_active())
                .ok_or_else(|| Error::input("Invalid reset code"))?;

            user.password_hash = password_hash;
            state.reset_codes.remove(&key);
            info!("Password reset for user {}", user_id);
            Ok(())
        })
    }

    // -- Session plumbing --

    /// Token → user id, for use inside an already-held store lock.
    pub(crate) fn authorize(&self, state: &State, token: &str) -> Result<UserId> {
        let claims = self.decode_token(token)?;
        session_user(state, &claims)
    }

    fn decode_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| Error::access("Invalid token"))
    }

    /// Mint a token for a new session. The caller records `sid` in the
    /// session map to make it live.
    fn sign_session(&self, user_id: UserId) -> Result<(Uuid, String)> {
        let claims = Claims {
            sub: user_id,
            sid: Uuid::new_v4(),
            exp: (Utc::now() + chrono::Duration::days(self.config.session_ttl_days)).timestamp()
                as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| Error::Internal(anyhow!("failed to sign session token: {}", e)))?;
        Ok((claims.sid, token))
    }

    fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::Internal(anyhow!("password hashing failed: {}", e)))?
            .to_string();
        Ok(hash)
    }
}

fn ensure_email_free(state: &State, email: &str) -> Result<()> {
    if state.active_user_by_email(email).is_some() {
        return Err(Error::input("Email is already registered"));
    }
    Ok(())
}

fn session_user(state: &State, claims: &Claims) -> Result<UserId> {
    match state.sessions.get(&claims.sid) {
        Some(&owner) if owner == claims.sub && state.active_user(owner).is_some() => Ok(owner),
        _ => Err(Error::access("Invalid token")),
    }
}

fn digest(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}
