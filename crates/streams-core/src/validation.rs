use std::sync::LazyLock;

use regex::Regex;

use streams_store::State;

use crate::error::{Error, Result};

pub const MIN_PASSWORD_CHARS: usize = 6;
pub const MAX_NAME_CHARS: usize = 50;
pub const MAX_CHANNEL_NAME_CHARS: usize = 20;
pub const MAX_MESSAGE_CHARS: usize = 1000;
pub const MIN_HANDLE_CHARS: usize = 3;
pub const MAX_HANDLE_CHARS: usize = 20;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("email pattern is valid")
});

pub fn email(email: &str) -> Result<()> {
    if EMAIL.is_match(email) {
        Ok(())
    } else {
        Err(Error::input("Invalid email"))
    }
}

pub fn password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(Error::input("Password must be at least 6 characters"));
    }
    Ok(())
}

pub fn name(name: &str, field: &str) -> Result<()> {
    let len = name.chars().count();
    if !(1..=MAX_NAME_CHARS).contains(&len) {
        return Err(Error::input(format!("Invalid {} length", field)));
    }
    Ok(())
}

pub fn channel_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if !(1..=MAX_CHANNEL_NAME_CHARS).contains(&len) {
        return Err(Error::input("Channel name must be 1 to 20 characters"));
    }
    Ok(())
}

/// Text of a message being sent: 1 to 1000 characters.
pub fn message_text(text: &str) -> Result<()> {
    let len = text.chars().count();
    if !(1..=MAX_MESSAGE_CHARS).contains(&len) {
        return Err(Error::input("Message must be 1 to 1000 characters"));
    }
    Ok(())
}

/// Text that may legitimately be empty (edits, share suffixes, standup
/// lines) but never longer than 1000 characters.
pub fn optional_text(text: &str) -> Result<()> {
    if text.chars().count() > MAX_MESSAGE_CHARS {
        return Err(Error::input("Message is longer than 1000 characters"));
    }
    Ok(())
}

pub fn handle(handle: &str) -> Result<()> {
    let len = handle.chars().count();
    if !(MIN_HANDLE_CHARS..=MAX_HANDLE_CHARS).contains(&len) {
        return Err(Error::input("Invalid handle length"));
    }
    if !handle.chars().all(char::is_alphanumeric) {
        return Err(Error::input("Handle contains non-alphanumeric characters"));
    }
    Ok(())
}

/// Lowercase alphanumeric concatenation of both names, truncated to 20
/// characters.
pub fn base_handle(name_first: &str, name_last: &str) -> String {
    name_first
        .chars()
        .chain(name_last.chars())
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .take(MAX_HANDLE_CHARS)
        .collect()
}

/// Derive a handle unused by any active user: the base handle if free,
/// otherwise the base with the smallest free numeric suffix starting at 0.
pub fn unique_handle(state: &State, name_first: &str, name_last: &str) -> Result<String> {
    let base = base_handle(name_first, name_last);
    if base.is_empty() {
        return Err(Error::input("Names must contain an alphanumeric character"));
    }
    if !state.handle_taken(&base) {
        return Ok(base);
    }
    let handle = (0u64..)
        .map(|suffix| format!("{}{}", base, suffix))
        .find(|candidate| !state.handle_taken(candidate))
        .ok_or_else(|| Error::Internal(anyhow::anyhow!("handle suffixes exhausted")))?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use streams_store::models::{Permission, UserRecord, UserStatus};

    use super::*;

    fn add_user(state: &mut State, handle: &str) {
        let id = state.allocate_user_id();
        state.users.insert(
            id,
            UserRecord {
                id,
                email: format!("{}@example.com", id),
                password_hash: String::new(),
                name_first: String::new(),
                name_last: String::new(),
                handle: handle.into(),
                permission: Permission::Member,
                profile_img_url: String::new(),
                status: UserStatus::Active,
            },
        );
    }

    #[test]
    fn base_handle_strips_and_lowercases() {
        assert_eq!(base_handle("First", "Last"), "firstlast");
        assert_eq!(base_handle("Jean-Luc", "O'Brien"), "jeanlucobrien");
        assert_eq!(base_handle("12345", "12345"), "1234512345");
        assert_eq!(base_handle("@#!$!", "@$#!$*"), "");
    }

    #[test]
    fn base_handle_truncates_to_twenty() {
        assert_eq!(base_handle("abcdefghijklmno", "pqrstuvwxyz"), "abcdefghijklmnopqrst");
    }

    #[test]
    fn duplicates_get_counting_suffixes() {
        let mut state = State::new();
        let mut handles = Vec::new();
        for _ in 0..13 {
            let handle = unique_handle(&state, "First", "Last").unwrap();
            add_user(&mut state, &handle);
            handles.push(handle);
        }
        assert_eq!(handles[0], "firstlast");
        assert_eq!(handles[1], "firstlast0");
        assert_eq!(handles[2], "firstlast1");
        assert_eq!(handles[12], "firstlast11");
    }

    #[test]
    fn suffix_skips_collisions_with_digit_names() {
        let mut state = State::new();
        add_user(&mut state, "firstlast");
        add_user(&mut state, "firstlast0");
        assert_eq!(unique_handle(&state, "First", "Last0").unwrap(), "firstlast00");
    }

    #[test]
    fn truncated_handle_gets_suffix_after_truncation() {
        let mut state = State::new();
        add_user(&mut state, "abcdefghijklmnopqrst");
        assert_eq!(
            unique_handle(&state, "abcdefghijklmno", "pqrstuvwxyz").unwrap(),
            "abcdefghijklmnopqrst0"
        );
    }

    #[test]
    fn email_format() {
        assert!(email("valid@gmail.com").is_ok());
        assert!(email("z5555555@ad.unsw.edu.au").is_ok());
        assert!(email("not-an-email").is_err());
        assert!(email("missing@tld").is_err());
    }

    #[test]
    fn message_bounds() {
        assert!(message_text("").is_err());
        assert!(message_text(&"a".repeat(1000)).is_ok());
        assert!(message_text(&"a".repeat(1001)).is_err());
        assert!(optional_text("").is_ok());
    }

    #[test]
    fn handle_rules() {
        assert!(handle("ab").is_err());
        assert!(handle("abc").is_ok());
        assert!(handle("abc!").is_err());
        assert!(handle(&"a".repeat(21)).is_err());
    }
}
