use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of leading characters of a message quoted in a tag notification.
pub const TAG_PREVIEW_CHARS: usize = 20;

/// Something that happened to a user and shows up in their notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum NotificationEvent {
    /// The user's handle was @-mentioned in a message
    Tagged {
        sender_handle: String,
        container_name: String,
        message: String,
    },

    /// Someone reacted to a message the user sent
    Reacted {
        reactor_handle: String,
        container_name: String,
    },

    /// The user was invited to a channel or included in a new DM
    Added {
        inviter_handle: String,
        container_name: String,
    },
}

impl fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tagged { sender_handle, container_name, message } => {
                let preview: String = message.chars().take(TAG_PREVIEW_CHARS).collect();
                write!(f, "{} tagged you in {}: {}", sender_handle, container_name, preview)
            }
            Self::Reacted { reactor_handle, container_name } => {
                write!(f, "{} reacted to your message in {}", reactor_handle, container_name)
            }
            Self::Added { inviter_handle, container_name } => {
                write!(f, "{} added you to {}", inviter_handle, container_name)
            }
        }
    }
}
