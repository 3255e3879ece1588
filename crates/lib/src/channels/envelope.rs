//! Inbound envelope and the category filter that decides whether it carries a message.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Kind of inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnvelopeCategory {
    /// A user posted a message.
    MessageCreated,
    /// System event (file shares, calls, ...). Same content shape as a message.
    Activity,
    /// Reaction added or removed.
    Reaction,
    /// Someone joined or left the conversation.
    Membership,
    Unknown(String),
}

impl EnvelopeCategory {
    pub fn as_str(&self) -> &str {
        match self {
            EnvelopeCategory::MessageCreated => "message-created",
            EnvelopeCategory::Activity => "activity",
            EnvelopeCategory::Reaction => "reaction",
            EnvelopeCategory::Membership => "membership",
            EnvelopeCategory::Unknown(s) => s.as_str(),
        }
    }

    /// True for categories that carry user-facing content.
    pub fn carries_message(&self) -> bool {
        matches!(
            self,
            EnvelopeCategory::MessageCreated | EnvelopeCategory::Activity
        )
    }
}

impl FromStr for EnvelopeCategory {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "message-created" => EnvelopeCategory::MessageCreated,
            "activity" => EnvelopeCategory::Activity,
            "reaction" => EnvelopeCategory::Reaction,
            "membership" => EnvelopeCategory::Membership,
            other => EnvelopeCategory::Unknown(other.to_string()),
        })
    }
}

impl fmt::Display for EnvelopeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EnvelopeCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Opaque fields copied from the webhook onto the resolved message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Conversation token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_name: Option<String>,
    /// e.g. "users/alice" or "bots/...".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    /// Actor type ("Person", "Application").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
}

/// One inbound event as handed over by the webhook transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEnvelope {
    pub category: EnvelopeCategory,
    /// Raw `content` string; usually JSON rich content, sometimes plain text, may be empty.
    pub content: String,
    /// Event label (`name`), shown when `content` is empty. Empty on older servers.
    pub fallback_label: String,
    pub meta: MessageMeta,
}

impl RawEnvelope {
    pub fn new(
        category: EnvelopeCategory,
        content: impl Into<String>,
        fallback_label: impl Into<String>,
    ) -> Self {
        Self {
            category,
            content: content.into(),
            fallback_label: fallback_label.into(),
            meta: MessageMeta::default(),
        }
    }

    pub fn with_meta(mut self, meta: MessageMeta) -> Self {
        self.meta = meta;
        self
    }
}

/// Content and fallback label of an envelope that carries a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeBody<'a> {
    pub content: &'a str,
    pub fallback_label: &'a str,
}

/// Returns the message body, or None when the category carries no message
/// (reactions, membership changes, unknown kinds). Rejection is silent.
pub fn classify(envelope: &RawEnvelope) -> Option<EnvelopeBody<'_>> {
    if !envelope.category.carries_message() {
        log::debug!(
            "ignoring {} envelope (message id {:?})",
            envelope.category,
            envelope.meta.message_id
        );
        return None;
    }
    Some(EnvelopeBody {
        content: &envelope.content,
        fallback_label: &envelope.fallback_label,
    })
}
