//! Inbound message from Talk: classified, decoded, and ready for delivery.

use crate::channels::envelope::{classify, EnvelopeCategory, MessageMeta, RawEnvelope};
use crate::content::{resolve_message, AccountContext, ResolvedMessage};
use serde::Serialize;

/// Channel id used for Talk messages.
pub const CHANNEL_ID: &str = "nextcloud-talk";

/// A message from a Talk conversation, with placeholders resolved and attachments listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    pub channel_id: String,
    pub category: EnvelopeCategory,
    #[serde(flatten)]
    pub meta: MessageMeta,
    #[serde(flatten)]
    pub message: ResolvedMessage,
}

impl InboundMessage {
    /// Run the envelope through the pipeline. None when the category carries no message.
    pub fn from_envelope(envelope: &RawEnvelope, account: &AccountContext) -> Option<Self> {
        let body = classify(envelope)?;
        let message = resolve_message(body.content, body.fallback_label, account);
        Some(Self {
            channel_id: CHANNEL_ID.to_string(),
            category: envelope.category.clone(),
            meta: envelope.meta.clone(),
            message,
        })
    }

    /// Conversation the message belongs to (room token), if known.
    pub fn conversation_id(&self) -> Option<&str> {
        self.meta.room_token.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.message.text
    }
}
