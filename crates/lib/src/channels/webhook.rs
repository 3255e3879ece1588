//! Nextcloud Talk bot webhook body (ActivityStreams 2.0).
//!
//! Talk POSTs one activity per event:
//!
//! ```json
//! { "type": "Create",
//!   "actor":  { "type": "Person", "id": "users/alice", "name": "Alice" },
//!   "object": { "type": "Note", "id": "1234", "name": "message",
//!               "content": "{\"message\":\"hi\",\"parameters\":{}}",
//!               "mediaType": "text/markdown" },
//!   "target": { "type": "Collection", "id": "n3xtc10ud", "name": "Team" } }
//! ```
//!
//! Signature checks happen in the transport before this is parsed.

use crate::channels::envelope::{EnvelopeCategory, MessageMeta, RawEnvelope};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("invalid webhook JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("webhook payload has no {0}")]
    MissingField(&'static str),
}

/// Top-level webhook activity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    /// Activity type: "Create", "Activity", "Like", "Undo", "Join", "Leave", ...
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default)]
    pub actor: Option<WebhookActor>,
    #[serde(default)]
    pub object: WebhookObject,
    #[serde(default)]
    pub target: Option<WebhookTarget>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookActor {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookObject {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    /// Event label ("message", "file_shared", ...). Empty or missing on older servers.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookTarget {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Ids are strings in current Talk versions; accept numbers too.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Envelope category for an ActivityStreams activity type.
pub fn category_for_activity(activity_type: &str) -> EnvelopeCategory {
    match activity_type {
        "Create" => EnvelopeCategory::MessageCreated,
        "Activity" => EnvelopeCategory::Activity,
        "Like" | "Undo" => EnvelopeCategory::Reaction,
        "Join" | "Leave" => EnvelopeCategory::Membership,
        other => EnvelopeCategory::Unknown(other.to_string()),
    }
}

impl WebhookPayload {
    pub fn parse(body: &[u8]) -> Result<Self, WebhookError> {
        let payload: WebhookPayload = serde_json::from_slice(body)?;
        if payload.activity_type.trim().is_empty() {
            return Err(WebhookError::MissingField("type"));
        }
        Ok(payload)
    }

    pub fn category(&self) -> EnvelopeCategory {
        category_for_activity(&self.activity_type)
    }

    /// Convert to the envelope the pipeline consumes. `received_at` is stamped by the caller.
    pub fn into_envelope(self, received_at: DateTime<Utc>) -> RawEnvelope {
        let category = self.category();
        let actor = self.actor.unwrap_or_default();
        let target = self.target.unwrap_or_default();
        let meta = MessageMeta {
            message_id: self.object.id,
            room_token: target.id,
            room_name: target.name,
            sender_id: actor.id,
            sender_name: actor.name,
            sender_kind: actor.kind,
            received_at: Some(received_at),
        };
        RawEnvelope::new(
            category,
            self.object.content.unwrap_or_default(),
            self.object.name.unwrap_or_default(),
        )
        .with_meta(meta)
    }
}
