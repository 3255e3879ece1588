//! Talk channel boundary.
//!
//! The webhook body is parsed into a [`RawEnvelope`], classified by category, and
//! resolved into an [`InboundMessage`] for delivery. Only message and activity
//! envelopes produce a message; everything else is dropped quietly.

mod envelope;
mod inbound;
mod webhook;

pub use envelope::{classify, EnvelopeBody, EnvelopeCategory, MessageMeta, RawEnvelope};
pub use inbound::{InboundMessage, CHANNEL_ID};
pub use webhook::{
    category_for_activity, WebhookActor, WebhookError, WebhookObject, WebhookPayload,
    WebhookTarget,
};
