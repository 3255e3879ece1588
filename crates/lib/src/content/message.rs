//! Assembles the resolved text and attachments of one message.

use crate::content::attachment::{attachments, AttachmentDescriptor};
use crate::content::download::AccountContext;
use crate::content::placeholder::resolve_placeholders;
use crate::content::ContentBody;
use serde::Serialize;

/// Text with placeholders resolved, plus file attachments in payload order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMessage {
    pub text: String,
    pub attachments: Vec<AttachmentDescriptor>,
}

impl ResolvedMessage {
    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }
}

/// Resolve a raw content string.
///
/// Rich content yields the substituted template and its file attachments. Anything else is
/// plain text: the raw string when non-empty, otherwise `fallback_label`, with no attachments.
pub fn resolve_message(
    raw_content: &str,
    fallback_label: &str,
    account: &AccountContext,
) -> ResolvedMessage {
    match ContentBody::decode(raw_content) {
        ContentBody::Rich(rich) => ResolvedMessage {
            text: resolve_placeholders(&rich.message, Some(&rich.parameters)),
            attachments: attachments(&rich.parameters, account),
        },
        ContentBody::Plain => {
            let text = if raw_content.is_empty() {
                fallback_label
            } else {
                raw_content
            };
            ResolvedMessage {
                text: text.to_string(),
                attachments: Vec::new(),
            }
        }
    }
}
