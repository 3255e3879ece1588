//! Plain-text rendering of a resolved message for human readers (CLI, agent prompts).

use crate::content::{AttachmentDescriptor, ResolvedMessage};

/// Rough attachment kind from the mimetype.
pub fn attachment_kind(mimetype: Option<&str>) -> &'static str {
    let Some(m) = mimetype else {
        return "file";
    };
    if m.starts_with("image/") {
        "image"
    } else if m.starts_with("video/") {
        "video"
    } else if m.starts_with("audio/") {
        "audio"
    } else {
        "file"
    }
}

/// `[image attachment] https://...`; the name stands in when there is no URL.
pub fn attachment_line(attachment: &AttachmentDescriptor) -> String {
    let kind = attachment_kind(attachment.mimetype.as_deref());
    let target = attachment
        .download_url
        .as_deref()
        .or(attachment.name.as_deref())
        .unwrap_or("unnamed");
    format!("[{} attachment] {}", kind, target)
}

/// Message text followed by one line per attachment. Blank text is left out.
pub fn render_text(message: &ResolvedMessage) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(message.attachments.len() + 1);
    if !message.text.trim().is_empty() {
        lines.push(message.text.clone());
    }
    lines.extend(message.attachments.iter().map(attachment_line));
    lines.join("\n")
}
