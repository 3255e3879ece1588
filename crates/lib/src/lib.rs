//! talkbridge core library: decodes Nextcloud Talk webhook messages into resolved text and
//! file attachments. Shared by the CLI and any gateway that receives Talk webhooks.

pub mod channels;
pub mod config;
pub mod content;
pub mod init;
pub mod render;
