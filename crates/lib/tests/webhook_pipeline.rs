//! Integration test: Talk webhook bodies through the whole pipeline, and the config file
//! written by init loading back into an account.

use chrono::Utc;
use talkbridge_core::channels::{EnvelopeCategory, InboundMessage, WebhookPayload};
use talkbridge_core::config;
use talkbridge_core::content::AccountContext;
use talkbridge_core::init;
use talkbridge_core::render::render_text;
use std::path::PathBuf;

fn account() -> AccountContext {
    AccountContext::new(
        Some("https://cloud.example.com".to_string()),
        Some("Vault".to_string()),
    )
}

fn webhook(activity_type: &str, name: &str, content: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "type": activity_type,
        "actor": { "type": "Person", "id": "users/alice", "name": "Alice" },
        "object": {
            "type": "Note",
            "id": "1234",
            "name": name,
            "content": content,
            "mediaType": "text/markdown"
        },
        "target": { "type": "Collection", "id": "n3xtc10ud", "name": "Team" }
    }))
    .expect("serialize webhook")
}

fn process(body: &[u8], account: &AccountContext) -> Option<InboundMessage> {
    let envelope = WebhookPayload::parse(body)
        .expect("parse webhook")
        .into_envelope(Utc::now());
    InboundMessage::from_envelope(&envelope, account)
}

const FILE_SHARE: &str = concat!(
    r#"{"message":"{file}","parameters":{"file":{"type":"file","name":"IMG_1.jpg","#,
    r#""path":"Talk/IMG_1.jpg","link":"https://host/f/1","mimetype":"image/jpeg"}}}"#
);

#[test]
fn file_share_message_resolves_to_dav_url() {
    let msg = process(&webhook("Create", "message", FILE_SHARE), &account()).expect("message");
    assert_eq!(msg.category, EnvelopeCategory::MessageCreated);
    assert_eq!(msg.text(), "IMG_1.jpg");
    assert_eq!(msg.message.attachments.len(), 1);
    assert_eq!(
        msg.message.attachments[0].download_url.as_deref(),
        Some("https://cloud.example.com/remote.php/dav/files/Vault/Talk/IMG_1.jpg")
    );
    assert_eq!(msg.conversation_id(), Some("n3xtc10ud"));
    assert_eq!(msg.meta.sender_name.as_deref(), Some("Alice"));
}

#[test]
fn file_share_activity_with_empty_label_is_not_dropped() {
    let msg = process(&webhook("Activity", "", FILE_SHARE), &account()).expect("message");
    assert_eq!(msg.category, EnvelopeCategory::Activity);
    assert_eq!(msg.text(), "IMG_1.jpg");
    assert_eq!(msg.message.attachments.len(), 1);
}

#[test]
fn reactions_and_membership_are_filtered() {
    assert!(process(&webhook("Like", "reaction", "👍"), &account()).is_none());
    assert!(process(&webhook("Undo", "reaction", "👍"), &account()).is_none());
    assert!(process(&webhook("Join", "", ""), &account()).is_none());
    assert!(process(&webhook("Leave", "", ""), &account()).is_none());
}

#[test]
fn plain_text_and_empty_content_fall_back() {
    let msg = process(
        &webhook("Create", "fallback-name", "this is not json at all"),
        &account(),
    )
    .expect("message");
    assert_eq!(msg.text(), "this is not json at all");
    assert!(msg.message.attachments.is_empty());

    let msg = process(&webhook("Create", "fallback-name", ""), &account()).expect("message");
    assert_eq!(msg.text(), "fallback-name");
    assert!(msg.message.attachments.is_empty());
}

#[test]
fn multiple_files_keep_order_and_render() {
    let content = serde_json::json!({
        "message": "{actor} shared {file0} and {file1}",
        "parameters": {
            "actor": { "type": "user", "id": "alice", "name": "Alice" },
            "file0": {
                "type": "file", "id": "1", "name": "b.pdf",
                "mimetype": "application/pdf", "link": "https://host/f/1"
            },
            "file1": {
                "type": "file", "id": "2", "name": "a.png",
                "mimetype": "image/png", "path": "Talk/a.png"
            }
        }
    })
    .to_string();
    let msg = process(&webhook("Create", "message", &content), &account()).expect("message");
    assert_eq!(msg.text(), "Alice shared b.pdf and a.png");
    assert_eq!(
        render_text(&msg.message),
        "Alice shared b.pdf and a.png\n\
         [file attachment] https://host/f/1\n\
         [image attachment] https://cloud.example.com/remote.php/dav/files/Vault/Talk/a.png"
    );
}

#[test]
fn unconfigured_account_uses_payload_link() {
    let msg = process(
        &webhook("Create", "message", FILE_SHARE),
        &AccountContext::unconfigured(),
    )
    .expect("message");
    assert_eq!(
        msg.message.attachments[0].download_url.as_deref(),
        Some("https://host/f/1")
    );
}

fn temp_config_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("talkbridge-test-{}", uuid::Uuid::new_v4()))
        .join("config.json")
}

#[test]
fn init_writes_loadable_default_config() {
    let path = temp_config_path();
    let dir = init::init_config_dir(&path).expect("init config dir");
    assert!(path.exists());
    let (loaded, used) = config::load_config(Some(path.clone())).expect("load config");
    assert_eq!(used, path);
    assert!(loaded.account.base_url.is_none());
    assert!(loaded.account.api_user.is_none());
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn init_keeps_existing_config() {
    let path = temp_config_path();
    std::fs::create_dir_all(path.parent().expect("parent")).expect("create dir");
    std::fs::write(
        &path,
        br#"{"account":{"baseUrl":"https://cloud.example.com/","apiUser":"Vault"}}"#,
    )
    .expect("write config");
    let dir = init::init_config_dir(&path).expect("init config dir");
    let (loaded, _) = config::load_config(Some(path)).expect("load config");
    assert_eq!(
        loaded.account.base_url.as_deref(),
        Some("https://cloud.example.com/")
    );
    assert_eq!(loaded.account.api_user.as_deref(), Some("Vault"));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn missing_config_file_is_default() {
    let path = temp_config_path();
    let (loaded, _) = config::load_config(Some(path)).expect("load config");
    assert!(loaded.account.base_url.is_none());
}

#[test]
fn invalid_config_file_is_an_error() {
    let path = temp_config_path();
    std::fs::create_dir_all(path.parent().expect("parent")).expect("create dir");
    std::fs::write(&path, b"{ not json").expect("write config");
    let err = config::load_config(Some(path.clone())).expect_err("invalid config");
    assert!(format!("{:#}", err).contains("parsing config"));
    let _ = std::fs::remove_dir_all(path.parent().expect("parent"));
}
