//! Rich content carried inside a Talk message: a template plus named parameters.
//!
//! Talk encodes the `content` of every message as a JSON string of the form
//! `{"message": "...", "parameters": {...}}`. Older servers and some bots post
//! plain text instead, so decoding is allowed to fail: the caller falls back to
//! the raw string (see [`message::resolve_message`]).

pub mod attachment;
pub mod download;
pub mod message;
pub mod placeholder;

pub use attachment::{attachments, file_parameters, AttachmentDescriptor, FILE_PARAMETER_TYPE};
pub use download::{resolve_download_url, AccountContext};
pub use message::{resolve_message, ResolvedMessage};
pub use placeholder::resolve_placeholders;

use serde_json::{Map, Value};
use std::collections::HashMap;

/// Why a raw content string did not decode as rich content. Never surfaced to callers of
/// [`message::resolve_message`]; it only selects the plain-text path.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("content is empty")]
    Empty,
    #[error("content is not JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("content is JSON but not an object")]
    NotAnObject,
    #[error("content has no string `message` field")]
    MissingMessage,
}

/// One entry of the `parameters` object (a Nextcloud "rich object").
///
/// Every field is optional: the same map carries users, calls, files and more,
/// and only file records are expected to have `path`, `link`, `mimetype` or `size`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterRecord {
    /// Discriminant, e.g. "file", "user", "call".
    pub kind: Option<String>,
    pub id: Option<String>,
    /// Display name substituted for the placeholder.
    pub name: Option<String>,
    /// Storage path relative to the account's files root (file records).
    pub path: Option<String>,
    /// Direct link supplied by the remote server. Untrusted.
    pub link: Option<String>,
    pub mimetype: Option<String>,
    pub size: Option<u64>,
    /// `preview-available` flag of file records.
    pub preview_available: Option<bool>,
}

impl ParameterRecord {
    /// Build a record from a JSON object, keeping whatever fields are usable.
    /// Rich object values are usually strings, but ids and sizes show up as numbers too.
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            kind: string_field(obj, "type"),
            id: string_field(obj, "id"),
            name: string_field(obj, "name"),
            path: string_field(obj, "path"),
            link: string_field(obj, "link"),
            mimetype: string_field(obj, "mimetype"),
            size: obj.get("size").and_then(size_value),
            preview_available: obj.get("preview-available").and_then(flag_value),
        }
    }

    /// Display name when present and non-empty.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn size_value(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flag_value(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "yes" | "true" => Some(true),
            "no" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Named parameters in the order they appeared in the payload, with a key index for lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    entries: Vec<(String, ParameterRecord)>,
    index: HashMap<String, usize>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, key: &str) -> Option<&ParameterRecord> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterRecord)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace a record. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, record: ParameterRecord) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = record,
            None => self.push(key, record),
        }
    }

    /// Appends without checking for an existing key. Callers guarantee `key` is new.
    fn push(&mut self, key: String, record: ParameterRecord) {
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, record));
    }

    /// Parameters from a JSON object. Entries whose value is not an object are skipped.
    fn from_json_object(obj: &Map<String, Value>) -> Self {
        let mut params = Self::with_capacity(obj.len());
        // JSON object keys are unique after parsing.
        for (key, value) in obj {
            match value.as_object() {
                Some(record) => params.push(key.clone(), ParameterRecord::from_object(record)),
                None => log::debug!("skipping non-object rich content parameter {:?}", key),
            }
        }
        params
    }
}

impl FromIterator<(String, ParameterRecord)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (String, ParameterRecord)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut params = Self::with_capacity(iter.size_hint().0);
        for (k, r) in iter {
            params.insert(k, r);
        }
        params
    }
}

/// Decoded rich content: template and (possibly empty) parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichContent {
    pub message: String,
    pub parameters: Parameters,
}

impl RichContent {
    /// Decode a raw content string.
    ///
    /// Fails without parsing when `raw` is empty. A missing or non-object `parameters`
    /// field is treated as no parameters.
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        if raw.is_empty() {
            return Err(DecodeError::Empty);
        }
        let value: Value = serde_json::from_str(raw)?;
        let obj = value.as_object().ok_or(DecodeError::NotAnObject)?;
        let message = obj
            .get("message")
            .and_then(Value::as_str)
            .ok_or(DecodeError::MissingMessage)?
            .to_string();
        let parameters = obj
            .get("parameters")
            .and_then(Value::as_object)
            .map(Parameters::from_json_object)
            .unwrap_or_default();
        Ok(Self {
            message,
            parameters,
        })
    }
}

/// Outcome of looking at a raw content string: structured, or plain text to pass through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBody {
    Rich(RichContent),
    Plain,
}

impl ContentBody {
    pub fn decode(raw: &str) -> Self {
        match RichContent::decode(raw) {
            Ok(rich) => ContentBody::Rich(rich),
            Err(e) => {
                log::debug!("content is not rich content, using plain text: {}", e);
                ContentBody::Plain
            }
        }
    }
}
