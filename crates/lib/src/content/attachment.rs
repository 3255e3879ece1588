//! File attachments: file-type parameters turned into descriptors with download URLs.

use crate::content::download::{resolve_download_url, AccountContext};
use crate::content::{ParameterRecord, Parameters};
use serde::Serialize;

/// `type` value of file share parameters.
pub const FILE_PARAMETER_TYPE: &str = "file";

/// One attachment of a resolved message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentDescriptor {
    /// Display name; may be absent on malformed file records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl AttachmentDescriptor {
    pub fn from_record(record: &ParameterRecord, account: &AccountContext) -> Self {
        Self {
            name: record.name.clone(),
            mimetype: record.mimetype.clone(),
            size: record.size,
            download_url: resolve_download_url(record, account),
        }
    }
}

/// File-type records in payload order. Everything else (mentions, calls, untyped) is skipped.
pub fn file_parameters(parameters: &Parameters) -> impl Iterator<Item = &ParameterRecord> {
    parameters
        .iter()
        .map(|(_, record)| record)
        .filter(|record| record.is_kind(FILE_PARAMETER_TYPE))
}

/// Descriptors for every file parameter, in payload order.
pub fn attachments(parameters: &Parameters, account: &AccountContext) -> Vec<AttachmentDescriptor> {
    file_parameters(parameters)
        .map(|record| AttachmentDescriptor::from_record(record, account))
        .collect()
}
