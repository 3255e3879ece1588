//! Download URLs for shared files.
//!
//! A file record may carry both a server-relative `path` and a `link`. The `link` comes
//! from the payload and cannot be trusted, so it is only used when no WebDAV URL can be
//! built from the locally configured base URL and account.

use crate::config::{self, Config};
use crate::content::ParameterRecord;

/// Trusted inputs for building WebDAV URLs: the server base URL and the account (API user)
/// the files are reachable under. Supplied by the caller, never by the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountContext {
    base_url: Option<String>,
    api_user: Option<String>,
}

impl AccountContext {
    /// Blank values count as absent; trailing slashes on the base URL are dropped.
    pub fn new(base_url: Option<String>, api_user: Option<String>) -> Self {
        Self {
            base_url: base_url
                .map(|u| u.trim().trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty()),
            api_user: api_user
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
        }
    }

    /// No base URL or account: only payload links can be used.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Account from config, with env overrides applied (see [`config::resolve_base_url`]).
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config::resolve_base_url(config),
            config::resolve_api_user(config),
        )
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn api_user(&self) -> Option<&str> {
        self.api_user.as_deref()
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.api_user.is_some()
    }

    /// `{base}/remote.php/dav/files/{user}/{path}`, or None when base or user is missing.
    pub fn dav_file_url(&self, path: &str) -> Option<String> {
        let base = self.base_url.as_deref()?;
        let user = self.api_user.as_deref()?;
        Some(format!(
            "{}/remote.php/dav/files/{}/{}",
            base,
            urlencoding::encode(user),
            path
        ))
    }
}

/// URL to fetch a file record from: WebDAV URL first, then the payload `link`, else None.
pub fn resolve_download_url(record: &ParameterRecord, account: &AccountContext) -> Option<String> {
    let path = record.path.as_deref().filter(|p| !p.is_empty());
    if let Some(url) = path.and_then(|p| account.dav_file_url(p)) {
        return Some(url);
    }
    let link = record.link.as_deref().filter(|l| !l.is_empty())?;
    log::debug!(
        "no WebDAV URL for file {:?} (path present: {}, account configured: {}), \
         using payload link",
        record.name,
        path.is_some(),
        account.is_configured()
    );
    Some(link.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> AccountContext {
        AccountContext::new(
            Some("https://cloud.example.com".to_string()),
            Some("Vault".to_string()),
        )
    }

    fn file(path: Option<&str>, link: Option<&str>) -> ParameterRecord {
        ParameterRecord {
            kind: Some("file".to_string()),
            name: Some("IMG_1.jpg".to_string()),
            path: path.map(String::from),
            link: link.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn dav_url_preferred_over_link() {
        let record = file(Some("Talk/IMG_1.jpg"), Some("https://evil.example/f/1"));
        assert_eq!(
            resolve_download_url(&record, &account()).as_deref(),
            Some("https://cloud.example.com/remote.php/dav/files/Vault/Talk/IMG_1.jpg")
        );
    }

    #[test]
    fn link_used_without_path() {
        let record = file(None, Some("https://host/f/1"));
        assert_eq!(
            resolve_download_url(&record, &account()).as_deref(),
            Some("https://host/f/1")
        );
    }

    #[test]
    fn link_used_without_account() {
        let record = file(Some("Talk/IMG_1.jpg"), Some("https://host/f/1"));
        assert_eq!(
            resolve_download_url(&record, &AccountContext::unconfigured()).as_deref(),
            Some("https://host/f/1")
        );
        let base_only = AccountContext::new(Some("https://cloud.example.com".to_string()), None);
        assert_eq!(
            resolve_download_url(&record, &base_only).as_deref(),
            Some("https://host/f/1")
        );
    }

    #[test]
    fn neither_gives_none() {
        assert_eq!(resolve_download_url(&file(None, None), &account()), None);
        assert_eq!(
            resolve_download_url(&file(Some(""), Some("")), &account()),
            None
        );
    }

    #[test]
    fn account_sub_delims_are_escaped() {
        let account = AccountContext::new(
            Some("https://cloud.example.com".to_string()),
            Some("o'brien(1)!*".to_string()),
        );
        assert_eq!(
            account.dav_file_url("a.png").as_deref(),
            Some("https://cloud.example.com/remote.php/dav/files/o%27brien%281%29%21%2A/a.png")
        );
    }

    #[test]
    fn account_is_percent_encoded() {
        let account = AccountContext::new(
            Some("https://cloud.example.com".to_string()),
            Some("bot user@example.com".to_string()),
        );
        assert_eq!(
            account.dav_file_url("Talk/a.png").as_deref(),
            Some(concat!(
                "https://cloud.example.com/remote.php/dav/files/",
                "bot%20user%40example.com/Talk/a.png"
            ))
        );
    }

    #[test]
    fn path_is_used_verbatim() {
        assert_eq!(
            account().dav_file_url("Talk/My%20File.png").as_deref(),
            Some("https://cloud.example.com/remote.php/dav/files/Vault/Talk/My%20File.png")
        );
    }

    #[test]
    fn base_url_trailing_slash_and_blanks_normalized() {
        let a = AccountContext::new(
            Some(" https://cloud.example.com/ ".to_string()),
            Some("  ".to_string()),
        );
        assert_eq!(a.base_url(), Some("https://cloud.example.com"));
        assert_eq!(a.api_user(), None);
        assert!(!a.is_configured());
    }
}
