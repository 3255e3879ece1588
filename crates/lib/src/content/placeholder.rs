//! `{name}` placeholder substitution for rich content templates.

use crate::content::Parameters;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_-]+)\}").expect("valid placeholder regex"));

/// Replace each `{key}` in `template` with the display name of `parameters[key]`.
///
/// Tokens without a matching parameter (or whose parameter has no name) stay exactly as
/// written, braces included. Substituted names are not scanned again.
pub fn resolve_placeholders(template: &str, parameters: Option<&Parameters>) -> String {
    let Some(parameters) = parameters.filter(|p| !p.is_empty()) else {
        return template.to_string();
    };
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures| {
            match parameters.get(&caps[1]).and_then(|r| r.display_name()) {
                Some(name) => name.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
