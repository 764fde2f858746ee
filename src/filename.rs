use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

pub const DEFAULT_SCRIPT_BASE: &str = "script";
pub const DEFAULT_FILENAME: &str = "downloaded.file";

static EXTENDED_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)filename\*\s*=\s*UTF-8''([^;\s]+)"#).unwrap());
static QUOTED_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)filename\s*=\s*"([^"]*)""#).unwrap());
static BARE_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)filename\s*=\s*([^;"\s]+)"#).unwrap());

/// How the outgoing attachment gets its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileNaming {
    /// URL path stem plus a fixed extension, e.g. `combat.lua`.
    ForcedExtension(String),
    /// Content-disposition first, then the URL path, then [`DEFAULT_FILENAME`].
    Negotiated,
}

impl FileNaming {
    pub fn resolve(&self, url: &Url, content_disposition: Option<&str>) -> String {
        match self {
            FileNaming::ForcedExtension(ext) => forced_extension_name(url, ext),
            FileNaming::Negotiated => negotiated_name(url, content_disposition),
        }
    }
}

pub fn forced_extension_name(url: &Url, extension: &str) -> String {
    let base = url
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .last()
        .map(strip_extension)
        .and_then(sanitize)
        .unwrap_or_else(|| DEFAULT_SCRIPT_BASE.to_string());
    format!("{}.{}", base, extension)
}

pub fn negotiated_name(url: &Url, content_disposition: Option<&str>) -> String {
    content_disposition
        .and_then(parse_content_disposition)
        .or_else(|| {
            let last = url.path().rsplit('/').next().unwrap_or_default();
            sanitize(&percent_decode(last))
        })
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

/// Pulls a filename out of a `content-disposition` header value.
/// `filename*=UTF-8''…` wins over `filename=…` when both are present.
pub fn parse_content_disposition(value: &str) -> Option<String> {
    if let Some(caps) = EXTENDED_FILENAME.captures(value) {
        if let Some(name) = sanitize(&percent_decode(&caps[1])) {
            return Some(name);
        }
    }

    QUOTED_FILENAME
        .captures(value)
        .or_else(|| BARE_FILENAME.captures(value))
        .and_then(|caps| sanitize(&percent_decode(&caps[1])))
}

fn percent_decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// Drops one trailing `.ext` made of word characters.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx)
            if idx + 1 < name.len()
                && name[idx + 1..]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_') =>
        {
            &name[..idx]
        }
        _ => name,
    }
}

fn sanitize(name: &str) -> Option<String> {
    let cleaned: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim();

    match cleaned {
        "" | "." | ".." => None,
        _ => Some(cleaned.to_string()),
    }
}
