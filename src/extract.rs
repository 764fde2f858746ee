use regex::Regex;
use url::Url;

/// Characters that chat formatting tends to glue onto the end of a link.
const TRAILING_ARTIFACTS: &[char] = &[')', ']', '}', '>', '"', '\'', '.', ',', ';', ':', '!', '?'];

const ANY_URL_PATTERN: &str = r#"(?i)https?://[^\s"'()<>]+"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    NoUrl,
    DisallowedHost(String),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ExtractError::NoUrl => write!(f, "No valid URL found"),
            ExtractError::DisallowedHost(host) => write!(f, "Host {} is not allowed", host),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Finds the first downloadable link in free-form message text.
#[derive(Debug, Clone)]
pub struct UrlExtractor {
    allowed_host: Option<String>,
    any_url: Regex,
    allowed_url: Option<Regex>,
}

impl UrlExtractor {
    pub fn new(allowed_host: Option<&str>) -> Result<Self, regex::Error> {
        let allowed_host = allowed_host.map(|h| h.to_ascii_lowercase());
        let allowed_url = match &allowed_host {
            Some(host) => Some(Regex::new(&format!(
                r#"(?i)https?://{}[^\s"'()<>]*"#,
                regex::escape(host)
            ))?),
            None => None,
        };

        Ok(UrlExtractor {
            allowed_host,
            any_url: Regex::new(ANY_URL_PATTERN)?,
            allowed_url,
        })
    }

    pub fn allowed_host(&self) -> Option<&str> {
        self.allowed_host.as_deref()
    }

    pub fn extract(&self, text: &str) -> Result<Url, ExtractError> {
        let (Some(host), Some(pattern)) = (&self.allowed_host, &self.allowed_url) else {
            return self
                .any_url
                .find(text)
                .and_then(|m| parse_trimmed(m.as_str()))
                .ok_or(ExtractError::NoUrl);
        };

        match pattern.find(text) {
            Some(m) => {
                let url = parse_trimmed(m.as_str()).ok_or(ExtractError::NoUrl)?;
                if host_matches(&url, host) {
                    Ok(url)
                } else {
                    Err(ExtractError::DisallowedHost(display_host(&url)))
                }
            }
            // Nothing on the allowed host; tell a foreign link apart from no link at all.
            None => match self.any_url.find(text).and_then(|m| parse_trimmed(m.as_str())) {
                Some(url) => Err(ExtractError::DisallowedHost(display_host(&url))),
                None => Err(ExtractError::NoUrl),
            },
        }
    }
}

fn parse_trimmed(raw: &str) -> Option<Url> {
    let trimmed = raw.trim_end_matches(TRAILING_ARTIFACTS);
    let url = Url::parse(trimmed).ok()?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Some(url),
        _ => None,
    }
}

fn host_matches(url: &Url, allowed: &str) -> bool {
    url.port().is_none() && url.host_str() == Some(allowed)
}

fn display_host(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}
