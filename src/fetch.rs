use reqwest::header::CONTENT_DISPOSITION;
use tracing::debug;
use url::Url;

/// How the response body is read once the request succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    /// Decode as text (honouring the response charset) and re-encode as UTF-8.
    Text,
    Binary,
}

#[derive(Debug)]
pub struct FetchedBody {
    pub bytes: Vec<u8>,
    pub content_disposition: Option<String>,
}

#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(FetchedBody),
    Status { code: u16, reason: String },
}

pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Fetcher { client })
    }

    /// Single GET, no retry. Transport failures come back as `Err`.
    pub async fn get(&self, url: &Url, mode: BodyMode) -> Result<FetchOutcome, reqwest::Error> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!("GET {} answered {}", url, status);
            return Ok(FetchOutcome::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let content_disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = match mode {
            BodyMode::Text => response.text().await?.into_bytes(),
            BodyMode::Binary => response.bytes().await?.to_vec(),
        };

        debug!("GET {} returned {} bytes", url, bytes.len());

        Ok(FetchOutcome::Fetched(FetchedBody {
            bytes,
            content_disposition,
        }))
    }
}
