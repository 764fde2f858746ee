use tracing::info;
use url::Url;
use uuid::Uuid;

use crate::config::Config;
use crate::fetch::{BodyMode, FetchOutcome, Fetcher};
use crate::filename::FileNaming;
use crate::reply::{Attachment, Reply};

pub const UNEXPECTED_ERROR: &str = "Unexpected error while downloading the file.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResult {
    Success { bytes: Vec<u8>, filename: String },
    Failure { status: u16, reason: String },
}

impl DownloadResult {
    pub fn into_reply(self, success_text: &str) -> Reply {
        match self {
            DownloadResult::Success { bytes, filename } => Reply::File {
                content: success_text.to_string(),
                attachment: Attachment { filename, bytes },
            },
            DownloadResult::Failure { status, reason } => Reply::Text(format!(
                "Failed to download file. HTTP {} {}",
                status, reason
            )),
        }
    }
}

/// Fetches a validated URL and names the result.
pub struct Downloader {
    fetcher: Fetcher,
    naming: FileNaming,
    mode: BodyMode,
    success_text: String,
}

impl Downloader {
    pub fn new(fetcher: Fetcher, forced_extension: Option<&str>) -> Self {
        match forced_extension {
            Some(ext) => Downloader {
                fetcher,
                naming: FileNaming::ForcedExtension(ext.to_string()),
                mode: BodyMode::Text,
                success_text: format!("Here is your .{} file.", ext),
            },
            None => Downloader {
                fetcher,
                naming: FileNaming::Negotiated,
                mode: BodyMode::Binary,
                success_text: "Here is your file.".to_string(),
            },
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let fetcher = Fetcher::new(&config.user_agent)?;
        Ok(Self::new(fetcher, config.forced_extension.as_deref()))
    }

    pub async fn download(&self, url: &Url) -> Result<DownloadResult, reqwest::Error> {
        let request_id = Uuid::new_v4();
        info!("[{request_id}] Downloading {url}");

        let result = match self.fetcher.get(url, self.mode).await? {
            FetchOutcome::Fetched(body) => {
                let filename = self.naming.resolve(url, body.content_disposition.as_deref());
                DownloadResult::Success {
                    bytes: body.bytes,
                    filename,
                }
            }
            FetchOutcome::Status { code, reason } => DownloadResult::Failure {
                status: code,
                reason,
            },
        };

        match &result {
            DownloadResult::Success { bytes, filename } => {
                info!("[{request_id}] Sending {filename} ({} bytes)", bytes.len())
            }
            DownloadResult::Failure { status, .. } => {
                info!("[{request_id}] Upstream answered HTTP {status}")
            }
        }

        Ok(result)
    }

    /// Download and turn the outcome into the reply the user sees.
    pub async fn reply_for(&self, url: &Url) -> Result<Reply, reqwest::Error> {
        Ok(self.download(url).await?.into_reply(&self.success_text))
    }
}
