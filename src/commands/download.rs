use crate::extract::ExtractError;
use crate::{Context, Error};

use super::require_dm;

/// User-facing text for a message or option that held no usable link.
pub fn guidance(allowed_host: Option<&str>, err: &ExtractError) -> String {
    match (err, allowed_host) {
        (ExtractError::DisallowedHost(_), Some(host)) => {
            format!("Only URLs from {} are allowed.", host)
        }
        (ExtractError::NoUrl, Some(host)) => {
            format!("Send a valid {} URL or use `/download`.", host)
        }
        (_, None) => "Send a valid http(s) URL or use `/download`.".to_string(),
    }
}

/// Download a file and get it back as an attachment
#[poise::command(slash_command)]
pub async fn download(
    ctx: Context<'_>,
    #[description = "URL of the file to download"] url: String,
) -> Result<(), Error> {
    if !require_dm(ctx).await? {
        return Ok(());
    }

    let data = ctx.data();
    let url = match data.extractor.extract(&url) {
        Ok(url) => url,
        Err(e) => {
            ctx.say(guidance(data.extractor.allowed_host(), &e)).await?;
            return Ok(());
        }
    };

    // The fetch can outlast the interaction's response window.
    ctx.defer().await?;

    let reply = data.downloader.reply_for(&url).await?;
    ctx.send(reply.into_create_reply()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guidance_names_the_allowed_host() {
        let host = Some("api.junkie-development.de");
        assert_eq!(
            guidance(host, &ExtractError::DisallowedHost("evil.com".to_string())),
            "Only URLs from api.junkie-development.de are allowed."
        );
        assert!(guidance(host, &ExtractError::NoUrl).contains("api.junkie-development.de"));
    }

    #[test]
    fn permissive_guidance_is_generic() {
        assert_eq!(
            guidance(None, &ExtractError::NoUrl),
            "Send a valid http(s) URL or use `/download`."
        );
    }
}
