use poise::serenity_prelude as serenity;
use tracing::{debug, error};

use crate::commands::guidance;
use crate::download::UNEXPECTED_ERROR;
use crate::reply::{send_to_message, Reply};
use crate::{Data, Error};

pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        handle_dm_message(ctx, new_message, data).await;
    }
    Ok(())
}

/// Treats every DM from a human as a download request.
pub async fn handle_dm_message(ctx: &serenity::Context, msg: &serenity::Message, data: &Data) {
    if msg.author.bot || msg.guild_id.is_some() {
        return;
    }

    if let Err(e) = download_from_message(ctx, msg, data).await {
        error!("Failed to handle DM from {}: {}", msg.author.name, e);
        if let Err(e) = send_to_message(ctx, msg, Reply::Text(UNEXPECTED_ERROR.to_string())).await {
            debug!("Could not report failure to {}: {}", msg.author.name, e);
        }
    }
}

async fn download_from_message(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    let url = match data.extractor.extract(&msg.content) {
        Ok(url) => url,
        Err(e) => {
            let text = guidance(data.extractor.allowed_host(), &e);
            send_to_message(ctx, msg, Reply::Text(text)).await?;
            return Ok(());
        }
    };

    msg.channel_id.broadcast_typing(&ctx.http).await?;

    let reply = data.downloader.reply_for(&url).await?;
    send_to_message(ctx, msg, reply).await?;
    Ok(())
}
