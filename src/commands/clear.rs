use tracing::info;

use crate::clear::{clear_own_messages, ChannelHistory};
use crate::{Context, Error};

use super::require_dm;

/// Delete my messages in this DM
#[poise::command(slash_command)]
pub async fn clear(ctx: Context<'_>) -> Result<(), Error> {
    if !require_dm(ctx).await? {
        return Ok(());
    }

    ctx.defer().await?;

    let history = ChannelHistory {
        http: &ctx.serenity_context().http,
        channel_id: ctx.channel_id(),
    };
    let deleted = clear_own_messages(&history, ctx.framework().bot_id).await?;

    info!("Cleared {} messages in DM with {}", deleted, ctx.author().name);
    ctx.say(format!("Deleted {} messages I sent in this DM.", deleted))
        .await?;
    Ok(())
}
