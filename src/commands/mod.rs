pub mod clear;
pub mod download;

use poise::CreateReply;

use crate::{Context, Error};

pub const DM_ONLY: &str = "This command works only in DMs.";

/// Answers guild invocations ephemerally. Returns `true` when the command may proceed.
pub async fn require_dm(ctx: Context<'_>) -> Result<bool, Error> {
    if ctx.guild_id().is_some() {
        ctx.send(CreateReply::default().content(DM_ONLY).ephemeral(true))
            .await?;
        return Ok(false);
    }
    Ok(true)
}

/// Generic text sent when a command fails for a reason the user can't fix.
pub fn unexpected_error_text(command_name: &str) -> &'static str {
    match command_name {
        "clear" => "Unexpected error while clearing messages.",
        _ => crate::download::UNEXPECTED_ERROR,
    }
}

pub use clear::*;
pub use download::*;
