use poise::serenity_prelude as serenity;
use poise::CreateReply;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    fn into_serenity(self) -> serenity::CreateAttachment {
        serenity::CreateAttachment::bytes(self.bytes, self.filename)
    }
}

/// What the bot sends back for one request, independent of where it arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    File { content: String, attachment: Attachment },
}

impl Reply {
    /// For slash commands. After a defer, poise routes this into the deferred placeholder.
    pub fn into_create_reply(self) -> CreateReply {
        match self {
            Reply::Text(content) => CreateReply::default().content(content),
            Reply::File { content, attachment } => CreateReply::default()
                .content(content)
                .attachment(attachment.into_serenity()),
        }
    }

    /// For plain DMs: a reply that references the triggering message.
    pub fn into_create_message(self, reference: &serenity::Message) -> serenity::CreateMessage {
        let message = serenity::CreateMessage::new().reference_message(reference);
        match self {
            Reply::Text(content) => message.content(content),
            Reply::File { content, attachment } => {
                message.content(content).add_file(attachment.into_serenity())
            }
        }
    }
}

pub async fn send_to_message(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    reply: Reply,
) -> Result<(), serenity::Error> {
    msg.channel_id
        .send_message(ctx, reply.into_create_message(msg))
        .await?;
    Ok(())
}

#[cfg(test)]
impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Text(content) | Reply::File { content, .. } => content,
        }
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        match self {
            Reply::Text(_) => None,
            Reply::File { attachment, .. } => Some(attachment),
        }
    }
}
