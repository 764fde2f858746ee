use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use tracing::debug;

pub const PAGE_SIZE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryMessage {
    pub id: serenity::MessageId,
    pub author_id: serenity::UserId,
}

/// Backward-paging view of one DM channel.
#[async_trait]
pub trait DmHistory {
    type Error: std::fmt::Display + Send;

    /// Up to `limit` messages older than `before`, newest first.
    async fn page(
        &self,
        before: Option<serenity::MessageId>,
        limit: u8,
    ) -> Result<Vec<HistoryMessage>, Self::Error>;

    async fn delete(&self, id: serenity::MessageId) -> Result<(), Self::Error>;
}

/// Deletes every message `own_id` authored in the channel and returns how many went.
/// A failed delete is skipped and not counted; a failed page fetch aborts.
pub async fn clear_own_messages<H>(history: &H, own_id: serenity::UserId) -> Result<usize, H::Error>
where
    H: DmHistory + Sync,
{
    let mut deleted = 0;
    let mut before = None;

    loop {
        let page = history.page(before, PAGE_SIZE).await?;
        let Some(oldest) = page.last() else {
            break;
        };
        before = Some(oldest.id);

        for message in page.iter().filter(|m| m.author_id == own_id) {
            match history.delete(message.id).await {
                Ok(()) => deleted += 1,
                Err(e) => debug!("Could not delete message {}: {}", message.id, e),
            }
        }

        if page.len() < PAGE_SIZE as usize {
            break;
        }
    }

    Ok(deleted)
}

pub struct ChannelHistory<'a> {
    pub http: &'a serenity::Http,
    pub channel_id: serenity::ChannelId,
}

#[async_trait]
impl DmHistory for ChannelHistory<'_> {
    type Error = serenity::Error;

    async fn page(
        &self,
        before: Option<serenity::MessageId>,
        limit: u8,
    ) -> Result<Vec<HistoryMessage>, Self::Error> {
        let mut request = serenity::GetMessages::new().limit(limit);
        if let Some(id) = before {
            request = request.before(id);
        }

        let messages = self.channel_id.messages(self.http, request).await?;
        Ok(messages
            .into_iter()
            .map(|m| HistoryMessage {
                id: m.id,
                author_id: m.author.id,
            })
            .collect())
    }

    async fn delete(&self, id: serenity::MessageId) -> Result<(), Self::Error> {
        self.channel_id.delete_message(self.http, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    const BOT: u64 = 1;
    const USER: u64 = 2;

    /// In-memory channel. Ids grow with time, so "older" means a smaller id.
    struct FakeHistory {
        messages: Mutex<Vec<HistoryMessage>>,
        failing: HashSet<u64>,
        pages_served: Mutex<usize>,
    }

    impl FakeHistory {
        fn new(authors: &[u64], failing: &[u64]) -> Self {
            let messages = authors
                .iter()
                .enumerate()
                .map(|(i, author)| HistoryMessage {
                    id: serenity::MessageId::new(i as u64 + 1),
                    author_id: serenity::UserId::new(*author),
                })
                .collect();
            FakeHistory {
                messages: Mutex::new(messages),
                failing: failing.iter().copied().collect(),
                pages_served: Mutex::new(0),
            }
        }

        fn remaining_by(&self, author: u64) -> usize {
            self.messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.author_id.get() == author)
                .count()
        }
    }

    #[async_trait]
    impl DmHistory for FakeHistory {
        type Error = String;

        async fn page(
            &self,
            before: Option<serenity::MessageId>,
            limit: u8,
        ) -> Result<Vec<HistoryMessage>, Self::Error> {
            *self.pages_served.lock().unwrap() += 1;
            let messages = self.messages.lock().unwrap();
            Ok(messages
                .iter()
                .rev()
                .filter(|m| before.map_or(true, |b| m.id < b))
                .take(limit as usize)
                .copied()
                .collect())
        }

        async fn delete(&self, id: serenity::MessageId) -> Result<(), Self::Error> {
            if self.failing.contains(&id.get()) {
                return Err(format!("refused {}", id));
            }
            self.messages.lock().unwrap().retain(|m| m.id != id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn deletes_every_own_message_across_pages() {
        let history = FakeHistory::new(&[BOT; 250], &[]);
        let deleted = clear_own_messages(&history, serenity::UserId::new(BOT)).await.unwrap();
        assert_eq!(deleted, 250);
        assert_eq!(history.remaining_by(BOT), 0);
        assert_eq!(*history.pages_served.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn leaves_other_authors_alone() {
        let authors: Vec<u64> = (0..300).map(|i| if i % 3 == 0 { USER } else { BOT }).collect();
        let history = FakeHistory::new(&authors, &[]);
        let deleted = clear_own_messages(&history, serenity::UserId::new(BOT)).await.unwrap();
        assert_eq!(deleted, 200);
        assert_eq!(history.remaining_by(BOT), 0);
        assert_eq!(history.remaining_by(USER), 100);
    }

    #[tokio::test]
    async fn failed_deletes_do_not_stop_the_sweep() {
        // Ids 250, 120 and 3 land on each of the three pages.
        let history = FakeHistory::new(&[BOT; 250], &[250, 120, 3]);
        let deleted = clear_own_messages(&history, serenity::UserId::new(BOT)).await.unwrap();
        assert_eq!(deleted, 247);
        assert_eq!(history.remaining_by(BOT), 3);
    }

    #[tokio::test]
    async fn exact_page_multiple_needs_one_empty_page() {
        let history = FakeHistory::new(&[BOT; 200], &[]);
        let deleted = clear_own_messages(&history, serenity::UserId::new(BOT)).await.unwrap();
        assert_eq!(deleted, 200);
        assert_eq!(*history.pages_served.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn empty_channel_deletes_nothing() {
        let history = FakeHistory::new(&[], &[]);
        let deleted = clear_own_messages(&history, serenity::UserId::new(BOT)).await.unwrap();
        assert_eq!(deleted, 0);
        assert_eq!(*history.pages_served.lock().unwrap(), 1);
    }
}
