//! Per-user chat groups
//!
//! Every websocket session of a user joins the same group channel, so status
//! updates published by one session reach the user's other open sockets.
//! Events carry the originating session id; sessions skip their own events
//! when forwarding to the browser.

use std::collections::HashMap;

use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::models::ChatFrame;

const GROUP_CHANNEL_CAPACITY: usize = 32;

/// A frame published to a user's group
#[derive(Debug, Clone)]
pub struct GroupEvent {
    /// Session that produced the event
    pub origin: Uuid,
    pub frame: ChatFrame,
}

/// Registry of one broadcast channel per user identity
#[derive(Default)]
pub struct ChatGroups {
    channels: RwLock<HashMap<i64, broadcast::Sender<GroupEvent>>>,
}

impl ChatGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the group for a user, creating the channel on first join
    pub async fn join(&self, user_id: i64) -> broadcast::Receiver<GroupEvent> {
        let mut channels = self.channels.write().await;
        channels
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(GROUP_CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Drop the channel once the last session of a user is gone
    pub async fn leave(&self, user_id: i64) {
        let mut channels = self.channels.write().await;
        if let Some(sender) = channels.get(&user_id) {
            if sender.receiver_count() == 0 {
                channels.remove(&user_id);
            }
        }
    }

    /// Publish an event to every open session of a user
    ///
    /// Returns the number of sessions that received it.
    pub async fn publish(&self, user_id: i64, event: GroupEvent) -> usize {
        let channels = self.channels.read().await;
        match channels.get(&user_id) {
            Some(sender) => sender.send(event).unwrap_or(0),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QueryStatus;

    fn update_frame() -> ChatFrame {
        ChatFrame::QueryUpdate {
            query_id: 1,
            status: QueryStatus::Completed,
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_all_sessions_of_the_user() {
        let groups = ChatGroups::new();
        let mut first = groups.join(42).await;
        let mut second = groups.join(42).await;

        let delivered = groups
            .publish(
                42,
                GroupEvent {
                    origin: Uuid::new_v4(),
                    frame: update_frame(),
                },
            )
            .await;

        assert_eq!(delivered, 2);
        assert_eq!(first.recv().await.unwrap().frame, update_frame());
        assert_eq!(second.recv().await.unwrap().frame, update_frame());
    }

    #[tokio::test]
    async fn test_publish_without_members_is_dropped() {
        let groups = ChatGroups::new();
        let delivered = groups
            .publish(
                7,
                GroupEvent {
                    origin: Uuid::new_v4(),
                    frame: update_frame(),
                },
            )
            .await;
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_groups_are_keyed_by_user() {
        let groups = ChatGroups::new();
        let mut alice = groups.join(1).await;
        let _bob = groups.join(2).await;

        groups
            .publish(
                2,
                GroupEvent {
                    origin: Uuid::new_v4(),
                    frame: update_frame(),
                },
            )
            .await;

        assert!(matches!(
            alice.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_leave_drops_empty_channel() {
        let groups = ChatGroups::new();
        {
            let _rx = groups.join(9).await;
        }
        groups.leave(9).await;
        assert!(groups.channels.read().await.get(&9).is_none());
    }
}
