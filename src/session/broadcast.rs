//! Named broadcast channels for auth events.
//!
//! Tabs of the same origin share a process-wide registry of channels keyed
//! by name. Every handle carries its own identity, so a publisher never
//! hears its own messages back.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

/// Channel the session publishes auth events on.
pub const AUTH_CHANNEL: &str = "sigac.auth";

const CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMessage {
    SignOut,
}

#[derive(Debug, Clone)]
struct Envelope {
    sender: Uuid,
    message: AuthMessage,
}

fn registry() -> &'static Mutex<HashMap<String, broadcast::Sender<Envelope>>> {
    static REGISTRY: OnceLock<Mutex<HashMap<String, broadcast::Sender<Envelope>>>> =
        OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// One participant on a named channel.
pub struct ChannelHandle {
    id: Uuid,
    sender: broadcast::Sender<Envelope>,
}

impl ChannelHandle {
    pub fn open(name: &str) -> Self {
        let mut channels = registry()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let sender = channels
            .entry(name.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone();
        ChannelHandle {
            id: Uuid::new_v4(),
            sender,
        }
    }

    pub fn publish(&self, message: AuthMessage) {
        // nobody listening is not an error
        let _ = self.sender.send(Envelope {
            sender: self.id,
            message,
        });
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            id: self.id,
            receiver: self.sender.subscribe(),
        }
    }
}

pub struct Subscription {
    id: Uuid,
    receiver: broadcast::Receiver<Envelope>,
}

impl Subscription {
    /// Next message published by some other handle, or `None` once the
    /// channel closes.
    pub async fn recv(&mut self) -> Option<AuthMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(envelope) if envelope.sender == self.id => continue,
                Ok(envelope) => return Some(envelope.message),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn messages_reach_other_handles_but_not_the_sender() {
        let a = ChannelHandle::open("test.broadcast.delivery");
        let b = ChannelHandle::open("test.broadcast.delivery");
        let mut from_a = a.subscribe();
        let mut from_b = b.subscribe();

        a.publish(AuthMessage::SignOut);

        let heard = tokio::time::timeout(Duration::from_secs(1), from_b.recv())
            .await
            .unwrap();
        assert_eq!(heard, Some(AuthMessage::SignOut));

        let own = tokio::time::timeout(Duration::from_millis(100), from_a.recv()).await;
        assert!(own.is_err());
    }

    #[tokio::test]
    async fn channels_are_isolated_by_name() {
        let a = ChannelHandle::open("test.broadcast.isolation-a");
        let b = ChannelHandle::open("test.broadcast.isolation-b");
        let mut from_b = b.subscribe();

        a.publish(AuthMessage::SignOut);

        let heard = tokio::time::timeout(Duration::from_millis(100), from_b.recv()).await;
        assert!(heard.is_err());
    }
}
