//! Search activation notifications delivered to the application layer.
//!
//! When the host opens the application from a search result, or continues a search query inside
//! it, the bridge forwards an [`ActivationEvent`] to every live [`Subscription`]. Dropping a
//! subscription unsubscribes it.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError};

const DEFAULT_CAPACITY: usize = 64;

/// Payload delivered to subscribers. At least one field is set on every delivered event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationEvent {
    /// Identifier of the activated record.
    #[serde(default)]
    pub id: Option<String>,
    /// Query text the user continued searching with.
    #[serde(default)]
    pub query: Option<String>,
}

impl ActivationEvent {
    /// Whether the event carries neither an id nor a query.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.query.is_none()
    }
}

/// Activity the host hands over when it launches or resumes the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserActivity {
    /// The user picked one of our indexed records.
    SearchableItem {
        /// Identifier attached to the activated record.
        identifier: Option<String>,
    },
    /// The user asked to continue a search inside the application.
    QueryContinuation {
        /// Query string typed by the user.
        query: Option<String>,
    },
    /// Any other activity type; carries nothing for subscribers.
    Other(String),
}

impl From<UserActivity> for ActivationEvent {
    fn from(activity: UserActivity) -> Self {
        match activity {
            UserActivity::SearchableItem { identifier } => Self {
                id: identifier,
                query: None,
            },
            UserActivity::QueryContinuation { query } => Self { id: None, query },
            UserActivity::Other(_) => Self::default(),
        }
    }
}

/// Errors raised by the notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// The host offers no search facility, so no activations will ever arrive.
    #[error("Platform {0} doesn't support search-with-spotlight.")]
    PlatformUnsupported(String),
}

/// Fan-out point for activation events.
#[derive(Clone)]
pub struct ActivationHub {
    sender: Option<broadcast::Sender<ActivationEvent>>,
}

impl ActivationHub {
    /// Create a hub buffering up to `capacity` undelivered events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Some(sender),
        }
    }

    /// Create a hub for hosts without a search facility; subscribing fails.
    pub fn unsupported() -> Self {
        Self { sender: None }
    }

    /// Whether subscriptions are accepted.
    pub fn is_supported(&self) -> bool {
        self.sender.is_some()
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> Result<Subscription, EventError> {
        match &self.sender {
            Some(sender) => Ok(Subscription {
                receiver: sender.subscribe(),
            }),
            None => Err(EventError::PlatformUnsupported(
                std::env::consts::OS.to_string(),
            )),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender
            .as_ref()
            .map(broadcast::Sender::receiver_count)
            .unwrap_or(0)
    }

    /// Deliver `event` to every subscriber.
    ///
    /// Returns `false` when the event is empty, the hub is unsupported, or nobody is listening.
    pub fn publish(&self, event: ActivationEvent) -> bool {
        if event.is_empty() {
            tracing::debug!("Ignoring activation without id or query");
            return false;
        }
        let Some(sender) = &self.sender else {
            return false;
        };
        match sender.send(event) {
            Ok(receivers) => {
                tracing::debug!(receivers, "Activation delivered");
                true
            }
            Err(broadcast::error::SendError(event)) => {
                tracing::warn!(id = ?event.id, query = ?event.query, "Activation dropped; no subscribers");
                false
            }
        }
    }

    /// Translate a host activity and deliver it.
    pub fn handle(&self, activity: UserActivity) -> bool {
        self.publish(activity.into())
    }
}

impl Default for ActivationHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Receiving end of an [`ActivationHub`].
pub struct Subscription {
    receiver: broadcast::Receiver<ActivationEvent>,
}

impl Subscription {
    /// Wait for the next event. Returns `None` once the hub has been dropped.
    pub async fn recv(&mut self) -> Option<ActivationEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Subscriber lagged; activations skipped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscriber_receives_events() {
        let hub = ActivationHub::default();
        let mut first = hub.subscribe().expect("subscribe");
        let mut second = hub.subscribe().expect("subscribe");

        assert!(hub.handle(UserActivity::SearchableItem {
            identifier: Some("doc-7".into()),
        }));

        let expected = ActivationEvent {
            id: Some("doc-7".into()),
            query: None,
        };
        assert_eq!(first.recv().await, Some(expected.clone()));
        assert_eq!(second.recv().await, Some(expected));
    }

    #[tokio::test]
    async fn dropped_subscription_unsubscribes() {
        let hub = ActivationHub::default();
        let subscription = hub.subscribe().expect("subscribe");
        assert_eq!(hub.subscriber_count(), 1);
        drop(subscription);
        assert_eq!(hub.subscriber_count(), 0);
        assert!(!hub.publish(ActivationEvent {
            id: None,
            query: Some("rust".into()),
        }));
    }

    #[tokio::test]
    async fn empty_and_foreign_activities_are_not_delivered() {
        let hub = ActivationHub::default();
        let _subscription = hub.subscribe().expect("subscribe");
        assert!(!hub.handle(UserActivity::Other("browsing".into())));
        assert!(!hub.handle(UserActivity::QueryContinuation { query: None }));
        assert!(hub.handle(UserActivity::QueryContinuation {
            query: Some("rust".into()),
        }));
    }

    #[test]
    fn unsupported_hub_rejects_subscriptions() {
        let hub = ActivationHub::unsupported();
        assert!(!hub.is_supported());
        assert!(matches!(
            hub.subscribe(),
            Err(EventError::PlatformUnsupported(_))
        ));
        assert!(!hub.publish(ActivationEvent {
            id: Some("x".into()),
            query: None,
        }));
    }
}
