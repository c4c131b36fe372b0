//! Subscriber registry
//!
//! Tracks every live subscriber together with its tenant scope. Each
//! subscriber gets a bounded outbound channel; the connection that owns the
//! receiving end writes whatever arrives to the wire. Dropping the last sender
//! (which removal does) ends that writer and closes the connection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::notification::Notification;
use crate::location::TenantScope;

/// Unique identifier of a registered subscriber
pub type SubscriberId = u64;

/// Outcome of a failed delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The subscriber's outbound buffer is full
    Lagged,
    /// The connection's writer is gone
    Closed,
}

/// A registered subscriber as seen by the distributor
#[derive(Debug, Clone)]
pub struct Subscriber {
    /// Registry id
    pub id: SubscriberId,
    /// Tenants this subscriber may see
    pub scope: TenantScope,
    sender: mpsc::Sender<Arc<Notification>>,
}

impl Subscriber {
    /// Check whether an update for `tenant_id` should reach this subscriber
    pub fn wants(&self, tenant_id: &str) -> bool {
        self.scope.matches(tenant_id)
    }

    /// Try to hand a notification to the connection without waiting
    pub fn try_deliver(&self, notification: &Arc<Notification>) -> Result<(), DeliveryError> {
        match self.sender.try_send(Arc::clone(notification)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DeliveryError::Lagged),
            Err(TrySendError::Closed(_)) => Err(DeliveryError::Closed),
        }
    }

    /// Check if the connection side has gone away
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Receiving side handed to the connection that registered
#[derive(Debug)]
pub struct Subscription {
    /// Registry id, used to unregister
    pub id: SubscriberId,
    /// Scope the subscriber registered with
    pub scope: TenantScope,
    /// Notifications fanned out to this subscriber
    pub receiver: mpsc::Receiver<Arc<Notification>>,
}

/// Concurrent set of live subscribers
///
/// Backed by a sharded `DashMap`, so registration and removal from connection
/// tasks never contend with each other for long. Broadcast iterates over a
/// [`snapshot`](Self::snapshot), never over the map itself.
#[derive(Debug)]
pub struct SubscriberRegistry {
    subscribers: DashMap<SubscriberId, Subscriber>,
    next_id: AtomicU64,
    buffer: usize,
}

impl SubscriberRegistry {
    /// Create a registry whose subscribers buffer up to `buffer` notifications
    pub fn new(buffer: usize) -> Self {
        Self {
            subscribers: DashMap::new(),
            next_id: AtomicU64::new(1),
            buffer: buffer.max(1),
        }
    }

    /// Register a subscriber for `scope`
    pub fn add(&self, scope: TenantScope) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel(self.buffer);

        self.subscribers.insert(
            id,
            Subscriber {
                id,
                scope: scope.clone(),
                sender,
            },
        );

        tracing::info!(
            subscriber_id = id,
            scope = %scope,
            subscribers = self.subscribers.len(),
            "Subscriber added"
        );

        Subscription {
            id,
            scope,
            receiver,
        }
    }

    /// Unregister a subscriber
    ///
    /// Idempotent: returns `false` if the subscriber was already gone.
    pub fn remove(&self, id: SubscriberId) -> bool {
        match self.subscribers.remove(&id) {
            Some(_) => {
                tracing::info!(
                    subscriber_id = id,
                    subscribers = self.subscribers.len(),
                    "Subscriber removed"
                );
                true
            }
            None => false,
        }
    }

    /// Copy the current subscriber set
    ///
    /// Shard locks are released before this returns, so callers may deliver
    /// to (and remove) subscribers freely while walking the result.
    pub fn snapshot(&self) -> Vec<Subscriber> {
        self.subscribers
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Check if a subscriber is registered
    pub fn contains(&self, id: SubscriberId) -> bool {
        self.subscribers.contains_key(&id)
    }

    /// Number of registered subscribers
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Check if nobody is subscribed
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
