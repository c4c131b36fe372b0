//! Shared handler state

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::server::error::{ApiError, ApiResult};
use crate::tracker::Tracker;

/// State cloned into every request handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub tracker: Arc<Tracker>,
    subscriber_limit: Option<Arc<Semaphore>>,
}

impl AppState {
    /// Create handler state; `max_subscribers` of 0 means unlimited
    pub fn new(tracker: Arc<Tracker>, max_subscribers: usize) -> Self {
        let subscriber_limit = if max_subscribers > 0 {
            Some(Arc::new(Semaphore::new(max_subscribers)))
        } else {
            None
        };

        Self {
            tracker,
            subscriber_limit,
        }
    }

    /// Reserve a subscriber slot for the lifetime of the returned permit
    pub fn admit_subscriber(&self) -> ApiResult<Option<OwnedSemaphorePermit>> {
        match self.subscriber_limit {
            Some(ref sem) => match sem.clone().try_acquire_owned() {
                Ok(permit) => Ok(Some(permit)),
                Err(_) => {
                    tracing::warn!("Subscriber rejected: limit reached");
                    Err(ApiError::service_unavailable("Subscriber limit reached"))
                }
            },
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::TrackerConfig;

    fn tracker() -> Arc<Tracker> {
        let (tracker, _distributor) = Tracker::new(TrackerConfig::default());
        Arc::new(tracker)
    }

    #[test]
    fn test_unlimited_subscribers() {
        let state = AppState::new(tracker(), 0);

        for _ in 0..100 {
            assert!(state.admit_subscriber().unwrap().is_none());
        }
    }

    #[test]
    fn test_subscriber_limit() {
        let state = AppState::new(tracker(), 1);

        let permit = state.admit_subscriber().unwrap();
        assert!(permit.is_some());

        let err = state.admit_subscriber().unwrap_err();
        assert_eq!(err.status.as_u16(), 503);

        drop(permit);
        assert!(state.admit_subscriber().unwrap().is_some());
    }
}
