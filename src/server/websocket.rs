//! WebSocket subscriber adapter
//!
//! One connection is one subscriber. The connection is registered before the
//! initial snapshot is read, so an update racing the snapshot is delivered
//! afterwards (possibly twice) rather than lost. Inbound frames are only read
//! to notice the close; their content is ignored.
//!
//! Removal is split in two. When the connection ends for any reason,
//! including a failed socket write in the writer task, the adapter
//! unregisters its own subscriber. The distributor evicts only when it finds
//! the subscriber's channel closed before the adapter got there. Removal is
//! idempotent, so whichever side runs second is a no-op and the eviction
//! counter only counts the distributor's removals.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::OwnedSemaphorePermit;

use crate::broadcast::{Notification, SubscriberId};
use crate::location::TenantScope;
use crate::server::error::ApiResult;
use crate::server::handlers::TenantQuery;
use crate::server::state::AppState;
use crate::tracker::Tracker;

/// Upgrade to a live location feed, optionally scoped by `?tenantId=`
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<TenantQuery>,
) -> ApiResult<Response> {
    let permit = state.admit_subscriber()?;
    let scope = TenantScope::from_param(query.tenant_id.as_deref());

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, scope, permit)))
}

/// Unregisters the subscriber however the connection ends
struct Registration {
    tracker: Arc<Tracker>,
    id: SubscriberId,
}

impl Drop for Registration {
    fn drop(&mut self) {
        if self.tracker.unsubscribe(self.id) {
            tracing::debug!(subscriber_id = self.id, "Subscriber disconnected");
        }
    }
}

async fn handle_socket(
    socket: WebSocket,
    state: AppState,
    scope: TenantScope,
    _permit: Option<OwnedSemaphorePermit>,
) {
    let (mut sink, mut stream) = socket.split();

    let mut subscription = state.tracker.subscribe(scope);
    let _registration = Registration {
        tracker: Arc::clone(&state.tracker),
        id: subscription.id,
    };
    let id = subscription.id;

    tracing::debug!(
        subscriber_id = id,
        scope = %subscription.scope,
        "Subscriber connected"
    );

    let snapshot = Notification::InitialLocations {
        locations: state.tracker.locations(&subscription.scope).await,
    };
    if let Err(e) = send(&mut sink, &snapshot).await {
        tracing::debug!(subscriber_id = id, error = %e, "Initial snapshot failed");
        return;
    }

    let mut writer = tokio::spawn(async move {
        while let Some(notification) = subscription.receiver.recv().await {
            if let Err(e) = send(&mut sink, &notification).await {
                tracing::debug!(subscriber_id = id, error = %e, "Write failed");
                break;
            }
        }
        let _ = sink.close().await;
    });

    loop {
        tokio::select! {
            _ = &mut writer => break,
            msg = stream.next() => match msg {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(subscriber_id = id, error = %e, "Read failed");
                    break;
                }
            },
        }
    }

    writer.abort();
}

async fn send(
    sink: &mut SplitSink<WebSocket, Message>,
    notification: &Notification,
) -> anyhow::Result<()> {
    let text = notification.to_json()?;
    sink.send(Message::Text(text.into())).await?;
    Ok(())
}
