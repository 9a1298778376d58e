// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live ticket desk notifications over WebSocket.
//!
//! Events tell connected desks that something changed (a schedule was
//! generated, seats were sold or freed, a route was added). They carry no
//! authority; clients re-read the HTTP API for the current figures. Nothing
//! is accepted from clients over the socket.

use axum::{
    extract::{
        State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Maximum number of events to buffer in the broadcast channel.
/// If clients cannot keep up, older events will be dropped.
const EVENT_BUFFER_SIZE: usize = 100;

/// Live event types, tagged by `type` in JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// Sent once when a client connects.
    Connected {
        /// Server timestamp (ISO 8601).
        timestamp: String,
    },
    /// Trips were generated for a route.
    ScheduleGenerated {
        /// The route.
        route_id: i64,
        /// How many trips were inserted.
        created: usize,
    },
    /// A sale or cancellation changed a trip's free seats.
    SeatsChanged {
        /// The trip.
        trip_id: i64,
        /// Seats still for sale.
        available_seats: u32,
    },
    /// A route was added to the catalog.
    RouteCreated {
        /// The new route.
        route_id: i64,
    },
}

/// Fans live events out to every connected desk.
#[derive(Clone)]
pub struct LiveEventBroadcaster {
    /// The broadcast channel sender.
    tx: broadcast::Sender<LiveEvent>,
}

impl LiveEventBroadcaster {
    /// Creates a new event broadcaster.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Broadcasts an event to all connected clients.
    ///
    /// If no clients are connected, the event is silently dropped.
    /// This is non-blocking and will not wait for clients to receive the event.
    pub fn broadcast(&self, event: &LiveEvent) {
        match self.tx.send(event.clone()) {
            Ok(count) => {
                debug!(?event, receivers = count, "Broadcast live event");
            }
            Err(_) => {
                // No receivers, which is fine
                debug!(?event, "No receivers for live event");
            }
        }
    }

    /// Subscribes to events sent from now on.
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }
}

impl Default for LiveEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Upgrades `/live` requests and streams events to the client.
pub async fn live_events_handler(
    ws: WebSocketUpgrade,
    AxumState(broadcaster): AxumState<Arc<LiveEventBroadcaster>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, broadcaster))
}

/// Handles an individual WebSocket connection.
///
/// Sends a connection confirmation, then streams all live events until
/// the client disconnects or an error occurs.
async fn handle_socket(socket: WebSocket, broadcaster: Arc<LiveEventBroadcaster>) {
    info!("Desk connected to live event stream");

    let (mut sender, mut receiver) = socket.split();
    let mut rx: broadcast::Receiver<LiveEvent> = broadcaster.subscribe();

    // Send connection confirmation
    let connected_event = LiveEvent::Connected {
        timestamp: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| String::from("unknown")),
    };

    match serde_json::to_string(&connected_event) {
        Ok(json) => {
            if sender.send(Message::Text(json.into())).await.is_err() {
                warn!("Failed to send connection confirmation");
                return;
            }
        }
        Err(e) => error!(?e, "Failed to serialize connection confirmation"),
    }

    // Task for sending events to the client
    let mut send_task = tokio::spawn(async move {
        loop {
            let event: LiveEvent = match rx.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Live event stream lagged, events dropped");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        // Client disconnected
                        break;
                    }
                }
                Err(e) => {
                    error!(?e, "Failed to serialize live event");
                }
            }
        }
    });

    // Task for receiving messages from the client (though we don't expect any)
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    // We don't process commands over WebSocket
                    warn!("Received unexpected message from client, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Ping/pong handled automatically by Axum
                }
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = &mut send_task => {
            debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!("Receive task completed");
            send_task.abort();
        }
    }

    info!("Desk disconnected from live event stream");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_broadcaster_starts_without_receivers() {
        let broadcaster = LiveEventBroadcaster::new();
        assert_eq!(broadcaster.tx.receiver_count(), 0);
    }

    #[test]
    fn test_broadcast_without_receivers_is_dropped() {
        let broadcaster = LiveEventBroadcaster::new();
        broadcaster.broadcast(&LiveEvent::RouteCreated { route_id: 1 });
    }

    #[test]
    fn test_broadcast_reaches_every_receiver() {
        let broadcaster = LiveEventBroadcaster::new();
        let mut rx1 = broadcaster.subscribe();
        let mut rx2 = broadcaster.subscribe();

        broadcaster.broadcast(&LiveEvent::SeatsChanged {
            trip_id: 7,
            available_seats: 28,
        });

        for rx in [&mut rx1, &mut rx2] {
            match rx.try_recv() {
                Ok(LiveEvent::SeatsChanged {
                    trip_id: 7,
                    available_seats: 28,
                }) => {}
                other => panic!("Expected SeatsChanged, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_events_serialize_with_snake_case_tag() {
        let event = LiveEvent::ScheduleGenerated {
            route_id: 3,
            created: 12,
        };

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "schedule_generated");
        assert_eq!(json["route_id"], 3);
        assert_eq!(json["created"], 12);

        let back: LiveEvent = serde_json::from_value(json).unwrap();
        assert!(matches!(
            back,
            LiveEvent::ScheduleGenerated {
                route_id: 3,
                created: 12
            }
        ));
    }
}
