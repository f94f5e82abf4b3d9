//! Event types for the DEVO event system
//!
//! Onboarding sessions emit an [`OnboardEvent`] for every classification and
//! approval decision. Consumers (audit loggers, UI streams) subscribe through
//! the [`EventBus`]; the engine itself keeps no record of past decisions.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Onboarding event types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OnboardEvent {
    /// A bulk paste was parsed and scored
    BatchClassified {
        session_id: Uuid,
        /// Candidates produced by the parser
        candidates: usize,
        /// How many of them were flagged as possible duplicates
        duplicates: usize,
        /// Size of the canonical population they were scored against
        population: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A single manually entered candidate was scored
    CandidateClassified {
        session_id: Uuid,
        ticket: Uuid,
        name: String,
        is_duplicate: bool,
        match_score: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The canonical population could not be loaded.
    /// Classification continued against an empty population.
    PopulationFetchFailed {
        session_id: Uuid,
        error: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A candidate was inserted into the store
    CandidateApproved {
        session_id: Uuid,
        ticket: Uuid,
        /// Id assigned by the store
        devotee_id: Option<Uuid>,
        name: String,
        match_score: f64,
        /// True when a flagged duplicate was approved anyway
        overridden: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The store refused an insert; the candidate stays pending
    ApprovalFailed {
        session_id: Uuid,
        ticket: Uuid,
        error: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl OnboardEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            OnboardEvent::BatchClassified { .. } => "BatchClassified",
            OnboardEvent::CandidateClassified { .. } => "CandidateClassified",
            OnboardEvent::PopulationFetchFailed { .. } => "PopulationFetchFailed",
            OnboardEvent::CandidateApproved { .. } => "CandidateApproved",
            OnboardEvent::ApprovalFailed { .. } => "ApprovalFailed",
        }
    }

    /// Session that produced the event
    pub fn session_id(&self) -> Uuid {
        match self {
            OnboardEvent::BatchClassified { session_id, .. }
            | OnboardEvent::CandidateClassified { session_id, .. }
            | OnboardEvent::PopulationFetchFailed { session_id, .. }
            | OnboardEvent::CandidateApproved { session_id, .. }
            | OnboardEvent::ApprovalFailed { session_id, .. } => *session_id,
        }
    }
}

/// Central event distribution for onboarding events
///
/// Thin wrapper over a tokio broadcast channel. Cloning the bus clones the
/// sender, so every clone feeds the same subscribers.
///
/// # Examples
///
/// ```
/// use devo_common::events::{EventBus, OnboardEvent};
///
/// let bus = EventBus::new(100);
/// let mut rx = bus.subscribe();
///
/// bus.emit_lossy(OnboardEvent::PopulationFetchFailed {
///     session_id: uuid::Uuid::new_v4(),
///     error: "timeout".to_string(),
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<OnboardEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per
    /// subscriber before the oldest are dropped
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<OnboardEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: OnboardEvent,
    ) -> Result<usize, broadcast::error::SendError<OnboardEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: OnboardEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approved(session_id: Uuid) -> OnboardEvent {
        OnboardEvent::CandidateApproved {
            session_id,
            ticket: Uuid::new_v4(),
            devotee_id: Some(Uuid::new_v4()),
            name: "Alice".to_string(),
            match_score: 0.8,
            overridden: true,
            timestamp: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_emit_without_subscribers_fails() {
        let bus = EventBus::new(10);
        assert!(bus.emit(approved(Uuid::new_v4())).is_err());
        // Lossy emit must not panic
        bus.emit_lossy(approved(Uuid::new_v4()));
    }

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let bus = EventBus::new(10);
        let mut rx = bus.subscribe();
        let session_id = Uuid::new_v4();

        assert_eq!(bus.emit(approved(session_id)).unwrap(), 1);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type(), "CandidateApproved");
        assert_eq!(event.session_id(), session_id);
    }

    #[test]
    fn test_clones_share_subscribers() {
        let bus = EventBus::new(10);
        let _rx = bus.subscribe();
        let clone = bus.clone();

        assert_eq!(clone.subscriber_count(), 1);
        assert_eq!(clone.capacity(), 10);
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let json = serde_json::to_value(approved(Uuid::new_v4())).unwrap();
        assert_eq!(json["type"], "CandidateApproved");
        assert_eq!(json["overridden"], true);
        assert_eq!(json["name"], "Alice");
    }
}
