//! Onboarding session: classification and approval of candidates
//!
//! A session owns the reviewer-facing partitions for one onboarding run:
//!
//! - `pending`: every classified candidate not yet approved
//! - `duplicate`: the flagged subset of `pending`, computed on read
//! - `approved`: candidates inserted into the store, in approval order
//!
//! Sessions are independent objects; nothing here is process-global.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use devo_common::events::{EventBus, OnboardEvent};
use devo_common::{Devotee, Error, Result};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::parser::parse_bulk;
use crate::score::{is_duplicate_points, points_to_score, score_breakdown};
use crate::store::RecordStore;

/// A candidate annotated with its duplicate decision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    /// Session-local handle used to approve this candidate
    pub ticket: Uuid,
    #[serde(flatten)]
    pub devotee: Devotee,
    pub is_duplicate: bool,
    pub match_score: f64,
    /// Canonical record that produced `match_score`, if any field matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_match_id: Option<Uuid>,
}

/// A candidate after a successful insert
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovedCandidate {
    pub candidate: ScoredCandidate,
    /// Record as returned by the store
    pub stored: Devotee,
}

/// Ordered copy of a session's partitions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub pending: Vec<ScoredCandidate>,
    pub duplicate: Vec<ScoredCandidate>,
    pub approved: Vec<ApprovedCandidate>,
}

/// Score one candidate against a population, keeping the best match
///
/// An empty population yields a clean candidate with score 0.
pub fn classify(candidate: Devotee, population: &[Devotee]) -> ScoredCandidate {
    let mut best_points = 0;
    let mut best_match_id = None;

    for existing in population {
        let points = score_breakdown(&candidate, existing).points();
        if points > best_points {
            best_points = points;
            best_match_id = existing.id;
        }
    }

    ScoredCandidate {
        ticket: Uuid::new_v4(),
        devotee: candidate,
        is_duplicate: is_duplicate_points(best_points),
        match_score: points_to_score(best_points),
        best_match_id,
    }
}

#[derive(Default)]
struct Partitions {
    pending: Vec<ScoredCandidate>,
    approved: Vec<ApprovedCandidate>,
    in_flight: HashSet<Uuid>,
}

/// One reviewer's onboarding run
pub struct OnboardingSession {
    id: Uuid,
    store: Arc<dyn RecordStore>,
    events: Option<EventBus>,
    partitions: Mutex<Partitions>,
}

impl OnboardingSession {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            id: Uuid::new_v4(),
            store,
            events: None,
            partitions: Mutex::new(Partitions::default()),
        }
    }

    /// Attach an event bus; every decision is emitted on it
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Parse `raw`, classify every candidate against `population` and append
    /// the results to `pending`. Returns the classified batch in input order.
    pub fn classify_batch(&self, raw: &str, population: &[Devotee]) -> Vec<ScoredCandidate> {
        let batch: Vec<ScoredCandidate> = parse_bulk(raw)
            .into_iter()
            .map(|candidate| classify(candidate, population))
            .collect();

        for scored in &batch {
            debug!(
                session_id = %self.id,
                ticket = %scored.ticket,
                name = %scored.devotee.name,
                match_score = scored.match_score,
                is_duplicate = scored.is_duplicate,
                "Classified candidate"
            );
        }

        let duplicates = batch.iter().filter(|c| c.is_duplicate).count();

        self.lock().pending.extend(batch.iter().cloned());

        info!(
            session_id = %self.id,
            candidates = batch.len(),
            duplicates,
            population = population.len(),
            "Classified bulk batch"
        );

        self.emit(OnboardEvent::BatchClassified {
            session_id: self.id,
            candidates: batch.len(),
            duplicates,
            population: population.len(),
            timestamp: Utc::now(),
        });

        batch
    }

    /// Classify a single manually entered candidate and append it to `pending`
    ///
    /// # Errors
    /// `InvalidInput` if the name is blank or the record already has an id.
    pub fn classify_one(&self, candidate: Devotee, population: &[Devotee]) -> Result<ScoredCandidate> {
        if candidate.name.trim().is_empty() {
            return Err(Error::InvalidInput("candidate name must not be empty".to_string()));
        }
        if candidate.is_canonical() {
            return Err(Error::InvalidInput(format!(
                "record '{}' is already stored",
                candidate.name
            )));
        }

        let scored = classify(candidate, population);

        debug!(
            session_id = %self.id,
            ticket = %scored.ticket,
            name = %scored.devotee.name,
            match_score = scored.match_score,
            is_duplicate = scored.is_duplicate,
            "Classified manual candidate"
        );

        self.lock().pending.push(scored.clone());

        self.emit(OnboardEvent::CandidateClassified {
            session_id: self.id,
            ticket: scored.ticket,
            name: scored.devotee.name.clone(),
            is_duplicate: scored.is_duplicate,
            match_score: scored.match_score,
            timestamp: Utc::now(),
        });

        Ok(scored)
    }

    /// [`classify_batch`](Self::classify_batch) against a freshly fetched population
    pub async fn classify_batch_from_store(&self, raw: &str) -> Vec<ScoredCandidate> {
        let population = self.fetch_population().await;
        self.classify_batch(raw, &population)
    }

    /// [`classify_one`](Self::classify_one) against a freshly fetched population
    pub async fn classify_one_from_store(&self, candidate: Devotee) -> Result<ScoredCandidate> {
        let population = self.fetch_population().await;
        self.classify_one(candidate, &population)
    }

    /// Insert the candidate behind `ticket` into the store and move it to
    /// `approved`. Flagged duplicates are approved the same way (override).
    ///
    /// The candidate stays in `pending` while the insert is outstanding.
    /// Approving an already approved ticket returns the stored record without
    /// inserting again.
    ///
    /// # Errors
    /// - `NotFound` if the ticket was never classified in this session
    /// - `ApprovalInProgress` if another approval of the ticket is running
    /// - `InsertFailed` if the store rejected the insert; the candidate stays
    ///   in `pending`
    pub async fn approve(&self, ticket: Uuid) -> Result<Devotee> {
        let (candidate, _in_flight) = {
            let mut partitions = self.lock();

            if let Some(done) = partitions.approved.iter().find(|a| a.candidate.ticket == ticket) {
                debug!(session_id = %self.id, %ticket, "Candidate already approved");
                return Ok(done.stored.clone());
            }
            if partitions.in_flight.contains(&ticket) {
                return Err(Error::ApprovalInProgress(ticket));
            }

            let candidate = partitions
                .pending
                .iter()
                .find(|c| c.ticket == ticket)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("candidate {}", ticket)))?;

            partitions.in_flight.insert(ticket);
            (candidate, InFlight { session: self, ticket })
        };

        let stored = match self.store.insert(&candidate.devotee.to_new()).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(
                    session_id = %self.id,
                    %ticket,
                    name = %candidate.devotee.name,
                    "Insert failed, candidate kept pending: {}",
                    e
                );
                self.emit(OnboardEvent::ApprovalFailed {
                    session_id: self.id,
                    ticket,
                    error: e.to_string(),
                    timestamp: Utc::now(),
                });
                return Err(Error::InsertFailed(e.to_string()));
            }
        };

        {
            let mut partitions = self.lock();
            partitions.pending.retain(|c| c.ticket != ticket);
            partitions.approved.push(ApprovedCandidate {
                candidate: candidate.clone(),
                stored: stored.clone(),
            });
        }

        info!(
            session_id = %self.id,
            %ticket,
            name = %candidate.devotee.name,
            overridden = candidate.is_duplicate,
            "Candidate approved"
        );

        self.emit(OnboardEvent::CandidateApproved {
            session_id: self.id,
            ticket,
            devotee_id: stored.id,
            name: stored.name.clone(),
            match_score: candidate.match_score,
            overridden: candidate.is_duplicate,
            timestamp: Utc::now(),
        });

        Ok(stored)
    }

    /// Approve every pending candidate that is not flagged, in pending order
    ///
    /// Failures are collected per ticket; they do not stop the remaining
    /// approvals.
    pub async fn approve_all_clean(&self) -> Vec<(Uuid, Result<Devotee>)> {
        let tickets: Vec<Uuid> = self
            .lock()
            .pending
            .iter()
            .filter(|c| !c.is_duplicate)
            .map(|c| c.ticket)
            .collect();

        let mut outcomes = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            outcomes.push((ticket, self.approve(ticket).await));
        }
        outcomes
    }

    /// Ordered copy of all partitions
    pub fn snapshot(&self) -> SessionSnapshot {
        let partitions = self.lock();

        SessionSnapshot {
            pending: partitions.pending.clone(),
            duplicate: partitions
                .pending
                .iter()
                .filter(|c| c.is_duplicate)
                .cloned()
                .collect(),
            approved: partitions.approved.clone(),
        }
    }

    async fn fetch_population(&self) -> Vec<Devotee> {
        match self.store.fetch_all().await {
            Ok(population) => population,
            Err(e) => {
                warn!(
                    session_id = %self.id,
                    "Population fetch failed, classifying against empty population: {}",
                    e
                );
                self.emit(OnboardEvent::PopulationFetchFailed {
                    session_id: self.id,
                    error: e.to_string(),
                    timestamp: Utc::now(),
                });
                Vec::new()
            }
        }
    }

    fn emit(&self, event: OnboardEvent) {
        if let Some(events) = &self.events {
            events.emit_lossy(event);
        }
    }

    // Critical sections never span an await, so a poisoned lock still holds
    // consistent partitions
    fn lock(&self) -> MutexGuard<'_, Partitions> {
        self.partitions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears a ticket's in-flight mark when the approval finishes or is dropped
struct InFlight<'a> {
    session: &'a OnboardingSession,
    ticket: Uuid,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.session.lock().in_flight.remove(&self.ticket);
    }
}
