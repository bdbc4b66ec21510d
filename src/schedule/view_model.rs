//! The board's view model: owns the fetched snapshot, the load state
//! machine, and the fall-back-to-cache behavior. State is replaced
//! wholesale on every successful load, never merged field by field.

use futures::future;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::api_client::{ApiError, ScheduleSource};
use super::cache::{KeyValueCache, LEADER_DATA_KEY, SCHEDULE_DATA_KEY, USER_NAME_KEY};
use super::models::event_model::{Event, EventDraft};
use super::models::LeaderData;
use super::reconcile::{derive_meal_events, merge_with_staffing, sort_events};
use super::time_grid::{place_event, GridSlot, ORIENTATION_WEEK};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    /// Fresh data from the backend.
    Ready,
    /// A fetch failed; showing the last cached snapshot if one exists.
    /// Not terminal, a new load re-enters `Loading`.
    Degraded,
}

/// Shape of the cached event snapshot; mirrors what the backend's events
/// envelope looks like so the cache stays inspectable.
#[derive(Serialize, Deserialize)]
struct ScheduleSnapshot {
    events: Vec<Event>,
}

pub struct ScheduleBoard<S, C> {
    source: S,
    cache: C,
    min_event_rows: Option<i32>,
    user_name: Option<String>,
    leader: Option<LeaderData>,
    events: Vec<Event>,
    state: LoadState,
    error: Option<String>,
    /// Load generation token. A finished fetch whose token no longer
    /// matches was superseded by a newer load and is dropped.
    generation: u64,
}

impl<S: ScheduleSource, C: KeyValueCache> ScheduleBoard<S, C> {
    pub fn new(source: S, cache: C, min_event_rows: Option<i32>) -> Self {
        ScheduleBoard {
            source,
            cache,
            min_event_rows,
            user_name: None,
            leader: None,
            events: Vec::new(),
            state: LoadState::Idle,
            error: None,
            generation: 0,
        }
    }

    /// Fetches the leader lookup and the staffing-enriched events
    /// concurrently; reconciliation only ever runs on the complete pair.
    pub async fn load(&mut self, username: &str) {
        let generation = self.begin_load(username);
        let (leader, enriched) = future::join(
            self.source.lookup_leader(username),
            self.source.events_with_staffing(),
        )
        .await;
        self.finish_load(generation, leader, enriched);
    }

    /// Re-runs the load with the current or last cached username.
    pub async fn reload(&mut self) {
        let name = self
            .user_name
            .clone()
            .or_else(|| self.cache.get(USER_NAME_KEY));
        match name {
            Some(name) => self.load(&name).await,
            None => {
                self.state = LoadState::Degraded;
                self.error = Some("No leader selected. Enter a name to load a schedule.".into());
            }
        }
    }

    /// Stub: the backend has no create endpoint yet. Reported distinctly
    /// from a network failure so the caller is not told to retry.
    pub async fn create_event(&self, draft: &EventDraft) -> Result<(), ApiError> {
        warn!("Rejecting create of {:?}: endpoint missing", draft.event_name);
        Err(ApiError::Unimplemented("creating events"))
    }

    pub(crate) fn begin_load(&mut self, username: &str) -> u64 {
        self.user_name = Some(username.to_string());
        self.state = LoadState::Loading;
        self.error = None;
        self.generation += 1;
        self.generation
    }

    pub(crate) fn finish_load(
        &mut self,
        generation: u64,
        leader: Result<LeaderData, ApiError>,
        enriched: Result<Vec<Event>, ApiError>,
    ) {
        if generation != self.generation {
            info!("Dropping superseded load (generation {})", generation);
            return;
        }
        match (leader, enriched) {
            (Ok(leader), Ok(enriched)) => self.apply_snapshot(leader, enriched),
            (Err(err), _) | (_, Err(err)) => self.fall_back(err),
        }
    }

    fn apply_snapshot(&mut self, leader: LeaderData, enriched: Vec<Event>) {
        let mut events = merge_with_staffing(leader.events.clone(), &enriched);
        events.extend(derive_meal_events(&leader.meal_eligibility));
        sort_events(&mut events);
        info!(
            "Loaded {} events for {}",
            events.len(),
            leader.leader_name
        );

        /* replace the whole cached snapshot, never single fields */
        if let Some(name) = &self.user_name {
            self.cache.set(USER_NAME_KEY, name);
        }
        match serde_json::to_string(&leader) {
            Ok(json) => self.cache.set(LEADER_DATA_KEY, &json),
            Err(err) => warn!("Could not serialize leader snapshot: {}", err),
        }
        let snapshot = ScheduleSnapshot {
            events: events.clone(),
        };
        match serde_json::to_string(&snapshot) {
            Ok(json) => self.cache.set(SCHEDULE_DATA_KEY, &json),
            Err(err) => warn!("Could not serialize schedule snapshot: {}", err),
        }

        self.leader = Some(leader);
        self.events = events;
        self.state = LoadState::Ready;
        self.error = None;
    }

    fn fall_back(&mut self, err: ApiError) {
        warn!("Schedule load failed: {}", err);
        self.error = Some(user_message(&err));
        self.state = LoadState::Degraded;
        self.restore_from_cache();
    }

    fn restore_from_cache(&mut self) {
        if self.user_name.is_none() {
            self.user_name = self.cache.get(USER_NAME_KEY);
        }
        if let Some(raw) = self.cache.get(LEADER_DATA_KEY) {
            match serde_json::from_str(&raw) {
                Ok(leader) => self.leader = Some(leader),
                Err(err) => warn!("Ignoring corrupt cached leader data: {}", err),
            }
        }
        if let Some(raw) = self.cache.get(SCHEDULE_DATA_KEY) {
            match serde_json::from_str::<ScheduleSnapshot>(&raw) {
                Ok(snapshot) => {
                    info!("Restored {} events from cache", snapshot.events.len());
                    self.events = snapshot.events;
                }
                Err(err) => warn!("Ignoring corrupt cached schedule: {}", err),
            }
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn leader(&self) -> Option<&LeaderData> {
        self.leader.as_ref()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events falling inside the fixed operating week.
    pub fn week_events(&self) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|event| ORIENTATION_WEEK.contains(&event.date))
            .collect()
    }

    /// Week events joined with their grid positions. Events whose times do
    /// not parse get no slot and are omitted here, not rendered wrong.
    pub fn placed_events(&self) -> Vec<(&Event, GridSlot)> {
        self.week_events()
            .into_iter()
            .filter_map(|event| {
                place_event(event, &ORIENTATION_WEEK, self.min_event_rows)
                    .map(|slot| (event, slot))
            })
            .collect()
    }
}

fn user_message(err: &ApiError) -> String {
    match err {
        ApiError::NotFound(_) => {
            "Leader not found. Please check your name and try again.".to_string()
        }
        ApiError::Unimplemented(_) => err.to_string(),
        ApiError::Network(_) => {
            "Unable to connect to the system. Please try again later.".to_string()
        }
    }
}
