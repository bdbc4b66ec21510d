//! HTTP client for the orientation backend and the trait seam the view model
//! consumes. Every network-facing operation converts failures into
//! [`ApiError`]; no raw transport error escapes past this module.

use futures::future;
use log::{info, warn};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::models::event_model::{
    Assignment, AssignmentsResponse, Event, EventLeaders, EventsResponse, HealthResponse,
    StaffingRecord, StaffingResponse,
};
use super::models::LeaderData;
use super::reconcile::{enrich_events, leaders_from_assignments};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Lookup matched nobody. User-correctable, not a transport problem.
    #[error("no leader found matching {0:?}")]
    NotFound(String),
    /// Request rejected or non-2xx. Transient; triggers cache fallback.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Operation the backend does not provide yet. Worded separately from
    /// network failures so nobody is told to retry.
    #[error("{0} is not available yet")]
    Unimplemented(&'static str),
}

/// A client for one backend deployment. The base URL is injected so the
/// whole stack can run against a local or mock endpoint.
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// `GET /api/lookup/{name}`. 404 becomes [`ApiError::NotFound`].
    pub async fn lookup_leader(&self, name: &str) -> Result<LeaderData, ApiError> {
        info!("Looking up leader {:?}", name);
        let response = self
            .http
            .get(format!(
                "{}/api/lookup/{}",
                self.base_url,
                urlencoding::encode(name)
            ))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(name.to_string()));
        }
        Ok(response.error_for_status()?.json().await?)
    }

    /// `GET /api/events`, raw rows with their inconsistent key casing.
    pub async fn events(&self) -> Result<Vec<serde_json::Value>, ApiError> {
        let body: EventsResponse = self.get_json("/api/events").await?;
        Ok(body.events)
    }

    /// `GET /api/event-staffing`.
    pub async fn event_staffing(&self) -> Result<Vec<StaffingRecord>, ApiError> {
        let body: StaffingResponse = self.get_json("/api/event-staffing").await?;
        Ok(body.events)
    }

    /// Both event feeds fetched concurrently and joined by event name into
    /// canonical staffing-enriched events.
    pub async fn events_with_staffing(&self) -> Result<Vec<Event>, ApiError> {
        let (events, staffing) = future::join(self.events(), self.event_staffing()).await;
        let (events, staffing) = (events?, staffing?);
        info!(
            "Collected {} events and {} staffing records",
            events.len(),
            staffing.len()
        );
        Ok(enrich_events(&events, &staffing))
    }

    /// `GET /api/leader-assignments` with optional event / leader filters.
    pub async fn leader_assignments(
        &self,
        event: Option<&str>,
        leader_email: Option<&str>,
    ) -> Result<Vec<Assignment>, ApiError> {
        let mut query = Vec::new();
        if let Some(event) = event {
            query.push(format!("event={}", urlencoding::encode(event)));
        }
        if let Some(email) = leader_email {
            query.push(format!("leader_email={}", urlencoding::encode(email)));
        }
        let path = if query.is_empty() {
            String::from("/api/leader-assignments")
        } else {
            format!("/api/leader-assignments?{}", query.join("&"))
        };
        let body: AssignmentsResponse = self.get_json(&path).await?;
        Ok(body.assignments)
    }

    /// `GET /api/event/{name}/leaders`, falling back to a roster derived
    /// from the assignments feed when the dedicated endpoint fails.
    pub async fn event_leaders(&self, event_name: &str) -> Result<EventLeaders, ApiError> {
        let path = format!("/api/event/{}/leaders", urlencoding::encode(event_name));
        match self.get_json::<EventLeaders>(&path).await {
            Ok(roster) => Ok(roster),
            Err(primary) => {
                warn!(
                    "Roster endpoint failed for {:?} ({}), deriving from assignments",
                    event_name, primary
                );
                let assignments = self.leader_assignments(Some(event_name), None).await?;
                Ok(leaders_from_assignments(event_name, &assignments))
            }
        }
    }

    /// `GET /health` liveness probe.
    pub async fn health(&self) -> Result<bool, ApiError> {
        let body: HealthResponse = self.get_json("/health").await?;
        Ok(body.status == "healthy")
    }
}

/// The two feeds the view model needs. Implemented by [`ApiClient`] for
/// production and by fixture-backed doubles in tests.
#[allow(async_fn_in_trait)]
pub trait ScheduleSource {
    async fn lookup_leader(&self, name: &str) -> Result<LeaderData, ApiError>;
    async fn events_with_staffing(&self) -> Result<Vec<Event>, ApiError>;
}

impl ScheduleSource for ApiClient {
    async fn lookup_leader(&self, name: &str) -> Result<LeaderData, ApiError> {
        ApiClient::lookup_leader(self, name).await
    }

    async fn events_with_staffing(&self) -> Result<Vec<Event>, ApiError> {
        ApiClient::events_with_staffing(self).await
    }
}
