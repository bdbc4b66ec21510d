//! Canonical event schema plus the wire models for the orientation backend.
//!
//! The backend emits two naming conventions for the same concepts
//! (spreadsheet-style `"Leaders Needed"` next to snake_case `leaders_needed`).
//! Everything is normalized into the canonical types here, at the boundary;
//! dual-cased records never travel further into the crate.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One schedule entry, identified by name + date + start time.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Event {
    pub event_name: String,
    /// Display date, e.g. "Aug 25".
    #[serde(default)]
    pub date: String,
    /// Free-form 12-hour wall-clock strings ("9:00am", "9:00 PM").
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub duration_hours: f64,
    #[serde(default)]
    pub is_meal: bool,
    #[serde(default)]
    pub is_indoor: Option<bool>,
    #[serde(default)]
    pub is_outdoor: Option<bool>,
    #[serde(default)]
    pub staffing: Option<StaffingInfo>,
}

impl Event {
    /// Normalizes a raw `/api/events` record, which carries both key casings.
    /// Returns `None` when no event name can be found under either key.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let event_name = string_field(raw, &["event_name", "Event"])?;
        Some(Event {
            event_name,
            date: string_field(raw, &["date", "Date"]).unwrap_or_default(),
            start_time: string_field(raw, &["start_time", "Start Time"]).unwrap_or_default(),
            end_time: string_field(raw, &["end_time", "End Time"]).unwrap_or_default(),
            location: string_field(raw, &["location", "Location"]).unwrap_or_default(),
            duration_hours: f64_field(raw, &["duration_hours", "Duration (hours)"])
                .unwrap_or(0.0),
            is_meal: bool_field(raw, &["is_meal"]).unwrap_or(false),
            is_indoor: bool_field(raw, &["is_indoor"]),
            is_outdoor: bool_field(raw, &["is_outdoor"]),
            staffing: None,
        })
    }
}

fn string_field(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| raw.get(*key).and_then(Value::as_str))
        .map(str::to_owned)
}

fn f64_field(raw: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| raw.get(*key).and_then(Value::as_f64))
}

fn bool_field(raw: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter()
        .find_map(|key| raw.get(*key).and_then(Value::as_bool))
}

/// Staffing counts for one event. `status` is always recomputed from the
/// percentage and the fully-staffed flag, never taken off the wire.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffingInfo {
    pub leaders_needed: u32,
    pub leaders_assigned: u32,
    pub staffing_percentage: f64,
    pub fully_staffed: bool,
    pub event_type: String,
    pub status: StaffingStatus,
}

impl StaffingInfo {
    pub fn from_record(record: &StaffingRecord) -> Self {
        StaffingInfo {
            leaders_needed: record.leaders_needed,
            leaders_assigned: record.leaders_assigned,
            staffing_percentage: record.staffing_percentage,
            fully_staffed: record.fully_staffed,
            event_type: record.event_type.clone(),
            status: StaffingStatus::classify(record.staffing_percentage, record.fully_staffed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffingStatus {
    FullyStaffed,
    Good,
    Understaffed,
    Critical,
}

impl StaffingStatus {
    /// Ordered classification: the fully-staffed flag wins outright, then
    /// under 50% is critical, under 80% understaffed, the rest good.
    pub fn classify(staffing_percentage: f64, fully_staffed: bool) -> Self {
        if fully_staffed {
            StaffingStatus::FullyStaffed
        } else if staffing_percentage < 50.0 {
            StaffingStatus::Critical
        } else if staffing_percentage < 80.0 {
            StaffingStatus::Understaffed
        } else {
            StaffingStatus::Good
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StaffingStatus::FullyStaffed => "fully staffed",
            StaffingStatus::Good => "good",
            StaffingStatus::Understaffed => "understaffed",
            StaffingStatus::Critical => "critical",
        }
    }
}

/// Raw `/api/event-staffing` row, spreadsheet keys.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StaffingRecord {
    #[serde(rename = "Event")]
    pub event: String,
    #[serde(rename = "Leaders Needed")]
    pub leaders_needed: u32,
    #[serde(rename = "Leaders Assigned")]
    pub leaders_assigned: u32,
    #[serde(rename = "Staffing Percentage")]
    pub staffing_percentage: f64,
    #[serde(rename = "Fully Staffed")]
    pub fully_staffed: bool,
    #[serde(rename = "Event Type", default)]
    pub event_type: String,
}

/// A leader's entitlement to one meal window; rendered as a pseudo-event.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MealEligibility {
    pub meal_name: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub reason: String,
}

/// Raw `/api/leader-assignments` row.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Assignment {
    #[serde(rename = "Leader Email")]
    pub leader_email: String,
    #[serde(rename = "Event", default)]
    pub event: String,
    #[serde(rename = "Date", default)]
    pub date: String,
    #[serde(rename = "Start Time", default)]
    pub start_time: String,
    #[serde(rename = "End Time", default)]
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Leader {
    pub name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
}

/// Roster for one event, from `/api/event/{name}/leaders` or derived from
/// assignments when that endpoint fails.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EventLeaders {
    pub total_leaders: u32,
    pub leaders: Vec<Leader>,
    #[serde(default)]
    pub event_name: String,
}

/// Payload for the create-event stub; the backend endpoint does not exist yet.
#[derive(Debug, Clone, Serialize)]
pub struct EventDraft {
    pub event_name: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
}

/* response envelopes */

#[derive(Debug, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct StaffingResponse {
    pub events: Vec<StaffingRecord>,
}

#[derive(Debug, Deserialize)]
pub struct AssignmentsResponse {
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
