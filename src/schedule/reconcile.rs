//! Reconciliation of the two independently fetched event collections, plus
//! the derived meal pseudo-events and the degraded per-event roster.

use log::{debug, warn};
use serde_json::Value;

use super::models::event_model::{
    Assignment, Event, EventLeaders, Leader, MealEligibility, StaffingInfo, StaffingRecord,
};
use super::time_grid::{self, parse_time};

/// Joins raw `/api/events` rows with `/api/event-staffing` records by exact
/// event name, normalizing the dual-cased rows into canonical events on the
/// way. Rows without a recognizable event name are logged and skipped.
pub fn enrich_events(raw_events: &[Value], staffing: &[StaffingRecord]) -> Vec<Event> {
    let mut enriched = Vec::with_capacity(raw_events.len());
    for raw in raw_events {
        let Some(mut event) = Event::from_raw(raw) else {
            warn!("Skipping event record without a name: {}", raw);
            continue;
        };
        event.staffing = staffing
            .iter()
            .find(|record| record.event == event.event_name)
            .map(StaffingInfo::from_record);
        enriched.push(event);
    }
    enriched
}

/// Merges a leader's personal events with the staffing-enriched global list.
/// The first enriched record with a matching name contributes its staffing
/// block and type flags; the personal name, date, times, location and
/// duration always win. No match means no staffing, never a failure.
pub fn merge_with_staffing(personal: Vec<Event>, enriched: &[Event]) -> Vec<Event> {
    personal
        .into_iter()
        .map(|mut event| {
            match enriched.iter().find(|e| e.event_name == event.event_name) {
                Some(hit) => {
                    event.staffing = hit.staffing.clone();
                    event.is_meal = hit.is_meal;
                    if event.is_indoor.is_none() {
                        event.is_indoor = hit.is_indoor;
                    }
                    if event.is_outdoor.is_none() {
                        event.is_outdoor = hit.is_outdoor;
                    }
                }
                None => debug!("No enriched record for {:?}", event.event_name),
            }
            event
        })
        .collect()
}

/// One pseudo-event per meal entitlement, for display next to real shifts.
/// Duration falls back to one hour when a meal window fails to parse.
pub fn derive_meal_events(eligibility: &[MealEligibility]) -> Vec<Event> {
    eligibility
        .iter()
        .map(|meal| Event {
            event_name: meal.meal_name.clone(),
            date: meal.date.clone(),
            start_time: meal.start_time.clone(),
            end_time: meal.end_time.clone(),
            location: meal.location.clone(),
            duration_hours: time_grid::duration_hours(&meal.start_time, &meal.end_time),
            is_meal: true,
            is_indoor: None,
            is_outdoor: None,
            staffing: None,
        })
        .collect()
}

/// Degraded substitute for the per-event roster endpoint: derives a display
/// name from each assignee's email local part and de-duplicates by email.
pub fn leaders_from_assignments(event_name: &str, assignments: &[Assignment]) -> EventLeaders {
    let mut leaders: Vec<Leader> = Vec::new();
    for assignment in assignments {
        if leaders.iter().any(|l| l.email == assignment.leader_email) {
            continue;
        }
        let local_part = assignment
            .leader_email
            .split('@')
            .next()
            .unwrap_or(&assignment.leader_email)
            .to_string();
        leaders.push(Leader {
            name: local_part.clone(),
            first_name: local_part,
            last_name: String::new(),
            email: assignment.leader_email.clone(),
        });
    }
    EventLeaders {
        total_leaders: leaders.len() as u32,
        leaders,
        event_name: event_name.to_string(),
    }
}

/// Display order used by the backend: date first, then parsed start time.
/// Unparseable start times sort to the front of their day.
pub fn sort_events(events: &mut [Event]) {
    events.sort_by(|a, b| {
        let minutes = |e: &Event| {
            parse_time(&e.start_time)
                .map(|t| t.hours * 60 + t.minutes)
                .unwrap_or(0)
        };
        a.date.cmp(&b.date).then(minutes(a).cmp(&minutes(b)))
    });
}
