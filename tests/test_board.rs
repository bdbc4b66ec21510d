use std::{
    cell::RefCell, collections::BTreeMap, fs::File, io::BufReader, path::Path, rc::Rc,
};

use orientation_board::schedule::api_client::{ApiError, ScheduleSource};
use orientation_board::schedule::cache::{
    KeyValueCache, LEADER_DATA_KEY, SCHEDULE_DATA_KEY, USER_NAME_KEY,
};
use orientation_board::schedule::models::event_model::{
    Event, EventDraft, EventsResponse, StaffingResponse, StaffingStatus,
};
use orientation_board::schedule::models::LeaderData;
use orientation_board::schedule::reconcile::enrich_events;
use orientation_board::schedule::view_model::{LoadState, ScheduleBoard};

/// Serves fixture JSON instead of the backend; fails every request when
/// `down` is set, like an unreachable deployment.
struct FixtureSource {
    down: bool,
}

fn read_json<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> T {
    let file = BufReader::new(File::open(path).unwrap());
    serde_json::from_reader(file).unwrap()
}

fn fixture_enriched_events() -> Vec<Event> {
    let events: EventsResponse = read_json("tests/test.events.json");
    let staffing: StaffingResponse = read_json("tests/test.staffing.json");
    enrich_events(&events.events, &staffing.events)
}

impl ScheduleSource for FixtureSource {
    async fn lookup_leader(&self, name: &str) -> Result<LeaderData, ApiError> {
        if self.down {
            return Err(ApiError::NotFound(name.to_string()));
        }
        Ok(read_json("tests/test.lookup.json"))
    }

    async fn events_with_staffing(&self) -> Result<Vec<Event>, ApiError> {
        if self.down {
            return Err(ApiError::NotFound("events".to_string()));
        }
        Ok(fixture_enriched_events())
    }
}

/// Shared in-memory stand-in for the persisted store, so two boards can
/// see the same snapshot the way two page loads share localStorage.
#[derive(Clone, Default)]
struct MemoryCache(Rc<RefCell<BTreeMap<String, String>>>);

impl KeyValueCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.0
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

#[tokio::test]
async fn load_merges_lookup_with_enriched_events() {
    let cache = MemoryCache::default();
    let mut board = ScheduleBoard::new(FixtureSource { down: false }, cache.clone(), None);

    board.load("Adrian Cheng").await;

    assert_eq!(board.state(), LoadState::Ready);
    assert_eq!(board.error(), None);
    assert_eq!(board.user_name(), Some("Adrian Cheng"));
    assert_eq!(board.leader().unwrap().leader_name, "Adrian Cheng");

    /* two personal events plus the synthesized meal */
    assert_eq!(board.events().len(), 3);

    let tour = board
        .events()
        .iter()
        .find(|e| e.event_name == "Campus Tour")
        .unwrap();
    /* personal fields win; the staffing block rides along unchanged */
    assert_eq!(tour.start_time, "9:00am");
    assert_eq!(tour.location, "Main Quad");
    let staffing = tour.staffing.as_ref().unwrap();
    assert_eq!(staffing.leaders_assigned, 5);
    assert_eq!(staffing.status, StaffingStatus::FullyStaffed);

    let lunch = board
        .events()
        .iter()
        .find(|e| e.event_name == "Leader Lunch")
        .unwrap();
    assert!(lunch.is_meal);
    assert_eq!(lunch.duration_hours, 1.0);

    /* the whole snapshot was cached */
    assert_eq!(cache.get(USER_NAME_KEY).as_deref(), Some("Adrian Cheng"));
    assert!(cache.get(LEADER_DATA_KEY).is_some());
    assert!(cache.get(SCHEDULE_DATA_KEY).is_some());
}

#[tokio::test]
async fn events_are_sorted_by_date_then_time() {
    let mut board = ScheduleBoard::new(
        FixtureSource { down: false },
        MemoryCache::default(),
        None,
    );
    board.load("Adrian Cheng").await;

    let names: Vec<&str> = board
        .events()
        .iter()
        .map(|e| e.event_name.as_str())
        .collect();
    assert_eq!(names, ["Welcome Ceremony", "Campus Tour", "Leader Lunch"]);
}

#[tokio::test]
async fn placed_events_land_on_the_grid() {
    let mut board = ScheduleBoard::new(
        FixtureSource { down: false },
        MemoryCache::default(),
        None,
    );
    board.load("Adrian Cheng").await;

    let placed = board.placed_events();
    assert_eq!(placed.len(), 3);

    let (_, ceremony) = placed
        .iter()
        .find(|(e, _)| e.event_name == "Welcome Ceremony")
        .unwrap();
    /* Aug 25 is Monday; 4pm starts 8 hours into the window */
    assert_eq!(ceremony.column, 1);
    assert_eq!(ceremony.row, 34);
    assert_eq!(ceremony.span, 8);
}

#[tokio::test]
async fn fetch_failure_falls_back_to_cached_snapshot() {
    let cache = MemoryCache::default();

    /* a prior successful load populates the cache */
    let mut board = ScheduleBoard::new(FixtureSource { down: false }, cache.clone(), None);
    board.load("Adrian Cheng").await;
    assert_eq!(board.state(), LoadState::Ready);
    let cached_count = board.events().len();

    /* backend goes away; a fresh board still shows the snapshot */
    let mut degraded = ScheduleBoard::new(FixtureSource { down: true }, cache.clone(), None);
    degraded.load("Adrian Cheng").await;

    assert_eq!(degraded.state(), LoadState::Degraded);
    assert!(degraded.error().is_some());
    assert_eq!(degraded.events().len(), cached_count);
    assert_eq!(degraded.leader().unwrap().leader_name, "Adrian Cheng");
}

#[tokio::test]
async fn degraded_is_not_terminal() {
    let cache = MemoryCache::default();
    let mut board = ScheduleBoard::new(FixtureSource { down: true }, cache.clone(), None);
    board.load("Adrian Cheng").await;
    assert_eq!(board.state(), LoadState::Degraded);

    /* nothing cached yet, so nothing to show */
    assert!(board.events().is_empty());

    let mut recovered = ScheduleBoard::new(FixtureSource { down: false }, cache, None);
    recovered.load("Adrian Cheng").await;
    assert_eq!(recovered.state(), LoadState::Ready);
    assert!(!recovered.events().is_empty());
}

#[tokio::test]
async fn reload_uses_the_cached_username() {
    let cache = MemoryCache::default();
    cache.set(USER_NAME_KEY, "Adrian Cheng");

    let mut board = ScheduleBoard::new(FixtureSource { down: false }, cache, None);
    board.reload().await;

    assert_eq!(board.state(), LoadState::Ready);
    assert_eq!(board.user_name(), Some("Adrian Cheng"));
}

#[tokio::test]
async fn reload_without_any_username_degrades() {
    let mut board = ScheduleBoard::new(
        FixtureSource { down: false },
        MemoryCache::default(),
        None,
    );
    board.reload().await;

    assert_eq!(board.state(), LoadState::Degraded);
    assert!(board.error().unwrap().contains("No leader selected"));
}

#[tokio::test]
async fn create_event_reports_unimplemented_not_network() {
    let board = ScheduleBoard::new(
        FixtureSource { down: false },
        MemoryCache::default(),
        None,
    );
    let draft = EventDraft {
        event_name: "Extra Tour".to_string(),
        date: "Aug 28".to_string(),
        start_time: "2:00pm".to_string(),
        end_time: "3:00pm".to_string(),
        location: "Main Quad".to_string(),
    };

    let err = board.create_event(&draft).await.unwrap_err();
    assert!(matches!(err, ApiError::Unimplemented(_)));
    assert!(err.to_string().contains("not available yet"));
}
