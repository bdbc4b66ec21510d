//! Week-grid arithmetic: 12-hour time parsing, time-to-row mapping on the
//! fixed 8am-11pm display window, and day-column assignment for the one
//! hard-coded orientation week.

use log::warn;

use super::models::event_model::Event;

/// First visible hour of the grid.
const GRID_START_HOUR: u32 = 8;
/// Last visible hour of the grid.
const GRID_END_HOUR: u32 = 23;
/// Row 1 is the header, so the first 15-minute slot is row 2.
const FIRST_SLOT_ROW: u32 = 2;

/// A wall-clock time in 24-hour form. No timezone, no date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hours: u32,
    pub minutes: u32,
}

impl ClockTime {
    fn total_minutes(&self) -> u32 {
        self.hours * 60 + self.minutes
    }
}

/// Parses free-form 12-hour strings: "9pm", "9:00 PM", "9:00pm".
/// Minutes default to 0. Returns `None` when there is no leading hour
/// number or a component is out of range; callers treat that as "unknown".
pub fn parse_time(raw: &str) -> Option<ClockTime> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    let is_pm = compact.ends_with("pm");
    let digits = compact.trim_end_matches("am").trim_end_matches("pm");

    let mut parts = digits.splitn(2, ':');
    let mut hours: u32 = parts.next()?.parse().ok()?;
    let minutes: u32 = match parts.next() {
        Some(m) => m.parse().ok()?,
        None => 0,
    };

    if is_pm && hours != 12 {
        hours += 12;
    }
    if !is_pm && hours == 12 {
        hours = 0;
    }

    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(ClockTime { hours, minutes })
}

/// Renders the canonical "H:MM AM/PM" form of a parsed time.
pub fn format_time(time: ClockTime) -> String {
    let period = if time.hours >= 12 { "PM" } else { "AM" };
    let display_hours = match time.hours {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hours, time.minutes, period)
}

/// Maps a time string onto the display grid. Times outside 8:00-23:00 are
/// clamped to the window edge rather than rejected, so out-of-window events
/// are misplaced but never hidden by a parse path.
pub fn time_to_row(raw: &str) -> Option<u32> {
    let time = parse_time(raw)?;
    let start = GRID_START_HOUR * 60;
    let end = GRID_END_HOUR * 60;
    let clamped = time.total_minutes().clamp(start, end);
    Some((clamped - start) / 15 + FIRST_SLOT_ROW)
}

/// Row span between two times. Zero and negative spans are surfaced as-is so
/// malformed data degrades visibly; any floor is the caller's policy.
pub fn duration_rows(start_time: &str, end_time: &str) -> Option<i32> {
    let start = time_to_row(start_time)?;
    let end = time_to_row(end_time)?;
    Some(end as i32 - start as i32)
}

/// Same-day duration in hours, used for meal pseudo-events.
/// Defaults to 1.0 when either time does not parse.
pub fn duration_hours(start_time: &str, end_time: &str) -> f64 {
    match (parse_time(start_time), parse_time(end_time)) {
        (Some(start), Some(end)) => {
            (end.total_minutes() as f64 - start.total_minutes() as f64) / 60.0
        }
        _ => {
            warn!(
                "Unparseable meal window {:?}-{:?}, assuming one hour",
                start_time, end_time
            );
            1.0
        }
    }
}

/// A positioned event: day column 1..=7, start row, row span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSlot {
    pub column: u32,
    pub row: u32,
    pub span: i32,
}

/// Computes the grid slot for an event, applying the configured minimum span
/// if any. `None` when either time string is unusable; such events are
/// skipped by the renderer instead of crashing it.
pub fn place_event(event: &Event, week: &WeekWindow, floor: Option<i32>) -> Option<GridSlot> {
    let row = time_to_row(&event.start_time)?;
    let mut span = duration_rows(&event.start_time, &event.end_time)?;
    if let Some(min) = floor {
        span = span.max(min);
    }
    Some(GridSlot {
        column: week.column_of(&event.date),
        row,
        span,
    })
}

/// The single operating week of a deployment. Deliberately a constant, not
/// derived from "today": the dashboard serves exactly one orientation week.
#[derive(Debug, Clone, Copy)]
pub struct WeekWindow {
    pub month_label: &'static str,
    /// Day of month of the week's Monday.
    pub base_day: u32,
}

/// Mon Aug 25 through Sun Aug 31.
pub const ORIENTATION_WEEK: WeekWindow = WeekWindow {
    month_label: "Aug",
    base_day: 25,
};

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

impl WeekWindow {
    /// Day column in [1, 7]; the base day is column 1. Dates within the
    /// month clamp to the week's edges, anything else defaults to column 1.
    pub fn column_of(&self, date: &str) -> u32 {
        if !date.contains(self.month_label) {
            return 1;
        }
        let prefix = format!("{} ", self.month_label);
        let Ok(day) = date.replace(&prefix, "").trim().parse::<i64>() else {
            return 1;
        };
        (day - self.base_day as i64 + 1).clamp(1, 7) as u32
    }

    /// Whether an event's date falls in the operating week's month.
    pub fn contains(&self, date: &str) -> bool {
        date.contains(self.month_label)
    }

    /// Display headers: "Mon Aug 25" .. "Sun Aug 31".
    pub fn day_labels(&self) -> [String; 7] {
        std::array::from_fn(|i| {
            format!("{} {} {}", DAY_NAMES[i], self.month_label, self.base_day + i as u32)
        })
    }
}
