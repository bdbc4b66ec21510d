use std::path::PathBuf;

use clap::{command, Parser};
use serde::{Deserialize, Serialize};

pub mod event_model;

use self::event_model::{Event, MealEligibility};

/// A model for describing ARGS of the tool.
/// Consists of:
/// 1. Optional leader name to look up; falls back to the configured or cached one.
/// 2. Path to config.json, that contains the backend connection parameters.
/// 3. Path to board_cache.json, the last-known-good snapshot used when the backend is down.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(value_name = "LEADER")]
    pub leader_name: Option<String>,
    #[arg(long, value_name = "FILE", default_value = "config.json")]
    pub config_json_path: PathBuf,
    #[arg(long, value_name = "FILE", default_value = "board_cache.json")]
    pub cache_json_path: PathBuf,
}

/// A model for describing configuration of the tool.
/// Consists of:
/// 1. Base URL of the orientation backend (injected, never compiled in)
/// 2. Leader name to load when none is given on the command line
/// 3. Optional minimum event height in grid rows; absent means events render
///    at their actual span, even a degenerate zero or negative one
#[derive(Debug, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    #[serde(default)]
    pub default_leader: Option<String>,
    #[serde(default)]
    pub min_event_rows: Option<i32>,
}

/// A leader's schedule as returned by `/api/lookup/{name}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LeaderData {
    pub leader_name: String,
    pub leader_email: String,
    pub total_events: u32,
    pub total_hours: f64,
    pub events: Vec<Event>,
    #[serde(default)]
    pub meal_eligibility: Vec<MealEligibility>,
}
