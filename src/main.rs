use clap::Parser;
use figment::{
    providers::{Env, Format, Json},
    Figment,
};
use log::{info, warn};
use orientation_board::schedule::{
    api_client::{ApiClient, ScheduleSource},
    cache::{JsonFileCache, KeyValueCache},
    models::{Args, Config},
    time_grid::ORIENTATION_WEEK,
    view_model::{LoadState, ScheduleBoard},
};

#[tokio::main]
async fn main() {
    /* Setup logging */
    env_logger::builder()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .init();

    /* Get all the required resources */
    let args = Args::parse();
    let config: Config = Figment::new()
        .merge(Json::file(&args.config_json_path))
        .merge(Env::prefixed("BOARD_"))
        .extract()
        .unwrap();
    info!(
        "Read config.json from {}",
        std::path::absolute(&args.config_json_path)
            .unwrap()
            .display()
    );

    let client = ApiClient::new(&config.api_base_url);
    match client.health().await {
        Ok(true) => info!("Backend at {} is healthy", config.api_base_url),
        Ok(false) => warn!("Backend at {} reports unhealthy", config.api_base_url),
        Err(err) => warn!("Health probe failed: {}", err),
    }

    let cache = JsonFileCache::new(args.cache_json_path.clone());
    let mut board = ScheduleBoard::new(client, cache, config.min_event_rows);

    /* Load the requested leader, or fall back to config / cached name */
    let leader_name = args.leader_name.clone().or(config.default_leader.clone());
    match leader_name {
        Some(name) => board.load(&name).await,
        None => board.reload().await,
    }

    print_board(&board);
}

fn print_board<S: ScheduleSource, C: KeyValueCache>(board: &ScheduleBoard<S, C>) {
    if let Some(error) = board.error() {
        if board.state() == LoadState::Degraded && !board.events().is_empty() {
            println!("! {} Showing the last saved schedule.", error);
        } else {
            println!("! {}", error);
            return;
        }
    }

    if let Some(leader) = board.leader() {
        println!(
            "{} <{}>: {} events, {} hours",
            leader.leader_name, leader.leader_email, leader.total_events, leader.total_hours
        );
    }

    let placed = board.placed_events();
    for (column, label) in ORIENTATION_WEEK.day_labels().iter().enumerate() {
        let column = column as u32 + 1;
        let day_events: Vec<_> = placed
            .iter()
            .filter(|(_, slot)| slot.column == column)
            .collect();
        if day_events.is_empty() {
            continue;
        }
        println!("{}", label);
        for (event, slot) in day_events {
            let staffing = match &event.staffing {
                Some(info) => format!(
                    " [{} {}/{}]",
                    info.status.label(),
                    info.leaders_assigned,
                    info.leaders_needed
                ),
                None if event.is_meal => " [meal]".to_string(),
                None => String::new(),
            };
            println!(
                "  {:>7}-{:<7} {} @ {}{} (row {}, span {})",
                event.start_time,
                event.end_time,
                event.event_name,
                if event.location.is_empty() {
                    "TBD"
                } else {
                    &event.location
                },
                staffing,
                slot.row,
                slot.span
            );
        }
    }
}
