use std::env;
use std::path::PathBuf;

use lineup::Lineup;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LINEUP_PATH: &str = "src/data/lineup.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let path = env::args()
        .nth(1)
        .or_else(|| env::var("LINEUP_PATH").ok())
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LINEUP_PATH));

    info!("Reading {:?}...", path);
    let mut lineup = Lineup::load(&path)?;
    let mut changed = 0usize;
    for record in lineup.records_mut() {
        if record.assign_vibes() {
            changed += 1;
        }
    }
    info!("Vibes changed for {} of {} artists", changed, lineup.len());

    lineup.save()?;
    println!("Lineup vibes updated!");
    Ok(())
}
