mod config;
mod enrich;

use config::{config_path_from_env, lineup_path, load_config, DriverKind};
use enrich::{run, PassOptions, RunError};
use lineup::Lineup;
use metadata::{ChromePage, HttpPage};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = config_path_from_env();
    let (config, from_disk) = load_config(&config_path).map_err(RunError::from)?;
    if from_disk {
        info!("Loaded config from {:?}", config_path);
    } else {
        info!("No config at {:?}; using defaults", config_path);
    }

    let path = lineup_path(&config_path, &config);
    info!("Reading {:?}...", path);
    let mut lineup = Lineup::load(&path).map_err(RunError::from)?;

    let options = PassOptions {
        timeouts: config.timeouts(),
        delay: config.delay(),
        only_incomplete: config.only_incomplete,
        expand_description: config.expand_description,
    };

    match config.driver {
        DriverKind::Browser => {
            info!("Launching browser...");
            let mut page = ChromePage::launch(&config.browser_options(&config_path))
                .await
                .map_err(RunError::from)?;
            run(&mut page, &mut lineup, options).await?;
        }
        DriverKind::Http => {
            let mut page = HttpPage::new(config.user_agent()).map_err(RunError::from)?;
            run(&mut page, &mut lineup, options).await?;
        }
    }

    Ok(())
}
