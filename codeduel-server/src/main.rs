use std::env;

use codeduel_core::{PgDatabase, Platform};
use codeduel_server::{logging, run_server};
use log::{error, info};

#[tokio::main]
async fn main() {
    logging::init_logger();

    let url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            error!("DATABASE_URL is not set. Point it at a postgres instance and try again.");
            std::process::exit(1);
        }
    };

    info!("Connecting to database...");

    match PgDatabase::new(&url).await {
        Ok(database) => {
            info!("Initialized successfully.");
            run_server(Platform::new(database)).await;
        }
        Err(error) => {
            error!("codeduel failed to start: {}", error);
            error!("Make sure the postgres instance is running and reachable, then try again.");
            std::process::exit(1);
        }
    }
}
