//! Binary entry point: wires configuration, database and the Discord bot.

use attendance_buddy::{
    bot,
    config::{database, school},
    core::class_room,
    errors::{Error, Result},
};
use dotenvy::dotenv;
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the school configuration
    let config = school::load_config_or_default(school::config_path())
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!(school = %config.school.default_name, "Configuration loaded.");

    // 4. Connect and create the schema
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database schema ready."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed configured classes
    let seeded = class_room::seed_classes(&db, &config.classes)
        .await
        .inspect_err(|e| error!("Failed to seed classes: {}", e))?;
    info!(seeded, "Class seeding finished.");

    // 6. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, Arc::new(config), db).await
}
