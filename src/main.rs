use chrono::Local;
use clap::Parser;
use dotenvy::dotenv;
use school_ledger::{
    cli::{self, AppContext, Cli},
    config::{database, school},
    core::{class::seed_classes, fees::seed_fee_schedule},
    errors::Result,
};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file; DATABASE_URL may come from there
    dotenv().ok();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => {
            println!("{}", output.trim_end());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Command failed: {:?}", e);
            eprintln!("❌ {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    // 3. Load the school configuration
    let config = school::load_config(&cli.config)
        .inspect_err(|e| error!("Failed to load {}: {}", cli.config.display(), e))?;

    // 4. Connect and make sure the schema exists
    let db = database::create_connection().await?;
    database::create_tables(&db).await?;

    // 5. Seed classes and fee schedule entries that are missing
    let classes = seed_classes(&db, &config.classes).await?;
    let fees = seed_fee_schedule(&db, &config.fee_schedule).await?;
    if classes + fees > 0 {
        info!("Seeded {} classes and {} fee entries", classes, fees);
    }

    let ctx = AppContext::new(db, config, Local::now().date_naive());
    cli::execute(&ctx, &cli.acting_user, cli.command).await
}
