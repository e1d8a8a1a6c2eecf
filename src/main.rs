// src/main.rs
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use haulbook_backend::config::{Config, ConfigError};
use haulbook_backend::database;
use haulbook_backend::dtos::settings::PayConfigRequest;
use haulbook_backend::handlers::{dashboard, settings, trip};
use haulbook_backend::store::PgStore;
use haulbook_backend::AppError;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    App(#[from] AppError),
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Trip accounting for owner-operators.
#[derive(Parser, Debug)]
#[command(name = "haulbook", version, about)]
struct Cli {
    /// Operator to act for; defaults to OPERATOR_ID.
    #[arg(long, global = true)]
    operator: Option<i64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply database migrations.
    Migrate,
    /// List trips with their derived figures.
    Trips,
    /// Print the dashboard series.
    Report,
    /// Mark a trip delivered.
    Complete {
        trip_number: String,
        /// Delivery date (YYYY-MM-DD); today if omitted.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show or change pay settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    Show,
    Set {
        /// percentage or mileage
        #[arg(long)]
        pay_type: String,
        /// Percentage of linehaul, 0-100.
        #[arg(long)]
        rate: Option<f64>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = Config::from_env()?;
    let operator_id = cli.operator.unwrap_or(config.operator_id);

    let db_pool = database::create_pool(&config.database_url, config.max_connections).await?;
    let store = PgStore::new(db_pool.clone());

    match cli.command {
        Commands::Migrate => {
            database::run_migrations(&db_pool).await?;
            tracing::info!("Migrations applied");
        }
        Commands::Trips => print_json(&trip::list_trips(&store, operator_id).await?)?,
        Commands::Report => print_json(&dashboard::dashboard(&store, operator_id).await?)?,
        Commands::Complete { trip_number, date } => {
            let delivered_on = date.unwrap_or_else(|| Local::now().date_naive());
            print_json(&trip::complete_trip(&store, operator_id, &trip_number, delivered_on).await?)?
        }
        Commands::Settings(SettingsCommand::Show) => {
            print_json(&settings::get_pay_config(&store, operator_id).await?)?
        }
        Commands::Settings(SettingsCommand::Set { pay_type, rate }) => {
            let req = PayConfigRequest {
                driver_pay_type: Some(pay_type),
                percentage_rate: rate.map(serde_json::Value::from),
            };
            print_json(&settings::update_pay_config(&store, operator_id, req).await?)?
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        if let CliError::App(app) = &e {
            eprintln!("{}", app.to_body());
        }
        tracing::error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}
