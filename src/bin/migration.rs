use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use logistics_api::{
    config,
    db::{self, DbConfig},
    migrator::Migrator,
};
use sea_orm_migration::MigratorTrait;
use tracing::info;

/// Applies or rolls back the schema for the logistics database.
#[derive(Debug, Parser)]
#[command(name = "migration", version, about)]
struct Cli {
    /// Overrides the configured `database_url`
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending migrations (default)
    Up {
        /// Apply at most this many migrations
        #[arg(short, long)]
        num: Option<u32>,
    },
    /// Roll back applied migrations
    Down {
        #[arg(short, long, default_value_t = 1)]
        num: u32,
    },
    /// Drop every table and re-apply all migrations
    Fresh,
    /// List migrations and whether they are applied
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let mut db_cfg = DbConfig::from(&cfg);
    if let Some(url) = cli.database_url {
        db_cfg.url = url;
    }
    let db = db::establish_connection_with_config(&db_cfg)
        .await
        .context("failed to connect to database")?;

    match cli.command.unwrap_or(Command::Up { num: None }) {
        Command::Up { num } => {
            info!(?num, "applying migrations");
            Migrator::up(&db, num).await?;
        }
        Command::Down { num } => {
            info!(num, "rolling back migrations");
            Migrator::down(&db, Some(num)).await?;
        }
        Command::Fresh => {
            info!("dropping all tables and re-applying migrations");
            Migrator::fresh(&db).await?;
        }
        Command::Status => {
            Migrator::status(&db).await?;
        }
    }

    info!("migration command completed");
    Ok(())
}
