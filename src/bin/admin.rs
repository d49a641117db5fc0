//! CLI administration tool for url-mapper.
//!
//! Creates and inspects mappings directly against PostgreSQL, without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a mapping (prompts for the URL when omitted)
//! cargo run --bin admin -- mapping create https://example.com/long/path
//! cargo run --bin admin -- mapping create https://a.com --code my-link -y
//!
//! # Show a mapping with its visit count
//! cargo run --bin admin -- mapping show my-link
//!
//! # Totals
//! cargo run --bin admin -- stats
//!
//! # Database tools
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_*` components): PostgreSQL connection
//! - `BASE_URL` / `PORT`: used to print short URLs

use url_mapper::application::services::MappingService;
use url_mapper::config::{Config, StorageBackend};
use url_mapper::domain::repositories::MappingRepository;
use url_mapper::infrastructure::cache::NullCache;
use url_mapper::infrastructure::persistence::PgMappingRepository;
use url_mapper::server::migrate;
use url_mapper::utils::code_generator::validate_custom_code;
use url_mapper::utils::target_url::validate_target_url;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;

/// CLI tool for managing url-mapper.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Create and inspect mappings
    Mapping {
        #[command(subcommand)]
        action: MappingAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Mapping subcommands.
#[derive(Subcommand)]
enum MappingAction {
    /// Create a new mapping
    Create {
        /// Target URL (prompted if omitted)
        url: Option<String>,

        /// Custom short code (generated if omitted)
        #[arg(short, long)]
        code: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show a mapping and its visit count
    Show {
        /// Short code
        code: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    if config.storage_backend != StorageBackend::Postgres {
        anyhow::bail!("The admin tool only works with the postgres backend");
    }
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Mapping { action } => handle_mapping_action(action, &pool, &config).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches mapping commands through the same service the HTTP API uses.
async fn handle_mapping_action(action: MappingAction, pool: &PgPool, config: &Config) -> Result<()> {
    let repository = Arc::new(PgMappingRepository::new(Arc::new(pool.clone())));
    // Nothing is resolved from the CLI, so the visit queue is never read.
    let (visit_tx, _visit_rx) = mpsc::channel(1);
    let service = MappingService::new(
        repository,
        Arc::new(NullCache::new()),
        visit_tx,
        config.base_url.clone(),
    );

    match action {
        MappingAction::Create { url, code, yes } => {
            create_mapping(&service, url, code, yes).await?;
        }
        MappingAction::Show { code } => {
            show_mapping(&service, &code).await?;
        }
    }

    Ok(())
}

/// Creates a mapping with interactive prompts.
async fn create_mapping(
    service: &MappingService<PgMappingRepository>,
    url: Option<String>,
    code: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔗 Create Mapping".bright_blue().bold());
    println!();

    let target = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Target URL")
            .with_initial_text("https://")
            .interact_text()?,
    };

    validate_target_url(&target).map_err(|e| anyhow::anyhow!("{}", e))?;

    if let Some(ref custom) = code {
        validate_custom_code(custom).map_err(|e| anyhow::anyhow!("{}", e))?;
    }

    println!("  Target: {}", target.cyan());
    println!(
        "  Code:   {}",
        code.as_deref()
            .map(|c| c.bright_yellow())
            .unwrap_or_else(|| "(generated)".bright_black())
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this mapping?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let mapping = service
        .create_short_mapping(target, code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create mapping: {}", e))?;

    println!("{}", "✅ Mapping created".green().bold());
    println!(
        "  Short URL: {}",
        service.short_url(&mapping.code).bright_yellow().bold()
    );
    println!();

    Ok(())
}

/// Prints a mapping and its visit count.
async fn show_mapping(service: &MappingService<PgMappingRepository>, code: &str) -> Result<()> {
    let stats = service
        .get_stats(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {}", code, e))?;

    println!("{}", "📋 Mapping".bright_blue().bold());
    println!();
    println!("  Code:      {}", code.cyan());
    println!("  Target:    {}", stats.target.bright_white());
    println!("  Short URL: {}", service.short_url(code).bright_yellow());
    println!(
        "  Visits:    {}",
        stats.visit_count.to_string().bright_green().bold()
    );
    println!(
        "  Created:   {}",
        stats
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!();

    Ok(())
}

/// Displays totals across all mappings.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let repository = PgMappingRepository::new(Arc::new(pool.clone()));
    let mappings_count = repository
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let visits_count: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(visit_count), 0)::BIGINT FROM mappings")
            .fetch_one(pool)
            .await?;

    println!(
        "  Mappings: {}",
        mappings_count.to_string().bright_green().bold()
    );
    println!(
        "  Visits:   {}",
        visits_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database maintenance commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            PgMappingRepository::new(Arc::new(pool.clone()))
                .ping()
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Migrate => {
            println!("{}", "🛠  Applying migrations...".bright_blue());

            migrate(pool).await?;

            println!("{}", "✅ Database is up to date".green().bold());
        }
    }

    Ok(())
}
