//! CLI administration tool for shortly.
//!
//! Works directly against the SQLite store, so it needs no running server.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection and schema
//! cargo run --bin admin -- db check
//!
//! # Totals
//! cargo run --bin admin -- stats
//!
//! # Inspect one short link
//! cargo run --bin admin -- show Ab3_x9
//!
//! # Shorten a URL (prompts when the URL is omitted)
//! cargo run --bin admin -- shorten https://example.com/a
//!
//! # Most visited links
//! cargo run --bin admin -- top --limit 20
//! ```
//!
//! # Environment Variables
//!
//! Reads the same variables as the server; see [`shortly::config`].

use shortly::application::services::LinkService;
use shortly::config::{self, Config};
use shortly::domain::entities::UrlMapping;
use shortly::domain::repositories::MappingRepository;
use shortly::infrastructure::persistence::{SqliteMappingRepository, connect};
use shortly::utils::code_generator::RandomCodeGenerator;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use sqlx::SqlitePool;
use std::sync::Arc;

type AdminLinkService = LinkService<SqliteMappingRepository, RandomCodeGenerator>;

/// CLI tool for managing shortly.
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
    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Show totals
    Stats,

    /// Show a single short link
    Show {
        /// Short code
        code: String,
    },

    /// Shorten a URL
    Shorten {
        /// URL to shorten (prompted for when omitted)
        url: Option<String>,
    },

    /// List the most visited links
    Top {
        /// Number of links to show
        #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(i64).range(1..))]
        limit: i64,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let pool = connect(&config.database_url, &config.pool_settings()).await?;
    let pool = Arc::new(pool);

    let result = run_command(cli.command, &config, pool.clone()).await;

    pool.close().await;
    result
}

async fn run_command(command: Commands, config: &Config, pool: Arc<SqlitePool>) -> Result<()> {
    let repository = Arc::new(SqliteMappingRepository::new(pool.clone()));

    match command {
        Commands::Db {
            action: DbAction::Check,
        } => check_database(config, &pool).await,
        Commands::Stats => show_stats(repository).await,
        Commands::Show { code } => show_link(link_service(repository, config), &code).await,
        Commands::Shorten { url } => shorten(link_service(repository, config), url).await,
        Commands::Top { limit } => show_top(repository, limit).await,
    }
}

fn link_service(repository: Arc<SqliteMappingRepository>, config: &Config) -> AdminLinkService {
    LinkService::new(
        repository,
        Arc::new(RandomCodeGenerator::new(config.code_length)),
        config.link_settings(),
    )
}

/// Verifies the store is reachable and the schema is applied.
async fn check_database(config: &Config, pool: &SqlitePool) -> Result<()> {
    println!("{}", "🔍 Checking database connection...".bright_blue());

    let version: String = sqlx::query_scalar("SELECT sqlite_version()")
        .fetch_one(pool)
        .await?;
    let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    println!("{}", "✅ Database connection successful".green().bold());
    println!();
    println!("  Location:   {}", config.database_url.cyan());
    println!("  SQLite:     {}", version.bright_white());
    println!("  Migrations: {}", migrations.to_string().bright_white());
    println!();

    Ok(())
}

async fn show_stats(repository: Arc<SqliteMappingRepository>) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links = repository.count().await?;
    let accesses = repository.total_accesses().await?;

    println!(
        "  Links:    {}",
        links.to_string().bright_white().bold()
    );
    println!(
        "  Accesses: {}",
        accesses.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn show_link(service: AdminLinkService, code: &str) -> Result<()> {
    let mapping = service.resolve(code).await?;

    println!("{}", "🔗 Short link".bright_blue().bold());
    println!();
    println!("  Code:     {}", mapping.short_code.cyan());
    println!(
        "  Short:    {}",
        service.short_url(&mapping.short_code).bright_yellow()
    );
    println!("  Target:   {}", mapping.original_url);
    println!(
        "  Created:  {}",
        mapping
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!(
        "  Accesses: {}",
        mapping.access_count.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn shorten(service: AdminLinkService, url: Option<String>) -> Result<()> {
    let url = match url {
        Some(url) => url,
        None => Input::new()
            .with_prompt("URL to shorten")
            .interact_text()?,
    };

    let allocation = service.allocate(&url).await?;
    let short_url = service.short_url(&allocation.mapping.short_code);

    if allocation.is_new {
        println!("{}", "✅ Short link created".green().bold());
    } else {
        println!("{}", "ℹ️  URL was already shortened".yellow());
    }
    println!();
    println!("  {}", short_url.bright_yellow().bold());
    println!();

    Ok(())
}

/// Prints the most visited links.
///
/// # Output Format
///
/// ```text
/// 🏆 Top links
///
///   Code     Accesses   Target
///   ──────────────────────────────────────────────
///   Ab3_x9   42         https://example.com/a
/// ```
async fn show_top(repository: Arc<SqliteMappingRepository>, limit: i64) -> Result<()> {
    println!("{}", "🏆 Top links".bright_blue().bold());
    println!();

    let mappings = repository.top_accessed(limit).await?;

    if mappings.is_empty() {
        println!("{}", "  No links yet".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<10} {:<10} {}",
        "Code".bright_white().bold(),
        "Accesses".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(60).bright_black());

    for UrlMapping {
        short_code,
        access_count,
        original_url,
        ..
    } in &mappings
    {
        println!(
            "  {:<10} {:<10} {}",
            short_code.cyan(),
            access_count.to_string().bright_white(),
            original_url
        );
    }
    println!();

    Ok(())
}
