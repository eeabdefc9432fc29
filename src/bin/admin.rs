//! Operator CLI for travel-listings.
//!
//! ```bash
//! cargo run --bin admin -- token create --name "Partner portal"
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke 3          # by id
//! cargo run --bin admin -- token revoke "Partner portal"
//! cargo run --bin admin -- report                  # listings per status
//! cargo run --bin admin -- db                      # connectivity and migrations
//! ```
//!
//! Uses the server's database variables (`DATABASE_URL` or `DB_*`) and
//! applies pending migrations first. `token create` also reads
//! `TOKEN_SIGNING_SECRET`: the stored hash must match the one the server
//! computes for incoming requests.

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Confirm, Input};
use rand::Rng;
use rand::distr::Alphanumeric;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use travel_listings::application::services::hash_token;
use travel_listings::config::DatabaseConfig;
use travel_listings::domain::entities::ListingStatus;
use travel_listings::domain::repositories::{ApiToken, TokenRepository};
use travel_listings::infrastructure::persistence::PgTokenRepository;
use travel_listings::server::connect_pool;

const TOKEN_LENGTH: usize = 48;

#[derive(Parser)]
#[command(name = "admin", version, about = "Operator tools for travel-listings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Issue, list or revoke API tokens
    #[command(subcommand)]
    Token(TokenCommand),

    /// Listing count and price range per status
    Report,

    /// Check connectivity and show applied migrations
    Db,
}

#[derive(Subcommand)]
enum TokenCommand {
    /// Issue a new token; its value is printed once
    Create {
        /// Label shown by `token list`; prompted for when omitted
        #[arg(short, long)]
        name: Option<String>,

        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show every token with its last use
    List,

    /// Revoke a token so requests using it get 401
    Revoke {
        /// Numeric id or exact name
        #[arg(value_parser = parse_token_ref)]
        target: TokenRef,

        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// How an operator names a token on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenRef {
    Id(i64),
    Name(String),
}

fn parse_token_ref(raw: &str) -> Result<TokenRef, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("token id or name must not be empty".to_string());
    }
    Ok(raw
        .parse()
        .map(TokenRef::Id)
        .unwrap_or_else(|_| TokenRef::Name(raw.to_string())))
}

impl fmt::Display for TokenRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Name(name) => write!(f, "name '{name}'"),
        }
    }
}

/// One row of the inventory report.
#[derive(Debug, FromRow)]
struct StatusSummary {
    status: String,
    listings: i64,
    min_price: Option<Decimal>,
    avg_price: Option<Decimal>,
    max_price: Option<Decimal>,
    newest: Option<DateTime<Utc>>,
}

struct Admin {
    pool: PgPool,
    tokens: PgTokenRepository,
}

impl Admin {
    async fn connect() -> Result<Self> {
        let database = DatabaseConfig::from_env()?;
        let pool = connect_pool(&database).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to apply migrations")?;

        let tokens = PgTokenRepository::new(Arc::new(pool.clone()));
        Ok(Self { pool, tokens })
    }

    async fn create_token(&self, name: Option<String>, yes: bool) -> Result<()> {
        let secret = std::env::var("TOKEN_SIGNING_SECRET")
            .context("TOKEN_SIGNING_SECRET is required to issue tokens")?;

        let name = match name {
            Some(name) => name,
            None => Input::<String>::new()
                .with_prompt("Token name")
                .interact_text()?,
        };
        let name = name.trim().to_string();
        if name.is_empty() {
            bail!("Token name must not be empty");
        }
        if self.tokens.find_by_name(&name).await?.is_some() {
            bail!("A token named '{name}' already exists");
        }

        if !yes && !confirm(&format!("Issue a token named '{name}'?"), true)? {
            println!("{}", "Nothing issued.".yellow());
            return Ok(());
        }

        let raw = generate_token();
        let hash = hash_token(&secret, &raw).map_err(|e| anyhow!("Cannot hash token: {e}"))?;
        let token = self.tokens.create_token(&name, &hash).await?;

        println!(
            "{} token #{} ({})",
            "Issued".green().bold(),
            token.id,
            token.name.cyan()
        );
        println!();
        println!("    {}", raw.bright_yellow().bold());
        println!();
        println!("Send it as `Authorization: Bearer <token>`.");
        println!(
            "{}",
            "Only its HMAC is stored; copy the value now.".red().bold()
        );

        Ok(())
    }

    async fn list_tokens(&self) -> Result<()> {
        let tokens = self.tokens.list_tokens().await?;

        if tokens.is_empty() {
            println!(
                "{}",
                "No API tokens yet. Issue one with `admin token create`.".yellow()
            );
            return Ok(());
        }

        println!(
            "{:>5}  {:<28} {:<17} {:<17} {}",
            "id", "name", "created", "last used", "state"
        );
        for token in &tokens {
            println!("{}", token_line(token));
        }

        let active = tokens.iter().filter(|t| !t.is_revoked()).count();
        println!();
        println!("{active} active, {} revoked", tokens.len() - active);

        Ok(())
    }

    async fn revoke_token(&self, target: TokenRef, yes: bool) -> Result<()> {
        let found = match &target {
            TokenRef::Id(id) => self.tokens.find_by_id(*id).await?,
            TokenRef::Name(name) => self.tokens.find_by_name(name).await?,
        };
        let token = found.with_context(|| format!("No token with {target}"))?;

        if token.is_revoked() {
            println!(
                "Token #{} ({}) is already revoked.",
                token.id,
                token.name.cyan()
            );
            return Ok(());
        }

        let prompt = format!("Revoke token #{} ({})?", token.id, token.name);
        if !yes && !confirm(&prompt, false)? {
            println!("{}", "Token left active.".yellow());
            return Ok(());
        }

        self.tokens.revoke_token(token.id).await?;
        println!(
            "{} token #{} ({})",
            "Revoked".red().bold(),
            token.id,
            token.name.cyan()
        );

        Ok(())
    }

    async fn report(&self) -> Result<()> {
        let rows: Vec<StatusSummary> = sqlx::query_as(
            r#"
            SELECT status,
                   COUNT(*)             AS listings,
                   MIN(price)           AS min_price,
                   ROUND(AVG(price), 2) AS avg_price,
                   MAX(price)           AS max_price,
                   MAX(created_at)      AS newest
            FROM listings
            GROUP BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to summarize listings")?;

        println!(
            "{:<10} {:>8} {:>12} {:>12} {:>12}  {}",
            "status", "count", "min", "avg", "max", "newest"
        );

        let mut total = 0;
        for status in ListingStatus::ALL {
            let line = match rows.iter().find(|row| row.status == status.as_str()) {
                Some(row) => {
                    total += row.listings;
                    format!(
                        "{:<10} {:>8} {:>12} {:>12} {:>12}  {}",
                        row.status,
                        row.listings,
                        money(row.min_price),
                        money(row.avg_price),
                        money(row.max_price),
                        row.newest.map(stamp).unwrap_or_default()
                    )
                }
                None => format!("{:<10} {:>8}", status.as_str(), 0),
            };
            println!("{line}");
        }
        println!("{:<10} {:>8}", "total".bold(), total.to_string().bold());

        let active_tokens: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        println!();
        println!("Active API tokens: {active_tokens}");

        Ok(())
    }

    async fn db_status(&self) -> Result<()> {
        let version: String = sqlx::query_scalar("SHOW server_version")
            .fetch_one(&self.pool)
            .await
            .context("Database did not answer")?;

        let applied: Vec<(i64, String)> = sqlx::query_as(
            "SELECT version, description FROM _sqlx_migrations WHERE success ORDER BY version",
        )
        .fetch_all(&self.pool)
        .await?;

        println!("{} PostgreSQL {version}", "Connected:".green().bold());
        println!("Applied migrations:");
        for (version, description) in applied {
            println!("  {version}  {description}");
        }

        Ok(())
    }
}

fn token_line(token: &ApiToken) -> String {
    let state = match token.revoked_at {
        Some(at) => format!("revoked {}", stamp(at)).red(),
        None => "active".green(),
    };

    format!(
        "{:>5}  {:<28} {:<17} {:<17} {}",
        token.id,
        token.name,
        stamp(token.created_at),
        token
            .last_used_at
            .map(stamp)
            .unwrap_or_else(|| "never".to_string()),
        state
    )
}

fn stamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn money(value: Option<Decimal>) -> String {
    value.map(|d| d.round_dp(2).to_string()).unwrap_or_default()
}

fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let admin = Admin::connect().await?;

    match cli.command {
        Command::Token(TokenCommand::Create { name, yes }) => admin.create_token(name, yes).await,
        Command::Token(TokenCommand::List) => admin.list_tokens().await,
        Command::Token(TokenCommand::Revoke { target, yes }) => {
            admin.revoke_token(target, yes).await
        }
        Command::Report => admin.report().await,
        Command::Db => admin.db_status().await,
    }
}
