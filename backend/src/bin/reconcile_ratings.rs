//! Rebuild every book's rating aggregates from its reviews.
//!
//! Repairs drift left behind when a refresh after a review mutation ran out
//! of attempts. Exits non-zero if any book failed to recompute.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;
use std::sync::Arc;

use bookshelf::domain::RatingAggregator;
use bookshelf::outbound::persistence::{
    DbPool, DieselBookRepository, DieselReviewRepository, PoolConfig,
};
use clap::Parser;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const DATABASE_URL_ENV: &str = "BOOKSHELF_DATABASE_URL";

/// `reconcile-ratings` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "reconcile-ratings",
    about = "Recompute averageRating and reviewCount for every book",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `BOOKSHELF_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt().with_env_filter(EnvFilter::from_default_env()).try_init() {
        eprintln!("tracing init failed: {e}");
    }
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url, env::var(DATABASE_URL_ENV).ok())?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let aggregator = RatingAggregator::new(
        Arc::new(DieselBookRepository::new(pool.clone())),
        Arc::new(DieselReviewRepository::new(pool)),
    );
    let report = aggregator
        .reconcile_all()
        .await
        .map_err(|error| io::Error::other(format!("list books: {error}")))?;

    println!("recomputed={}", report.recomputed);
    println!("failed={}", report.failed);
    if report.failed > 0 {
        warn!(failed = report.failed, "some books could not be recomputed");
        return Err(io::Error::other(format!(
            "{} book(s) failed to recompute",
            report.failed
        )));
    }
    info!(recomputed = report.recomputed, "rating aggregates reconciled");
    Ok(())
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> io::Result<String> {
    let (value, source) = match (explicit, from_env) {
        (Some(value), _) => (value, "--database-url"),
        (None, Some(value)) => (value, DATABASE_URL_ENV),
        (None, None) => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("database URL missing: set --database-url or {DATABASE_URL_ENV}"),
            ));
        }
    };
    if value.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{source} must not be empty"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    //! Database URL resolution.

    use rstest::rstest;

    use super::resolve_database_url;

    #[rstest]
    fn explicit_url_wins_over_environment() {
        let url = resolve_database_url(
            Some("postgres://cli/db".to_owned()),
            Some("postgres://env/db".to_owned()),
        )
        .expect("url resolves");
        assert_eq!(url, "postgres://cli/db");
    }

    #[rstest]
    fn environment_is_the_fallback() {
        let url = resolve_database_url(None, Some("postgres://env/db".to_owned()))
            .expect("url resolves");
        assert_eq!(url, "postgres://env/db");
    }

    #[rstest]
    #[case(Some("  ".to_owned()), None, "--database-url")]
    #[case(None, Some(String::new()), "BOOKSHELF_DATABASE_URL")]
    #[case(None, None, "missing")]
    fn blank_or_missing_urls_are_rejected(
        #[case] explicit: Option<String>,
        #[case] from_env: Option<String>,
        #[case] mentions: &str,
    ) {
        let error = resolve_database_url(explicit, from_env).expect_err("should fail");
        assert!(error.to_string().contains(mentions));
    }
}
