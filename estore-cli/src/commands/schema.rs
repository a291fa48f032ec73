//! Schema bootstrap command

use anyhow::{Context, Result};
use clap::Parser;

use estore_server::db::{create_pool, ensure_schema};

/// Arguments for the init-schema command
#[derive(Parser, Debug)]
pub struct SchemaArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}

/// Create the establishments and stores tables if missing
pub async fn run_schema(args: SchemaArgs) -> Result<()> {
    let pool = create_pool(&args.database_url)
        .await
        .context("Failed to connect to database")?;

    ensure_schema(&pool)
        .await
        .context("Failed to create database schema")?;

    pool.close().await;
    println!("Schema ready");
    Ok(())
}
