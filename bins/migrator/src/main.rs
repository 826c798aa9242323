//! Database migration runner for Bizdir.
//!
//! Reads `DATABASE_URL` from the environment or `.env`. The server takes the
//! same URL from `BIZDIR__DATABASE__URL`; set both to the same value.
//!
//! Usage:
//!   migrator up      - Run all pending migrations
//!   migrator down    - Rollback last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations

use bizdir_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The migrator CLI sets up its own tracing
    cli::run_cli(Migrator).await;
}
