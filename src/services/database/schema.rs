use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_documents_table(conn)?;
    run_documents_migrations(conn)?;
    create_credentials_table(conn)?;
    log::info!("Database schema initialized");
    Ok(())
}

fn create_documents_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL,
            PRIMARY KEY (collection, id)
        )",
        [],
    )
    .context("Failed to create documents table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection)",
        [],
    )
    .context("Failed to create documents index")?;

    Ok(())
}

fn run_documents_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "documents",
        "updated_at",
        "ALTER TABLE documents ADD COLUMN updated_at TEXT",
    )?;

    Ok(())
}

fn create_credentials_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS credentials (
            uid TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            salt TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to create credentials table")?;

    Ok(())
}
