use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;

/// Catalog tables. Show references are plain columns with no foreign-key
/// constraints; integrity is checked by the delete workflow instead.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS creators (
        id            UUID PRIMARY KEY,
        first_name    VARCHAR(100) NOT NULL,
        last_name     VARCHAR(100) NOT NULL,
        date_of_birth DATE,
        date_of_death DATE,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS genres (
        id         UUID PRIMARY KEY,
        name       VARCHAR(100) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS shows (
        id         UUID PRIMARY KEY,
        title      TEXT NOT NULL,
        summary    TEXT NOT NULL,
        creator_id UUID NOT NULL,
        genre_ids  UUID[] NOT NULL DEFAULT '{}',
        poster     TEXT,
        seasons    INTEGER,
        imdb_id    TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS shows_creator_id_idx ON shows (creator_id)",
    "CREATE INDEX IF NOT EXISTS shows_genre_ids_idx ON shows USING GIN (genre_ids)",
    // Replaced by the unique index below
    "DROP INDEX IF EXISTS genres_name_idx",
    "CREATE UNIQUE INDEX IF NOT EXISTS genres_name_key ON genres (name)",
];

/// Advisory lock key held while the schema is applied
const SCHEMA_LOCK_KEY: i64 = 0x5348_4f57_4341_54;

/// Create the catalog tables if they do not exist yet.
///
/// Runs in one transaction under an advisory lock so that processes starting
/// together do not race on `CREATE ... IF NOT EXISTS`.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    info!(statements = SCHEMA.len(), "Catalog schema is up to date");
    Ok(())
}
