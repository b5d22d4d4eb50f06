use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Creator, Genre, NewCreator, NewGenre, NewShow, Show};
use crate::database::repository::{
    CatalogStore, ForeignKey, GenreRepository, Repository, ShowRepository,
};

const CREATOR_COLUMNS: &str = "id, first_name, last_name, date_of_birth, date_of_death, created_at";
const GENRE_COLUMNS: &str = "id, name, created_at";
const SHOW_COLUMNS: &str =
    "id, title, summary, creator_id, genre_ids, poster, seasons, imdb_id, created_at";

/// Catalog store backed by PostgreSQL
pub struct PgStore {
    db: DatabaseManager,
}

impl PgStore {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        Ok(Self::new(DatabaseManager::connect(config).await?))
    }

    pub fn pool(&self) -> &PgPool {
        self.db.pool()
    }
}

/// Table name, column list and ORDER BY clause for a row type.
///
/// Ordering is case-insensitive with a byte-order tie-break, independent of
/// the database collation, so it agrees with `MemoryStore`.
struct Table {
    name: &'static str,
    columns: &'static str,
    order_by: &'static str,
}

static CREATORS: Table = Table {
    name: "creators",
    columns: CREATOR_COLUMNS,
    order_by: "lower(last_name) COLLATE \"C\", lower(first_name) COLLATE \"C\", \
               last_name COLLATE \"C\", first_name COLLATE \"C\"",
};

static GENRES: Table = Table {
    name: "genres",
    columns: GENRE_COLUMNS,
    order_by: "lower(name) COLLATE \"C\", name COLLATE \"C\"",
};

static SHOWS: Table = Table {
    name: "shows",
    columns: SHOW_COLUMNS,
    order_by: "lower(title) COLLATE \"C\", title COLLATE \"C\"",
};

async fn select_by_id<T>(pool: &PgPool, table: &Table, id: Uuid) -> Result<Option<T>, DatabaseError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let sql = format!("SELECT {} FROM {} WHERE id = $1", table.columns, table.name);
    let row = sqlx::query_as::<_, T>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

async fn select_all<T>(pool: &PgPool, table: &Table) -> Result<Vec<T>, DatabaseError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        table.columns, table.name, table.order_by
    );
    let rows = sqlx::query_as::<_, T>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

async fn delete_by_id(pool: &PgPool, table: &Table, id: Uuid) -> Result<bool, DatabaseError> {
    let sql = format!("DELETE FROM {} WHERE id = $1", table.name);
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

async fn count_rows(pool: &PgPool, table: &Table) -> Result<i64, DatabaseError> {
    let sql = format!("SELECT COUNT(*) FROM {}", table.name);
    let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(pool).await?;
    Ok(count)
}

#[async_trait]
impl Repository<Creator> for PgStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Creator>, DatabaseError> {
        select_by_id(self.pool(), &CREATORS, id).await
    }

    async fn list(&self) -> Result<Vec<Creator>, DatabaseError> {
        select_all(self.pool(), &CREATORS).await
    }

    async fn insert(&self, draft: NewCreator) -> Result<Creator, DatabaseError> {
        let sql = format!(
            "INSERT INTO creators (id, first_name, last_name, date_of_birth, date_of_death, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            CREATOR_COLUMNS
        );
        let creator = sqlx::query_as::<_, Creator>(&sql)
            .bind(Uuid::new_v4())
            .bind(&draft.first_name)
            .bind(&draft.last_name)
            .bind(draft.date_of_birth)
            .bind(draft.date_of_death)
            .bind(Utc::now())
            .fetch_one(self.pool())
            .await?;
        Ok(creator)
    }

    async fn remove_by_id(&self, id: Uuid) -> Result<bool, DatabaseError> {
        delete_by_id(self.pool(), &CREATORS, id).await
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        count_rows(self.pool(), &CREATORS).await
    }
}

#[async_trait]
impl Repository<Genre> for PgStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Genre>, DatabaseError> {
        select_by_id(self.pool(), &GENRES, id).await
    }

    async fn list(&self) -> Result<Vec<Genre>, DatabaseError> {
        select_all(self.pool(), &GENRES).await
    }

    /// Names are unique; inserting a taken name returns the existing row
    async fn insert(&self, draft: NewGenre) -> Result<Genre, DatabaseError> {
        let sql = format!(
            "INSERT INTO genres (id, name, created_at) VALUES ($1, $2, $3) \
             ON CONFLICT (name) DO NOTHING RETURNING {}",
            GENRE_COLUMNS
        );
        let inserted = sqlx::query_as::<_, Genre>(&sql)
            .bind(Uuid::new_v4())
            .bind(&draft.name)
            .bind(Utc::now())
            .fetch_optional(self.pool())
            .await?;
        if let Some(genre) = inserted {
            return Ok(genre);
        }

        debug!(name = %draft.name, "Genre name taken, returning existing row");
        self.find_by_name(&draft.name)
            .await?
            .ok_or(DatabaseError::Sqlx(sqlx::Error::RowNotFound))
    }

    async fn remove_by_id(&self, id: Uuid) -> Result<bool, DatabaseError> {
        delete_by_id(self.pool(), &GENRES, id).await
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        count_rows(self.pool(), &GENRES).await
    }
}

#[async_trait]
impl GenreRepository for PgStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Genre>, DatabaseError> {
        let sql = format!("SELECT {} FROM genres WHERE name = $1 LIMIT 1", GENRE_COLUMNS);
        let genre = sqlx::query_as::<_, Genre>(&sql)
            .bind(name)
            .fetch_optional(self.pool())
            .await?;
        Ok(genre)
    }
}

#[async_trait]
impl Repository<Show> for PgStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Show>, DatabaseError> {
        select_by_id(self.pool(), &SHOWS, id).await
    }

    async fn list(&self) -> Result<Vec<Show>, DatabaseError> {
        select_all(self.pool(), &SHOWS).await
    }

    async fn insert(&self, draft: NewShow) -> Result<Show, DatabaseError> {
        let sql = format!(
            "INSERT INTO shows (id, title, summary, creator_id, genre_ids, poster, seasons, imdb_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            SHOW_COLUMNS
        );
        let show = sqlx::query_as::<_, Show>(&sql)
            .bind(Uuid::new_v4())
            .bind(&draft.title)
            .bind(&draft.summary)
            .bind(draft.creator_id)
            .bind(&draft.genre_ids)
            .bind(&draft.poster)
            .bind(draft.seasons)
            .bind(&draft.imdb_id)
            .bind(Utc::now())
            .fetch_one(self.pool())
            .await?;
        Ok(show)
    }

    async fn remove_by_id(&self, id: Uuid) -> Result<bool, DatabaseError> {
        delete_by_id(self.pool(), &SHOWS, id).await
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        count_rows(self.pool(), &SHOWS).await
    }
}

#[async_trait]
impl ShowRepository for PgStore {
    async fn find_by_foreign_key(&self, key: ForeignKey) -> Result<Vec<Show>, DatabaseError> {
        let predicate = match key {
            ForeignKey::Creator(_) => "creator_id = $1",
            ForeignKey::Genre(_) => "$1 = ANY(genre_ids)",
        };
        let sql = format!(
            "SELECT {} FROM shows WHERE {} ORDER BY {}",
            SHOW_COLUMNS, predicate, SHOWS.order_by
        );
        let shows = sqlx::query_as::<_, Show>(&sql)
            .bind(key.id())
            .fetch_all(self.pool())
            .await?;
        Ok(shows)
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.health_check().await
    }

    async fn close(&self) {
        self.db.close().await;
    }
}
