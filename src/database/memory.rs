use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Creator, Genre, NewCreator, NewGenre, NewShow, Show};
use crate::database::repository::{
    CatalogStore, Entity, ForeignKey, GenreRepository, Repository, ShowRepository,
};

#[derive(Default)]
struct Tables {
    creators: Vec<Creator>,
    genres: Vec<Genre>,
    shows: Vec<Show>,
}

/// In-process catalog store.
///
/// Used for development serving and by the test suite. `set_unavailable`
/// makes every call fail the way a lost database connection would.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
    removal_attempts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a backend outage (or recovery)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, AtomicOrdering::SeqCst);
    }

    /// Number of `remove_by_id` calls made against any table
    pub fn removal_attempts(&self) -> usize {
        self.removal_attempts.load(AtomicOrdering::SeqCst)
    }

    fn check_available(&self) -> Result<(), DatabaseError> {
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            return Err(DatabaseError::ConnectionError(
                "memory store is unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

/// Maps a row type onto its table and display order
trait Stored: Entity + Sized {
    fn table(tables: &Tables) -> &Vec<Self>;
    fn table_mut(tables: &mut Tables) -> &mut Vec<Self>;
    fn build(id: Uuid, draft: Self::Draft) -> Self;
    fn display_order(a: &Self, b: &Self) -> Ordering;

    /// A row that `draft` would collide with on a unique column
    fn existing<'a>(_rows: &'a [Self], _draft: &Self::Draft) -> Option<&'a Self> {
        None
    }
}

/// Case-insensitive comparison. Callers break ties by byte order, which
/// matches the ORDER BY clauses in `PgStore`.
fn folded(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

impl Stored for Creator {
    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.creators
    }

    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.creators
    }

    fn build(id: Uuid, draft: NewCreator) -> Self {
        Creator {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            date_of_birth: draft.date_of_birth,
            date_of_death: draft.date_of_death,
            created_at: Utc::now(),
        }
    }

    fn display_order(a: &Self, b: &Self) -> Ordering {
        folded(&a.last_name, &b.last_name)
            .then_with(|| folded(&a.first_name, &b.first_name))
            .then_with(|| a.last_name.cmp(&b.last_name))
            .then_with(|| a.first_name.cmp(&b.first_name))
    }
}

impl Stored for Genre {
    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.genres
    }

    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.genres
    }

    fn build(id: Uuid, draft: NewGenre) -> Self {
        Genre {
            id,
            name: draft.name,
            created_at: Utc::now(),
        }
    }

    fn display_order(a: &Self, b: &Self) -> Ordering {
        folded(&a.name, &b.name).then_with(|| a.name.cmp(&b.name))
    }

    fn existing<'a>(rows: &'a [Self], draft: &NewGenre) -> Option<&'a Self> {
        rows.iter().find(|g| g.name == draft.name)
    }
}

impl Stored for Show {
    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.shows
    }

    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.shows
    }

    fn build(id: Uuid, draft: NewShow) -> Self {
        Show {
            id,
            title: draft.title,
            summary: draft.summary,
            creator_id: draft.creator_id,
            genre_ids: draft.genre_ids,
            poster: draft.poster,
            seasons: draft.seasons,
            imdb_id: draft.imdb_id,
            created_at: Utc::now(),
        }
    }

    fn display_order(a: &Self, b: &Self) -> Ordering {
        folded(&a.title, &b.title).then_with(|| a.title.cmp(&b.title))
    }
}

#[async_trait]
impl<E: Stored> Repository<E> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, DatabaseError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(E::table(&tables).iter().find(|row| row.id() == id).cloned())
    }

    async fn list(&self) -> Result<Vec<E>, DatabaseError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let mut rows = E::table(&tables).clone();
        rows.sort_by(E::display_order);
        Ok(rows)
    }

    async fn insert(&self, draft: E::Draft) -> Result<E, DatabaseError> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        let rows = E::table_mut(&mut tables);
        if let Some(existing) = E::existing(rows, &draft) {
            return Ok(existing.clone());
        }
        let row = E::build(Uuid::new_v4(), draft);
        rows.push(row.clone());
        Ok(row)
    }

    async fn remove_by_id(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.removal_attempts.fetch_add(1, AtomicOrdering::SeqCst);
        self.check_available()?;
        let mut tables = self.tables.write().await;
        let rows = E::table_mut(&mut tables);
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        Ok(rows.len() < before)
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(E::table(&tables).len() as i64)
    }
}

#[async_trait]
impl GenreRepository for MemoryStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Genre>, DatabaseError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.genres.iter().find(|g| g.name == name).cloned())
    }
}

#[async_trait]
impl ShowRepository for MemoryStore {
    async fn find_by_foreign_key(&self, key: ForeignKey) -> Result<Vec<Show>, DatabaseError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let mut shows: Vec<Show> = tables
            .shows
            .iter()
            .filter(|show| key.matches(show))
            .cloned()
            .collect();
        shows.sort_by(Show::display_order);
        Ok(shows)
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.check_available()
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_genre(name: &str) -> NewGenre {
        NewGenre {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn lists_in_display_order() {
        let store = MemoryStore::new();
        for name in ["Science Fiction", "Crime", "Fantasy"] {
            Repository::<Genre>::insert(&store, new_genre(name)).await.unwrap();
        }

        let genres = Repository::<Genre>::list(&store).await.unwrap();
        let names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Crime", "Fantasy", "Science Fiction"]);
    }

    #[tokio::test]
    async fn display_order_ignores_case() {
        let store = MemoryStore::new();
        for name in ["cyberpunk", "Western", "anthology", "Biopic"] {
            Repository::<Genre>::insert(&store, new_genre(name)).await.unwrap();
        }

        let genres = Repository::<Genre>::list(&store).await.unwrap();
        let names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["anthology", "Biopic", "cyberpunk", "Western"]);
    }

    #[tokio::test]
    async fn genre_insert_returns_existing_name() {
        let store = MemoryStore::new();
        let first = Repository::<Genre>::insert(&store, new_genre("Crime")).await.unwrap();
        let second = Repository::<Genre>::insert(&store, new_genre("Crime")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(Repository::<Genre>::count(&store).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn remove_reports_whether_a_row_existed() {
        let store = MemoryStore::new();
        let genre = Repository::<Genre>::insert(&store, new_genre("Crime")).await.unwrap();

        assert!(Repository::<Genre>::remove_by_id(&store, genre.id).await.unwrap());
        assert!(!Repository::<Genre>::remove_by_id(&store, genre.id).await.unwrap());
        assert_eq!(store.removal_attempts(), 2);
        assert!(Repository::<Genre>::find_by_id(&store, genre.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        let result = Repository::<Creator>::list(&store).await;
        assert!(matches!(result, Err(DatabaseError::ConnectionError(_))));
        assert!(store.health_check().await.is_err());

        store.set_unavailable(false);
        assert!(store.health_check().await.is_ok());
    }
}
