use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Creator, Genre, NewCreator, NewGenre, NewShow, Show};
use crate::types::EntityKind;

/// A record type the catalog stores under a surrogate id
pub trait Entity: Clone + Send + Sync + Serialize + 'static {
    const KIND: EntityKind;

    /// Validated input used to create a new record
    type Draft: Send + Sync + 'static;

    fn id(&self) -> Uuid;

    fn url(&self) -> String {
        Self::KIND.detail_url(self.id())
    }
}

/// Entities that go through the delete confirmation workflow.
///
/// `dependents_key` names the show column that refers back to the entity.
/// `None` means nothing can reference it, so the delete is never blocked.
pub trait Deletable: Entity {
    fn dependents_key(id: Uuid) -> Option<ForeignKey>;
}

/// A reference held by a show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForeignKey {
    /// Matches `shows.creator_id`
    Creator(Uuid),
    /// Matches membership in `shows.genre_ids`
    Genre(Uuid),
}

impl ForeignKey {
    pub fn id(&self) -> Uuid {
        match self {
            ForeignKey::Creator(id) | ForeignKey::Genre(id) => *id,
        }
    }

    /// Whether `show` holds this reference
    pub fn matches(&self, show: &Show) -> bool {
        match self {
            ForeignKey::Creator(id) => show.creator_id == *id,
            ForeignKey::Genre(id) => show.genre_ids.contains(id),
        }
    }
}

impl Entity for Creator {
    const KIND: EntityKind = EntityKind::Creator;
    type Draft = NewCreator;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Deletable for Creator {
    fn dependents_key(id: Uuid) -> Option<ForeignKey> {
        Some(ForeignKey::Creator(id))
    }
}

impl Entity for Genre {
    const KIND: EntityKind = EntityKind::Genre;
    type Draft = NewGenre;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Deletable for Genre {
    fn dependents_key(id: Uuid) -> Option<ForeignKey> {
        Some(ForeignKey::Genre(id))
    }
}

impl Entity for Show {
    const KIND: EntityKind = EntityKind::Show;
    type Draft = NewShow;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Deletable for Show {
    fn dependents_key(_id: Uuid) -> Option<ForeignKey> {
        None
    }
}

/// Typed access to one table of the catalog
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, DatabaseError>;

    /// All records in the collection's display order, compared
    /// case-insensitively
    async fn list(&self) -> Result<Vec<E>, DatabaseError>;

    /// Genre names are unique: inserting a taken name returns the stored row
    async fn insert(&self, draft: E::Draft) -> Result<E, DatabaseError>;

    /// Returns whether a row was removed
    async fn remove_by_id(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn count(&self) -> Result<i64, DatabaseError>;
}

#[async_trait]
pub trait GenreRepository: Repository<Genre> {
    /// Exact-match lookup used to avoid duplicate genres
    async fn find_by_name(&self, name: &str) -> Result<Option<Genre>, DatabaseError>;
}

#[async_trait]
pub trait ShowRepository: Repository<Show> {
    /// Every show holding `key`, ordered by title
    async fn find_by_foreign_key(&self, key: ForeignKey) -> Result<Vec<Show>, DatabaseError>;
}

/// Everything the HTTP layer and CLI need from a backend
#[async_trait]
pub trait CatalogStore: Repository<Creator> + GenreRepository + ShowRepository {
    /// Short backend name for logs and the health endpoint
    fn backend(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    /// Release backend resources at shutdown
    async fn close(&self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn show(creator_id: Uuid, genre_ids: Vec<Uuid>) -> Show {
        Show {
            id: Uuid::new_v4(),
            title: "Death Wave".to_string(),
            summary: "A wave of radiation".to_string(),
            creator_id,
            genre_ids,
            poster: None,
            seasons: None,
            imdb_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn foreign_keys_match_the_right_column() {
        let creator = Uuid::new_v4();
        let genre = Uuid::new_v4();
        let s = show(creator, vec![genre]);

        assert!(ForeignKey::Creator(creator).matches(&s));
        assert!(ForeignKey::Genre(genre).matches(&s));
        assert!(!ForeignKey::Creator(genre).matches(&s));
        assert!(!ForeignKey::Genre(creator).matches(&s));
    }

    #[test]
    fn only_creators_and_genres_have_dependents() {
        let id = Uuid::new_v4();
        assert_eq!(Creator::dependents_key(id), Some(ForeignKey::Creator(id)));
        assert_eq!(Genre::dependents_key(id), Some(ForeignKey::Genre(id)));
        assert_eq!(Show::dependents_key(id), None);
    }
}
