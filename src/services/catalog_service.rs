use std::collections::BTreeMap;

use chrono::NaiveDate;
use futures::future::try_join_all;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Creator, Genre, NewCreator, NewGenre, NewShow, Show};
use crate::database::repository::{ForeignKey, GenreRepository, Repository, ShowRepository};
use crate::types::{parse_id, EntityKind};

/// Longest value accepted for names
pub const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid {kind} identifier: {value}")]
    InvalidIdentifier { kind: EntityKind, value: String },

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: Uuid },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

/// Per-field messages for a rejected create payload
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid {kind} submission")]
pub struct ValidationError {
    pub kind: EntityKind,
    pub field_errors: BTreeMap<String, String>,
}

impl ValidationError {
    fn for_kind(kind: EntityKind) -> Self {
        Self {
            kind,
            field_errors: BTreeMap::new(),
        }
    }

    /// Keeps the first message reported for a field
    fn add(&mut self, field: &str, message: impl Into<String>) {
        self.field_errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationError> {
        if self.field_errors.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

// ----------------------------------------------------------------------------
// Create payloads
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenreForm {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatorForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// ISO date, e.g. 1973-06-06
    pub date_of_birth: Option<String>,
    pub date_of_death: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowForm {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub creator: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
    pub poster: Option<String>,
    pub seasons: Option<i32>,
    pub imdb_id: Option<String>,
}

/// Trimmed value, or `None` when missing or blank
fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn required_name(errors: &mut ValidationError, field: &str, label: &str, value: &Option<String>) -> String {
    match trimmed(value) {
        Some(v) if v.chars().count() > MAX_NAME_LEN => {
            errors.add(field, format!("{} must be at most {} characters", label, MAX_NAME_LEN));
            v
        }
        Some(v) => v,
        None => {
            errors.add(field, format!("{} required", label));
            String::new()
        }
    }
}

fn optional_date(errors: &mut ValidationError, field: &str, value: &Option<String>) -> Option<NaiveDate> {
    let raw = trimmed(value)?;
    match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, "Invalid date, expected YYYY-MM-DD");
            None
        }
    }
}

pub fn validate_genre(form: &GenreForm) -> Result<NewGenre, ValidationError> {
    let mut errors = ValidationError::for_kind(EntityKind::Genre);
    let name = required_name(&mut errors, "name", "Genre name", &form.name);
    errors.into_result(|| NewGenre { name })
}

pub fn validate_creator(form: &CreatorForm) -> Result<NewCreator, ValidationError> {
    let mut errors = ValidationError::for_kind(EntityKind::Creator);
    let first_name = required_name(&mut errors, "first_name", "First name", &form.first_name);
    let last_name = required_name(&mut errors, "last_name", "Last name", &form.last_name);
    let date_of_birth = optional_date(&mut errors, "date_of_birth", &form.date_of_birth);
    let date_of_death = optional_date(&mut errors, "date_of_death", &form.date_of_death);

    if let (Some(born), Some(died)) = (date_of_birth, date_of_death) {
        if died < born {
            errors.add("date_of_death", "Date of death must not precede date of birth");
        }
    }

    errors.into_result(|| NewCreator {
        first_name,
        last_name,
        date_of_birth,
        date_of_death,
    })
}

/// Field-level checks only; references are resolved by [`create_show`]
pub fn validate_show(form: &ShowForm) -> Result<NewShow, ValidationError> {
    let mut errors = ValidationError::for_kind(EntityKind::Show);

    let title = trimmed(&form.title).unwrap_or_else(|| {
        errors.add("title", "Title required");
        String::new()
    });
    let summary = trimmed(&form.summary).unwrap_or_else(|| {
        errors.add("summary", "Summary required");
        String::new()
    });

    let creator_id = match trimmed(&form.creator).map(|raw| parse_id(&raw)) {
        Some(Ok(id)) => id,
        Some(Err(_)) => {
            errors.add("creator", "Invalid creator identifier");
            Uuid::nil()
        }
        None => {
            errors.add("creator", "Creator required");
            Uuid::nil()
        }
    };

    let mut genre_ids = Vec::with_capacity(form.genre.len());
    let mut invalid_genres = Vec::new();
    for raw in &form.genre {
        match parse_id(raw) {
            Ok(id) if !genre_ids.contains(&id) => genre_ids.push(id),
            Ok(_) => {}
            Err(_) => invalid_genres.push(raw.as_str()),
        }
    }
    if !invalid_genres.is_empty() {
        errors.add("genre", format!("Invalid genre identifier: {}", invalid_genres.join(", ")));
    }

    if matches!(form.seasons, Some(n) if n < 0) {
        errors.add("seasons", "Seasons must not be negative");
    }

    errors.into_result(|| NewShow {
        title,
        summary,
        creator_id,
        genre_ids,
        poster: trimmed(&form.poster),
        seasons: form.seasons,
        imdb_id: trimmed(&form.imdb_id),
    })
}

// ----------------------------------------------------------------------------
// Create operations
// ----------------------------------------------------------------------------

/// Result of a create request
#[derive(Debug, Clone, PartialEq)]
pub enum Created<E> {
    New(E),
    /// An equivalent record already existed and was returned instead
    Existing(E),
}

impl<E> Created<E> {
    pub fn into_inner(self) -> E {
        match self {
            Created::New(e) | Created::Existing(e) => e,
        }
    }
}

/// Create a genre unless one with the same name already exists
pub async fn create_genre<S>(store: &S, form: &GenreForm) -> Result<Created<Genre>, CatalogError>
where
    S: GenreRepository + ?Sized,
{
    let draft = validate_genre(form)?;
    if let Some(existing) = store.find_by_name(&draft.name).await? {
        return Ok(Created::Existing(existing));
    }
    let genre = store.insert(draft).await?;
    tracing::info!(id = %genre.id, name = %genre.name, "Created genre");
    Ok(Created::New(genre))
}

pub async fn create_creator<S>(store: &S, form: &CreatorForm) -> Result<Creator, CatalogError>
where
    S: Repository<Creator> + ?Sized,
{
    let draft = validate_creator(form)?;
    let creator = store.insert(draft).await?;
    tracing::info!(id = %creator.id, name = %creator.name(), "Created creator");
    Ok(creator)
}

/// Create a show after confirming its creator and genres exist
pub async fn create_show<S>(store: &S, form: &ShowForm) -> Result<Show, CatalogError>
where
    S: Repository<Creator> + Repository<Genre> + Repository<Show> + ?Sized,
{
    let draft = validate_show(form)?;

    let creator = <S as Repository<Creator>>::find_by_id(store, draft.creator_id);
    let genres = try_join_all(
        draft
            .genre_ids
            .iter()
            .map(|id| <S as Repository<Genre>>::find_by_id(store, *id)),
    );
    let (creator, genres) = futures::try_join!(creator, genres)?;

    let mut errors = ValidationError::for_kind(EntityKind::Show);
    if creator.is_none() {
        errors.add("creator", "Creator does not exist");
    }
    let missing: Vec<String> = draft
        .genre_ids
        .iter()
        .zip(&genres)
        .filter(|(_, genre)| genre.is_none())
        .map(|(id, _)| id.to_string())
        .collect();
    match missing.as_slice() {
        [] => {}
        [id] => errors.add("genre", format!("Genre {} does not exist", id)),
        ids => errors.add("genre", format!("Genres {} do not exist", ids.join(", "))),
    }
    if !errors.field_errors.is_empty() {
        return Err(errors.into());
    }

    let show = <S as Repository<Show>>::insert(store, draft).await?;
    tracing::info!(id = %show.id, title = %show.title, "Created show");
    Ok(show)
}

// ----------------------------------------------------------------------------
// Detail and index
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CreatorDetail {
    pub creator: Creator,
    pub shows: Vec<Show>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenreDetail {
    pub genre: Genre,
    pub shows: Vec<Show>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShowDetail {
    pub show: Show,
    /// `None` if the referenced creator no longer exists
    pub creator: Option<Creator>,
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CatalogCounts {
    pub shows: i64,
    pub creators: i64,
    pub genres: i64,
}

fn parse_for(kind: EntityKind, raw_id: &str) -> Result<Uuid, CatalogError> {
    parse_id(raw_id).map_err(|_| CatalogError::InvalidIdentifier {
        kind,
        value: raw_id.to_string(),
    })
}

pub async fn creator_detail<S>(store: &S, raw_id: &str) -> Result<CreatorDetail, CatalogError>
where
    S: Repository<Creator> + ShowRepository + ?Sized,
{
    let id = parse_for(EntityKind::Creator, raw_id)?;
    let (creator, shows) = futures::try_join!(
        <S as Repository<Creator>>::find_by_id(store, id),
        store.find_by_foreign_key(ForeignKey::Creator(id)),
    )?;
    let creator = creator.ok_or(CatalogError::NotFound { kind: EntityKind::Creator, id })?;
    Ok(CreatorDetail { creator, shows })
}

pub async fn genre_detail<S>(store: &S, raw_id: &str) -> Result<GenreDetail, CatalogError>
where
    S: Repository<Genre> + ShowRepository + ?Sized,
{
    let id = parse_for(EntityKind::Genre, raw_id)?;
    let (genre, shows) = futures::try_join!(
        <S as Repository<Genre>>::find_by_id(store, id),
        store.find_by_foreign_key(ForeignKey::Genre(id)),
    )?;
    let genre = genre.ok_or(CatalogError::NotFound { kind: EntityKind::Genre, id })?;
    Ok(GenreDetail { genre, shows })
}

pub async fn show_detail<S>(store: &S, raw_id: &str) -> Result<ShowDetail, CatalogError>
where
    S: Repository<Creator> + Repository<Genre> + Repository<Show> + ?Sized,
{
    let id = parse_for(EntityKind::Show, raw_id)?;
    let show = <S as Repository<Show>>::find_by_id(store, id)
        .await?
        .ok_or(CatalogError::NotFound { kind: EntityKind::Show, id })?;

    let genres = try_join_all(
        show.genre_ids
            .iter()
            .map(|genre_id| <S as Repository<Genre>>::find_by_id(store, *genre_id)),
    );
    let (creator, genres) = futures::try_join!(
        <S as Repository<Creator>>::find_by_id(store, show.creator_id),
        genres,
    )?;

    Ok(ShowDetail {
        show,
        creator,
        genres: genres.into_iter().flatten().collect(),
    })
}

/// Record counts for the catalog home page
pub async fn counts<S>(store: &S) -> Result<CatalogCounts, CatalogError>
where
    S: Repository<Creator> + Repository<Genre> + Repository<Show> + ?Sized,
{
    let (shows, creators, genres) = futures::try_join!(
        <S as Repository<Show>>::count(store),
        <S as Repository<Creator>>::count(store),
        <S as Repository<Genre>>::count(store),
    )?;
    Ok(CatalogCounts { shows, creators, genres })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    fn genre_form(name: &str) -> GenreForm {
        GenreForm { name: Some(name.to_string()) }
    }

    #[test]
    fn genre_name_is_trimmed_and_required() {
        assert_eq!(validate_genre(&genre_form("  Crime ")).unwrap().name, "Crime");

        let err = validate_genre(&genre_form("   ")).unwrap_err();
        assert_eq!(err.field_errors.get("name").map(String::as_str), Some("Genre name required"));

        let err = validate_genre(&GenreForm::default()).unwrap_err();
        assert!(err.field_errors.contains_key("name"));
    }

    #[test]
    fn names_over_the_limit_are_rejected() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        let err = validate_genre(&genre_form(&long)).unwrap_err();
        assert!(err.field_errors["name"].contains("at most 100"));
    }

    #[test]
    fn creator_dates_are_parsed_and_ordered() {
        let form = CreatorForm {
            first_name: Some("Isaac".to_string()),
            last_name: Some("Asimov".to_string()),
            date_of_birth: Some("1920-01-02".to_string()),
            date_of_death: Some("1992-04-06".to_string()),
        };
        let draft = validate_creator(&form).unwrap();
        assert_eq!(draft.date_of_birth, NaiveDate::from_ymd_opt(1920, 1, 2));

        let backwards = CreatorForm {
            date_of_death: Some("1900-01-01".to_string()),
            ..form.clone()
        };
        let err = validate_creator(&backwards).unwrap_err();
        assert!(err.field_errors.contains_key("date_of_death"));

        let garbled = CreatorForm {
            date_of_birth: Some("June 6th".to_string()),
            ..form
        };
        let err = validate_creator(&garbled).unwrap_err();
        assert!(err.field_errors.contains_key("date_of_birth"));
    }

    #[test]
    fn show_requires_title_summary_and_creator() {
        let err = validate_show(&ShowForm::default()).unwrap_err();
        let fields: Vec<&str> = err.field_errors.keys().map(String::as_str).collect();
        assert_eq!(fields, vec!["creator", "summary", "title"]);
    }

    #[test]
    fn duplicate_genre_ids_are_collapsed() {
        let genre = Uuid::new_v4().to_string();
        let form = ShowForm {
            title: Some("Test Book 1".to_string()),
            summary: Some("Summary of test book 1".to_string()),
            creator: Some(Uuid::new_v4().to_string()),
            genre: vec![genre.clone(), genre],
            ..Default::default()
        };
        assert_eq!(validate_show(&form).unwrap().genre_ids.len(), 1);
    }

    #[tokio::test]
    async fn existing_genre_is_returned_instead_of_duplicated() {
        let store = MemoryStore::new();
        let first = create_genre(&store, &genre_form("Fantasy")).await.unwrap();
        let second = create_genre(&store, &genre_form(" Fantasy ")).await.unwrap();

        assert!(matches!(first, Created::New(_)));
        assert_eq!(second, Created::Existing(first.into_inner()));
        assert_eq!(Repository::<Genre>::count(&store).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn show_with_unknown_references_is_rejected() {
        let store = MemoryStore::new();
        let form = ShowForm {
            title: Some("Apes and Angels".to_string()),
            summary: Some("Humankind headed out to the stars".to_string()),
            creator: Some(Uuid::new_v4().to_string()),
            genre: vec![Uuid::new_v4().to_string()],
            ..Default::default()
        };

        match create_show(&store, &form).await {
            Err(CatalogError::Validation(err)) => {
                assert_eq!(err.field_errors["creator"], "Creator does not exist");
                assert!(err.field_errors["genre"].contains("does not exist"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(Repository::<Show>::count(&store).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn every_missing_genre_is_reported() {
        let store = MemoryStore::new();
        let creator = Repository::<Creator>::insert(
            &store,
            NewCreator {
                first_name: "Ben".to_string(),
                last_name: "Bova".to_string(),
                date_of_birth: None,
                date_of_death: None,
            },
        )
        .await
        .unwrap();
        let known = Repository::<Genre>::insert(&store, NewGenre { name: "Science Fiction".to_string() })
            .await
            .unwrap();
        let (first, second) = (Uuid::new_v4(), Uuid::new_v4());

        let form = ShowForm {
            title: Some("Death Wave".to_string()),
            summary: Some("Earth must face a lethal wave of radiation".to_string()),
            creator: Some(creator.id.to_string()),
            genre: vec![first.to_string(), known.id.to_string(), second.to_string()],
            ..Default::default()
        };

        match create_show(&store, &form).await {
            Err(CatalogError::Validation(err)) => {
                let message = &err.field_errors["genre"];
                assert!(message.contains(&first.to_string()));
                assert!(message.contains(&second.to_string()));
                assert!(!message.contains(&known.id.to_string()));
                assert!(!err.field_errors.contains_key("creator"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn every_invalid_genre_identifier_is_reported() {
        let form = ShowForm {
            title: Some("Death Wave".to_string()),
            summary: Some("Earth must face a lethal wave of radiation".to_string()),
            creator: Some(Uuid::new_v4().to_string()),
            genre: vec!["abc".to_string(), "xyz".to_string()],
            ..Default::default()
        };

        let err = validate_show(&form).unwrap_err();
        assert_eq!(err.field_errors["genre"], "Invalid genre identifier: abc, xyz");
    }

    #[tokio::test]
    async fn detail_of_missing_genre_is_not_found() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        let err = genre_detail(&store, &id.to_string()).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { kind: EntityKind::Genre, id: missing } if missing == id));
    }
}
