//! Runs the delete workflow against a real Postgres database.
//!
//! Set `DATABASE_URL` to enable; every test returns early when it is unset.
//! Rows are named with a per-test tag and removed again at the end.

use anyhow::Result;
use uuid::Uuid;

use show_catalog::config::AppConfig;
use show_catalog::database::models::{Creator, Genre, NewCreator, NewGenre, NewShow, Show};
use show_catalog::database::schema::ensure_schema;
use show_catalog::database::{
    CatalogStore, ForeignKey, GenreRepository, PgStore, Repository, ShowRepository,
};
use show_catalog::services::{confirm_delete, DeleteOutcome};

async fn connect() -> Result<Option<PgStore>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres test");
        return Ok(None);
    };

    let mut config = AppConfig::development().database;
    config.url = Some(url);
    config.max_connections = 2;

    let store = PgStore::connect(&config).await?;
    ensure_schema(store.pool()).await?;
    Ok(Some(store))
}

fn tag() -> String {
    Uuid::new_v4().simple().to_string()
}

async fn insert_genre(store: &PgStore, name: String) -> Result<Genre> {
    Ok(Repository::<Genre>::insert(store, NewGenre { name }).await?)
}

async fn insert_creator(store: &PgStore, tag: &str) -> Result<Creator> {
    let draft = NewCreator {
        first_name: "Ben".to_string(),
        last_name: format!("Bova {}", tag),
        date_of_birth: None,
        date_of_death: None,
    };
    Ok(Repository::<Creator>::insert(store, draft).await?)
}

async fn insert_show(store: &PgStore, tag: &str, creator: &Creator, genres: &[&Genre]) -> Result<Show> {
    let draft = NewShow {
        title: format!("Apes and Angels {}", tag),
        summary: "Humankind headed out to the stars".to_string(),
        creator_id: creator.id,
        genre_ids: genres.iter().map(|g| g.id).collect(),
        poster: None,
        seasons: Some(1),
        imdb_id: None,
    };
    Ok(Repository::<Show>::insert(store, draft).await?)
}

#[tokio::test]
async fn referenced_genre_and_creator_are_blocked() -> Result<()> {
    let Some(store) = connect().await? else {
        return Ok(());
    };
    let tag = tag();

    let genre = insert_genre(&store, format!("Science Fiction {}", tag)).await?;
    let other = insert_genre(&store, format!("Space Opera {}", tag)).await?;
    let creator = insert_creator(&store, &tag).await?;
    let show = insert_show(&store, &tag, &creator, &[&genre, &other]).await?;

    let by_genre = store.find_by_foreign_key(ForeignKey::Genre(genre.id)).await?;
    assert_eq!(by_genre, vec![show.clone()]);
    let by_creator = store.find_by_foreign_key(ForeignKey::Creator(creator.id)).await?;
    assert_eq!(by_creator, vec![show.clone()]);

    match confirm_delete::<Genre, _>(&store, &genre.id.to_string()).await? {
        DeleteOutcome::Blocked(confirmation) => {
            assert_eq!(confirmation.entity.id, genre.id);
            assert_eq!(confirmation.dependents, vec![show.clone()]);
        }
        other => panic!("expected blocked delete, got {:?}", other),
    }
    match confirm_delete::<Creator, _>(&store, &creator.id.to_string()).await? {
        DeleteOutcome::Blocked(confirmation) => assert_eq!(confirmation.dependents.len(), 1),
        other => panic!("expected blocked delete, got {:?}", other),
    }
    assert!(Repository::<Genre>::find_by_id(&store, genre.id).await?.is_some());
    assert!(Repository::<Creator>::find_by_id(&store, creator.id).await?.is_some());

    // Once the show is gone nothing refers to them
    assert_eq!(
        confirm_delete::<Show, _>(&store, &show.id.to_string()).await?,
        DeleteOutcome::Removed
    );
    for id in [genre.id, other.id] {
        assert_eq!(confirm_delete::<Genre, _>(&store, &id.to_string()).await?, DeleteOutcome::Removed);
    }
    assert_eq!(
        confirm_delete::<Creator, _>(&store, &creator.id.to_string()).await?,
        DeleteOutcome::Removed
    );

    store.close().await;
    Ok(())
}

#[tokio::test]
async fn unreferenced_genre_is_removed() -> Result<()> {
    let Some(store) = connect().await? else {
        return Ok(());
    };
    let genre = insert_genre(&store, format!("Crime {}", tag())).await?;
    let id = genre.id.to_string();

    assert_eq!(confirm_delete::<Genre, _>(&store, &id).await?, DeleteOutcome::Removed);
    assert!(Repository::<Genre>::find_by_id(&store, genre.id).await?.is_none());
    assert!(!Repository::<Genre>::remove_by_id(&store, genre.id).await?);
    assert_eq!(confirm_delete::<Genre, _>(&store, &id).await?, DeleteOutcome::NotFound);

    store.close().await;
    Ok(())
}

#[tokio::test]
async fn duplicate_genre_name_returns_existing_row() -> Result<()> {
    let Some(store) = connect().await? else {
        return Ok(());
    };
    let name = format!("Fantasy {}", tag());

    let first = insert_genre(&store, name.clone()).await?;
    let second = insert_genre(&store, name.clone()).await?;
    assert_eq!(first.id, second.id);
    assert_eq!(store.find_by_name(&name).await?.map(|g| g.id), Some(first.id));

    Repository::<Genre>::remove_by_id(&store, first.id).await?;
    store.close().await;
    Ok(())
}

#[tokio::test]
async fn listing_ignores_case() -> Result<()> {
    let Some(store) = connect().await? else {
        return Ok(());
    };
    let tag = tag();
    let mut inserted = Vec::new();
    for word in ["cyberpunk", "Western", "anthology", "Biopic"] {
        inserted.push(insert_genre(&store, format!("{} {}", tag, word)).await?);
    }

    let names: Vec<String> = Repository::<Genre>::list(&store)
        .await?
        .into_iter()
        .filter(|g| g.name.starts_with(&tag))
        .map(|g| g.name)
        .collect();
    let expected: Vec<String> = ["anthology", "Biopic", "cyberpunk", "Western"]
        .iter()
        .map(|word| format!("{} {}", tag, word))
        .collect();
    assert_eq!(names, expected);

    for genre in inserted {
        Repository::<Genre>::remove_by_id(&store, genre.id).await?;
    }
    store.close().await;
    Ok(())
}
