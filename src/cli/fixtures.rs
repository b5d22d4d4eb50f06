//! Sample catalog used by `catalog populate` and the integration tests.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{Creator, Genre, NewCreator, NewGenre, NewShow, Show};
use crate::database::{CatalogStore, DatabaseError, GenreRepository, Repository};

/// What a populate run inserted
#[derive(Debug, Clone, Serialize)]
pub struct Populated {
    pub creators: Vec<Creator>,
    pub genres: Vec<Genre>,
    pub shows: Vec<Show>,
}

struct SampleShow {
    title: &'static str,
    summary: &'static str,
    imdb_id: &'static str,
    creator: usize,
    genres: &'static [usize],
}

const GENRES: [&str; 3] = ["Fantasy", "Science Fiction", "Crime"];

const SHOWS: [SampleShow; 7] = [
    SampleShow {
        title: "The Name of the Wind (The Kingkiller Chronicle, #1)",
        summary: "I have stolen princesses back from sleeping barrow kings. I burned down the town of Trebon. \
                  I have spent the night with Felurian and left with both my sanity and my life.",
        imdb_id: "9781473211896",
        creator: 0,
        genres: &[0],
    },
    SampleShow {
        title: "The Wise Man's Fear (The Kingkiller Chronicle, #2)",
        summary: "Picking up the tale of Kvothe Kingkiller once again, we follow him into exile, into \
                  political intrigue, courtship, adventure, love and magic.",
        imdb_id: "9788401352836",
        creator: 0,
        genres: &[0],
    },
    SampleShow {
        title: "The Slow Regard of Silent Things (Kingkiller Chronicle)",
        summary: "Deep below the University, there is a dark place. Few people know of it: a broken web of \
                  ancient passageways and abandoned rooms.",
        imdb_id: "9780756411336",
        creator: 0,
        genres: &[0],
    },
    SampleShow {
        title: "Apes and Angels",
        summary: "Humankind headed out to the stars not for conquest, nor exploration, nor even for \
                  curiosity. Humans went to the stars in a desperate crusade to save intelligent life.",
        imdb_id: "9780765379528",
        creator: 1,
        genres: &[1],
    },
    SampleShow {
        title: "Death Wave",
        summary: "An explosion in the black hole at the heart of the Milky Way galaxy has created a wave of \
                  deadly radiation, expanding out from the core toward Earth.",
        imdb_id: "9780765379504",
        creator: 1,
        genres: &[1],
    },
    SampleShow {
        title: "Test Book 1",
        summary: "Summary of test book 1",
        imdb_id: "ISBN111111",
        creator: 4,
        genres: &[0, 1],
    },
    SampleShow {
        title: "Test Book 2",
        summary: "Summary of test book 2",
        imdb_id: "ISBN222222",
        creator: 4,
        genres: &[],
    },
];

fn creators() -> Vec<NewCreator> {
    let creator = |first: &str, last: &str, born: Option<NaiveDate>, died: Option<NaiveDate>| NewCreator {
        first_name: first.to_string(),
        last_name: last.to_string(),
        date_of_birth: born,
        date_of_death: died,
    };

    vec![
        creator("Patrick", "Rothfuss", NaiveDate::from_ymd_opt(1973, 6, 6), None),
        creator("Ben", "Bova", NaiveDate::from_ymd_opt(1932, 11, 8), None),
        creator(
            "Isaac",
            "Asimov",
            NaiveDate::from_ymd_opt(1920, 1, 2),
            NaiveDate::from_ymd_opt(1992, 4, 6),
        ),
        creator("Bob", "Billings", None, None),
        creator("Jim", "Jones", NaiveDate::from_ymd_opt(1971, 12, 16), None),
    ]
}

/// Insert the sample creators and genres, then the shows that refer to them
pub async fn populate<S>(store: &S) -> Result<Populated, DatabaseError>
where
    S: CatalogStore + ?Sized,
{
    let mut created_creators = Vec::new();
    for draft in creators() {
        created_creators.push(<S as Repository<Creator>>::insert(store, draft).await?);
    }

    // Genres are unique by name, so a second run reuses the first run's rows
    let mut created_genres = Vec::new();
    for name in GENRES {
        let genre = match store.find_by_name(name).await? {
            Some(existing) => existing,
            None => {
                let draft = NewGenre { name: name.to_string() };
                <S as Repository<Genre>>::insert(store, draft).await?
            }
        };
        created_genres.push(genre);
    }

    let mut created_shows = Vec::new();
    for sample in &SHOWS {
        let genre_ids: Vec<Uuid> = sample.genres.iter().map(|&i| created_genres[i].id).collect();
        let draft = NewShow {
            title: sample.title.to_string(),
            summary: sample.summary.to_string(),
            creator_id: created_creators[sample.creator].id,
            genre_ids,
            poster: None,
            seasons: None,
            imdb_id: Some(sample.imdb_id.to_string()),
        };
        created_shows.push(<S as Repository<Show>>::insert(store, draft).await?);
    }

    tracing::info!(
        creators = created_creators.len(),
        genres = created_genres.len(),
        shows = created_shows.len(),
        "Populated sample catalog"
    );

    Ok(Populated {
        creators: created_creators,
        genres: created_genres,
        shows: created_shows,
    })
}
