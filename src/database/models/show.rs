use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::EntityKind;

/// A show references exactly one creator and any number of genres.
/// Neither reference is enforced by the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Show {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub creator_id: Uuid,
    pub genre_ids: Vec<Uuid>,
    pub poster: Option<String>,
    pub seasons: Option<i32>,
    pub imdb_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewShow {
    pub title: String,
    pub summary: String,
    pub creator_id: Uuid,
    pub genre_ids: Vec<Uuid>,
    pub poster: Option<String>,
    pub seasons: Option<i32>,
    pub imdb_id: Option<String>,
}

/// Compact form of a show, listed on detail and delete views
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowSummary {
    pub id: Uuid,
    pub title: String,
    pub url: String,
}

impl From<&Show> for ShowSummary {
    fn from(show: &Show) -> Self {
        Self {
            id: show.id,
            title: show.title.clone(),
            url: EntityKind::Show.detail_url(show.id),
        }
    }
}
