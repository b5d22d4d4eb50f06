use serde::Serialize;
use serde_json::{json, Value};

use crate::api::format::{entities_to_api_array, entity_to_api_value, ApiFormat};
use crate::database::models::ShowSummary;
use crate::services::catalog_service::{CatalogCounts, CreatorDetail, GenreDetail, ShowDetail};
use crate::services::delete_service::DeleteConfirmation;

/// Delete confirmation page: the entity plus whatever still refers to it
#[derive(Debug, Clone, Serialize)]
pub struct DeleteView {
    pub title: String,
    pub entity: Value,
    pub dependents: Vec<ShowSummary>,
    pub dependent_count: usize,
    /// True when the delete would be (or was) refused
    pub blocked: bool,
}

impl DeleteView {
    pub fn from_confirmation<E: ApiFormat>(confirmation: &DeleteConfirmation<E>) -> Self {
        let dependents: Vec<ShowSummary> = confirmation.dependents.iter().map(ShowSummary::from).collect();
        Self {
            title: format!("Delete {}", E::KIND.label()),
            entity: entity_to_api_value(&confirmation.entity),
            dependent_count: dependents.len(),
            blocked: !dependents.is_empty(),
            dependents,
        }
    }
}

fn summaries(shows: &[crate::database::models::Show]) -> Vec<ShowSummary> {
    shows.iter().map(ShowSummary::from).collect()
}

pub fn creator_detail_view(detail: &CreatorDetail) -> Value {
    json!({
        "title": "Creator Detail",
        "creator": entity_to_api_value(&detail.creator),
        "shows": summaries(&detail.shows),
    })
}

pub fn genre_detail_view(detail: &GenreDetail) -> Value {
    json!({
        "title": "Genre Detail",
        "genre": entity_to_api_value(&detail.genre),
        "shows": summaries(&detail.shows),
    })
}

pub fn show_detail_view(detail: &ShowDetail) -> Value {
    json!({
        "title": detail.show.title,
        "show": entity_to_api_value(&detail.show),
        "creator": detail.creator.as_ref().map(entity_to_api_value),
        "genres": entities_to_api_array(&detail.genres),
    })
}

pub fn index_view(counts: &CatalogCounts) -> Value {
    json!({
        "title": "Show Catalog Home",
        "counts": counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Genre, Show};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn delete_view_counts_dependents() {
        let genre = Genre {
            id: Uuid::new_v4(),
            name: "Fantasy".to_string(),
            created_at: Utc::now(),
        };
        let show = Show {
            id: Uuid::new_v4(),
            title: "The Wise Man's Fear".to_string(),
            summary: "Kvothe in exile".to_string(),
            creator_id: Uuid::new_v4(),
            genre_ids: vec![genre.id],
            poster: None,
            seasons: None,
            imdb_id: None,
            created_at: Utc::now(),
        };

        let view = DeleteView::from_confirmation(&DeleteConfirmation {
            entity: genre.clone(),
            dependents: vec![show.clone()],
        });

        assert_eq!(view.title, "Delete Genre");
        assert!(view.blocked);
        assert_eq!(view.dependent_count, 1);
        assert_eq!(view.dependents[0].url, format!("/catalog/show/{}", show.id));
        assert_eq!(view.entity["attributes"]["name"], "Fantasy");
    }
}
