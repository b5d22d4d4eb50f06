use serde_json::{json, Map, Value};

use crate::database::models::{Creator, Genre, Show};
use crate::database::repository::Entity;

/// Adds computed attributes to the wire format of an entity
pub trait ApiFormat: Entity {
    fn computed_attributes(&self, _attributes: &mut Map<String, Value>) {}
}

impl ApiFormat for Creator {
    fn computed_attributes(&self, attributes: &mut Map<String, Value>) {
        attributes.insert("name".into(), Value::String(self.name()));
    }
}

impl ApiFormat for Genre {}

impl ApiFormat for Show {}

/// Convert an entity into the public wire format
/// { id, type, attributes, links }
pub fn entity_to_api_value<E: ApiFormat>(entity: &E) -> Value {
    let mut attributes = match serde_json::to_value(entity) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(e) => {
            tracing::error!("Failed to serialize {}: {}", E::KIND, e);
            Map::new()
        }
    };
    attributes.remove("id");
    entity.computed_attributes(&mut attributes);

    json!({
        "id": entity.id(),
        "type": E::KIND,
        "attributes": attributes,
        "links": { "self": entity.url() },
    })
}

pub fn entities_to_api_array<E: ApiFormat>(entities: &[E]) -> Value {
    Value::Array(entities.iter().map(entity_to_api_value).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn creator_gets_name_and_self_link() {
        let creator = Creator {
            id: Uuid::new_v4(),
            first_name: "Patrick".to_string(),
            last_name: "Rothfuss".to_string(),
            date_of_birth: None,
            date_of_death: None,
            created_at: Utc::now(),
        };

        let value = entity_to_api_value(&creator);
        assert_eq!(value["id"], json!(creator.id));
        assert_eq!(value["type"], "creator");
        assert_eq!(value["attributes"]["name"], "Rothfuss, Patrick");
        assert!(value["attributes"].get("id").is_none());
        assert_eq!(value["links"]["self"], format!("/catalog/creator/{}", creator.id));
    }

    #[test]
    fn show_attributes_keep_references() {
        let creator_id = Uuid::new_v4();
        let show = Show {
            id: Uuid::new_v4(),
            title: "Death Wave".to_string(),
            summary: "Radiation from the core".to_string(),
            creator_id,
            genre_ids: vec![],
            poster: None,
            seasons: Some(2),
            imdb_id: None,
            created_at: Utc::now(),
        };

        let value = entity_to_api_value(&show);
        assert_eq!(value["type"], "show");
        assert_eq!(value["attributes"]["creator_id"], json!(creator_id));
        assert_eq!(value["attributes"]["seasons"], 2);
    }
}
