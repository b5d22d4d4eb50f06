/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kinds of record stored in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Creator,
    Genre,
    Show,
}

impl EntityKind {
    /// Singular path segment, e.g. `/catalog/genre/:id`
    pub fn singular(&self) -> &'static str {
        match self {
            EntityKind::Creator => "creator",
            EntityKind::Genre => "genre",
            EntityKind::Show => "show",
        }
    }

    /// Plural path segment, e.g. `/catalog/genres`
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Creator => "creators",
            EntityKind::Genre => "genres",
            EntityKind::Show => "shows",
        }
    }

    /// Human-readable label used in view titles
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Creator => "Creator",
            EntityKind::Genre => "Genre",
            EntityKind::Show => "Show",
        }
    }

    pub fn list_url(&self) -> String {
        format!("/catalog/{}", self.plural())
    }

    pub fn detail_url(&self, id: Uuid) -> String {
        format!("/catalog/{}/{}", self.singular(), id)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.singular())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "creator" | "creators" => Ok(EntityKind::Creator),
            "genre" | "genres" => Ok(EntityKind::Genre),
            "show" | "shows" => Ok(EntityKind::Show),
            other => Err(format!("unknown entity kind '{}'", other)),
        }
    }
}

/// Parse a client-supplied identifier into the store's id format
pub fn parse_id(raw: &str) -> Result<Uuid, uuid::Error> {
    Uuid::parse_str(raw.trim())
}
