use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Creator {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Creator {
    /// Display name, "last, first"
    pub fn name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

/// Validated input for a new creator
#[derive(Debug, Clone, PartialEq)]
pub struct NewCreator {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}
